use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Issues shown in an error message; the full list stays on the error value.
const MAX_DISPLAYED_ISSUES: usize = 3;

/// A single structural problem found while validating a model document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// JSON pointer into the document, `<root>` for the document itself
    pub path: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            path: if path.is_empty() {
                "<root>".to_string()
            } else {
                path
            },
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Main error type for the generation pipeline
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider rejected the API credential")]
    Authentication,

    #[error("Provider rejected the request: {0}")]
    BadRequest(String),

    #[error("Rate limit exceeded{}", retry_hint(.retry_after))]
    RateLimit { retry_after: Option<u64> },

    #[error("Provider error{}: {message}", status_hint(.status))]
    Server {
        status: Option<u16>,
        message: String,
    },

    #[error("Tool call arguments are not valid JSON: {reason}")]
    InvalidJsonResponse { reason: String, raw: String },

    #[error("Document does not match `{schema}` schema: {}", summarize_issues(.issues))]
    SchemaValidation {
        schema: String,
        issues: Vec<ValidationIssue>,
    },
}

/// Result type alias
pub type Result<T> = std::result::Result<T, GenerationError>;

fn retry_hint(retry_after: &Option<u64>) -> String {
    retry_after
        .map(|secs| format!(": retry after {secs}s"))
        .unwrap_or_default()
}

fn status_hint(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" (HTTP {code})"))
        .unwrap_or_default()
}

fn summarize_issues(issues: &[ValidationIssue]) -> String {
    if issues.is_empty() {
        return "document failed schema validation".to_string();
    }

    let mut summary = issues
        .iter()
        .take(MAX_DISPLAYED_ISSUES)
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");

    if issues.len() > MAX_DISPLAYED_ISSUES {
        summary.push_str("; additional errors truncated");
    }

    summary
}

impl GenerationError {
    pub(crate) fn server(message: impl Into<String>) -> Self {
        GenerationError::Server {
            status: None,
            message: message.into(),
        }
    }

    /// Only schema validation failures may succeed on a repeated attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationError::SchemaValidation { .. })
    }

    /// Whether a caller may reasonably try the same request again later.
    ///
    /// Broader than [`is_retryable`](Self::is_retryable), which only covers
    /// what the pipeline retries by itself.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            GenerationError::RateLimit { .. }
                | GenerationError::Server { .. }
                | GenerationError::InvalidJsonResponse { .. }
                | GenerationError::SchemaValidation { .. }
        )
    }

    /// Get the error code for structured responses
    pub fn error_code(&self) -> &'static str {
        match self {
            GenerationError::Config(_) => "CONFIG_ERROR",
            GenerationError::Authentication => "AUTHENTICATION_ERROR",
            GenerationError::BadRequest(_) => "BAD_REQUEST",
            GenerationError::RateLimit { .. } => "RATE_LIMIT_ERROR",
            GenerationError::Server { .. } => "SERVER_ERROR",
            GenerationError::InvalidJsonResponse { .. } => "INVALID_JSON_RESPONSE",
            GenerationError::SchemaValidation { .. } => "SCHEMA_VALIDATION_ERROR",
        }
    }

    /// Suggested status for an HTTP layer sitting in front of the pipeline.
    pub fn http_status(&self) -> u16 {
        match self {
            GenerationError::Config(_) | GenerationError::Authentication => 500,
            GenerationError::BadRequest(_) => 400,
            GenerationError::RateLimit { .. } => 429,
            GenerationError::Server { .. }
            | GenerationError::InvalidJsonResponse { .. }
            | GenerationError::SchemaValidation { .. } => 503,
        }
    }

    pub fn retry_after(&self) -> Option<u64> {
        match self {
            GenerationError::RateLimit { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// End-user message. Never includes provider bodies or raw model output.
    pub fn user_message(&self) -> &'static str {
        match self {
            GenerationError::Config(_) | GenerationError::Authentication => {
                "The plan generator is not configured correctly. Please contact support."
            }
            GenerationError::BadRequest(_) => {
                "The plan request could not be processed. Please check your note and options."
            }
            GenerationError::RateLimit { .. } => {
                "Too many plan requests right now. Please wait a moment and try again."
            }
            GenerationError::Server { .. } => {
                "The plan generator is temporarily unavailable. Please try again later."
            }
            GenerationError::InvalidJsonResponse { .. }
            | GenerationError::SchemaValidation { .. } => {
                "The generated plan was incomplete. Please try again."
            }
        }
    }

    pub fn issues(&self) -> &[ValidationIssue] {
        match self {
            GenerationError::SchemaValidation { issues, .. } => issues,
            _ => &[],
        }
    }

    /// Convert to a structured error payload safe to return to end users
    pub fn to_error_payload(&self) -> serde_json::Value {
        let mut payload = serde_json::json!({
            "error": {
                "code": self.error_code(),
                "message": self.user_message(),
                "retryable": self.is_transient()
            }
        });

        if let Some(retry_after) = self.retry_after() {
            payload["error"]["retry_after"] = serde_json::json!(retry_after);
        }

        payload
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_schema_validation_is_retryable() {
        let validation = GenerationError::SchemaValidation {
            schema: "itinerary_plan".to_string(),
            issues: vec![],
        };
        assert!(validation.is_retryable());

        for err in [
            GenerationError::Authentication,
            GenerationError::BadRequest("bad".to_string()),
            GenerationError::RateLimit { retry_after: None },
            GenerationError::server("down"),
            GenerationError::InvalidJsonResponse {
                reason: "eof".to_string(),
                raw: "{".to_string(),
            },
            GenerationError::Config("missing key".to_string()),
        ] {
            assert!(!err.is_retryable(), "{} should not retry", err.error_code());
        }
    }

    #[test]
    fn validation_message_truncates_issue_list() {
        let issues = (0..5)
            .map(|idx| ValidationIssue::new(format!("/days/{idx}"), "missing `day`"))
            .collect();
        let err = GenerationError::SchemaValidation {
            schema: "itinerary_plan".to_string(),
            issues,
        };

        let message = err.to_string();
        assert!(message.contains("/days/2"));
        assert!(!message.contains("/days/3"));
        assert!(message.ends_with("additional errors truncated"));
        assert_eq!(err.issues().len(), 5);
    }

    #[test]
    fn empty_path_is_reported_as_root() {
        let issue = ValidationIssue::new("", "expected object");
        assert_eq!(issue.to_string(), "<root>: expected object");
    }

    #[test]
    fn payload_hides_provider_body() {
        let err = GenerationError::BadRequest("secret provider detail".to_string());
        let payload = err.to_error_payload();

        assert_eq!(payload["error"]["code"], "BAD_REQUEST");
        assert!(!payload.to_string().contains("secret provider detail"));
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn rate_limit_payload_carries_retry_hint() {
        let err = GenerationError::RateLimit {
            retry_after: Some(30),
        };
        assert_eq!(err.http_status(), 429);
        let payload = err.to_error_payload();
        assert_eq!(payload["error"]["retry_after"], 30);
        assert_eq!(payload["error"]["retryable"], true);
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "Rate limit exceeded: retry after 30s");
    }

    #[test]
    fn payload_marks_transient_failures_retryable() {
        for err in [
            GenerationError::server("down"),
            GenerationError::InvalidJsonResponse {
                reason: "eof".to_string(),
                raw: "{".to_string(),
            },
            GenerationError::SchemaValidation {
                schema: "itinerary_plan".to_string(),
                issues: vec![],
            },
        ] {
            assert_eq!(err.to_error_payload()["error"]["retryable"], true, "{}", err.error_code());
        }

        for err in [
            GenerationError::Authentication,
            GenerationError::BadRequest("bad".to_string()),
            GenerationError::Config("missing key".to_string()),
        ] {
            assert!(!err.is_transient());
            assert_eq!(err.to_error_payload()["error"]["retryable"], false, "{}", err.error_code());
        }
    }
}
