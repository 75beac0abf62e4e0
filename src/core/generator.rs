use crate::{
    core::GenerationRequest,
    error::{GenerationError, Result},
    schemas::{validate, CompletionSchema},
    services::{repair::repair, transport::CompletionTransport},
};
use tracing::{debug, warn};

/// Default attempt bound. Long generations make a second attempt expensive,
/// so retrying is opt-in.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1;

/// What the attempt loop does after a failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    /// Resend the identical request
    Retry,
    /// Return the error to the caller
    GiveUp,
}

/// Retry only schema validation failures, and only while attempts remain.
///
/// `attempt` is 1-based: the number of attempts already made.
pub fn retry_decision(error: &GenerationError, attempt: usize, max_attempts: usize) -> RetryDecision {
    if error.is_retryable() && attempt < max_attempts {
        RetryDecision::Retry
    } else {
        RetryDecision::GiveUp
    }
}

/// Drives send, repair and validate with a bounded number of attempts.
#[derive(Debug, Clone)]
pub struct StructuredGenerator<C> {
    transport: C,
    max_attempts: usize,
}

impl<C: CompletionTransport> StructuredGenerator<C> {
    pub fn new(transport: C) -> Self {
        Self {
            transport,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Values below 1 are treated as 1.
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> usize {
        self.max_attempts
    }

    pub fn transport(&self) -> &C {
        &self.transport
    }

    /// Run the request until it yields a valid `T` or a non-retryable error.
    pub async fn generate<T: CompletionSchema>(&self, request: &GenerationRequest) -> Result<T> {
        let mut attempt = 0;

        loop {
            attempt += 1;

            let error = match self.attempt::<T>(request).await {
                Ok(value) => {
                    debug!(
                        target: "tripgen::generator",
                        schema = request.schema_name(),
                        attempt,
                        "structured generation succeeded"
                    );
                    return Ok(value);
                }
                Err(error) => error,
            };

            match retry_decision(&error, attempt, self.max_attempts) {
                RetryDecision::Retry => {
                    warn!(
                        target: "tripgen::generator",
                        schema = request.schema_name(),
                        attempt,
                        max_attempts = self.max_attempts,
                        issues = error.issues().len(),
                        error = %error,
                        "model output failed validation, retrying"
                    );
                }
                RetryDecision::GiveUp => return Err(error),
            }
        }
    }

    async fn attempt<T: CompletionSchema>(&self, request: &GenerationRequest) -> Result<T> {
        let raw_arguments = self.transport.send(request).await?;
        let document = repair(&raw_arguments)?;
        validate::<T>(request.schema(), document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validation_error() -> GenerationError {
        GenerationError::SchemaValidation {
            schema: "itinerary_plan".to_string(),
            issues: vec![],
        }
    }

    #[test]
    fn validation_failure_retries_while_attempts_remain() {
        assert_eq!(retry_decision(&validation_error(), 1, 2), RetryDecision::Retry);
        assert_eq!(retry_decision(&validation_error(), 2, 2), RetryDecision::GiveUp);
        assert_eq!(retry_decision(&validation_error(), 1, 1), RetryDecision::GiveUp);
    }

    #[test]
    fn other_errors_never_retry() {
        let errors = [
            GenerationError::Authentication,
            GenerationError::RateLimit { retry_after: Some(5) },
            GenerationError::BadRequest("bad".to_string()),
            GenerationError::server("down"),
            GenerationError::InvalidJsonResponse {
                reason: "eof".to_string(),
                raw: String::new(),
            },
        ];

        for error in &errors {
            assert_eq!(retry_decision(error, 1, 5), RetryDecision::GiveUp);
        }
    }
}
