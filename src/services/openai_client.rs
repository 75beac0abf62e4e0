use std::fmt;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tracing::debug;

use super::{
    tool_call_utils::{extract_function_arguments, first_tool_call, provider_error_message},
    transport::CompletionTransport,
};
use crate::{
    core::GenerationRequest,
    error::{GenerationError, Result},
};

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "openai/gpt-4.1-mini";

/// Client for an OpenAI-compatible `/chat/completions` endpoint.
#[derive(Clone)]
pub struct OpenAIClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

impl OpenAIClient {
    /// Fails when `api_key` is empty so a missing credential surfaces at startup.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(GenerationError::Config(
                "an API key is required to create the completion client".to_string(),
            ));
        }

        let http = reqwest::Client::builder().build().map_err(|err| {
            GenerationError::Config(format!("Failed to build HTTP client: {err}"))
        })?;

        Ok(Self {
            http,
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Reads `OPENAI_API_KEY` (or `OPENROUTER_API_KEY`), then applies
    /// [`with_env_settings`](Self::with_env_settings).
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .or_else(|_| std::env::var("OPENROUTER_API_KEY"))
            .map_err(|_| {
                GenerationError::Config(
                    "OPENAI_API_KEY or OPENROUTER_API_KEY must be set".to_string(),
                )
            })?;

        Ok(Self::new(api_key)?.with_env_settings())
    }

    /// Applies `OPENAI_BASE_URL` (or `OPENROUTER_BASE_URL`) and
    /// `TRIPGEN_MODEL` when they are set.
    pub fn with_env_settings(mut self) -> Self {
        if let Ok(base_url) =
            std::env::var("OPENAI_BASE_URL").or_else(|_| std::env::var("OPENROUTER_BASE_URL"))
        {
            self.set_base_url(base_url);
        }
        if let Ok(model) = std::env::var("TRIPGEN_MODEL") {
            self.model = model;
        }
        self
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) {
        self.base_url = base_url.into();
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.set_base_url(base_url);
        self
    }

    /// Model used when a request does not name one.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST `body` and return the decoded completion envelope.
    pub async fn chat_completion(&self, body: &Value) -> Result<Value> {
        let request_url = build_chat_url(&self.base_url);

        let response = self
            .http
            .post(&request_url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .header("X-Title", "tripgen-rs")
            .json(body)
            .send()
            .await
            .map_err(|err| GenerationError::server(format!("HTTP request failed: {err}")))?;

        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            return Err(GenerationError::Authentication);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<u64>().ok());
            return Err(GenerationError::RateLimit { retry_after });
        }

        let response_text = response
            .text()
            .await
            .map_err(|err| GenerationError::server(format!("Failed to read response: {err}")))?;

        if status == StatusCode::BAD_REQUEST {
            return Err(GenerationError::BadRequest(response_text));
        }

        if !status.is_success() {
            return Err(GenerationError::Server {
                status: Some(status.as_u16()),
                message: provider_error_message(&response_text),
            });
        }

        let response_json: Value = serde_json::from_str(&response_text).map_err(|err| {
            GenerationError::server(format!("Failed to parse completion envelope: {err}"))
        })?;

        if let Some(error) = response_json.get("error") {
            let error_message = error
                .get("message")
                .and_then(|value| value.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(GenerationError::server(format!("API error: {error_message}")));
        }

        Ok(response_json)
    }
}

#[async_trait]
impl CompletionTransport for OpenAIClient {
    async fn send(&self, request: &GenerationRequest) -> Result<String> {
        let model = request.model().unwrap_or(self.model.as_str());
        let body = ChatCompletionRequest::new(model, request.messages())
            .with_tools(vec![request.tool_definition()])
            .with_tool_choice(request.tool_choice())
            .with_temperature(request.temperature())
            .with_max_tokens(request.max_tokens())
            .into_value();

        debug!(
            target: "tripgen::transport",
            model,
            tool = request.schema_name(),
            "sending chat completion"
        );

        let response = self.chat_completion(&body).await?;
        let tool_call = first_tool_call(&response)?;
        let arguments = extract_function_arguments(tool_call)?;

        debug!(
            target: "tripgen::transport",
            bytes = arguments.len(),
            "received tool call arguments"
        );

        Ok(arguments)
    }
}

fn build_chat_url(base_url: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with("/chat/completions") {
        trimmed.to_string()
    } else {
        format!("{}/chat/completions", trimmed)
    }
}

#[derive(Clone, Debug)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Value>,
    tools: Vec<Value>,
    tool_choice: Option<Value>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl ChatCompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<Value>) -> Self {
        Self {
            model: model.into(),
            messages,
            tools: Vec::new(),
            tool_choice: None,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_tools(mut self, tools: Vec<Value>) -> Self {
        self.tools = tools;
        self
    }

    pub fn with_tool_choice(mut self, tool_choice: Value) -> Self {
        self.tool_choice = Some(tool_choice);
        self
    }

    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn into_value(self) -> Value {
        let mut body = json!({
            "model": self.model,
            "messages": self.messages,
        });

        if !self.tools.is_empty() {
            body["tools"] = Value::Array(self.tools);
        }

        if let Some(tool_choice) = self.tool_choice {
            body["tool_choice"] = tool_choice;
        }

        if let Some(temperature) = self.temperature {
            body["temperature"] = json!(temperature);
        }

        if let Some(max_tokens) = self.max_tokens {
            body["max_tokens"] = json!(max_tokens);
        }

        body
    }
}
