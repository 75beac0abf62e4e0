use crate::schemas::{CompletionSchema, SchemaHandle};
use serde_json::Value;

/// Everything needed for one structured generation call.
///
/// Built once per call and never mutated afterwards; retries resend the
/// identical request.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    system_prompt: String,
    user_prompt: String,
    schema: SchemaHandle,
    schema_name: String,
    schema_description: String,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl GenerationRequest {
    pub fn new(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
        schema: SchemaHandle,
    ) -> Self {
        let schema_name = schema.schema_name().to_string();
        let schema_description = schema
            .description()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Return a `{}` object.", schema_name));

        Self {
            system_prompt: system_prompt.into(),
            user_prompt: user_prompt.into(),
            schema,
            schema_name,
            schema_description,
            model: None,
            temperature: None,
            max_tokens: None,
        }
    }

    /// Request whose schema, tool name and tool description come from `T`.
    pub fn for_schema<T: CompletionSchema>(
        system_prompt: impl Into<String>,
        user_prompt: impl Into<String>,
    ) -> Self {
        Self::new(system_prompt, user_prompt, T::schema().clone())
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
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

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn user_prompt(&self) -> &str {
        &self.user_prompt
    }

    pub fn schema(&self) -> &SchemaHandle {
        &self.schema
    }

    /// Function name of the forced tool call.
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    pub fn schema_description(&self) -> &str {
        &self.schema_description
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }

    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    /// Tool definition carrying the schema as its `parameters`.
    pub fn tool_definition(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.schema_name,
                "description": self.schema_description,
                "parameters": self.schema.to_json_schema()
            }
        })
    }

    /// `tool_choice` pinning the response to exactly this tool.
    pub fn tool_choice(&self) -> Value {
        serde_json::json!({
            "type": "function",
            "function": { "name": self.schema_name }
        })
    }

    pub fn messages(&self) -> Vec<Value> {
        vec![
            serde_json::json!({ "role": "system", "content": self.system_prompt }),
            serde_json::json!({ "role": "user", "content": self.user_prompt }),
        ]
    }
}
