use crate::error::{GenerationError, Result};
use serde_json::Value;

/// Locate `choices[0].message.tool_calls[0]` in a completion envelope.
pub(super) fn first_tool_call(response: &Value) -> Result<&Value> {
    let message = response
        .get("choices")
        .and_then(|value| value.as_array())
        .and_then(|choices| choices.first())
        .and_then(|choice| choice.get("message"))
        .ok_or_else(|| {
            GenerationError::server("Completion response contained no assistant message")
        })?;

    message
        .get("tool_calls")
        .and_then(|value| value.as_array())
        .and_then(|calls| calls.first())
        .ok_or_else(|| GenerationError::server("Assistant message contained no tool call"))
}

/// Extract the arguments text of a tool call, enforcing `type == "function"`.
pub(super) fn extract_function_arguments(tool_call: &Value) -> Result<String> {
    let call_type = tool_call.get("type").and_then(|value| value.as_str());
    if call_type != Some("function") {
        return Err(GenerationError::server(format!(
            "Unexpected tool call type: {}",
            call_type.unwrap_or("<missing>")
        )));
    }

    let arguments = tool_call
        .get("function")
        .and_then(|function| function.get("arguments"))
        .ok_or_else(|| GenerationError::server("Tool call is missing function arguments"))?;

    // Some OpenAI-compatible gateways send the arguments already decoded.
    match arguments {
        Value::String(text) => Ok(text.clone()),
        Value::Object(_) => Ok(arguments.to_string()),
        other => Err(GenerationError::server(format!(
            "Tool call arguments have unexpected shape: {}",
            other
        ))),
    }
}

/// Best-effort `error.message` from a provider error body.
pub(super) fn provider_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|error| error.get("message"))
                .and_then(|value| value.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn envelope(tool_call: Value) -> Value {
        json!({ "choices": [{ "message": { "role": "assistant", "tool_calls": [tool_call] } }] })
    }

    #[test]
    fn extracts_arguments_string() {
        let response = envelope(json!({
            "id": "call_1",
            "type": "function",
            "function": { "name": "itinerary_plan", "arguments": "{\"days\":[]}" }
        }));

        let call = first_tool_call(&response).unwrap();
        assert_eq!(extract_function_arguments(call).unwrap(), "{\"days\":[]}");
    }

    #[test]
    fn non_function_tool_call_is_protocol_violation() {
        let response = envelope(json!({
            "type": "custom",
            "custom": { "input": "{}" }
        }));

        let call = first_tool_call(&response).unwrap();
        let err = extract_function_arguments(call).unwrap_err();
        assert!(matches!(err, GenerationError::Server { status: None, .. }));
    }

    #[test]
    fn missing_tool_calls_is_server_error() {
        let response = json!({ "choices": [{ "message": { "content": "Sure! Here is a plan" } }] });
        assert!(matches!(
            first_tool_call(&response),
            Err(GenerationError::Server { .. })
        ));
    }

    #[test]
    fn provider_message_falls_back_to_body() {
        assert_eq!(
            provider_error_message(r#"{"error":{"message":"model overloaded"}}"#),
            "model overloaded"
        );
        assert_eq!(provider_error_message("Bad Gateway"), "Bad Gateway");
    }
}
