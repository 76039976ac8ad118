use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// A function the model is forced to call. `parameters` is a JSON Schema object.
#[derive(Debug, Clone)]
pub struct FunctionSpec {
	pub name: &'static str,
	pub description: &'static str,
	pub parameters: Value,
}
impl FunctionSpec {
	fn as_tool(&self) -> Value {
		serde_json::json!({
			"type": "function",
			"function": {
				"name": self.name,
				"description": self.description,
				"parameters": self.parameters,
			},
		})
	}
}

/// Single-shot structured call. The model is forced to call `function` and the decoded argument
/// object is returned as-is; field validation is left to the caller.
pub async fn call_function(
	client: &Client,
	cfg: &hotline_config::LlmProviderConfig,
	messages: &[Value],
	function: &FunctionSpec,
) -> Result<Value> {
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": crate::TEMPERATURE,
		"messages": messages,
		"tools": [function.as_tool()],
		"tool_choice": { "type": "function", "function": { "name": function.name } },
	});
	let json = crate::post_chat(client, cfg, &body).await?;

	parse_function_arguments(&json, function.name)
}

fn parse_function_arguments(json: &Value, expected_name: &str) -> Result<Value> {
	let message = crate::first_message(json)?;
	// Older deployments answer with the legacy `function_call` field instead of `tool_calls`.
	let call = message
		.get("tool_calls")
		.and_then(|v| v.as_array())
		.and_then(|calls| calls.first())
		.and_then(|call| call.get("function"))
		.or_else(|| message.get("function_call"))
		.ok_or_else(|| Error::InvalidResponse {
			message: "Completion message carries no function call.".to_string(),
		})?;

	if let Some(name) = call.get("name").and_then(|v| v.as_str())
		&& name != expected_name
	{
		return Err(Error::InvalidResponse {
			message: format!("Model called {name:?} instead of {expected_name:?}."),
		});
	}

	let raw = call.get("arguments").and_then(|v| v.as_str()).ok_or_else(|| {
		Error::InvalidResponse { message: "Function call is missing arguments.".to_string() }
	})?;
	let arguments: Value = serde_json::from_str(raw).map_err(|_| Error::InvalidResponse {
		message: "Function call arguments are not valid JSON.".to_string(),
	})?;

	if !arguments.is_object() {
		return Err(Error::InvalidResponse {
			message: "Function call arguments must be a JSON object.".to_string(),
		});
	}

	Ok(arguments)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tool_call_response(name: &str, arguments: &str) -> Value {
		serde_json::json!({
			"choices": [{
				"message": {
					"role": "assistant",
					"content": null,
					"tool_calls": [{
						"id": "call_1",
						"type": "function",
						"function": { "name": name, "arguments": arguments }
					}]
				}
			}]
		})
	}

	#[test]
	fn parses_tool_call_arguments() {
		let json = tool_call_response(
			"process_query",
			r#"{"rewritten_query":"refund policy","is_escalation":false}"#,
		);
		let args = parse_function_arguments(&json, "process_query").expect("parse failed");

		assert_eq!(args["rewritten_query"], "refund policy");
		assert_eq!(args["is_escalation"], false);
	}

	#[test]
	fn parses_legacy_function_call() {
		let json = serde_json::json!({
			"choices": [{
				"message": {
					"function_call": {
						"name": "process_query",
						"arguments": "{\"rewritten_query\":\"talk to agent\",\"is_escalation\":true}"
					}
				}
			}]
		});
		let args = parse_function_arguments(&json, "process_query").expect("parse failed");

		assert_eq!(args["is_escalation"], true);
	}

	#[test]
	fn rejects_other_function_name() {
		let json = tool_call_response("something_else", "{}");

		assert!(matches!(
			parse_function_arguments(&json, "process_query"),
			Err(Error::InvalidResponse { .. })
		));
	}

	#[test]
	fn rejects_non_json_arguments() {
		let json = tool_call_response("process_query", "rewritten_query=refund");

		assert!(parse_function_arguments(&json, "process_query").is_err());
	}

	#[test]
	fn rejects_plain_text_answer() {
		let json = serde_json::json!({
			"choices": [{ "message": { "role": "assistant", "content": "I think yes." } }]
		});

		assert!(parse_function_arguments(&json, "process_query").is_err());
	}
}
