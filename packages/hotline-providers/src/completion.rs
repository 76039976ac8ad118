use reqwest::Client;
use serde_json::Value;

use crate::{Error, Result};

/// Single-shot free-text completion. Returns the trimmed content of the first choice.
pub async fn complete(
	client: &Client,
	cfg: &hotline_config::LlmProviderConfig,
	messages: &[Value],
) -> Result<String> {
	let body = serde_json::json!({
		"model": cfg.model,
		"temperature": crate::TEMPERATURE,
		"messages": messages,
	});
	let json = crate::post_chat(client, cfg, &body).await?;

	parse_completion_content(&json)
}

fn parse_completion_content(json: &Value) -> Result<String> {
	let content = crate::first_message(json)?
		.get("content")
		.and_then(|c| c.as_str())
		.ok_or_else(|| Error::InvalidResponse {
			message: "Completion message is missing text content.".to_string(),
		})?;

	Ok(content.trim().to_string())
}
