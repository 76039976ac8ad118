pub mod completion;
pub mod function_call;

mod error;

pub use error::{Error, Result};

use std::time::Duration;

use reqwest::{
	Client,
	header::{AUTHORIZATION, HeaderMap, HeaderName},
};
use serde_json::{Map, Value};

/// Every pipeline call is sent at temperature zero to keep classification variance low.
pub const TEMPERATURE: f32 = 0.0;

pub fn auth_headers(api_key: &str, default_headers: &Map<String, Value>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	headers.insert(AUTHORIZATION, format!("Bearer {api_key}").parse()?);

	for (key, value) in default_headers {
		let Some(raw) = value.as_str() else {
			return Err(Error::InvalidConfig {
				message: "Default header values must be strings.".to_string(),
			});
		};

		headers.insert(HeaderName::from_bytes(key.as_bytes())?, raw.parse()?);
	}

	Ok(headers)
}

/// Builds a chat message in the OpenAI wire shape.
pub fn message(role: &str, content: impl Into<String>) -> Value {
	serde_json::json!({ "role": role, "content": content.into() })
}

/// Builds the one HTTP client shared by every provider. Timeouts and headers vary per provider and
/// are set on each request, so all roles share a single connection pool.
pub fn http_client() -> Result<Client> {
	Ok(Client::builder().build()?)
}

pub(crate) async fn post_chat(
	client: &Client,
	cfg: &hotline_config::LlmProviderConfig,
	body: &Value,
) -> Result<Value> {
	let url = format!("{}{}", cfg.api_base, cfg.path);
	let res = client
		.post(url)
		.timeout(Duration::from_millis(cfg.timeout_ms))
		.headers(auth_headers(&cfg.api_key, &cfg.default_headers)?)
		.json(body)
		.send()
		.await?;
	let json: Value = res.error_for_status()?.json().await?;

	Ok(json)
}

pub(crate) fn first_message(json: &Value) -> Result<&Value> {
	json.get("choices")
		.and_then(|v| v.as_array())
		.and_then(|arr| arr.first())
		.and_then(|choice| choice.get("message"))
		.ok_or_else(|| Error::InvalidResponse {
			message: "Completion response is missing choices[0].message.".to_string(),
		})
}
