use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub retrieval: Retrieval,
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
	#[serde(default = "default_acquire_timeout_ms")]
	pub acquire_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Qdrant {
	pub url: String,
	#[serde(default)]
	pub api_key: Option<String>,
	pub collection: String,
	/// Named vector the near-text query runs against.
	pub vector_name: String,
	/// Model Qdrant uses to embed the query text server-side, e.g. "qdrant/bm25".
	pub inference_model: String,
	#[serde(default = "default_text_field")]
	pub text_field: String,
}

/// One OpenAI-compatible chat-completions endpoint per pipeline step, so the classifier can run
/// on a stronger model than the tagger and summarizer.
#[derive(Debug, Clone, Deserialize)]
pub struct Providers {
	pub normalizer: LlmProviderConfig,
	pub tagger: LlmProviderConfig,
	pub summarizer: LlmProviderConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Retrieval {
	#[serde(default = "default_k")]
	pub default_k: u32,
	#[serde(default = "default_max_k")]
	pub max_k: u32,
}
impl Default for Retrieval {
	fn default() -> Self {
		Self { default_k: default_k(), max_k: default_max_k() }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	#[serde(default)]
	pub api_auth_token: Option<String>,
}

fn default_acquire_timeout_ms() -> u64 {
	5_000
}

fn default_text_field() -> String {
	"text".to_string()
}

fn default_k() -> u32 {
	4
}

fn default_max_k() -> u32 {
	50
}
