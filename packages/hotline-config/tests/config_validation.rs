use std::{
	env, fs,
	path::PathBuf,
	sync::atomic::{AtomicU64, Ordering},
	time::{SystemTime, UNIX_EPOCH},
};

use toml::Value;

use hotline_config::{Config, Error};

const SAMPLE_CONFIG_TEMPLATE_TOML: &str = include_str!("fixtures/sample_config.template.toml");

fn sample_value() -> Value {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse template config.")
}

fn table_mut<'a>(value: &'a mut Value, path: &[&str]) -> &'a mut toml::Table {
	let mut current = value.as_table_mut().expect("Template config must be a table.");

	for key in path {
		current = current
			.get_mut(*key)
			.and_then(Value::as_table_mut)
			.unwrap_or_else(|| panic!("Template config must include [{key}]."));
	}

	current
}

fn render(value: &Value) -> String {
	toml::to_string(value).expect("Failed to render template config.")
}

fn write_temp_config(payload: String) -> PathBuf {
	static COUNTER: AtomicU64 = AtomicU64::new(0);

	let nanos = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.expect("System time must be valid.")
		.as_nanos();
	let ordinal = COUNTER.fetch_add(1, Ordering::SeqCst);
	let pid = std::process::id();
	let mut path = env::temp_dir();

	path.push(format!("hotline_config_test_{nanos}_{pid}_{ordinal}.toml"));

	fs::write(&path, payload).expect("Failed to write test config.");

	path
}

fn load_payload(payload: String) -> hotline_config::Result<Config> {
	let path = write_temp_config(payload);
	let result = hotline_config::load(&path);

	fs::remove_file(&path).expect("Failed to remove test config.");

	result
}

fn base_config() -> Config {
	toml::from_str(SAMPLE_CONFIG_TEMPLATE_TOML).expect("Failed to parse test config.")
}

#[test]
fn sample_config_loads() {
	let cfg = load_payload(render(&sample_value())).expect("Sample config must load.");

	assert_eq!(cfg.retrieval.default_k, 4);
	assert_eq!(cfg.storage.qdrant.text_field, "text");
	assert_eq!(cfg.providers.normalizer.model, "gpt-4o");
}

#[test]
fn blank_auth_token_is_normalized_to_none() {
	let cfg = load_payload(render(&sample_value())).expect("Sample config must load.");

	assert!(cfg.security.api_auth_token.is_none());
}

#[test]
fn retrieval_section_is_optional() {
	let mut value = sample_value();

	value.as_table_mut().expect("Template config must be a table.").remove("retrieval");

	let cfg = load_payload(render(&value)).expect("Config without [retrieval] must load.");

	assert_eq!(cfg.retrieval.default_k, 4);
	assert_eq!(cfg.retrieval.max_k, 50);
}

#[test]
fn non_loopback_bind_is_rejected_when_localhost_only() {
	let mut value = sample_value();

	table_mut(&mut value, &["service"])
		.insert("http_bind".to_string(), Value::String("0.0.0.0:8088".to_string()));

	let err = load_payload(render(&value)).expect_err("Expected http_bind validation error.");

	assert!(
		err.to_string().contains("must be a loopback address"),
		"Unexpected error message: {err}"
	);
}

#[test]
fn non_loopback_bind_is_allowed_when_not_localhost_only() {
	let mut cfg = base_config();

	cfg.service.http_bind = "0.0.0.0:8088".to_string();
	cfg.security.bind_localhost_only = false;

	assert!(hotline_config::validate(&cfg).is_ok());
}

#[test]
fn default_k_must_be_positive() {
	let mut cfg = base_config();

	cfg.retrieval.default_k = 0;

	let err = hotline_config::validate(&cfg).expect_err("Expected default_k validation error.");

	assert!(matches!(err, Error::Validation { .. }));
	assert!(err.to_string().contains("retrieval.default_k must be greater than zero."));
}

#[test]
fn max_k_must_cover_default_k() {
	let mut cfg = base_config();

	cfg.retrieval.default_k = 8;
	cfg.retrieval.max_k = 4;

	let err = hotline_config::validate(&cfg).expect_err("Expected max_k validation error.");

	assert!(err.to_string().contains("retrieval.max_k"), "Unexpected error: {err}");
}

#[test]
fn provider_api_key_must_be_non_empty() {
	let mut value = sample_value();

	table_mut(&mut value, &["providers", "summarizer"])
		.insert("api_key".to_string(), Value::String("  ".to_string()));

	let err = load_payload(render(&value)).expect_err("Expected api_key validation error.");

	assert!(
		err.to_string().contains("Provider summarizer api_key must be non-empty."),
		"Unexpected error: {err}"
	);
}

#[test]
fn qdrant_collection_must_be_non_empty() {
	let mut cfg = base_config();

	cfg.storage.qdrant.collection = String::new();

	let err = hotline_config::validate(&cfg).expect_err("Expected collection validation error.");

	assert!(err.to_string().contains("storage.qdrant.collection must be non-empty."));
}

#[test]
fn missing_file_reports_read_error() {
	let path = env::temp_dir().join("hotline_config_missing_does_not_exist.toml");
	let err = hotline_config::load(&path).expect_err("Expected read error.");

	assert!(matches!(err, Error::ReadConfig { .. }));
}
