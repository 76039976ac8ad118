//! Query normalization: one forced function call that rewrites the caller's latest utterance into a
//! standalone query and decides whether the caller explicitly asked for a human.

use serde::Deserialize;
use serde_json::Value;

use hotline_providers::function_call::FunctionSpec;

use crate::{Error, HotlineService, Result};

pub const PROCESS_QUERY_FUNCTION: &str = "process_query";

const NORMALIZE_INSTRUCTION: &str = "\
Rewrite the caller's latest message as a standalone question: resolve every pronoun and reference \
to earlier turns so it can be understood without the history.
Also set is_escalation. It is false by default. Set it to true only when the caller explicitly \
says they want to talk to a human, a person, an agent, or ask to be escalated. Do not set it \
because the caller sounds frustrated or because you think a human could help better; only an \
explicit request counts.";

const NO_HISTORY: &str = "[none]";

/// Outcome of normalization. The orchestrator branches on the variant, never on a raw flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
	Escalate { rewritten_query: String },
	Continue { rewritten_query: String },
}
impl Intent {
	pub fn rewritten_query(&self) -> &str {
		match self {
			Self::Escalate { rewritten_query } | Self::Continue { rewritten_query } =>
				rewritten_query,
		}
	}

	pub fn is_escalation(&self) -> bool {
		matches!(self, Self::Escalate { .. })
	}
}

#[derive(Debug, Deserialize)]
struct ProcessQueryArgs {
	rewritten_query: String,
	is_escalation: bool,
}

pub fn process_query_function() -> FunctionSpec {
	FunctionSpec {
		name: PROCESS_QUERY_FUNCTION,
		description: "Rewrite the follow-up question and flag an explicit escalation request.",
		parameters: serde_json::json!({
			"type": "object",
			"properties": {
				"rewritten_query": { "type": "string" },
				"is_escalation": { "type": "boolean" }
			},
			"required": ["rewritten_query", "is_escalation"],
			"additionalProperties": false
		}),
	}
}

pub fn normalize_messages(question: &str, history: Option<&str>) -> Vec<Value> {
	let history = history.unwrap_or(NO_HISTORY);

	vec![
		hotline_providers::message("system", NORMALIZE_INSTRUCTION),
		hotline_providers::message("user", format!("History:\n{history}\n\nLatest:\n{question}")),
	]
}

/// Decodes the function arguments strictly. A missing field, a non-boolean flag, or a blank
/// rewrite is a classification failure; no default is ever substituted.
pub fn decode_intent(arguments: Value) -> Result<Intent> {
	let args: ProcessQueryArgs =
		serde_json::from_value(arguments).map_err(|err| Error::Classification {
			message: format!("Normalizer returned malformed fields: {err}."),
		})?;
	let rewritten_query = args.rewritten_query.trim().to_string();

	if rewritten_query.is_empty() {
		return Err(Error::Classification {
			message: "Normalizer returned an empty rewritten_query.".to_string(),
		});
	}

	if args.is_escalation {
		Ok(Intent::Escalate { rewritten_query })
	} else {
		Ok(Intent::Continue { rewritten_query })
	}
}

impl HotlineService {
	pub async fn normalize(&self, question: &str, history: Option<&str>) -> Result<Intent> {
		let provider = &self.cfg.providers.normalizer;
		let messages = normalize_messages(question, history);
		let function = process_query_function();
		let arguments = self
			.providers
			.structured
			.call_function(provider, &messages, &function)
			.await
			.map_err(|err| Error::Classification {
				message: format!("Provider {} failed: {err}", provider.provider_id),
			})?;
		let intent = decode_intent(arguments)?;

		tracing::debug!(
			is_escalation = intent.is_escalation(),
			rewritten_query = intent.rewritten_query(),
			"Query normalized."
		);

		Ok(intent)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn decodes_continue() {
		let intent = decode_intent(serde_json::json!({
			"rewritten_query": "  What is the refund policy for shoes?  ",
			"is_escalation": false
		}))
		.expect("decode failed");

		assert_eq!(
			intent,
			Intent::Continue { rewritten_query: "What is the refund policy for shoes?".to_string() }
		);
	}

	#[test]
	fn decodes_escalate() {
		let intent = decode_intent(serde_json::json!({
			"rewritten_query": "request human agent",
			"is_escalation": true
		}))
		.expect("decode failed");

		assert!(intent.is_escalation());
		assert_eq!(intent.rewritten_query(), "request human agent");
	}

	#[test]
	fn missing_flag_is_classification_failure() {
		let err = decode_intent(serde_json::json!({ "rewritten_query": "refund policy" }))
			.expect_err("missing flag must fail");

		assert!(matches!(err, Error::Classification { .. }));
	}

	#[test]
	fn stringly_flag_is_classification_failure() {
		let result = decode_intent(serde_json::json!({
			"rewritten_query": "refund policy",
			"is_escalation": "true"
		}));

		assert!(matches!(result, Err(Error::Classification { .. })));
	}

	#[test]
	fn blank_rewrite_is_classification_failure() {
		let result = decode_intent(serde_json::json!({
			"rewritten_query": "   ",
			"is_escalation": false
		}));

		assert!(matches!(result, Err(Error::Classification { .. })));
	}

	#[test]
	fn absent_history_uses_marker() {
		let messages = normalize_messages("Where is my order?", None);

		assert_eq!(messages.len(), 2);
		assert_eq!(messages[0]["role"], "system");
		assert_eq!(messages[1]["content"], "History:\n[none]\n\nLatest:\nWhere is my order?");
	}

	#[test]
	fn function_schema_requires_both_fields() {
		let function = process_query_function();

		assert_eq!(function.name, PROCESS_QUERY_FUNCTION);
		assert_eq!(
			function.parameters["required"],
			serde_json::json!(["rewritten_query", "is_escalation"])
		);
	}
}
