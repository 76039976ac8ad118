use serde_json::Value;
use uuid::Uuid;

use hotline_storage::models::NewEscalation;

use crate::HotlineService;

/// Stored in place of a caller or destination the front-end did not supply.
pub const UNKNOWN_PARTY: &str = "unknown";

/// Stored when the summarizer call fails so the escalation row is still written.
pub const SUMMARY_UNAVAILABLE: &str = "\
CONVERSATION: Summary unavailable.
ESCALATION: Caller explicitly asked for a human agent.";

const SUMMARY_INSTRUCTION: &str = "\
Given a conversation transcript, reply with exactly two lines:
CONVERSATION: a brief 1-2 line overview of what was discussed
ESCALATION: the specific reason the customer wants human assistance";

/// The transcript is sent whole; nothing is truncated.
pub fn summary_messages(transcript: &str) -> Vec<Value> {
	vec![
		hotline_providers::message("system", SUMMARY_INSTRUCTION),
		hotline_providers::message("user", transcript),
	]
}

pub fn escalation_record(
	caller_id: Option<&str>,
	escalation_target: Option<&str>,
	reason: String,
) -> NewEscalation {
	NewEscalation {
		caller_number: caller_id.unwrap_or(UNKNOWN_PARTY).to_string(),
		escalated_to: escalation_target.unwrap_or(UNKNOWN_PARTY).to_string(),
		reason,
	}
}

impl HotlineService {
	/// Returns the model's two-line summary verbatim. It is stored as one opaque reason string.
	pub async fn summarize(&self, transcript: &str) -> String {
		let provider = &self.cfg.providers.summarizer;
		let messages = summary_messages(transcript);

		match self.providers.completion.complete(provider, &messages).await {
			Ok(summary) if !summary.trim().is_empty() => summary,
			Ok(_) => {
				tracing::warn!("Summarizer returned an empty summary; storing placeholder reason.");

				SUMMARY_UNAVAILABLE.to_string()
			},
			Err(err) => {
				tracing::warn!(
					error = %err,
					provider_id = %provider.provider_id,
					"Summarizer call failed; storing placeholder reason."
				);

				SUMMARY_UNAVAILABLE.to_string()
			},
		}
	}

	/// Appends one escalation row. The error is returned, not handled: the caller decides that
	/// recording is best-effort.
	pub async fn record_escalation(
		&self,
		caller_id: Option<&str>,
		escalation_target: Option<&str>,
		reason: String,
	) -> hotline_storage::Result<Uuid> {
		let record = escalation_record(caller_id, escalation_target, reason);

		self.backends.escalations.record(&record).await
	}
}
