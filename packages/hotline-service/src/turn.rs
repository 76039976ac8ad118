use serde::{Deserialize, Serialize};

use hotline_config::Retrieval;

use crate::{Error, HotlineService, Intent, Result, retrieve};

/// One caller turn as submitted by the dialog front-end. History is supplied whole on every call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnRequest {
	pub question: String,
	#[serde(default)]
	pub history: Option<String>,
	#[serde(default, rename = "caller_number")]
	pub caller_id: Option<String>,
	#[serde(default, rename = "escalated_to")]
	pub escalation_target: Option<String>,
	#[serde(default, rename = "k")]
	pub result_count: Option<u32>,
}

/// `is_escalation` is true exactly when the turn took the escalation branch, and then `context`
/// is always empty. An empty context with `is_escalation == false` means nothing was retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnResult {
	pub context: String,
	pub is_escalation: bool,
}
impl TurnResult {
	pub fn escalation() -> Self {
		Self { context: String::new(), is_escalation: true }
	}

	pub fn answer(context: String) -> Self {
		Self { context, is_escalation: false }
	}
}

struct Turn<'a> {
	question: &'a str,
	history: Option<&'a str>,
	caller_id: Option<&'a str>,
	escalation_target: Option<&'a str>,
	result_count: Option<u32>,
}

impl TurnRequest {
	fn resolve(&self) -> Result<Turn<'_>> {
		if self.question.trim().is_empty() {
			return Err(Error::InvalidRequest {
				message: "question must be non-empty.".to_string(),
				field: "question",
			});
		}

		Ok(Turn {
			question: self.question.as_str(),
			history: non_blank(self.history.as_deref()),
			caller_id: non_blank(self.caller_id.as_deref()),
			escalation_target: non_blank(self.escalation_target.as_deref()),
			result_count: self.result_count,
		})
	}
}

/// Zero counts as absent. Requests above `max_k` are capped rather than rejected, so `k` can never
/// fail a turn.
fn result_count(requested: Option<u32>, retrieval: &Retrieval) -> u32 {
	match requested {
		None | Some(0) => retrieval.default_k,
		Some(k) => k.min(retrieval.max_k),
	}
}

impl HotlineService {
	/// Runs one turn: normalize, then either summarize and record an escalation, or extract tags,
	/// retrieve, and assemble context. Only a classification failure (or a blank question) is
	/// returned as an error; every other failure degrades to a valid result.
	pub async fn process_turn(&self, req: TurnRequest) -> Result<TurnResult> {
		let turn = req.resolve()?;

		match self.normalize(turn.question, turn.history).await? {
			Intent::Escalate { .. } => {
				let transcript = turn.history.unwrap_or(turn.question);
				let reason = self.summarize(transcript).await;

				// Best-effort: the routing decision is already made and a lost audit row must not
				// block it.
				match self.record_escalation(turn.caller_id, turn.escalation_target, reason).await {
					Ok(escalation_id) => tracing::info!(%escalation_id, "Escalation recorded."),
					Err(err) => tracing::error!(
						error = %err,
						caller = turn.caller_id.unwrap_or(crate::UNKNOWN_PARTY),
						"Failed to record escalation."
					),
				}

				Ok(TurnResult::escalation())
			},
			Intent::Continue { rewritten_query } => {
				let limit = result_count(turn.result_count, &self.cfg.retrieval);
				let tags = self.extract_tags(&rewritten_query).await;
				let chunks = self.retrieve(&tags, limit).await;

				Ok(TurnResult::answer(retrieve::assemble_context(&chunks)))
			},
		}
	}
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.filter(|value| !value.trim().is_empty())
}
