use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEscalation {
	pub caller_number: String,
	pub escalated_to: String,
	pub reason: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EscalationRow {
	pub escalation_id: Uuid,
	pub caller_number: String,
	pub escalated_to: String,
	pub reason: String,
	pub created_at: OffsetDateTime,
}
