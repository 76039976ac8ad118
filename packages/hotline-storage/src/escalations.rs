use sqlx::PgPool;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
	Error, Result,
	models::{EscalationRow, NewEscalation},
};

/// Appends one escalation row inside its own transaction. The connection goes back to the pool
/// when the transaction is committed or dropped, so every exit path releases it.
pub async fn insert_escalation(pool: &PgPool, record: &NewEscalation) -> Result<Uuid> {
	if record.reason.trim().is_empty() {
		return Err(Error::InvalidArgument("Escalation reason must be non-empty.".to_string()));
	}

	let escalation_id = Uuid::new_v4();
	let now = OffsetDateTime::now_utc();
	let mut tx = pool.begin().await?;

	sqlx::query(
		"\
INSERT INTO human_escalation (
	escalation_id,
	caller_number,
	escalated_to,
	reason,
	created_at
)
VALUES ($1,$2,$3,$4,$5)",
	)
	.bind(escalation_id)
	.bind(record.caller_number.as_str())
	.bind(record.escalated_to.as_str())
	.bind(record.reason.as_str())
	.bind(now)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;

	Ok(escalation_id)
}

pub async fn fetch_escalation(pool: &PgPool, escalation_id: Uuid) -> Result<Option<EscalationRow>> {
	let row = sqlx::query_as::<_, EscalationRow>(
		"\
SELECT escalation_id, caller_number, escalated_to, reason, created_at
FROM human_escalation
WHERE escalation_id = $1",
	)
	.bind(escalation_id)
	.fetch_optional(pool)
	.await?;

	Ok(row)
}
