use std::collections::HashMap;

use qdrant_client::qdrant::{
	Document, Query, QueryPointsBuilder, ScoredPoint, Value, value::Kind,
};

use crate::Result;

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_name: String,
	pub inference_model: String,
	pub text_field: String,
}
impl QdrantStore {
	pub fn new(cfg: &hotline_config::Qdrant) -> Result<Self> {
		let client =
			qdrant_client::Qdrant::from_url(&cfg.url).api_key(cfg.api_key.clone()).build()?;

		Ok(Self {
			client,
			collection: cfg.collection.clone(),
			vector_name: cfg.vector_name.clone(),
			inference_model: cfg.inference_model.clone(),
			text_field: cfg.text_field.clone(),
		})
	}

	/// Near-text search: Qdrant embeds the keyword text with the configured inference model and
	/// returns up to `limit` chunk texts in relevance order. Points without a string text payload
	/// are skipped.
	pub async fn near_text(&self, keywords: &[String], limit: u32) -> Result<Vec<String>> {
		let text = near_text_input(keywords);
		let search = QueryPointsBuilder::new(self.collection.clone())
			.query(Query::new_nearest(Document::new(text, self.inference_model.clone())))
			.using(self.vector_name.clone())
			.with_payload(true)
			.limit(limit as u64);
		let response = self.client.query(search).await?;

		Ok(chunk_texts(&response.result, &self.text_field))
	}
}

pub fn near_text_input(keywords: &[String]) -> String {
	keywords.join(", ")
}

fn chunk_texts(points: &[ScoredPoint], text_field: &str) -> Vec<String> {
	points.iter().filter_map(|point| payload_string(&point.payload, text_field)).collect()
}

fn payload_string(payload: &HashMap<String, Value>, key: &str) -> Option<String> {
	let value = payload.get(key)?;

	match &value.kind {
		Some(Kind::StringValue(text)) => Some(text.clone()),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn point(payload: Vec<(&str, Value)>, score: f32) -> ScoredPoint {
		ScoredPoint {
			payload: payload.into_iter().map(|(k, v)| (k.to_string(), v)).collect(),
			score,
			..Default::default()
		}
	}

	#[test]
	fn keeps_rank_order_and_skips_missing_text() {
		let points = vec![
			point(vec![("text", Value::from("Chunk A"))], 0.9),
			point(vec![("title", Value::from("no text here"))], 0.8),
			point(vec![("text", Value::from(3_i64))], 0.7),
			point(vec![("text", Value::from("Chunk B"))], 0.6),
		];

		assert_eq!(chunk_texts(&points, "text"), vec!["Chunk A", "Chunk B"]);
	}

	#[test]
	fn joins_keywords_for_inference() {
		let keywords = vec!["refund".to_string(), "policy".to_string(), "return".to_string()];

		assert_eq!(near_text_input(&keywords), "refund, policy, return");
	}
}
