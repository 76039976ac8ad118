use std::{collections::HashMap, thread};

use qdrant_client::{
	Payload, Qdrant,
	qdrant::{
		CreateCollectionBuilder, Document, Modifier, PointStruct, SparseVectorParamsBuilder,
		SparseVectorsConfigBuilder, UpsertPointsBuilder, Vector,
	},
};
use tokio::runtime::Builder;
use uuid::Uuid;

use crate::{Error, Result};

pub const VECTOR_NAME: &str = "text";
pub const INFERENCE_MODEL: &str = "qdrant/bm25";

const TEXT_FIELD: &str = "text";

/// A knowledge-base collection with one IDF-weighted sparse vector per chunk. Qdrant embeds both
/// the seeded chunks and the search text with [`INFERENCE_MODEL`], so no embedding provider is
/// needed.
pub struct TestKnowledgeBase {
	client: Qdrant,
	config: hotline_config::Qdrant,
	cleaned: bool,
}
impl TestKnowledgeBase {
	pub async fn new(url: &str) -> Result<Self> {
		let client = build_client(url)?;
		let collection = format!("hotline_kb_test_{}", Uuid::new_v4().simple());
		let mut sparse_vectors_config = SparseVectorsConfigBuilder::default();

		sparse_vectors_config.add_named_vector_params(
			VECTOR_NAME,
			SparseVectorParamsBuilder::default().modifier(Modifier::Idf as i32),
		);

		client
			.create_collection(
				CreateCollectionBuilder::new(collection.clone())
					.sparse_vectors_config(sparse_vectors_config),
			)
			.await
			.map_err(|err| Error::Message(format!("Failed to create Qdrant collection: {err}.")))?;

		let config = hotline_config::Qdrant {
			url: url.to_string(),
			api_key: None,
			collection,
			vector_name: VECTOR_NAME.to_string(),
			inference_model: INFERENCE_MODEL.to_string(),
			text_field: TEXT_FIELD.to_string(),
		};

		Ok(Self { client, config, cleaned: false })
	}

	/// Store settings pointed at this collection.
	pub fn config(&self) -> &hotline_config::Qdrant {
		&self.config
	}

	/// Upserts one point per chunk and waits until they are searchable.
	pub async fn seed(&self, chunks: &[&str]) -> Result<()> {
		let points = chunks
			.iter()
			.enumerate()
			.map(|(idx, text)| {
				let mut payload = Payload::new();

				payload.insert(TEXT_FIELD, text.to_string());

				let mut vectors = HashMap::new();

				vectors.insert(
					VECTOR_NAME.to_string(),
					Vector::from(Document::new(text.to_string(), INFERENCE_MODEL)),
				);

				PointStruct::new(idx as u64 + 1, vectors, payload)
			})
			.collect::<Vec<_>>();

		self.client
			.upsert_points(
				UpsertPointsBuilder::new(self.config.collection.clone(), points).wait(true),
			)
			.await
			.map_err(|err| Error::Message(format!("Failed to seed Qdrant collection: {err}.")))?;

		Ok(())
	}

	pub async fn cleanup(mut self) -> Result<()> {
		delete_collection(&self.client, &self.config.collection).await?;

		self.cleaned = true;

		Ok(())
	}
}
impl Drop for TestKnowledgeBase {
	fn drop(&mut self) {
		if self.cleaned {
			return;
		}

		let url = self.config.url.clone();
		let collection = self.config.collection.clone();
		let cleanup_thread = thread::spawn(move || {
			let runtime = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime,
				Err(err) => {
					eprintln!("Test collection cleanup failed: {err}.");

					return;
				},
			};
			let result = build_client(&url).map(|client| {
				runtime.block_on(async { delete_collection(&client, &collection).await })
			});

			if let Err(err) | Ok(Err(err)) = result {
				eprintln!("Test collection cleanup failed: {err}.");
			}
		});
		let _ = cleanup_thread.join();
	}
}

fn build_client(url: &str) -> Result<Qdrant> {
	Qdrant::from_url(url)
		.build()
		.map_err(|err| Error::Message(format!("Failed to build Qdrant client: {err}.")))
}

async fn delete_collection(client: &Qdrant, collection: &str) -> Result<()> {
	client
		.delete_collection(collection.to_string())
		.await
		.map_err(|err| Error::Message(format!("Failed to delete Qdrant collection: {err}.")))?;

	Ok(())
}
