use crate::HotlineService;

/// Separator placed between chunk texts in the assembled context.
pub const CONTEXT_SEPARATOR: &str = "\n---\n";

/// A passage returned by the knowledge index. It has no identity beyond its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
	pub text: String,
}
impl Chunk {
	pub fn new(text: impl Into<String>) -> Self {
		Self { text: text.into() }
	}
}

/// Joins chunk texts in rank order. No chunks gives an empty context.
pub fn assemble_context(chunks: &[Chunk]) -> String {
	chunks.iter().map(|chunk| chunk.text.as_str()).collect::<Vec<_>>().join(CONTEXT_SEPARATOR)
}

impl HotlineService {
	/// One near-text search over the knowledge index, keeping the index's relevance order.
	/// Any search error yields no chunks: retrieval never fails a turn.
	pub async fn retrieve(&self, tags: &[String], limit: u32) -> Vec<Chunk> {
		if tags.is_empty() {
			tracing::debug!("No tags extracted; skipping knowledge search.");

			return Vec::new();
		}

		match self.backends.knowledge.search(tags, limit).await {
			Ok(mut texts) => {
				texts.truncate(limit as usize);

				tracing::info!(chunks = texts.len(), limit, "Knowledge chunks retrieved.");

				texts.into_iter().map(Chunk::new).collect()
			},
			Err(err) => {
				tracing::error!(error = %err, "Knowledge search failed; returning empty context.");

				Vec::new()
			},
		}
	}
}
