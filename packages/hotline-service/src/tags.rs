use crate::HotlineService;

const TAG_INSTRUCTION: &str = "Extract 3-7 concise keywords (comma-separated, no extra text) that \
best represent this query:";

pub fn tag_prompt(query: &str) -> String {
	format!("{TAG_INSTRUCTION}\n\n{query}")
}

/// Lenient keyword parser for free-text model output: split on commas, trim, drop empty tokens,
/// keep first-seen order. Repeats are dropped too, since the keywords form an ordered set and a
/// repeated keyword would only re-weight the near-text query. The 3-7 count in the prompt is
/// advisory and not enforced.
/// Output with no usable token (blank, or only separators) yields an empty list, never an error.
pub fn parse_tags(raw: &str) -> Vec<String> {
	let mut tags: Vec<String> = Vec::new();

	for token in raw.split(',') {
		let tag = token.trim();

		if tag.is_empty() || tags.iter().any(|seen| seen == tag) {
			continue;
		}

		tags.push(tag.to_string());
	}

	tags
}

impl HotlineService {
	/// One tagger call. A provider failure degrades to no tags, which in turn yields an empty
	/// retrieval rather than failing the turn.
	pub async fn extract_tags(&self, query: &str) -> Vec<String> {
		let provider = &self.cfg.providers.tagger;
		let messages = vec![hotline_providers::message("user", tag_prompt(query))];

		match self.providers.completion.complete(provider, &messages).await {
			Ok(raw) => {
				let tags = parse_tags(&raw);

				tracing::debug!(?tags, "Tags extracted.");

				tags
			},
			Err(err) => {
				tracing::warn!(
					error = %err,
					provider_id = %provider.provider_id,
					"Tag extraction failed; continuing without tags."
				);

				Vec::new()
			},
		}
	}
}
