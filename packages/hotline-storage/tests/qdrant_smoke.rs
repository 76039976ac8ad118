use hotline_storage::qdrant::QdrantStore;
use hotline_testkit::TestKnowledgeBase;

const SHIPPING: &str = "Shipping and delivery take three to five business days.";
const EXPRESS: &str = "Express shipping is available at checkout.";
const REFUNDS: &str = "Refunds are issued to the original payment method.";

async fn knowledge_base() -> Option<TestKnowledgeBase> {
	let Some(url) = hotline_testkit::env_qdrant_url() else {
		eprintln!("Skipping Qdrant smoke tests; set HOTLINE_QDRANT_URL to run this test.");

		return None;
	};
	let kb = TestKnowledgeBase::new(&url).await.expect("Failed to create test collection.");

	kb.seed(&[REFUNDS, SHIPPING, EXPRESS]).await.expect("Failed to seed test collection.");

	Some(kb)
}

fn keywords(words: &[&str]) -> Vec<String> {
	words.iter().map(|word| word.to_string()).collect()
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set HOTLINE_QDRANT_URL to run."]
async fn near_text_ranks_matching_chunks() {
	let Some(kb) = knowledge_base().await else {
		return;
	};
	let store = QdrantStore::new(kb.config()).expect("Failed to create Qdrant store.");
	let chunks = store
		.near_text(&keywords(&["shipping", "delivery"]), 5)
		.await
		.expect("Near-text search failed.");

	assert_eq!(chunks, vec![SHIPPING, EXPRESS]);

	kb.cleanup().await.expect("Failed to cleanup test collection.");
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set HOTLINE_QDRANT_URL to run."]
async fn near_text_honors_limit() {
	let Some(kb) = knowledge_base().await else {
		return;
	};
	let store = QdrantStore::new(kb.config()).expect("Failed to create Qdrant store.");
	let chunks = store
		.near_text(&keywords(&["shipping", "delivery"]), 1)
		.await
		.expect("Near-text search failed.");

	assert_eq!(chunks, vec![SHIPPING]);

	kb.cleanup().await.expect("Failed to cleanup test collection.");
}

#[tokio::test]
#[ignore = "Requires external Qdrant. Set HOTLINE_QDRANT_URL to run."]
async fn unknown_vector_name_is_an_error() {
	let Some(kb) = knowledge_base().await else {
		return;
	};
	let mut cfg = kb.config().clone();

	cfg.vector_name = "dense".to_string();

	let store = QdrantStore::new(&cfg).expect("Failed to create Qdrant store.");

	assert!(store.near_text(&keywords(&["refunds"]), 3).await.is_err());

	kb.cleanup().await.expect("Failed to cleanup test collection.");
}
