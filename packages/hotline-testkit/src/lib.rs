//! Throwaway backends for integration tests.
//!
//! [`TestDatabase`] creates a uniquely named database next to the one named by `HOTLINE_PG_DSN`.
//! [`TestKnowledgeBase`] creates a uniquely named knowledge-base collection on the Qdrant server
//! named by `HOTLINE_QDRANT_URL`. Both are removed on `cleanup`, or from a helper thread on drop.

mod database;
mod error;
mod knowledge;

pub use database::{TestDatabase, with_test_db};
pub use error::{Error, Result};
pub use knowledge::{INFERENCE_MODEL, TestKnowledgeBase, VECTOR_NAME};

use std::env;

pub fn env_dsn() -> Option<String> {
	env::var("HOTLINE_PG_DSN").ok()
}

pub fn env_qdrant_url() -> Option<String> {
	env::var("HOTLINE_QDRANT_URL").ok()
}
