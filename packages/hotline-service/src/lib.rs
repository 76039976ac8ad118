pub mod escalation;
pub mod normalize;
pub mod retrieve;
pub mod tags;
pub mod turn;

mod error;

pub use error::{Error, Result};
pub use escalation::UNKNOWN_PARTY;
pub use normalize::Intent;
pub use retrieve::{CONTEXT_SEPARATOR, Chunk};
pub use turn::{TurnRequest, TurnResult};

use std::{future::Future, pin::Pin, sync::Arc};

use reqwest::Client;
use serde_json::Value;
use uuid::Uuid;

use hotline_config::{Config, LlmProviderConfig};
use hotline_providers::{
	completion,
	function_call::{self, FunctionSpec},
};
use hotline_storage::{db::Db, escalations, models::NewEscalation, qdrant::QdrantStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Forced function-call completion used by the query normalizer.
pub trait StructuredProvider
where
	Self: Send + Sync,
{
	fn call_function<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
		function: &'a FunctionSpec,
	) -> BoxFuture<'a, hotline_providers::Result<Value>>;
}

/// Free-text completion used by the tag extractor and the escalation summarizer.
pub trait CompletionProvider
where
	Self: Send + Sync,
{
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, hotline_providers::Result<String>>;
}

pub trait KnowledgeIndex
where
	Self: Send + Sync,
{
	fn search<'a>(
		&'a self,
		keywords: &'a [String],
		limit: u32,
	) -> BoxFuture<'a, hotline_storage::Result<Vec<String>>>;
}

pub trait EscalationStore
where
	Self: Send + Sync,
{
	fn record<'a>(
		&'a self,
		record: &'a NewEscalation,
	) -> BoxFuture<'a, hotline_storage::Result<Uuid>>;
}

#[derive(Clone)]
pub struct Providers {
	pub structured: Arc<dyn StructuredProvider>,
	pub completion: Arc<dyn CompletionProvider>,
}

#[derive(Clone)]
pub struct Backends {
	pub knowledge: Arc<dyn KnowledgeIndex>,
	pub escalations: Arc<dyn EscalationStore>,
}

/// Process-wide turn pipeline. Built once at startup and shared read-only across turns.
pub struct HotlineService {
	pub cfg: Config,
	pub providers: Providers,
	pub backends: Backends,
}

/// Calls the configured OpenAI-compatible endpoints through one shared client.
struct DefaultProviders {
	client: Client,
}

impl StructuredProvider for DefaultProviders {
	fn call_function<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
		function: &'a FunctionSpec,
	) -> BoxFuture<'a, hotline_providers::Result<Value>> {
		Box::pin(function_call::call_function(&self.client, cfg, messages, function))
	}
}

impl CompletionProvider for DefaultProviders {
	fn complete<'a>(
		&'a self,
		cfg: &'a LlmProviderConfig,
		messages: &'a [Value],
	) -> BoxFuture<'a, hotline_providers::Result<String>> {
		Box::pin(completion::complete(&self.client, cfg, messages))
	}
}

impl KnowledgeIndex for QdrantStore {
	fn search<'a>(
		&'a self,
		keywords: &'a [String],
		limit: u32,
	) -> BoxFuture<'a, hotline_storage::Result<Vec<String>>> {
		Box::pin(self.near_text(keywords, limit))
	}
}

impl EscalationStore for Db {
	fn record<'a>(
		&'a self,
		record: &'a NewEscalation,
	) -> BoxFuture<'a, hotline_storage::Result<Uuid>> {
		Box::pin(escalations::insert_escalation(&self.pool, record))
	}
}

impl Providers {
	pub fn new(
		structured: Arc<dyn StructuredProvider>,
		completion: Arc<dyn CompletionProvider>,
	) -> Self {
		Self { structured, completion }
	}

	/// Serves every role from the same HTTP client.
	pub fn http(client: Client) -> Self {
		let provider = Arc::new(DefaultProviders { client });

		Self { structured: provider.clone(), completion: provider }
	}
}

impl Backends {
	pub fn new(knowledge: Arc<dyn KnowledgeIndex>, escalations: Arc<dyn EscalationStore>) -> Self {
		Self { knowledge, escalations }
	}
}

impl HotlineService {
	pub fn new(cfg: Config, http: Client, db: Arc<Db>, qdrant: Arc<QdrantStore>) -> Self {
		Self { cfg, providers: Providers::http(http), backends: Backends::new(qdrant, db) }
	}

	pub fn with_parts(cfg: Config, providers: Providers, backends: Backends) -> Self {
		Self { cfg, providers, backends }
	}
}
