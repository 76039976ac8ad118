use std::sync::Arc;

use hotline_service::HotlineService;
use hotline_storage::{db::Db, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<HotlineService>,
	pub auth_token: Option<Arc<str>>,
}
impl AppState {
	pub fn new(service: HotlineService) -> Self {
		let auth_token = service.cfg.security.api_auth_token.as_deref().map(Arc::from);

		Self { service: Arc::new(service), auth_token }
	}
}

/// Opens the long-lived backends and the shared LLM client once. The database handle is returned
/// separately so the caller can close the pool after the server stops.
pub async fn connect(
	config: hotline_config::Config,
) -> color_eyre::Result<(HotlineService, Arc<Db>)> {
	let db = Arc::new(Db::connect_lazy(&config.storage.postgres)?);

	db.ensure_schema().await?;

	let qdrant = Arc::new(QdrantStore::new(&config.storage.qdrant)?);
	let http = hotline_providers::http_client()?;
	let service = HotlineService::new(config, http, db.clone(), qdrant);

	Ok((service, db))
}
