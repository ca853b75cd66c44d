use std::sync::Arc;

use crate::auth::AuthState;
use zill_service::NoteService;
use zill_storage::{db::Db, qdrant::QdrantStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<NoteService>,
	pub auth: AuthState,
}
impl AppState {
	/// Connects both stores and makes sure the table and collection exist.
	pub async fn new(config: zill_config::Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema().await?;

		let qdrant = QdrantStore::new(&config.storage.qdrant)?;

		qdrant.ensure_collection().await?;

		Ok(Self::from_service(NoteService::new(config, db, qdrant)))
	}

	pub fn from_service(service: NoteService) -> Self {
		let auth = AuthState::from_security(&service.cfg.security);

		Self { service: Arc::new(service), auth }
	}
}
