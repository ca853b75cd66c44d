pub mod access;
pub mod create;
pub mod delete;
pub mod embed;
pub mod index;
pub mod list;
pub mod store;
pub mod time_serde;
pub mod update;

mod error;
mod sync;

pub use access::{Caller, Denial};
pub use delete::DeleteResponse;
pub use error::{Error, Result};
pub use list::{ListResponse, NoteItem};
pub use zill_storage::models::Note;

use std::{future::Future, pin::Pin, sync::Arc};

use time::OffsetDateTime;
use uuid::Uuid;

use zill_config::{Config, EmbeddingProviderConfig};
use zill_providers::embedding;
use zill_storage::{db::Db, qdrant::QdrantStore};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub trait EmbeddingProvider
where
	Self: Send + Sync,
{
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>>;
}

/// Read access to persisted notes plus the ability to open a write transaction.
pub trait NoteStore
where
	Self: Send + Sync,
{
	fn find_note(&self, note_id: Uuid) -> BoxFuture<'_, Result<Option<Note>>>;

	/// Notes owned by `owner_id`, newest first.
	fn list_notes<'a>(&'a self, owner_id: &'a str) -> BoxFuture<'a, Result<Vec<Note>>>;

	fn begin(&self) -> BoxFuture<'_, Result<Box<dyn NoteTx>>>;
}

/// A write transaction against the note store. Nothing is visible to other readers until
/// `commit` succeeds; dropping or rolling back discards every staged write.
pub trait NoteTx
where
	Self: Send,
{
	fn insert_note<'a>(&'a mut self, note: &'a NewNote) -> BoxFuture<'a, Result<Note>>;

	/// Returns `None` when the note no longer exists.
	fn update_note<'a>(&'a mut self, change: &'a NoteChange) -> BoxFuture<'a, Result<Option<Note>>>;

	/// Returns `false` when the note no longer exists.
	fn delete_note(&mut self, note_id: Uuid) -> BoxFuture<'_, Result<bool>>;

	fn commit(self: Box<Self>) -> BoxFuture<'static, Result<()>>;

	fn rollback(self: Box<Self>) -> BoxFuture<'static, Result<()>>;
}

pub trait VectorIndex
where
	Self: Send + Sync,
{
	/// Inserts or replaces the entry keyed by `point.note_id`.
	fn upsert<'a>(&'a self, point: &'a IndexPoint) -> BoxFuture<'a, Result<()>>;

	/// Removing an absent entry is not an error.
	fn delete(&self, note_id: Uuid) -> BoxFuture<'_, Result<()>>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
	pub owner_id: String,
	pub title: String,
	pub content: Option<String>,
	pub now: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteChange {
	pub note_id: Uuid,
	pub title: String,
	pub content: Option<String>,
	pub now: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndexPoint {
	pub note_id: Uuid,
	pub vector: Vec<f32>,
	pub owner_id: String,
}

#[derive(Clone)]
pub struct Providers {
	pub embedding: Arc<dyn EmbeddingProvider>,
}
impl Providers {
	pub fn new(embedding: Arc<dyn EmbeddingProvider>) -> Self {
		Self { embedding }
	}
}
impl Default for Providers {
	fn default() -> Self {
		Self { embedding: Arc::new(DefaultProviders) }
	}
}

pub struct NoteService {
	pub cfg: Config,
	pub store: Arc<dyn NoteStore>,
	pub index: Arc<dyn VectorIndex>,
	pub providers: Providers,
}
impl NoteService {
	pub fn new(cfg: Config, db: Db, qdrant: QdrantStore) -> Self {
		Self::with_backends(cfg, Arc::new(db), Arc::new(qdrant), Providers::default())
	}

	pub fn with_backends(
		cfg: Config,
		store: Arc<dyn NoteStore>,
		index: Arc<dyn VectorIndex>,
		providers: Providers,
	) -> Self {
		Self { cfg, store, index, providers }
	}
}

struct DefaultProviders;
impl EmbeddingProvider for DefaultProviders {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move { Ok(embedding::embed(cfg, texts).await?) })
	}
}
