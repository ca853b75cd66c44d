pub mod config;
pub mod memory;

mod error;

pub use config::{TEST_VECTOR_DIM, test_config, test_config_with, token_for};
pub use error::{Error, Result};
pub use memory::{MemoryNoteStore, MemoryVectorIndex, RecordingEmbedding};

use std::{env, mem, str::FromStr, sync::Mutex, thread, time::Duration};

use qdrant_client::Qdrant;
use sqlx::{
	ConnectOptions, Connection, Executor,
	postgres::{PgConnectOptions, PgConnection},
};
use tokio::{runtime::Builder, time};
use uuid::Uuid;

use zill_config::{Config, Postgres};
use zill_storage::{db::Db, qdrant::QdrantStore};

const NOTES_COLLECTION_PREFIX: &str = "zill_notes";
const QDRANT_DELETE_TIMEOUT: Duration = Duration::from_secs(10);

/// A scratch Postgres database for live-backend tests. Qdrant collections named through it share
/// its lifetime and are removed with it, either by `cleanup` or on drop.
pub struct TestDatabase {
	leftovers: Leftovers,
	dsn: String,
	released: bool,
}
impl TestDatabase {
	pub async fn new(base_dsn: &str) -> Result<Self> {
		let base = PgConnectOptions::from_str(base_dsn)
			.map_err(|err| Error::Message(format!("Invalid ZILL_PG_DSN: {err}.")))?;
		let (admin, mut conn) = connect_admin(&base).await?;
		let name = format!("zill_test_{}", Uuid::new_v4().simple());

		conn.execute(format!(r#"CREATE DATABASE "{name}""#).as_str())
			.await
			.map_err(|err| Error::Message(format!("Failed to create database {name}: {err}.")))?;

		let dsn = base.database(&name).to_url_lossy().to_string();

		Ok(Self {
			leftovers: Leftovers { database: name, admin, collections: Mutex::new(Vec::new()) },
			dsn,
			released: false,
		})
	}

	pub fn dsn(&self) -> &str {
		&self.dsn
	}

	/// Registers a collection name scoped to this database.
	pub fn collection_name(&self, prefix: &str) -> String {
		let collection = format!("{prefix}_{}", self.leftovers.database);

		self.leftovers.track(collection.clone());

		collection
	}

	/// A static-keys config pointing at this database and a fresh notes collection.
	pub fn notes_config(&self, qdrant_url: &str, users: &[&str]) -> Config {
		let collection = self.collection_name(NOTES_COLLECTION_PREFIX);

		test_config_with(&self.dsn, qdrant_url, &collection, users)
	}

	/// Connects to this database with the notes schema in place.
	pub async fn connect_notes(&self) -> Result<Db> {
		let db = Db::connect(&Postgres { dsn: self.dsn.clone(), pool_max_conns: 2 }).await?;

		db.ensure_schema().await?;

		Ok(db)
	}

	/// A Qdrant store whose collection exists and is tracked for removal.
	pub async fn notes_index(&self, cfg: &zill_config::Qdrant) -> Result<QdrantStore> {
		self.leftovers.track(cfg.collection.clone());

		let store = QdrantStore::new(cfg)?;

		store.ensure_collection().await?;

		Ok(store)
	}

	pub async fn cleanup(mut self) -> Result<()> {
		self.released = true;

		self.leftovers.take().remove().await
	}
}
impl Drop for TestDatabase {
	fn drop(&mut self) {
		if self.released {
			return;
		}

		let leftovers = self.leftovers.take();
		let worker = thread::spawn(move || {
			let runtime = match Builder::new_current_thread().enable_all().build() {
				Ok(runtime) => runtime,
				Err(err) => {
					eprintln!("Test backend cleanup could not start a runtime: {err}.");

					return;
				},
			};

			if let Err(err) = runtime.block_on(leftovers.remove()) {
				eprintln!("Test backend cleanup failed: {err}");
			}
		});

		let _ = worker.join();
	}
}

/// Everything a `TestDatabase` created outside of this process.
struct Leftovers {
	database: String,
	admin: PgConnectOptions,
	collections: Mutex<Vec<String>>,
}
impl Leftovers {
	fn track(&self, collection: String) {
		let mut collections = self.collections.lock().unwrap_or_else(|err| err.into_inner());

		if !collections.contains(&collection) {
			collections.push(collection);
		}
	}

	fn take(&mut self) -> Self {
		let tracked = self.collections.get_mut().unwrap_or_else(|err| err.into_inner());
		let collections = mem::take(tracked);

		Self {
			database: mem::take(&mut self.database),
			admin: self.admin.clone(),
			collections: Mutex::new(collections),
		}
	}

	async fn remove(self) -> Result<()> {
		let collections = self.collections.into_inner().unwrap_or_else(|err| err.into_inner());
		let collections_removed = drop_collections(&collections).await;
		let database_removed = drop_database(&self.database, &self.admin).await;

		collections_removed.and(database_removed)
	}
}

pub fn env_dsn() -> Option<String> {
	env::var("ZILL_PG_DSN").ok()
}

pub fn env_qdrant_url() -> Option<String> {
	env::var("ZILL_QDRANT_URL").ok()
}

/// Connects to the database named in the DSN, falling back to `postgres` when it does not exist.
async fn connect_admin(base: &PgConnectOptions) -> Result<(PgConnectOptions, PgConnection)> {
	let candidates = [base.clone(), base.clone().database("postgres")];
	let mut failures = Vec::new();

	for options in candidates {
		match PgConnection::connect_with(&options).await {
			Ok(conn) => return Ok((options, conn)),
			Err(err) => failures.push(err.to_string()),
		}
	}

	Err(Error::Message(format!("No admin database reachable: {}.", failures.join("; "))))
}

async fn drop_database(name: &str, admin: &PgConnectOptions) -> Result<()> {
	if name.is_empty() {
		return Ok(());
	}

	let mut conn = PgConnection::connect_with(admin)
		.await
		.map_err(|err| Error::Message(format!("Failed to reconnect for cleanup: {err}.")))?;

	conn.execute(format!(r#"DROP DATABASE IF EXISTS "{name}" WITH (FORCE)"#).as_str())
		.await
		.map_err(|err| Error::Message(format!("Failed to drop database {name}: {err}.")))?;

	Ok(())
}

async fn drop_collections(collections: &[String]) -> Result<()> {
	if collections.is_empty() {
		return Ok(());
	}

	let Some(url) = env_qdrant_url() else {
		eprintln!("ZILL_QDRANT_URL is unset; leaving {} test collection(s).", collections.len());

		return Ok(());
	};
	let client = Qdrant::from_url(&url)
		.build()
		.map_err(|err| Error::Message(format!("Failed to build Qdrant client: {err}.")))?;

	for collection in collections {
		time::timeout(QDRANT_DELETE_TIMEOUT, client.delete_collection(collection.clone()))
			.await
			.map_err(|_| Error::Message(format!("Timed out deleting collection {collection}.")))?
			.map_err(|err| {
				Error::Message(format!("Failed to delete collection {collection}: {err}."))
			})?;
	}

	Ok(())
}
