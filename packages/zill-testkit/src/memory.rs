//! In-memory stand-ins for the note store, vector index, and embedding provider, with failure
//! injection for exercising rollback paths.

use std::{
	collections::HashMap,
	sync::{Arc, Mutex, MutexGuard},
};

use uuid::Uuid;

use zill_config::EmbeddingProviderConfig;
use zill_service::{
	BoxFuture, EmbeddingProvider, Error, IndexPoint, NewNote, Note, NoteChange, NoteStore, NoteTx,
	Result, VectorIndex,
};

#[derive(Default)]
struct StoreState {
	notes: HashMap<Uuid, Note>,
	fail_reads: bool,
	fail_inserts: bool,
	fail_commits: bool,
	begins: usize,
	commits: usize,
	rollbacks: usize,
}

/// A note store whose transactions stage writes privately and publish them on commit.
#[derive(Clone, Default)]
pub struct MemoryNoteStore {
	state: Arc<Mutex<StoreState>>,
}
impl MemoryNoteStore {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn seed(&self, note: Note) {
		self.lock().notes.insert(note.note_id, note);
	}

	pub fn get(&self, note_id: Uuid) -> Option<Note> {
		self.lock().notes.get(&note_id).cloned()
	}

	pub fn len(&self) -> usize {
		self.lock().notes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn fail_reads(&self, fail: bool) {
		self.lock().fail_reads = fail;
	}

	pub fn fail_inserts(&self, fail: bool) {
		self.lock().fail_inserts = fail;
	}

	pub fn fail_commits(&self, fail: bool) {
		self.lock().fail_commits = fail;
	}

	pub fn begin_count(&self) -> usize {
		self.lock().begins
	}

	pub fn commit_count(&self) -> usize {
		self.lock().commits
	}

	pub fn rollback_count(&self) -> usize {
		self.lock().rollbacks
	}

	fn lock(&self) -> MutexGuard<'_, StoreState> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}
}
impl NoteStore for MemoryNoteStore {
	fn find_note(&self, note_id: Uuid) -> BoxFuture<'_, Result<Option<Note>>> {
		Box::pin(async move {
			if self.lock().fail_reads {
				return Err(Error::Storage { message: "Injected read failure.".to_string() });
			}

			Ok(self.get(note_id))
		})
	}

	fn list_notes<'a>(&'a self, owner_id: &'a str) -> BoxFuture<'a, Result<Vec<Note>>> {
		Box::pin(async move {
			let mut notes = self
				.lock()
				.notes
				.values()
				.filter(|note| note.owner_id == owner_id)
				.cloned()
				.collect::<Vec<_>>();

			notes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(a.note_id.cmp(&b.note_id)));

			Ok(notes)
		})
	}

	fn begin(&self) -> BoxFuture<'_, Result<Box<dyn NoteTx>>> {
		Box::pin(async move {
			self.lock().begins += 1;

			Ok(Box::new(MemoryNoteTx { state: self.state.clone(), staged: HashMap::new() })
				as Box<dyn NoteTx>)
		})
	}
}

/// Staged writes: `Some` replaces the row, `None` removes it.
pub struct MemoryNoteTx {
	state: Arc<Mutex<StoreState>>,
	staged: HashMap<Uuid, Option<Note>>,
}
impl MemoryNoteTx {
	fn lock(&self) -> MutexGuard<'_, StoreState> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn visible(&self, note_id: Uuid) -> Option<Note> {
		match self.staged.get(&note_id) {
			Some(staged) => staged.clone(),
			None => self.lock().notes.get(&note_id).cloned(),
		}
	}
}
impl NoteTx for MemoryNoteTx {
	fn insert_note<'a>(&'a mut self, note: &'a NewNote) -> BoxFuture<'a, Result<Note>> {
		Box::pin(async move {
			if self.lock().fail_inserts {
				return Err(Error::Storage { message: "Injected insert failure.".to_string() });
			}

			let stored = Note {
				note_id: Uuid::new_v4(),
				owner_id: note.owner_id.clone(),
				title: note.title.clone(),
				content: note.content.clone(),
				created_at: note.now,
				updated_at: note.now,
			};

			self.staged.insert(stored.note_id, Some(stored.clone()));

			Ok(stored)
		})
	}

	fn update_note<'a>(&'a mut self, change: &'a NoteChange) -> BoxFuture<'a, Result<Option<Note>>> {
		Box::pin(async move {
			let Some(mut note) = self.visible(change.note_id) else {
				return Ok(None);
			};

			note.title = change.title.clone();
			note.content = change.content.clone();
			note.updated_at = change.now;

			self.staged.insert(note.note_id, Some(note.clone()));

			Ok(Some(note))
		})
	}

	fn delete_note(&mut self, note_id: Uuid) -> BoxFuture<'_, Result<bool>> {
		Box::pin(async move {
			if self.visible(note_id).is_none() {
				return Ok(false);
			}

			self.staged.insert(note_id, None);

			Ok(true)
		})
	}

	fn commit(self: Box<Self>) -> BoxFuture<'static, Result<()>> {
		Box::pin(async move {
			let mut state = self.state.lock().unwrap_or_else(|err| err.into_inner());

			if state.fail_commits {
				state.rollbacks += 1;

				return Err(Error::Storage { message: "Injected commit failure.".to_string() });
			}

			for (note_id, staged) in &self.staged {
				match staged {
					Some(note) => {
						state.notes.insert(*note_id, note.clone());
					},
					None => {
						state.notes.remove(note_id);
					},
				}
			}

			state.commits += 1;

			Ok(())
		})
	}

	fn rollback(self: Box<Self>) -> BoxFuture<'static, Result<()>> {
		Box::pin(async move {
			self.lock().rollbacks += 1;

			Ok(())
		})
	}
}

#[derive(Default)]
struct IndexState {
	points: HashMap<Uuid, IndexPoint>,
	fail_upserts: bool,
	fail_deletes: bool,
	upserts: usize,
	deletes: usize,
}

#[derive(Clone, Default)]
pub struct MemoryVectorIndex {
	state: Arc<Mutex<IndexState>>,
}
impl MemoryVectorIndex {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn seed(&self, point: IndexPoint) {
		self.lock().points.insert(point.note_id, point);
	}

	pub fn entry(&self, note_id: Uuid) -> Option<IndexPoint> {
		self.lock().points.get(&note_id).cloned()
	}

	pub fn len(&self) -> usize {
		self.lock().points.len()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn fail_upserts(&self, fail: bool) {
		self.lock().fail_upserts = fail;
	}

	pub fn fail_deletes(&self, fail: bool) {
		self.lock().fail_deletes = fail;
	}

	/// Write attempts seen so far, including injected failures.
	pub fn upsert_count(&self) -> usize {
		self.lock().upserts
	}

	pub fn delete_count(&self) -> usize {
		self.lock().deletes
	}

	fn lock(&self) -> MutexGuard<'_, IndexState> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}
}
impl VectorIndex for MemoryVectorIndex {
	fn upsert<'a>(&'a self, point: &'a IndexPoint) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			let mut state = self.lock();

			state.upserts += 1;

			if state.fail_upserts {
				return Err(Error::Storage { message: "Injected upsert failure.".to_string() });
			}

			state.points.insert(point.note_id, point.clone());

			Ok(())
		})
	}

	fn delete(&self, note_id: Uuid) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			let mut state = self.lock();

			state.deletes += 1;

			if state.fail_deletes {
				return Err(Error::Storage { message: "Injected delete failure.".to_string() });
			}

			state.points.remove(&note_id);

			Ok(())
		})
	}
}

#[derive(Default)]
struct EmbeddingState {
	inputs: Vec<String>,
	fail: bool,
	dimension_override: Option<usize>,
}

/// Returns a deterministic vector per input and records every text it was asked to embed.
#[derive(Clone, Default)]
pub struct RecordingEmbedding {
	state: Arc<Mutex<EmbeddingState>>,
}
impl RecordingEmbedding {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn inputs(&self) -> Vec<String> {
		self.lock().inputs.clone()
	}

	pub fn fail(&self, fail: bool) {
		self.lock().fail = fail;
	}

	/// Forces vectors of `dim` entries regardless of the configured dimension.
	pub fn return_dimension(&self, dim: usize) {
		self.lock().dimension_override = Some(dim);
	}

	fn lock(&self) -> MutexGuard<'_, EmbeddingState> {
		self.state.lock().unwrap_or_else(|err| err.into_inner())
	}
}
impl EmbeddingProvider for RecordingEmbedding {
	fn embed<'a>(
		&'a self,
		cfg: &'a EmbeddingProviderConfig,
		texts: &'a [String],
	) -> BoxFuture<'a, Result<Vec<Vec<f32>>>> {
		Box::pin(async move {
			let mut state = self.lock();

			state.inputs.extend(texts.iter().cloned());

			if state.fail {
				return Err(Error::Provider { message: "Injected provider failure.".to_string() });
			}

			let dim = state.dimension_override.unwrap_or(cfg.dimensions as usize);

			Ok(texts.iter().map(|text| deterministic_vector(text, dim)).collect())
		})
	}
}

pub fn deterministic_vector(text: &str, dim: usize) -> Vec<f32> {
	let seed = text.bytes().fold(0_u32, |acc, byte| acc.wrapping_mul(31).wrapping_add(byte.into()));

	(0..dim).map(|i| ((seed.wrapping_add(i as u32) % 997) as f32 + 1.0) / 997.0).collect()
}
