use sqlx::{Postgres, Transaction};
use uuid::Uuid;

use crate::{BoxFuture, NewNote, Note, NoteChange, NoteStore, NoteTx, Result};
use zill_storage::{db::Db, notes};

/// A Postgres transaction holding the relational half of a note write.
pub struct PgNoteTx {
	tx: Transaction<'static, Postgres>,
}

impl NoteStore for Db {
	fn find_note(&self, note_id: Uuid) -> BoxFuture<'_, Result<Option<Note>>> {
		Box::pin(async move { Ok(notes::find_note(&self.pool, note_id).await?) })
	}

	fn list_notes<'a>(&'a self, owner_id: &'a str) -> BoxFuture<'a, Result<Vec<Note>>> {
		Box::pin(async move { Ok(notes::list_notes_by_owner(&self.pool, owner_id).await?) })
	}

	fn begin(&self) -> BoxFuture<'_, Result<Box<dyn NoteTx>>> {
		Box::pin(async move {
			let tx = self.pool.begin().await?;

			Ok(Box::new(PgNoteTx { tx }) as Box<dyn NoteTx>)
		})
	}
}

impl NoteTx for PgNoteTx {
	fn insert_note<'a>(&'a mut self, note: &'a NewNote) -> BoxFuture<'a, Result<Note>> {
		Box::pin(async move {
			let note = notes::insert_note(
				&mut *self.tx,
				&note.owner_id,
				&note.title,
				note.content.as_deref(),
				note.now,
			)
			.await?;

			Ok(note)
		})
	}

	fn update_note<'a>(&'a mut self, change: &'a NoteChange) -> BoxFuture<'a, Result<Option<Note>>> {
		Box::pin(async move {
			let note = notes::update_note(
				&mut *self.tx,
				change.note_id,
				&change.title,
				change.content.as_deref(),
				change.now,
			)
			.await?;

			Ok(note)
		})
	}

	fn delete_note(&mut self, note_id: Uuid) -> BoxFuture<'_, Result<bool>> {
		Box::pin(async move { Ok(notes::delete_note(&mut *self.tx, note_id).await?) })
	}

	fn commit(self: Box<Self>) -> BoxFuture<'static, Result<()>> {
		Box::pin(async move {
			self.tx.commit().await?;

			Ok(())
		})
	}

	fn rollback(self: Box<Self>) -> BoxFuture<'static, Result<()>> {
		Box::pin(async move {
			self.tx.rollback().await?;

			Ok(())
		})
	}
}
