use uuid::Uuid;

use crate::{Error, IndexPoint, Note, NoteService, NoteTx, Result};

/// Rolls back `tx` after a failed write and returns the failure as a storage error.
pub(crate) async fn abort(
	tx: Box<dyn NoteTx>,
	op: &'static str,
	note_id: Option<Uuid>,
	err: Error,
) -> Error {
	let err = err.into_storage();

	tracing::warn!(op, ?note_id, error = %err, "Note write failed. Rolling back.");

	if let Err(rollback_err) = tx.rollback().await {
		tracing::error!(op, ?note_id, error = %rollback_err, "Failed to roll back note write.");
	}

	err
}

impl NoteService {
	/// Commits `tx`. On failure the index has already been written, so it is brought back in line
	/// with the relational state through `compensate`.
	pub(crate) async fn commit_or_compensate(
		&self,
		tx: Box<dyn NoteTx>,
		op: &'static str,
		note_id: Uuid,
		compensate: Compensation<'_>,
	) -> Result<()> {
		let Err(err) = tx.commit().await else {
			return Ok(());
		};
		let err = err.into_storage();

		tracing::error!(op, %note_id, error = %err, "Commit failed after index write.");

		match compensate {
			Compensation::Discard => {
				if let Err(index_err) = self.index.delete(note_id).await {
					tracing::error!(
						op,
						%note_id,
						error = %index_err,
						"Failed to remove index entry. Stores may diverge."
					);
				}
			},
			Compensation::Restore(previous) =>
				if let Err(index_err) = self.reindex(previous).await {
					tracing::error!(
						op,
						%note_id,
						error = %index_err,
						"Failed to restore index entry. Stores may diverge."
					);
				},
		}

		Err(err)
	}

	async fn reindex(&self, note: &Note) -> Result<()> {
		let vector = self.embed_note(&note.title, note.content.as_deref()).await?;
		let point = IndexPoint { note_id: note.note_id, vector, owner_id: note.owner_id.clone() };

		self.index.upsert(&point).await
	}
}

/// How to undo an index write whose relational counterpart failed to commit.
pub(crate) enum Compensation<'a> {
	/// The note never existed; drop its entry.
	Discard,
	/// Put back the entry for the last committed state.
	Restore(&'a Note),
}
