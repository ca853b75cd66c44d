use serde_json::Value;
use time::OffsetDateTime;

use crate::{
	Caller, Error, IndexPoint, NoteChange, NoteService, Result, access,
	list::NoteItem,
	sync::{self, Compensation},
};
use zill_domain::validation::{self, NoteOperation};

const KIND: NoteOperation = NoteOperation::Update;
const OP: &str = KIND.as_str();

impl NoteService {
	/// Replaces the title and content of a note the caller owns and re-indexes it. Omitted
	/// content clears the stored content, so the row always matches its embedded text.
	pub async fn update_note(&self, caller: Option<&Caller>, payload: &Value) -> Result<NoteItem> {
		let req = validation::validate_update(payload, &self.cfg.notes)
			.map_err(|failure| Error::invalid_payload(KIND, failure))?;
		let caller = access::require_identity(caller, OP)?;
		let found = self.store.find_note(req.note_id).await.inspect_err(|err| {
			tracing::error!(op = OP, note_id = %req.note_id, error = %err, "Failed to look up note.");
		})?;
		let Some(existing) = found else {
			tracing::info!(op = OP, note_id = %req.note_id, "Note not found.");

			return Err(Error::NotFound { note_id: req.note_id });
		};

		access::authorize_existing(Some(caller), &existing)
			.map_err(|denial| access::denied(OP, Some(existing.note_id), denial))?;

		let vector = self.embed_note(&req.title, req.content.as_deref()).await.inspect_err(|err| {
			tracing::error!(op = OP, note_id = %req.note_id, error = %err, "Failed to embed note.");
		})?;
		let change = NoteChange {
			note_id: req.note_id,
			title: req.title,
			content: req.content,
			now: OffsetDateTime::now_utc(),
		};
		let mut tx = self.store.begin().await.map_err(Error::into_storage).inspect_err(|err| {
			tracing::error!(
				op = OP,
				note_id = %change.note_id,
				error = %err,
				"Failed to begin note transaction."
			);
		})?;
		let updated = tx.update_note(&change).await;
		let note = match updated {
			Ok(Some(note)) => note,
			Ok(None) => {
				// Deleted between lookup and write.
				if let Err(err) = tx.rollback().await {
					tracing::error!(
						op = OP,
						note_id = %change.note_id,
						error = %err,
						"Failed to roll back note write."
					);
				}

				return Err(Error::NotFound { note_id: change.note_id });
			},
			Err(err) => return Err(sync::abort(tx, OP, Some(change.note_id), err).await),
		};
		let point =
			IndexPoint { note_id: note.note_id, vector, owner_id: note.owner_id.clone() };

		if let Err(err) = self.index.upsert(&point).await {
			return Err(sync::abort(tx, OP, Some(note.note_id), err).await);
		}

		self.commit_or_compensate(tx, OP, note.note_id, Compensation::Restore(&existing)).await?;

		tracing::info!(op = OP, note_id = %note.note_id, "Note updated.");

		Ok(NoteItem::from(note))
	}
}
