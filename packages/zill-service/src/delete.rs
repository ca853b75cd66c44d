use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::{
	Caller, Error, NoteService, Result, access,
	sync::{self, Compensation},
};
use zill_domain::validation::{self, NoteOperation};

const KIND: NoteOperation = NoteOperation::Delete;
const OP: &str = KIND.as_str();

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
	pub note_id: Uuid,
}

impl NoteService {
	/// Removes a note the caller owns from both stores.
	pub async fn delete_note(
		&self,
		caller: Option<&Caller>,
		payload: &Value,
	) -> Result<DeleteResponse> {
		let req = validation::validate_delete(payload)
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

		let mut tx = self.store.begin().await.map_err(Error::into_storage).inspect_err(|err| {
			tracing::error!(
				op = OP,
				note_id = %existing.note_id,
				error = %err,
				"Failed to begin note transaction."
			);
		})?;
		let deleted = tx.delete_note(existing.note_id).await;

		match deleted {
			Ok(true) => {},
			Ok(false) => {
				if let Err(err) = tx.rollback().await {
					tracing::error!(
						op = OP,
						note_id = %existing.note_id,
						error = %err,
						"Failed to roll back note write."
					);
				}

				return Err(Error::NotFound { note_id: existing.note_id });
			},
			Err(err) => return Err(sync::abort(tx, OP, Some(existing.note_id), err).await),
		}

		if let Err(err) = self.index.delete(existing.note_id).await {
			return Err(sync::abort(tx, OP, Some(existing.note_id), err).await);
		}

		self.commit_or_compensate(tx, OP, existing.note_id, Compensation::Restore(&existing))
			.await?;

		tracing::info!(op = OP, note_id = %existing.note_id, "Note deleted.");

		Ok(DeleteResponse { note_id: existing.note_id })
	}
}
