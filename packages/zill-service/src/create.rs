use serde_json::Value;
use time::OffsetDateTime;

use crate::{
	Caller, Error, IndexPoint, NewNote, NoteService, Result, access,
	list::NoteItem,
	sync::{self, Compensation},
};
use zill_domain::validation::{self, NoteOperation};

const KIND: NoteOperation = NoteOperation::Create;
const OP: &str = KIND.as_str();

impl NoteService {
	/// Creates a note owned by `caller` and indexes its embedding. Either both stores hold the
	/// note afterwards or neither does.
	pub async fn create_note(&self, caller: Option<&Caller>, payload: &Value) -> Result<NoteItem> {
		let req = validation::validate_create(payload, &self.cfg.notes)
			.map_err(|failure| Error::invalid_payload(KIND, failure))?;
		let caller = access::require_identity(caller, OP)?;
		let vector = self.embed_note(&req.title, req.content.as_deref()).await.inspect_err(|err| {
			tracing::error!(op = OP, error = %err, "Failed to embed note.");
		})?;
		let new_note = NewNote {
			owner_id: caller.user_id().to_string(),
			title: req.title,
			content: req.content,
			now: OffsetDateTime::now_utc(),
		};
		let mut tx = self.store.begin().await.map_err(Error::into_storage).inspect_err(|err| {
			tracing::error!(op = OP, error = %err, "Failed to begin note transaction.");
		})?;
		let inserted = tx.insert_note(&new_note).await;
		let note = match inserted {
			Ok(note) => note,
			Err(err) => return Err(sync::abort(tx, OP, None, err).await),
		};
		let point =
			IndexPoint { note_id: note.note_id, vector, owner_id: note.owner_id.clone() };

		if let Err(err) = self.index.upsert(&point).await {
			return Err(sync::abort(tx, OP, Some(note.note_id), err).await);
		}

		self.commit_or_compensate(tx, OP, note.note_id, Compensation::Discard).await?;

		tracing::info!(op = OP, note_id = %note.note_id, owner_id = %note.owner_id, "Note created.");

		Ok(NoteItem::from(note))
	}
}
