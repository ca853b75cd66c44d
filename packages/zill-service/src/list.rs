use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Caller, Error, Note, NoteService, Result, access};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteItem {
	#[serde(rename = "id")]
	pub note_id: Uuid,
	pub owner_id: String,
	pub title: String,
	pub content: Option<String>,
	#[serde(with = "crate::time_serde")]
	pub created_at: OffsetDateTime,
	#[serde(with = "crate::time_serde")]
	pub updated_at: OffsetDateTime,
	pub was_updated: bool,
}
impl From<Note> for NoteItem {
	fn from(note: Note) -> Self {
		let was_updated = note.was_updated();

		Self {
			note_id: note.note_id,
			owner_id: note.owner_id,
			title: note.title,
			content: note.content,
			created_at: note.created_at,
			updated_at: note.updated_at,
			was_updated,
		}
	}
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ListResponse {
	pub notes: Vec<NoteItem>,
}

impl NoteService {
	/// Lists the caller's notes, newest first.
	pub async fn list_notes(&self, caller: Option<&Caller>) -> Result<ListResponse> {
		let caller = access::require_identity(caller, "list")?;
		let notes = self.store.list_notes(caller.user_id()).await?;

		Ok(ListResponse { notes: notes.into_iter().map(NoteItem::from).collect() })
	}

	pub async fn get_note(&self, caller: Option<&Caller>, note_id: Uuid) -> Result<NoteItem> {
		let caller = access::require_identity(caller, "get")?;
		let Some(note) = self.store.find_note(note_id).await? else {
			return Err(Error::NotFound { note_id });
		};

		access::authorize_existing(Some(caller), &note)
			.map_err(|denial| access::denied("get", Some(note_id), denial))?;

		Ok(NoteItem::from(note))
	}
}
