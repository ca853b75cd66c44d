use uuid::Uuid;

use crate::{Error, Note};

/// An authenticated caller. The identifier is never blank.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Caller {
	user_id: String,
}
impl Caller {
	/// Returns `None` for a blank identifier, which is treated the same as no identity at all.
	pub fn new(user_id: impl Into<String>) -> Option<Self> {
		let user_id = user_id.into().trim().to_string();

		if user_id.is_empty() {
			return None;
		}

		Some(Self { user_id })
	}

	pub fn user_id(&self) -> &str {
		&self.user_id
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
	Unauthenticated,
	Forbidden,
}

pub fn authorize_create(caller: Option<&Caller>) -> Result<&Caller, Denial> {
	caller.ok_or(Denial::Unauthenticated)
}

/// Owner-only access to an existing note. Used for reads as well as writes.
pub fn authorize_existing<'a>(caller: Option<&'a Caller>, note: &Note) -> Result<&'a Caller, Denial> {
	let caller = caller.ok_or(Denial::Unauthenticated)?;

	if caller.user_id != note.owner_id {
		return Err(Denial::Forbidden);
	}

	Ok(caller)
}

pub(crate) fn require_identity<'a>(
	caller: Option<&'a Caller>,
	op: &str,
) -> Result<&'a Caller, Error> {
	authorize_create(caller).map_err(|denial| denied(op, None, denial))
}

pub(crate) fn denied(op: &str, note_id: Option<Uuid>, denial: Denial) -> Error {
	match (denial, note_id) {
		(Denial::Forbidden, Some(note_id)) => {
			tracing::warn!(op, %note_id, "Caller does not own the note.");

			Error::Forbidden { note_id }
		},
		_ => {
			tracing::info!(op, ?note_id, "Rejected request without caller identity.");

			Error::Unauthenticated
		},
	}
}
