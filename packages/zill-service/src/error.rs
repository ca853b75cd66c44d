use uuid::Uuid;

use zill_domain::validation::{NoteOperation, ValidationFailure};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {failure}")]
	Validation { failure: ValidationFailure },
	#[error("Caller identity is required.")]
	Unauthenticated,
	#[error("Caller does not own note {note_id}.")]
	Forbidden { note_id: Uuid },
	#[error("Note {note_id} not found.")]
	NotFound { note_id: Uuid },
	#[error("Provider error: {message}")]
	Provider { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	/// Stable label used in logs.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Validation { .. } => "validation_failed",
			Self::Unauthenticated => "unauthenticated",
			Self::Forbidden { .. } => "forbidden",
			Self::NotFound { .. } => "not_found",
			Self::Provider { .. } => "provider_error",
			Self::Storage { .. } => "store_error",
		}
	}

	pub(crate) fn invalid_payload(op: NoteOperation, failure: ValidationFailure) -> Self {
		tracing::info!(op = op.as_str(), fields = ?failure.fields(), "Rejected invalid note payload.");

		Self::Validation { failure }
	}

	/// Collapses any failure on the write path into a storage failure.
	pub(crate) fn into_storage(self) -> Self {
		match self {
			Self::Storage { .. } => self,
			other => Self::Storage { message: other.to_string() },
		}
	}
}
impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		Self::Storage { message: err.to_string() }
	}
}
impl From<zill_storage::Error> for Error {
	fn from(err: zill_storage::Error) -> Self {
		match err {
			zill_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			zill_storage::Error::Qdrant(inner) =>
				Self::Storage { message: format!("Vector index: {inner}") },
		}
	}
}
impl From<zill_providers::Error> for Error {
	fn from(err: zill_providers::Error) -> Self {
		Self::Provider { message: err.to_string() }
	}
}
