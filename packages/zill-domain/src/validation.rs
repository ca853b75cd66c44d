use serde_json::{Map, Value};
use uuid::Uuid;

use zill_config::Notes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteOperation {
	Create,
	Update,
	Delete,
}
impl NoteOperation {
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Create => "create",
			Self::Update => "update",
			Self::Delete => "delete",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationCode {
	NotAnObject,
	Missing,
	WrongType,
	Empty,
	TooLong,
	InvalidId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
	/// JSON path of the offending field, e.g. `$.title`.
	pub field: String,
	pub code: ViolationCode,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationFailure {
	pub violations: Vec<FieldViolation>,
}
impl ValidationFailure {
	pub fn fields(&self) -> Vec<String> {
		self.violations.iter().map(|violation| violation.field.clone()).collect()
	}

	pub fn contains(&self, field: &str, code: ViolationCode) -> bool {
		self.violations.iter().any(|violation| violation.field == field && violation.code == code)
	}
}
impl std::fmt::Display for ValidationFailure {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Invalid fields: {}", self.fields().join(", "))
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateNote {
	pub title: String,
	pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNote {
	pub note_id: Uuid,
	pub title: String,
	pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteNote {
	pub note_id: Uuid,
}

pub fn validate_create(payload: &Value, limits: &Notes) -> Result<CreateNote, ValidationFailure> {
	let object = as_object(payload)?;
	let mut violations = Vec::new();
	let title = read_title(object, limits, &mut violations);
	let content = read_content(object, limits, &mut violations);

	match title {
		Some(title) if violations.is_empty() => Ok(CreateNote { title, content }),
		_ => Err(ValidationFailure { violations }),
	}
}

pub fn validate_update(payload: &Value, limits: &Notes) -> Result<UpdateNote, ValidationFailure> {
	let object = as_object(payload)?;
	let mut violations = Vec::new();
	let note_id = read_id(object, &mut violations);
	let title = read_title(object, limits, &mut violations);
	let content = read_content(object, limits, &mut violations);

	match (note_id, title) {
		(Some(note_id), Some(title)) if violations.is_empty() =>
			Ok(UpdateNote { note_id, title, content }),
		_ => Err(ValidationFailure { violations }),
	}
}

pub fn validate_delete(payload: &Value) -> Result<DeleteNote, ValidationFailure> {
	let object = as_object(payload)?;
	let mut violations = Vec::new();

	match read_id(object, &mut violations) {
		Some(note_id) => Ok(DeleteNote { note_id }),
		None => Err(ValidationFailure { violations }),
	}
}

/// Parses a note identifier taken from a path segment rather than a JSON body.
pub fn parse_note_id(raw: &str) -> Result<Uuid, ValidationFailure> {
	Uuid::parse_str(raw.trim()).map_err(|_| ValidationFailure {
		violations: vec![violation("$.id", ViolationCode::InvalidId)],
	})
}

fn as_object(payload: &Value) -> Result<&Map<String, Value>, ValidationFailure> {
	payload.as_object().ok_or_else(|| ValidationFailure {
		violations: vec![violation("$", ViolationCode::NotAnObject)],
	})
}

fn read_id(object: &Map<String, Value>, violations: &mut Vec<FieldViolation>) -> Option<Uuid> {
	match object.get("id") {
		None | Some(Value::Null) => {
			violations.push(violation("$.id", ViolationCode::Missing));

			None
		},
		Some(Value::String(raw)) => match Uuid::parse_str(raw.trim()) {
			Ok(note_id) => Some(note_id),
			Err(_) => {
				violations.push(violation("$.id", ViolationCode::InvalidId));

				None
			},
		},
		Some(_) => {
			violations.push(violation("$.id", ViolationCode::WrongType));

			None
		},
	}
}

fn read_title(
	object: &Map<String, Value>,
	limits: &Notes,
	violations: &mut Vec<FieldViolation>,
) -> Option<String> {
	match object.get("title") {
		None | Some(Value::Null) => {
			violations.push(violation("$.title", ViolationCode::Missing));

			None
		},
		Some(Value::String(title)) => {
			if title.trim().is_empty() {
				violations.push(violation("$.title", ViolationCode::Empty));

				return None;
			}
			if title.chars().count() > limits.max_title_chars as usize {
				violations.push(violation("$.title", ViolationCode::TooLong));

				return None;
			}

			Some(title.clone())
		},
		Some(_) => {
			violations.push(violation("$.title", ViolationCode::WrongType));

			None
		},
	}
}

fn read_content(
	object: &Map<String, Value>,
	limits: &Notes,
	violations: &mut Vec<FieldViolation>,
) -> Option<String> {
	match object.get("content") {
		None | Some(Value::Null) => None,
		Some(Value::String(content)) => {
			if content.chars().count() > limits.max_content_chars as usize {
				violations.push(violation("$.content", ViolationCode::TooLong));

				return None;
			}

			Some(content.clone())
		},
		Some(_) => {
			violations.push(violation("$.content", ViolationCode::WrongType));

			None
		},
	}
}

fn violation(field: &str, code: ViolationCode) -> FieldViolation {
	FieldViolation { field: field.to_string(), code }
}
