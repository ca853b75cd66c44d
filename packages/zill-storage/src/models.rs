use time::OffsetDateTime;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct Note {
	pub note_id: Uuid,
	pub owner_id: String,
	pub title: String,
	pub content: Option<String>,
	pub created_at: OffsetDateTime,
	pub updated_at: OffsetDateTime,
}
impl Note {
	pub fn was_updated(&self) -> bool {
		self.updated_at > self.created_at
	}
}
