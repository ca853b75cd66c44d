use sqlx::PgExecutor;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{Result, models::Note};

pub async fn find_note<'e, E>(executor: E, note_id: Uuid) -> Result<Option<Note>>
where
	E: PgExecutor<'e>,
{
	let note = sqlx::query_as::<_, Note>(
		"\
SELECT note_id, owner_id, title, content, created_at, updated_at
FROM notes
WHERE note_id = $1",
	)
	.bind(note_id)
	.fetch_optional(executor)
	.await?;

	Ok(note)
}

pub async fn list_notes_by_owner<'e, E>(executor: E, owner_id: &str) -> Result<Vec<Note>>
where
	E: PgExecutor<'e>,
{
	let notes = sqlx::query_as::<_, Note>(
		"\
SELECT note_id, owner_id, title, content, created_at, updated_at
FROM notes
WHERE owner_id = $1
ORDER BY created_at DESC, note_id",
	)
	.bind(owner_id)
	.fetch_all(executor)
	.await?;

	Ok(notes)
}

/// Inserts a note and returns the stored row, including the identifier assigned by Postgres.
pub async fn insert_note<'e, E>(
	executor: E,
	owner_id: &str,
	title: &str,
	content: Option<&str>,
	now: OffsetDateTime,
) -> Result<Note>
where
	E: PgExecutor<'e>,
{
	let note = sqlx::query_as::<_, Note>(
		"\
INSERT INTO notes (owner_id, title, content, created_at, updated_at)
VALUES ($1, $2, $3, $4, $4)
RETURNING note_id, owner_id, title, content, created_at, updated_at",
	)
	.bind(owner_id)
	.bind(title)
	.bind(content)
	.bind(now)
	.fetch_one(executor)
	.await?;

	Ok(note)
}

/// Rewrites title and content. Returns `None` when the row no longer exists.
pub async fn update_note<'e, E>(
	executor: E,
	note_id: Uuid,
	title: &str,
	content: Option<&str>,
	now: OffsetDateTime,
) -> Result<Option<Note>>
where
	E: PgExecutor<'e>,
{
	let note = sqlx::query_as::<_, Note>(
		"\
UPDATE notes
SET
	title = $2,
	content = $3,
	updated_at = $4
WHERE note_id = $1
RETURNING note_id, owner_id, title, content, created_at, updated_at",
	)
	.bind(note_id)
	.bind(title)
	.bind(content)
	.bind(now)
	.fetch_optional(executor)
	.await?;

	Ok(note)
}

pub async fn delete_note<'e, E>(executor: E, note_id: Uuid) -> Result<bool>
where
	E: PgExecutor<'e>,
{
	let result =
		sqlx::query("DELETE FROM notes WHERE note_id = $1").bind(note_id).execute(executor).await?;

	Ok(result.rows_affected() > 0)
}
