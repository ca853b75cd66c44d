use time::{Duration, OffsetDateTime};

use super::{Harness, caller};
use zill_service::Error;

#[tokio::test]
async fn list_returns_only_callers_notes_newest_first() {
	let h = Harness::new();
	let now = OffsetDateTime::now_utc();
	let older = h.seed_at("U1", "Older", None, now - Duration::hours(2));
	let newer = h.seed_at("U1", "Newer", None, now - Duration::hours(1));

	h.seed("U2", "Someone else", None);

	let u1 = caller("U1");
	let listed = h.service.list_notes(Some(&u1)).await.expect("List failed.");
	let ids = listed.notes.iter().map(|item| item.note_id).collect::<Vec<_>>();

	assert_eq!(ids, vec![newer.note_id, older.note_id]);
}

#[tokio::test]
async fn list_requires_identity() {
	let h = Harness::new();
	let err = h.service.list_notes(None).await.expect_err("Expected anonymous list to fail.");

	assert!(matches!(err, Error::Unauthenticated));
}

#[tokio::test]
async fn get_is_owner_only() {
	let h = Harness::new();
	let note = h.seed("U1", "Groceries", Some("milk, eggs"));
	let u1 = caller("U1");
	let u2 = caller("U2");
	let item = h.service.get_note(Some(&u1), note.note_id).await.expect("Get failed.");

	assert_eq!(item.title, "Groceries");
	assert!(!item.was_updated);

	let err = h
		.service
		.get_note(Some(&u2), note.note_id)
		.await
		.expect_err("Expected forbidden read.");

	assert!(matches!(err, Error::Forbidden { .. }));

	let err = h
		.service
		.get_note(Some(&u1), uuid::Uuid::new_v4())
		.await
		.expect_err("Expected not found.");

	assert!(matches!(err, Error::NotFound { .. }));
}
