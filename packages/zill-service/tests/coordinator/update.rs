use serde_json::json;

use super::{Harness, caller, vector_for};
use zill_service::Error;

#[tokio::test]
async fn owner_update_rewrites_both_stores() {
	let h = Harness::new();
	let note = h.seed("U1", "Groceries", Some("milk, eggs"));
	let u1 = caller("U1");
	let item = h
		.service
		.update_note(
			Some(&u1),
			&json!({ "id": note.note_id.to_string(), "title": "Groceries v2", "content": null }),
		)
		.await
		.expect("Update failed.");

	assert_eq!(item.note_id, note.note_id);
	assert_eq!(item.title, "Groceries v2");
	assert_eq!(item.content, None);
	assert_eq!(item.created_at, note.created_at);
	assert!(item.was_updated);

	let stored = h.store.get(note.note_id).expect("Expected the note to remain.");
	let entry = h.index.entry(note.note_id).expect("Expected an index entry.");

	assert_eq!(stored.title, "Groceries v2");
	assert_eq!(entry.vector, vector_for("Groceries v2", None));
	assert_eq!(entry.owner_id, "U1");
	assert_eq!(h.embedding.inputs(), vec!["Groceries v2\n\n".to_string()]);
}

#[tokio::test]
async fn non_owner_is_forbidden_and_nothing_changes() {
	let h = Harness::new();
	let note = h.seed("U1", "Groceries", Some("milk, eggs"));
	let u2 = caller("U2");
	let err = h
		.service
		.update_note(Some(&u2), &json!({ "id": note.note_id.to_string(), "title": "Hijacked" }))
		.await
		.expect_err("Expected forbidden update.");

	assert!(matches!(err, Error::Forbidden { note_id } if note_id == note.note_id));
	assert_eq!(h.store.get(note.note_id), Some(note.clone()));
	assert_eq!(
		h.index.entry(note.note_id).map(|entry| entry.vector),
		Some(vector_for("Groceries", Some("milk, eggs")))
	);
	assert!(h.embedding.inputs().is_empty());
	assert_eq!(h.store.begin_count(), 0);
}

#[tokio::test]
async fn missing_identity_is_distinct_from_forbidden() {
	let h = Harness::new();
	let note = h.seed("U1", "Groceries", None);
	let err = h
		.service
		.update_note(None, &json!({ "id": note.note_id.to_string(), "title": "Anon" }))
		.await
		.expect_err("Expected anonymous update to fail.");

	assert!(matches!(err, Error::Unauthenticated));
}

#[tokio::test]
async fn unknown_note_is_not_found() {
	let h = Harness::new();
	let u1 = caller("U1");
	let missing = uuid::Uuid::new_v4();
	let err = h
		.service
		.update_note(Some(&u1), &json!({ "id": missing.to_string(), "title": "Ghost" }))
		.await
		.expect_err("Expected not found.");

	assert!(matches!(err, Error::NotFound { note_id } if note_id == missing));
	assert!(h.embedding.inputs().is_empty());
}

#[tokio::test]
async fn malformed_id_is_a_validation_failure() {
	let h = Harness::new();
	let u1 = caller("U1");
	let err = h
		.service
		.update_note(Some(&u1), &json!({ "id": "abc", "title": "Groceries" }))
		.await
		.expect_err("Expected validation failure.");

	assert!(matches!(err, Error::Validation { .. }));
}

#[tokio::test]
async fn index_failure_keeps_previous_row() {
	let h = Harness::new();
	let note = h.seed("U1", "Groceries", Some("milk, eggs"));
	let u1 = caller("U1");

	h.index.fail_upserts(true);

	let err = h
		.service
		.update_note(Some(&u1), &json!({ "id": note.note_id.to_string(), "title": "Groceries v2" }))
		.await
		.expect_err("Expected index failure.");

	assert!(matches!(err, Error::Storage { .. }));
	assert_eq!(h.store.get(note.note_id), Some(note.clone()));
	assert_eq!(h.store.rollback_count(), 1);
	assert_eq!(h.store.commit_count(), 0);
}

#[tokio::test]
async fn commit_failure_restores_previous_index_entry() {
	let h = Harness::new();
	let note = h.seed("U1", "Groceries", Some("milk, eggs"));
	let u1 = caller("U1");

	h.store.fail_commits(true);

	let err = h
		.service
		.update_note(Some(&u1), &json!({ "id": note.note_id.to_string(), "title": "Groceries v2" }))
		.await
		.expect_err("Expected commit failure.");

	assert!(matches!(err, Error::Storage { .. }));
	assert_eq!(h.store.get(note.note_id), Some(note.clone()));
	assert_eq!(
		h.index.entry(note.note_id).map(|entry| entry.vector),
		Some(vector_for("Groceries", Some("milk, eggs")))
	);
	assert_eq!(h.index.upsert_count(), 2);
}

#[tokio::test]
async fn omitted_content_clears_stored_content() {
	let h = Harness::new();
	let note = h.seed("U1", "Groceries", Some("milk, eggs"));
	let u1 = caller("U1");
	let item = h
		.service
		.update_note(Some(&u1), &json!({ "id": note.note_id.to_string(), "title": "Groceries" }))
		.await
		.expect("Update failed.");

	assert_eq!(item.content, None);
	assert_eq!(h.store.get(note.note_id).and_then(|stored| stored.content), None);
	assert_eq!(
		h.index.entry(note.note_id).map(|entry| entry.vector),
		Some(vector_for("Groceries", None))
	);
	assert_eq!(h.embedding.inputs(), vec!["Groceries\n\n".to_string()]);
}

#[tokio::test]
async fn lookup_failure_is_a_storage_error() {
	let h = Harness::new();
	let note = h.seed("U1", "Groceries", Some("milk, eggs"));
	let u1 = caller("U1");

	h.store.fail_reads(true);

	let err = h
		.service
		.update_note(Some(&u1), &json!({ "id": note.note_id.to_string(), "title": "Groceries v2" }))
		.await
		.expect_err("Expected lookup failure.");

	assert!(matches!(err, Error::Storage { .. }));
	assert!(h.embedding.inputs().is_empty());
	assert_eq!(h.store.begin_count(), 0);
	assert_eq!(h.index.upsert_count(), 0);
}
