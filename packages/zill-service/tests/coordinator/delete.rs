use serde_json::json;

use super::{Harness, caller, vector_for};
use zill_service::Error;

#[tokio::test]
async fn owner_delete_removes_note_everywhere() {
	let h = Harness::new();
	let note = h.seed("U1", "Groceries", Some("milk, eggs"));
	let u1 = caller("U1");
	let payload = json!({ "id": note.note_id.to_string() });
	let deleted = h.service.delete_note(Some(&u1), &payload).await.expect("Delete failed.");

	assert_eq!(deleted.note_id, note.note_id);
	assert!(h.store.get(note.note_id).is_none());
	assert!(h.index.entry(note.note_id).is_none());
	assert!(h.embedding.inputs().is_empty());

	let err = h
		.service
		.delete_note(Some(&u1), &payload)
		.await
		.expect_err("Expected repeated delete to fail.");

	assert!(matches!(err, Error::NotFound { note_id } if note_id == note.note_id));
}

#[tokio::test]
async fn non_owner_is_forbidden_and_nothing_changes() {
	let h = Harness::new();
	let note = h.seed("U1", "Groceries", None);
	let u2 = caller("U2");
	let err = h
		.service
		.delete_note(Some(&u2), &json!({ "id": note.note_id.to_string() }))
		.await
		.expect_err("Expected forbidden delete.");

	assert!(matches!(err, Error::Forbidden { .. }));
	assert!(h.store.get(note.note_id).is_some());
	assert!(h.index.entry(note.note_id).is_some());
	assert_eq!(h.store.begin_count(), 0);
}

#[tokio::test]
async fn index_failure_keeps_note() {
	let h = Harness::new();
	let note = h.seed("U1", "Groceries", None);
	let u1 = caller("U1");

	h.index.fail_deletes(true);

	let err = h
		.service
		.delete_note(Some(&u1), &json!({ "id": note.note_id.to_string() }))
		.await
		.expect_err("Expected index failure.");

	assert!(matches!(err, Error::Storage { .. }));
	assert_eq!(h.store.get(note.note_id), Some(note.clone()));
	assert!(h.index.entry(note.note_id).is_some());
	assert_eq!(h.store.rollback_count(), 1);
}

#[tokio::test]
async fn commit_failure_restores_index_entry() {
	let h = Harness::new();
	let note = h.seed("U1", "Groceries", Some("milk, eggs"));
	let u1 = caller("U1");

	h.store.fail_commits(true);

	let err = h
		.service
		.delete_note(Some(&u1), &json!({ "id": note.note_id.to_string() }))
		.await
		.expect_err("Expected commit failure.");

	assert!(matches!(err, Error::Storage { .. }));
	assert!(h.store.get(note.note_id).is_some());
	assert_eq!(
		h.index.entry(note.note_id).map(|entry| entry.vector),
		Some(vector_for("Groceries", Some("milk, eggs")))
	);
}

#[tokio::test]
async fn missing_id_is_a_validation_failure() {
	let h = Harness::new();
	let u1 = caller("U1");
	let err = h
		.service
		.delete_note(Some(&u1), &json!({}))
		.await
		.expect_err("Expected validation failure.");

	assert!(matches!(err, Error::Validation { .. }));
}

#[tokio::test]
async fn lookup_failure_leaves_both_stores_untouched() {
	let h = Harness::new();
	let note = h.seed("U1", "Groceries", None);
	let u1 = caller("U1");

	h.store.fail_reads(true);

	let err = h
		.service
		.delete_note(Some(&u1), &json!({ "id": note.note_id.to_string() }))
		.await
		.expect_err("Expected lookup failure.");

	assert!(matches!(err, Error::Storage { .. }));
	assert_eq!(h.store.begin_count(), 0);
	assert_eq!(h.index.delete_count(), 0);
	assert!(h.index.entry(note.note_id).is_some());
}
