use serde_json::json;

use super::{Harness, caller, vector_for};
use zill_domain::validation::ViolationCode;
use zill_service::Error;

#[tokio::test]
async fn creates_note_owned_by_caller_in_both_stores() {
	let h = Harness::new();
	let u1 = caller("U1");
	let item = h
		.service
		.create_note(Some(&u1), &json!({ "title": "Groceries", "content": "milk, eggs" }))
		.await
		.expect("Create failed.");

	assert_eq!(item.owner_id, "U1");
	assert_eq!(item.title, "Groceries");
	assert_eq!(item.content.as_deref(), Some("milk, eggs"));
	assert!(!item.was_updated);

	let stored = h.store.get(item.note_id).expect("Expected the note to be committed.");
	let entry = h.index.entry(item.note_id).expect("Expected an index entry.");

	assert_eq!(stored.owner_id, "U1");
	assert_eq!(entry.owner_id, "U1");
	assert_eq!(entry.vector, vector_for("Groceries", Some("milk, eggs")));
	assert_eq!(h.embedding.inputs(), vec!["Groceries\n\nmilk, eggs".to_string()]);
	assert_eq!(h.store.commit_count(), 1);
}

#[tokio::test]
async fn client_supplied_owner_is_ignored() {
	let h = Harness::new();
	let u1 = caller("U1");
	let item = h
		.service
		.create_note(Some(&u1), &json!({ "title": "Groceries", "ownerId": "U2" }))
		.await
		.expect("Create failed.");

	assert_eq!(item.owner_id, "U1");
	assert_eq!(h.index.entry(item.note_id).map(|entry| entry.owner_id), Some("U1".to_string()));
}

#[tokio::test]
async fn absent_content_embeds_title_and_separator() {
	let h = Harness::new();
	let u1 = caller("U1");
	let item = h
		.service
		.create_note(Some(&u1), &json!({ "title": "Groceries" }))
		.await
		.expect("Create failed.");

	assert_eq!(item.content, None);
	assert_eq!(h.embedding.inputs(), vec!["Groceries\n\n".to_string()]);
}

#[tokio::test]
async fn invalid_payload_touches_nothing() {
	let h = Harness::new();
	let u1 = caller("U1");
	let err = h
		.service
		.create_note(Some(&u1), &json!({ "title": "", "content": 5 }))
		.await
		.expect_err("Expected validation to fail.");

	let Error::Validation { failure } = &err else {
		panic!("Expected a validation error, got {err:?}.");
	};

	assert!(failure.contains("$.title", ViolationCode::Empty));
	assert!(failure.contains("$.content", ViolationCode::WrongType));
	assert!(h.embedding.inputs().is_empty());
	assert_eq!(h.store.begin_count(), 0);
}

#[tokio::test]
async fn validation_is_reported_before_missing_identity() {
	let h = Harness::new();
	let err = h
		.service
		.create_note(None, &json!({ "content": "no title" }))
		.await
		.expect_err("Expected validation to fail.");

	assert!(matches!(err, Error::Validation { .. }));
}

#[tokio::test]
async fn missing_identity_is_unauthenticated() {
	let h = Harness::new();
	let err = h
		.service
		.create_note(None, &json!({ "title": "Groceries" }))
		.await
		.expect_err("Expected anonymous create to fail.");

	assert!(matches!(err, Error::Unauthenticated));
	assert!(h.embedding.inputs().is_empty());
	assert_eq!(h.store.begin_count(), 0);
}

#[tokio::test]
async fn provider_failure_opens_no_transaction() {
	let h = Harness::new();
	let u1 = caller("U1");

	h.embedding.fail(true);

	let err = h
		.service
		.create_note(Some(&u1), &json!({ "title": "Groceries" }))
		.await
		.expect_err("Expected provider failure.");

	assert!(matches!(err, Error::Provider { .. }));
	assert_eq!(h.store.begin_count(), 0);
	assert!(h.store.is_empty());
	assert!(h.index.is_empty());
}

#[tokio::test]
async fn wrong_vector_dimension_is_a_provider_failure() {
	let h = Harness::new();
	let u1 = caller("U1");

	h.embedding.return_dimension(3);

	let err = h
		.service
		.create_note(Some(&u1), &json!({ "title": "Groceries" }))
		.await
		.expect_err("Expected dimension mismatch.");

	assert!(matches!(err, Error::Provider { .. }));
	assert_eq!(h.store.begin_count(), 0);
}

#[tokio::test]
async fn index_failure_rolls_back_insert() {
	let h = Harness::new();
	let u1 = caller("U1");

	h.index.fail_upserts(true);

	let err = h
		.service
		.create_note(Some(&u1), &json!({ "title": "Groceries", "content": "milk, eggs" }))
		.await
		.expect_err("Expected index failure.");

	assert!(matches!(err, Error::Storage { .. }));
	assert!(h.store.is_empty());
	assert!(h.index.is_empty());
	assert_eq!(h.store.rollback_count(), 1);
	assert_eq!(h.store.commit_count(), 0);
}

#[tokio::test]
async fn insert_failure_never_reaches_index() {
	let h = Harness::new();
	let u1 = caller("U1");

	h.store.fail_inserts(true);

	let err = h
		.service
		.create_note(Some(&u1), &json!({ "title": "Groceries" }))
		.await
		.expect_err("Expected insert failure.");

	assert!(matches!(err, Error::Storage { .. }));
	assert_eq!(h.index.upsert_count(), 0);
	assert_eq!(h.store.rollback_count(), 1);
}

#[tokio::test]
async fn commit_failure_removes_new_index_entry() {
	let h = Harness::new();
	let u1 = caller("U1");

	h.store.fail_commits(true);

	let err = h
		.service
		.create_note(Some(&u1), &json!({ "title": "Groceries" }))
		.await
		.expect_err("Expected commit failure.");

	assert!(matches!(err, Error::Storage { .. }));
	assert!(h.store.is_empty());
	assert!(h.index.is_empty());
	assert_eq!(h.index.upsert_count(), 1);
	assert_eq!(h.index.delete_count(), 1);
}
