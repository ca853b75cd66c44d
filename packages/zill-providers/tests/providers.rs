use reqwest::header::AUTHORIZATION;
use serde_json::{Map, Value};

use zill_config::EmbeddingProviderConfig;
use zill_providers::Error;

fn unreachable_provider() -> EmbeddingProviderConfig {
	EmbeddingProviderConfig {
		provider_id: "test".to_string(),
		api_base: "http://127.0.0.1:1".to_string(),
		api_key: "test-key".to_string(),
		path: "/v1/embeddings".to_string(),
		model: "test".to_string(),
		dimensions: 4,
		timeout_ms: 1_000,
		default_headers: Map::new(),
	}
}

#[test]
fn builds_bearer_auth_header() {
	let headers =
		zill_providers::auth_headers("secret", &Map::new()).expect("Failed to build headers.");
	let value = headers.get(AUTHORIZATION).expect("Missing authorization header.");

	assert_eq!(value, "Bearer secret");
}

#[test]
fn includes_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("x-org".to_string(), Value::String("acme".to_string()));

	let headers =
		zill_providers::auth_headers("secret", &defaults).expect("Failed to build headers.");

	assert_eq!(headers.get("x-org").expect("Missing default header."), "acme");
}

#[test]
fn rejects_non_string_default_headers() {
	let mut defaults = Map::new();

	defaults.insert("x-retries".to_string(), Value::from(3));

	let err = zill_providers::auth_headers("secret", &defaults)
		.expect_err("Expected non-string header to fail.");

	assert!(matches!(err, Error::InvalidConfig { .. }));
}

#[tokio::test]
async fn unreachable_endpoint_surfaces_transport_error() {
	let err = zill_providers::embedding::embed(&unreachable_provider(), &["hello".to_string()])
		.await
		.expect_err("Expected connection failure.");

	assert!(matches!(err, Error::Reqwest(_)), "Unexpected error: {err}");
}
