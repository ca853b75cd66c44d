use serde::Deserialize;
use serde_json::{Map, Value};

#[derive(Debug, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	pub providers: Providers,
	#[serde(default)]
	pub notes: Notes,
	pub security: Security,
}

#[derive(Debug, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Deserialize)]
pub struct Storage {
	pub postgres: Postgres,
	pub qdrant: Qdrant,
}

#[derive(Debug, Deserialize)]
pub struct Postgres {
	pub dsn: String,
	pub pool_max_conns: u32,
}

#[derive(Debug, Deserialize)]
pub struct Qdrant {
	pub url: String,
	pub collection: String,
	pub vector_dim: u32,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
	pub embedding: EmbeddingProviderConfig,
}

#[derive(Debug, Deserialize)]
pub struct EmbeddingProviderConfig {
	pub provider_id: String,
	pub api_base: String,
	pub api_key: String,
	pub path: String,
	pub model: String,
	pub dimensions: u32,
	pub timeout_ms: u64,
	#[serde(default)]
	pub default_headers: Map<String, Value>,
}

/// Payload limits enforced by the note validator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Notes {
	pub max_title_chars: u32,
	pub max_content_chars: u32,
}
impl Default for Notes {
	fn default() -> Self {
		Self { max_title_chars: 200, max_content_chars: 20_000 }
	}
}

#[derive(Debug, Deserialize)]
pub struct Security {
	pub bind_localhost_only: bool,
	/// One of "off" or "static_keys".
	#[serde(default = "default_auth_mode")]
	pub auth_mode: String,
	#[serde(default)]
	pub auth_keys: Vec<SecurityAuthKey>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityAuthKey {
	pub token_id: String,
	pub token: String,
	/// Identity attached to every request presenting this token.
	pub user_id: String,
}

fn default_auth_mode() -> String {
	"static_keys".to_string()
}
