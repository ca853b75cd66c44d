use std::{collections::HashMap, sync::Arc};

use axum::http::HeaderMap;

use zill_config::Security;
use zill_service::Caller;

pub const HEADER_USER_ID: &str = "X-Zill-User-Id";
pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// How request headers map to a caller identity.
#[derive(Clone, Debug)]
pub enum AuthState {
	/// Trust the user id header. Only allowed on loopback binds.
	Off,
	/// Map bearer tokens to configured user ids.
	StaticKeys { users_by_token: Arc<HashMap<String, String>> },
}
impl AuthState {
	pub fn from_security(security: &Security) -> Self {
		match security.auth_mode.as_str() {
			"off" => Self::Off,
			_ => Self::StaticKeys {
				users_by_token: Arc::new(
					security
						.auth_keys
						.iter()
						.map(|key| (key.token.clone(), key.user_id.clone()))
						.collect(),
				),
			},
		}
	}

	/// Returns `None` when the request carries no usable identity.
	pub fn resolve_caller(&self, headers: &HeaderMap) -> Option<Caller> {
		match self {
			Self::Off => {
				let raw = headers.get(HEADER_USER_ID)?.to_str().ok()?;

				Caller::new(raw)
			},
			Self::StaticKeys { users_by_token } => {
				let token = read_bearer_token(headers)?;

				Caller::new(users_by_token.get(token)?.as_str())
			},
		}
	}
}

fn read_bearer_token(headers: &HeaderMap) -> Option<&str> {
	let raw = headers.get(HEADER_AUTHORIZATION)?;
	let value = raw.to_str().ok()?.trim();
	let token = value.strip_prefix("Bearer ")?.trim();

	if token.is_empty() { None } else { Some(token) }
}
