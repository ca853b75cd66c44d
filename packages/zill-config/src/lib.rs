mod error;
mod types;

pub use error::{Error, Result};
pub use types::{
	Config, EmbeddingProviderConfig, Notes, Postgres, Providers, Qdrant, Security, SecurityAuthKey,
	Service, Storage,
};

use std::{collections::HashSet, fs, net::SocketAddr, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}
	if cfg.storage.postgres.pool_max_conns == 0 {
		return Err(Error::Validation {
			message: "storage.postgres.pool_max_conns must be greater than zero.".to_string(),
		});
	}
	if cfg.storage.qdrant.collection.trim().is_empty() {
		return Err(Error::Validation {
			message: "storage.qdrant.collection must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must be greater than zero.".to_string(),
		});
	}
	if cfg.providers.embedding.dimensions != cfg.storage.qdrant.vector_dim {
		return Err(Error::Validation {
			message: "providers.embedding.dimensions must match storage.qdrant.vector_dim."
				.to_string(),
		});
	}
	if cfg.providers.embedding.api_key.trim().is_empty() {
		return Err(Error::Validation {
			message: "Provider embedding api_key must be non-empty.".to_string(),
		});
	}
	if cfg.providers.embedding.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "providers.embedding.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.notes.max_title_chars == 0 {
		return Err(Error::Validation {
			message: "notes.max_title_chars must be greater than zero.".to_string(),
		});
	}
	if cfg.notes.max_content_chars == 0 {
		return Err(Error::Validation {
			message: "notes.max_content_chars must be greater than zero.".to_string(),
		});
	}

	validate_security(cfg)
}

fn validate_security(cfg: &Config) -> Result<()> {
	match cfg.security.auth_mode.as_str() {
		"off" => {
			let bind_addr: SocketAddr = cfg.service.http_bind.parse().map_err(|err| {
				Error::Validation {
					message: format!(
						"service.http_bind must be a valid socket address when security.auth_mode=off: {err}"
					),
				}
			})?;

			if !bind_addr.ip().is_loopback() {
				return Err(Error::Validation {
					message: "service.http_bind must be a loopback address when security.auth_mode=off."
						.to_string(),
				});
			}
		},
		"static_keys" => {
			if cfg.security.auth_keys.is_empty() {
				return Err(Error::Validation {
					message: "security.auth_keys must be non-empty when security.auth_mode=static_keys."
						.to_string(),
				});
			}

			let mut token_ids = HashSet::new();
			let mut tokens = HashSet::new();

			for key in &cfg.security.auth_keys {
				for (label, value) in [
					("token_id", &key.token_id),
					("token", &key.token),
					("user_id", &key.user_id),
				] {
					if value.trim().is_empty() {
						return Err(Error::Validation {
							message: format!("security.auth_keys.{label} must be non-empty."),
						});
					}
				}

				if !token_ids.insert(key.token_id.as_str()) {
					return Err(Error::Validation {
						message: "token_id must be unique across security.auth_keys.".to_string(),
					});
				}
				if !tokens.insert(key.token.as_str()) {
					return Err(Error::Validation {
						message: "token must be unique across security.auth_keys.".to_string(),
					});
				}
			}
		},
		other => {
			return Err(Error::Validation {
				message: format!("security.auth_mode must be one of off or static_keys, got {other}."),
			});
		},
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.security.auth_mode = cfg.security.auth_mode.trim().to_ascii_lowercase();

	for key in &mut cfg.security.auth_keys {
		key.user_id = key.user_id.trim().to_string();
	}

	if cfg.providers.embedding.api_base.ends_with('/') && cfg.providers.embedding.path.starts_with('/')
	{
		let trimmed = cfg.providers.embedding.api_base.trim_end_matches('/').to_string();

		cfg.providers.embedding.api_base = trimmed;
	}
}
