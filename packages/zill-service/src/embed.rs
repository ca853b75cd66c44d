use crate::{Error, NoteService, Result};
use zill_domain::note_text;

impl NoteService {
	/// Embeds `title` and `content` as a single text and returns a vector of the configured
	/// dimension.
	pub async fn embed_note(&self, title: &str, content: Option<&str>) -> Result<Vec<f32>> {
		let text = note_text::embedding_input(title, content);
		let embeddings = self
			.providers
			.embedding
			.embed(&self.cfg.providers.embedding, std::slice::from_ref(&text))
			.await
			.map_err(provider_error)?;
		let Some(vec) = embeddings.into_iter().next() else {
			return Err(Error::Provider {
				message: "Embedding provider returned no vectors.".to_string(),
			});
		};

		if vec.len() != self.cfg.storage.qdrant.vector_dim as usize {
			return Err(Error::Provider {
				message: "Embedding vector dimension mismatch.".to_string(),
			});
		}
		if vec.iter().any(|value| !value.is_finite()) {
			return Err(Error::Provider {
				message: "Embedding vector contains non-finite values.".to_string(),
			});
		}

		Ok(vec)
	}
}

fn provider_error(err: Error) -> Error {
	match err {
		Error::Provider { .. } => err,
		other => Error::Provider { message: other.to_string() },
	}
}
