use uuid::Uuid;

use crate::{BoxFuture, IndexPoint, Result, VectorIndex};
use zill_storage::qdrant::QdrantStore;

impl VectorIndex for QdrantStore {
	fn upsert<'a>(&'a self, point: &'a IndexPoint) -> BoxFuture<'a, Result<()>> {
		Box::pin(async move {
			self.upsert_note(point.note_id, point.vector.clone(), &point.owner_id).await?;

			Ok(())
		})
	}

	fn delete(&self, note_id: Uuid) -> BoxFuture<'_, Result<()>> {
		Box::pin(async move {
			self.delete_note(note_id).await?;

			Ok(())
		})
	}
}
