pub const NOTE_ID_PAYLOAD_KEY: &str = "note_id";
pub const OWNER_ID_PAYLOAD_KEY: &str = "owner_id";

use qdrant_client::{
	Payload,
	qdrant::{
		CreateCollectionBuilder, DeletePointsBuilder, Distance, GetPointsBuilder, PointId,
		PointStruct, PointsIdsList, UpsertPointsBuilder, VectorParamsBuilder, value::Kind,
	},
};
use uuid::Uuid;

use crate::Result;

pub struct QdrantStore {
	pub client: qdrant_client::Qdrant,
	pub collection: String,
	pub vector_dim: u32,
}
impl QdrantStore {
	pub fn new(cfg: &zill_config::Qdrant) -> Result<Self> {
		let client = qdrant_client::Qdrant::from_url(&cfg.url).build()?;

		Ok(Self { client, collection: cfg.collection.clone(), vector_dim: cfg.vector_dim })
	}

	/// Creates the note collection with cosine distance when it does not exist yet.
	pub async fn ensure_collection(&self) -> Result<()> {
		if self.client.collection_exists(self.collection.clone()).await? {
			return Ok(());
		}

		self.client
			.create_collection(
				CreateCollectionBuilder::new(self.collection.clone()).vectors_config(
					VectorParamsBuilder::new(self.vector_dim.into(), Distance::Cosine),
				),
			)
			.await?;

		Ok(())
	}

	/// Writes the point for a note. The point id is the note id, so repeated writes overwrite.
	pub async fn upsert_note(&self, note_id: Uuid, vector: Vec<f32>, owner_id: &str) -> Result<()> {
		let mut payload = Payload::new();

		payload.insert(NOTE_ID_PAYLOAD_KEY, note_id.to_string());
		payload.insert(OWNER_ID_PAYLOAD_KEY, owner_id.to_string());

		let point = PointStruct::new(note_id.to_string(), vector, payload);

		self.client
			.upsert_points(
				UpsertPointsBuilder::new(self.collection.clone(), vec![point]).wait(true),
			)
			.await?;

		Ok(())
	}

	pub async fn delete_note(&self, note_id: Uuid) -> Result<()> {
		self.client
			.delete_points(
				DeletePointsBuilder::new(self.collection.clone())
					.points(PointsIdsList { ids: vec![point_id(note_id)] })
					.wait(true),
			)
			.await?;

		Ok(())
	}

	/// Returns the `owner_id` payload of the point stored for a note, if any.
	pub async fn note_owner(&self, note_id: Uuid) -> Result<Option<String>> {
		let response = self
			.client
			.get_points(
				GetPointsBuilder::new(self.collection.clone(), vec![point_id(note_id)])
					.with_payload(true),
			)
			.await?;
		let Some(point) = response.result.into_iter().next() else {
			return Ok(None);
		};
		let owner = point.payload.get(OWNER_ID_PAYLOAD_KEY).and_then(|value| match &value.kind {
			Some(Kind::StringValue(owner)) => Some(owner.clone()),
			_ => None,
		});

		Ok(owner)
	}
}

fn point_id(note_id: Uuid) -> PointId {
	PointId::from(note_id.to_string())
}
