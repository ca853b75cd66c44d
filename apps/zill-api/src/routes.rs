use axum::{
	Json, Router,
	body::Bytes,
	extract::{Path, State},
	http::{HeaderMap, StatusCode},
	response::{IntoResponse, Response},
	routing::get,
};
use serde::Serialize;
use serde_json::Value;

use crate::state::AppState;
use zill_domain::validation;
use zill_service::{Error, ListResponse, NoteItem};

pub const MESSAGE_INVALID_INPUT: &str = "Invalid input";
pub const MESSAGE_UNAUTHORIZED: &str = "Unauthorized";
pub const MESSAGE_NOT_FOUND: &str = "Note not found";
pub const MESSAGE_INTERNAL: &str = "Internal server error";
pub const MESSAGE_DELETED: &str = "Note Deleted";

#[derive(Debug, Serialize)]
struct NoteBody {
	note: NoteItem,
}

#[derive(Debug, Serialize)]
struct MessageBody {
	message: &'static str,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error: &'static str,
}

/// Every failure leaves the process as one of four fixed messages. Details stay in the logs.
#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	message: &'static str,
}
impl ApiError {
	fn invalid_input() -> Self {
		Self { status: StatusCode::BAD_REQUEST, message: MESSAGE_INVALID_INPUT }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::Validation { .. } => Self::invalid_input(),
			Error::Unauthenticated | Error::Forbidden { .. } =>
				Self { status: StatusCode::UNAUTHORIZED, message: MESSAGE_UNAUTHORIZED },
			Error::NotFound { .. } =>
				Self { status: StatusCode::NOT_FOUND, message: MESSAGE_NOT_FOUND },
			Error::Provider { .. } | Error::Storage { .. } => {
				tracing::error!(kind = err.kind(), error = %err, "Request failed.");

				Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: MESSAGE_INTERNAL }
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(ErrorBody { error: self.message })).into_response()
	}
}

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route(
			"/api/notes",
			get(list_notes).post(create_note).put(update_note).delete(delete_note),
		)
		.route("/api/notes/{note_id}", get(get_note))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn create_note(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Bytes,
) -> Result<(StatusCode, Json<NoteBody>), ApiError> {
	let payload = parse_payload(&body)?;
	let caller = state.auth.resolve_caller(&headers);
	let note = state.service.create_note(caller.as_ref(), &payload).await?;

	Ok((StatusCode::CREATED, Json(NoteBody { note })))
}

async fn update_note(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Bytes,
) -> Result<Json<NoteBody>, ApiError> {
	let payload = parse_payload(&body)?;
	let caller = state.auth.resolve_caller(&headers);
	let note = state.service.update_note(caller.as_ref(), &payload).await?;

	Ok(Json(NoteBody { note }))
}

async fn delete_note(
	State(state): State<AppState>,
	headers: HeaderMap,
	body: Bytes,
) -> Result<Json<MessageBody>, ApiError> {
	let payload = parse_payload(&body)?;
	let caller = state.auth.resolve_caller(&headers);

	state.service.delete_note(caller.as_ref(), &payload).await?;

	Ok(Json(MessageBody { message: MESSAGE_DELETED }))
}

async fn list_notes(
	State(state): State<AppState>,
	headers: HeaderMap,
) -> Result<Json<ListResponse>, ApiError> {
	let caller = state.auth.resolve_caller(&headers);
	let response = state.service.list_notes(caller.as_ref()).await?;

	Ok(Json(response))
}

async fn get_note(
	State(state): State<AppState>,
	headers: HeaderMap,
	Path(raw_id): Path<String>,
) -> Result<Json<NoteBody>, ApiError> {
	let note_id = validation::parse_note_id(&raw_id)
		.map_err(|failure| ApiError::from(Error::Validation { failure }))?;
	let caller = state.auth.resolve_caller(&headers);
	let note = state.service.get_note(caller.as_ref(), note_id).await?;

	Ok(Json(NoteBody { note }))
}

fn parse_payload(body: &Bytes) -> Result<Value, ApiError> {
	serde_json::from_slice(body).map_err(|err| {
		tracing::info!(error = %err, "Rejected malformed JSON body.");

		ApiError::invalid_input()
	})
}
