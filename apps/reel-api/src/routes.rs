use axum::{
	Json, Router,
	extract::{Path, Query, State},
	http::StatusCode,
	response::{IntoResponse, Response},
	routing::{delete, get, post},
};
use serde::Serialize;

use reel_service::{
	AddVideoTagRequest, Error, PlayCountResponse, RatingRequest, RatingResponse, TagListResponse,
	VideoItem, VideoListRequest, VideoListResponse,
};

use crate::state::AppState;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/v1/videos", get(list_videos))
		.route("/v1/videos/{id}", get(get_video))
		.route("/v1/videos/{id}/play", post(record_play))
		.route("/v1/videos/{id}/rating", post(update_rating))
		.route("/v1/videos/{id}/tags", get(get_video_tags).post(add_video_tag))
		.route("/v1/videos/{id}/tags/{tag_id}", delete(remove_video_tag))
		.route("/v1/tags", get(list_tags))
		.with_state(state)
}

async fn health() -> StatusCode {
	StatusCode::OK
}

async fn list_videos(
	State(state): State<AppState>,
	Query(query): Query<VideoListRequest>,
) -> Result<Json<VideoListResponse>, ApiError> {
	let response = state.service.list_videos(query).await?;

	Ok(Json(response))
}

async fn get_video(
	State(state): State<AppState>,
	Path(video_id): Path<i64>,
) -> Result<Json<VideoItem>, ApiError> {
	let response = state.service.get_video(video_id).await?;

	Ok(Json(response))
}

async fn record_play(
	State(state): State<AppState>,
	Path(video_id): Path<i64>,
) -> Result<Json<PlayCountResponse>, ApiError> {
	let response = state.service.record_play(video_id).await?;

	Ok(Json(response))
}

async fn update_rating(
	State(state): State<AppState>,
	Path(video_id): Path<i64>,
	Json(payload): Json<RatingRequest>,
) -> Result<Json<RatingResponse>, ApiError> {
	let response = state.service.update_rating(video_id, payload).await?;

	Ok(Json(response))
}

async fn list_tags(State(state): State<AppState>) -> Result<Json<TagListResponse>, ApiError> {
	let response = state.service.list_tags().await?;

	Ok(Json(response))
}

async fn get_video_tags(
	State(state): State<AppState>,
	Path(video_id): Path<i64>,
) -> Result<Json<TagListResponse>, ApiError> {
	let response = state.service.get_video_tags(video_id).await?;

	Ok(Json(response))
}

async fn add_video_tag(
	State(state): State<AppState>,
	Path(video_id): Path<i64>,
	Json(payload): Json<AddVideoTagRequest>,
) -> Result<Json<TagListResponse>, ApiError> {
	let response = state.service.add_video_tag(video_id, payload).await?;

	Ok(Json(response))
}

async fn remove_video_tag(
	State(state): State<AppState>,
	Path((video_id, tag_id)): Path<(i64, i64)>,
) -> Result<Json<TagListResponse>, ApiError> {
	let response = state.service.remove_video_tag(video_id, tag_id).await?;

	Ok(Json(response))
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	error_code: String,
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	error_code: String,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, error_code: impl Into<String>, message: impl Into<String>) -> Self {
		Self { status, error_code: error_code.into(), message: message.into() }
	}
}
impl From<Error> for ApiError {
	fn from(err: Error) -> Self {
		match err {
			Error::InvalidRequest { message } =>
				Self::new(StatusCode::BAD_REQUEST, "invalid_request", message),
			Error::NotFound { message } => Self::new(StatusCode::NOT_FOUND, "not_found", message),
			Error::Storage { message } => {
				tracing::error!(error = %message, "Storage request failed.");

				Self::new(StatusCode::INTERNAL_SERVER_ERROR, "storage_error", "Storage error.")
			},
		}
	}
}
impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let body = ErrorBody { error_code: self.error_code, message: self.message };

		(self.status, Json(body)).into_response()
	}
}
