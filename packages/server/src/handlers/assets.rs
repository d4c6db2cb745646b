use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::Response;
use tokio_util::io::ReaderStream;
use tracing::instrument;

use common::media::MediaKind;

use crate::error::{AppError, ErrorBody};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/{bucket}/{file_name}",
    tag = "Assets",
    operation_id = "getAsset",
    summary = "Stream a stored media file",
    description = "Serves uploaded videos and thumbnails. Responses are publicly cacheable for \
        one day. Unknown buckets, unknown files and path traversal attempts all report 404.",
    params(
        ("bucket" = String, Path, description = "`course-videos` or `course-thumbnails`"),
        ("file_name" = String, Path, description = "Stored file name"),
    ),
    responses(
        (status = 200, description = "File content"),
        (status = 404, description = "File not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn get_asset(
    State(state): State<AppState>,
    Path((bucket, file_name)): Path<(String, String)>,
) -> Result<Response, AppError> {
    let kind = MediaKind::from_bucket(&bucket)
        .ok_or_else(|| AppError::NotFound("File not found".into()))?;

    let size = state.media_store.size(kind, &file_name).await?;
    let reader = state.media_store.get_stream(kind, &file_name).await?;
    let body = Body::from_stream(ReaderStream::new(reader));

    let content_type = mime_guess::from_path(&file_name)
        .first()
        .map(|m| m.to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, size.to_string())
        .header(header::CACHE_CONTROL, "public, max-age=86400")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))?;

    Ok(response)
}
