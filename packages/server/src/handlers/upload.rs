use axum::Json;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use tokio::io::AsyncWriteExt;
use tracing::instrument;
use uuid::Uuid;

use common::media::{MediaError, MediaKind, media_file_name};

use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::upload::UploadResponse;
use crate::state::AppState;

pub fn upload_body_limit() -> DefaultBodyLimit {
    DefaultBodyLimit::max(110 * 1024 * 1024) // video ceiling plus multipart overhead
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Uploads",
    operation_id = "uploadMedia",
    summary = "Upload a course video or thumbnail",
    description = "Multipart upload with a required `file` field and an optional `type` tag used \
        in the stored file name. The MIME type selects the bucket: mp4/webm/ogg videos up to \
        100 MB, jpeg/png/webp images up to 5 MB. Returns the public asset URL.",
    request_body(content_type = "multipart/form-data", description = "File upload with optional type tag"),
    responses(
        (status = 201, description = "File stored", body = UploadResponse),
        (status = 400, description = "Missing file, bad MIME type or too large (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, multipart), fields(user_id = auth_user.user_id))]
pub async fn upload_media(
    auth_user: AuthUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let mut file: Option<(MediaKind, String, std::path::PathBuf)> = None;
    let mut type_tag: Option<String> = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
    {
        match field.name() {
            Some("file") => {
                let content_type = field.content_type().map(|m| m.to_string()).ok_or_else(|| {
                    AppError::Validation("File field must have a content type".into())
                })?;
                let kind = MediaKind::from_mime(&content_type).ok_or_else(|| {
                    AppError::Validation(format!("Unsupported file type: {content_type}"))
                })?;
                let ext = field
                    .file_name()
                    .and_then(|n| n.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase()))
                    .unwrap_or_else(|| kind.default_ext().to_string());

                let temp_path = spool_field_to_temp(&mut field, kind.max_size()).await?;
                file = Some((kind, ext, temp_path));
            }
            Some("type") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read type: {e}")))?;
                let text = text.trim().to_string();
                if !text.is_empty() {
                    type_tag = Some(text);
                }
            }
            _ => {} // Ignore unknown fields.
        }
    }

    let (kind, ext, temp_path) =
        file.ok_or_else(|| AppError::Validation("Missing 'file' field".into()))?;

    let tag = type_tag.as_deref().unwrap_or(match kind {
        MediaKind::Video => "video",
        MediaKind::Image => "image",
    });
    let file_name = media_file_name(tag, &ext);

    let stored = async {
        let reader = tokio::fs::File::open(&temp_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to reopen temp file: {e}")))?;
        state
            .media_store
            .put_stream(kind, &file_name, Box::new(reader))
            .await
            .map_err(AppError::from)
    }
    .await;
    tokio::fs::remove_file(&temp_path).await.ok();
    let stored = stored?;

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            url: format!(
                "/api/v1/assets/{}/{}",
                stored.kind.bucket(),
                stored.file_name
            ),
        }),
    ))
}

/// Stream a multipart field to a temp file, enforcing the size ceiling
/// as bytes arrive.
async fn spool_field_to_temp(
    field: &mut axum::extract::multipart::Field<'_>,
    max_size: u64,
) -> Result<std::path::PathBuf, AppError> {
    let temp_path = std::env::temp_dir().join(format!("campus-upload-{}", Uuid::new_v4()));

    let result = async {
        let mut temp_file = tokio::fs::File::create(&temp_path)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;
        let mut written: u64 = 0;

        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
        {
            written += chunk.len() as u64;
            if written > max_size {
                return Err(AppError::from(MediaError::TooLarge {
                    actual: written,
                    limit: max_size,
                }));
            }
            temp_file
                .write_all(&chunk)
                .await
                .map_err(|e| AppError::Internal(format!("Failed to write temp file: {e}")))?;
        }

        temp_file
            .flush()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to flush temp file: {e}")))?;
        Ok(())
    }
    .await;

    if let Err(e) = result {
        tokio::fs::remove_file(&temp_path).await.ok();
        return Err(e);
    }

    Ok(temp_path)
}
