use axum::Json;
use axum::extract::{Query, State};
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{ConnectionTrait, EntityTrait, Set};
use tracing::instrument;

use crate::entity::{lesson, progress};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::progress::{
    ProgressQuery, ProgressResponse, ProgressUpdateRequest, validate_progress_update,
};
use crate::state::AppState;

/// Merge expression for the conflict action: once a lesson is recorded as
/// completed, no later update can unset it.
const STICKY_COMPLETED_SQL: &str = r#""progress"."completed" OR "excluded"."completed""#;

#[utoipa::path(
    get,
    path = "/",
    tag = "Progress",
    operation_id = "getProgress",
    summary = "Get the caller's progress for one lesson",
    description = "Lessons the caller never watched report position 0 and not completed.",
    params(ProgressQuery),
    responses(
        (status = 200, description = "Stored progress", body = ProgressResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Lesson not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn get_progress(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<ProgressQuery>,
) -> Result<Json<ProgressResponse>, AppError> {
    find_lesson(&state.db, query.lesson_id).await?;

    let stored = progress::Entity::find_by_id((query.lesson_id, auth_user.user_id))
        .one(&state.db)
        .await?;

    Ok(Json(match stored {
        Some(p) => ProgressResponse::from(p),
        None => ProgressResponse::untouched(query.lesson_id),
    }))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Progress",
    operation_id = "recordProgress",
    summary = "Record playback progress for a lesson",
    description = "Idempotent upsert keyed on (user, lesson). `positionSec` is only overwritten \
        when provided, and `completed` is sticky: once true it stays true regardless of later \
        updates.",
    request_body = ProgressUpdateRequest,
    responses(
        (status = 200, description = "Progress after the update", body = ProgressResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Lesson not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, lesson_id = payload.lesson_id))]
pub async fn record_progress(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<ProgressUpdateRequest>,
) -> Result<Json<ProgressResponse>, AppError> {
    validate_progress_update(&payload)?;
    find_lesson(&state.db, payload.lesson_id).await?;

    let now = chrono::Utc::now();
    let row = progress::ActiveModel {
        lesson_id: Set(payload.lesson_id),
        user_id: Set(auth_user.user_id),
        position_sec: Set(payload.position_sec.unwrap_or(0)),
        completed: Set(payload.completed.unwrap_or(false)),
        updated_at: Set(now),
    };

    let mut on_conflict = OnConflict::columns([progress::Column::LessonId, progress::Column::UserId]);
    on_conflict
        .value(progress::Column::Completed, Expr::cust(STICKY_COMPLETED_SQL))
        .update_column(progress::Column::UpdatedAt);
    if payload.position_sec.is_some() {
        on_conflict.update_column(progress::Column::PositionSec);
    }

    progress::Entity::insert(row)
        .on_conflict(on_conflict.to_owned())
        .exec_without_returning(&state.db)
        .await?;

    let saved = progress::Entity::find_by_id((payload.lesson_id, auth_user.user_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Internal("Progress row missing after upsert".into()))?;

    Ok(Json(ProgressResponse::from(saved)))
}

async fn find_lesson<C: ConnectionTrait>(db: &C, id: i32) -> Result<lesson::Model, AppError> {
    lesson::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson not found".into()))
}
