use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{course, enrollment, review, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::review::{
    PutReviewRequest, ReviewListResponse, ReviewResponse, validate_review,
};
use crate::state::AppState;

#[utoipa::path(
    put,
    path = "/{course_id}/review",
    tag = "Reviews",
    operation_id = "putReview",
    summary = "Create or replace the caller's review for a course",
    description = "Each student holds at most one review per course; a second submission \
        replaces the first. Requires an active enrollment.",
    params(("course_id" = i32, Path, description = "Course ID")),
    request_body = PutReviewRequest,
    responses(
        (status = 200, description = "Review stored", body = ReviewResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Not enrolled (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload), fields(user_id = auth_user.user_id, course_id))]
pub async fn put_review(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    AppJson(payload): AppJson<PutReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    validate_review(&payload)?;

    course::Entity::find_by_id(course_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".into()))?;

    enrollment::Entity::find_by_id((course_id, auth_user.user_id))
        .one(&state.db)
        .await?
        .ok_or(AppError::PermissionDenied)?;

    let now = chrono::Utc::now();
    let row = review::ActiveModel {
        course_id: Set(course_id),
        user_id: Set(auth_user.user_id),
        rating: Set(payload.rating),
        comment: Set(payload.comment.clone()),
        visible: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    review::Entity::insert(row)
        .on_conflict(
            OnConflict::columns([review::Column::CourseId, review::Column::UserId])
                .update_columns([
                    review::Column::Rating,
                    review::Column::Comment,
                    review::Column::UpdatedAt,
                ])
                .to_owned(),
        )
        .exec_without_returning(&state.db)
        .await?;

    let saved = review::Entity::find_by_id((course_id, auth_user.user_id))
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Internal("Review row missing after upsert".into()))?;

    let name = user::Entity::find_by_id(auth_user.user_id)
        .one(&state.db)
        .await?
        .and_then(|u| u.name);

    Ok(Json(ReviewResponse {
        user_id: saved.user_id,
        user_name: name,
        rating: saved.rating,
        comment: saved.comment,
        updated_at: saved.updated_at,
    }))
}

#[utoipa::path(
    get,
    path = "/{course_id}/reviews",
    tag = "Reviews",
    operation_id = "listReviews",
    summary = "List visible reviews for a course",
    params(("course_id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Visible reviews, newest first", body = ReviewListResponse),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state))]
pub async fn list_reviews(
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
) -> Result<Json<ReviewListResponse>, AppError> {
    course::Entity::find_by_id(course_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".into()))?;

    let reviews = review::Entity::find()
        .filter(review::Column::CourseId.eq(course_id))
        .filter(review::Column::Visible.eq(true))
        .order_by(review::Column::UpdatedAt, Order::Desc)
        .all(&state.db)
        .await?;

    let names: HashMap<i32, Option<String>> = user::Entity::find()
        .filter(user::Column::Id.is_in(reviews.iter().map(|r| r.user_id).collect::<Vec<_>>()))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|u| (u.id, u.name))
        .collect();

    let reviews = reviews
        .into_iter()
        .map(|r| ReviewResponse {
            user_name: names.get(&r.user_id).cloned().flatten(),
            user_id: r.user_id,
            rating: r.rating,
            comment: r.comment,
            updated_at: r.updated_at,
        })
        .collect();

    Ok(Json(ReviewListResponse { reviews }))
}
