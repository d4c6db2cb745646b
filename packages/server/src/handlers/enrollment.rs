use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{course, enrollment, lesson, progress, section};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::enrollment::{LearningEntry, MyLearningResponse};
use crate::state::AppState;

#[utoipa::path(
    post,
    path = "/{course_id}/enroll",
    tag = "Enrollments",
    operation_id = "enroll",
    summary = "Enroll in a published course",
    params(("course_id" = i32, Path, description = "Course ID")),
    responses(
        (status = 201, description = "Enrolled"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Course not found or not published (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Already enrolled (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, course_id))]
pub async fn enroll(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let course = course::Entity::find_by_id(course_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".into()))?;
    if course.status != course::STATUS_PUBLISHED {
        return Err(AppError::NotFound("Course not found".into()));
    }

    let row = enrollment::ActiveModel {
        course_id: Set(course_id),
        user_id: Set(auth_user.user_id),
        enrolled_at: Set(chrono::Utc::now()),
    };

    enrollment::Entity::insert(row)
        .exec_without_returning(&state.db)
        .await
        .map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::Conflict("Already enrolled in this course".into())
            }
            _ => AppError::from(e),
        })?;

    Ok(StatusCode::CREATED)
}

#[utoipa::path(
    delete,
    path = "/{course_id}/enroll",
    tag = "Enrollments",
    operation_id = "unenroll",
    summary = "Leave a course",
    params(("course_id" = i32, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Enrollment removed"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Not enrolled (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id, course_id))]
pub async fn unenroll(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    let result = enrollment::Entity::delete_by_id((course_id, auth_user.user_id))
        .exec(&state.db)
        .await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound("Not enrolled in this course".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Enrollments",
    operation_id = "myLearning",
    summary = "List the caller's enrollments with completion stats",
    responses(
        (status = 200, description = "Enrolled courses", body = MyLearningResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user), fields(user_id = auth_user.user_id))]
pub async fn my_learning(
    auth_user: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<MyLearningResponse>, AppError> {
    let enrollments = enrollment::Entity::find()
        .filter(enrollment::Column::UserId.eq(auth_user.user_id))
        .order_by(enrollment::Column::EnrolledAt, Order::Desc)
        .all(&state.db)
        .await?;
    let course_ids: Vec<i32> = enrollments.iter().map(|e| e.course_id).collect();

    let courses: HashMap<i32, course::Model> = course::Entity::find()
        .filter(course::Column::Id.is_in(course_ids.clone()))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    let totals: HashMap<i32, u64> = lesson::Entity::find()
        .select_only()
        .column(section::Column::CourseId)
        .column_as(lesson::Column::Id.count(), "count")
        .inner_join(section::Entity)
        .filter(section::Column::CourseId.is_in(course_ids.clone()))
        .group_by(section::Column::CourseId)
        .into_tuple::<(i32, i64)>()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|(id, n)| (id, n as u64))
        .collect();

    // Completed lessons per course, resolved through the section the
    // lesson belongs to.
    let completed_lesson_ids: Vec<i32> = progress::Entity::find()
        .select_only()
        .column(progress::Column::LessonId)
        .filter(progress::Column::UserId.eq(auth_user.user_id))
        .filter(progress::Column::Completed.eq(true))
        .into_tuple::<i32>()
        .all(&state.db)
        .await?;
    let completed: HashMap<i32, u64> = lesson::Entity::find()
        .select_only()
        .column(section::Column::CourseId)
        .column_as(lesson::Column::Id.count(), "count")
        .inner_join(section::Entity)
        .filter(lesson::Column::Id.is_in(completed_lesson_ids))
        .filter(section::Column::CourseId.is_in(course_ids))
        .group_by(section::Column::CourseId)
        .into_tuple::<(i32, i64)>()
        .all(&state.db)
        .await?
        .into_iter()
        .map(|(id, n)| (id, n as u64))
        .collect();

    let entries = enrollments
        .into_iter()
        .filter_map(|e| {
            courses.get(&e.course_id).map(|c| LearningEntry {
                course_id: c.id,
                slug: c.slug.clone(),
                title: c.title.clone(),
                thumbnail: c.thumbnail_url.clone(),
                enrolled_at: e.enrolled_at,
                total_lessons: totals.get(&c.id).copied().unwrap_or(0),
                completed_lessons: completed.get(&c.id).copied().unwrap_or(0),
            })
        })
        .collect();

    Ok(Json(MyLearningResponse { courses: entries }))
}
