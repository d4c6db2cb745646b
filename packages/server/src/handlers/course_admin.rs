use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use serde::Deserialize;
use tracing::instrument;

use crate::entity::{course, course_tag, enrollment, lesson, section, tag};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::extractors::json::AppJson;
use crate::models::course::{
    CourseAdminListResponse, CourseResponse, CreateCourseRequest, CreateLessonRequest,
    CreateSectionRequest, LessonResponse, ReorderRequest, SectionResponse, UpdateCourseRequest,
    UpdateLessonRequest, UpdateSectionRequest, validate_price, validate_status,
};
use crate::models::shared::{PageMeta, page_offset, validate_reorder_ids, validate_title};
use crate::state::AppState;
use crate::utils::slug;

#[derive(Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AdminListQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[utoipa::path(
    get,
    path = "/courses",
    tag = "Admin Courses",
    operation_id = "adminListCourses",
    summary = "List all courses including drafts",
    params(AdminListQuery),
    responses(
        (status = 200, description = "Courses, newest first", body = CourseAdminListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, query))]
pub async fn list_courses(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<AdminListQuery>,
) -> Result<Json<CourseAdminListResponse>, AppError> {
    auth_user.require_admin()?;

    let page = Ord::max(query.page.unwrap_or(1), 1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);

    let select = course::Entity::find();
    let total = select.clone().count(&state.db).await?;

    let data = select
        .order_by(course::Column::CreatedAt, Order::Desc)
        .offset(Some(page_offset(page, per_page)))
        .limit(Some(per_page))
        .all(&state.db)
        .await?
        .into_iter()
        .map(CourseResponse::from)
        .collect();

    Ok(Json(CourseAdminListResponse {
        data,
        pagination: PageMeta::new(page, per_page, total),
    }))
}

#[utoipa::path(
    post,
    path = "/courses",
    tag = "Admin Courses",
    operation_id = "adminCreateCourse",
    summary = "Create a draft course",
    request_body = CreateCourseRequest,
    responses(
        (status = 201, description = "Course created", body = CourseResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_course(
    auth_user: AuthUser,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateCourseRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_title(&payload.title)?;
    validate_price(payload.price)?;

    let title = payload.title.trim().to_string();
    let now = chrono::Utc::now();

    let txn = state.db.begin().await?;

    let slug = unique_course_slug(&txn, &title).await?;
    let new_course = course::ActiveModel {
        slug: Set(slug),
        title: Set(title),
        subtitle: Set(payload.subtitle),
        description: Set(payload.description),
        category: Set(payload.category),
        level: Set(payload.level),
        language: Set(payload.language),
        status: Set(course::STATUS_DRAFT.to_string()),
        price_cents: Set(payload.price.unwrap_or(0)),
        thumbnail_url: Set(payload.thumbnail),
        created_by_id: Set(auth_user.user_id),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    };
    let created = new_course.insert(&txn).await?;

    if let Some(tags) = payload.tags {
        replace_course_tags(&txn, created.id, &tags).await?;
    }

    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(CourseResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/courses/{id}",
    tag = "Admin Courses",
    operation_id = "adminGetCourse",
    summary = "Get a course by ID",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Course", body = CourseResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_course(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
) -> Result<Json<CourseResponse>, AppError> {
    auth_user.require_admin()?;
    let course = find_course(&state.db, course_id).await?;
    Ok(Json(CourseResponse::from(course)))
}

#[utoipa::path(
    patch,
    path = "/courses/{id}",
    tag = "Admin Courses",
    operation_id = "adminUpdateCourse",
    summary = "Update a course",
    description = "Partial update. Setting `status` to PUBLISHED makes the course visible in \
        the public catalog. The slug never changes after creation.",
    params(("id" = i32, Path, description = "Course ID")),
    request_body = UpdateCourseRequest,
    responses(
        (status = 200, description = "Updated course", body = CourseResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn update_course(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    AppJson(payload): AppJson<UpdateCourseRequest>,
) -> Result<Json<CourseResponse>, AppError> {
    auth_user.require_admin()?;
    if let Some(ref title) = payload.title {
        validate_title(title)?;
    }
    if let Some(ref status) = payload.status {
        validate_status(status)?;
    }
    validate_price(payload.price)?;

    let txn = state.db.begin().await?;
    let course = find_course(&txn, course_id).await?;

    let mut active: course::ActiveModel = course.into();
    if let Some(title) = payload.title {
        active.title = Set(title.trim().to_string());
    }
    if let Some(subtitle) = payload.subtitle {
        active.subtitle = Set(subtitle);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    if let Some(category) = payload.category {
        active.category = Set(category);
    }
    if let Some(level) = payload.level {
        active.level = Set(level);
    }
    if let Some(language) = payload.language {
        active.language = Set(language);
    }
    if let Some(status) = payload.status {
        active.status = Set(status);
    }
    if let Some(price) = payload.price {
        active.price_cents = Set(price);
    }
    if let Some(thumbnail) = payload.thumbnail {
        active.thumbnail_url = Set(thumbnail);
    }
    active.updated_at = Set(chrono::Utc::now());

    let updated = active.update(&txn).await?;

    if let Some(tags) = payload.tags {
        replace_course_tags(&txn, updated.id, &tags).await?;
    }

    txn.commit().await?;

    Ok(Json(CourseResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/courses/{id}",
    tag = "Admin Courses",
    operation_id = "adminDeleteCourse",
    summary = "Delete a course",
    description = "Refused for published courses with active enrollments.",
    params(("id" = i32, Path, description = "Course ID")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "Course has enrollments (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_course(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;
    let course = find_course(&txn, course_id).await?;

    if course.status == course::STATUS_PUBLISHED {
        let enrollments = enrollment::Entity::find()
            .filter(enrollment::Column::CourseId.eq(course_id))
            .count(&txn)
            .await?;
        if enrollments > 0 {
            return Err(AppError::Conflict(
                "Cannot delete a published course with enrollments".into(),
            ));
        }
    }

    course::Entity::delete_by_id(course_id).exec(&txn).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/courses/{id}/sections",
    tag = "Admin Curriculum",
    operation_id = "adminCreateSection",
    summary = "Append a section to a course",
    params(("id" = i32, Path, description = "Course ID")),
    request_body = CreateSectionRequest,
    responses(
        (status = 201, description = "Section created", body = SectionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_section(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    AppJson(payload): AppJson<CreateSectionRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_title(&payload.title)?;

    let txn = state.db.begin().await?;
    find_course(&txn, course_id).await?;

    let next_position = section::Entity::find()
        .filter(section::Column::CourseId.eq(course_id))
        .count(&txn)
        .await? as i32;

    let created = section::ActiveModel {
        course_id: Set(course_id),
        title: Set(payload.title.trim().to_string()),
        position: Set(next_position),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(SectionResponse::from(created))))
}

#[utoipa::path(
    patch,
    path = "/sections/{id}",
    tag = "Admin Curriculum",
    operation_id = "adminUpdateSection",
    summary = "Rename a section",
    params(("id" = i32, Path, description = "Section ID")),
    request_body = UpdateSectionRequest,
    responses(
        (status = 200, description = "Updated section", body = SectionResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Section not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn update_section(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(section_id): Path<i32>,
    AppJson(payload): AppJson<UpdateSectionRequest>,
) -> Result<Json<SectionResponse>, AppError> {
    auth_user.require_admin()?;

    let section = find_section(&state.db, section_id).await?;
    let mut active: section::ActiveModel = section.into();
    if let Some(title) = payload.title {
        validate_title(&title)?;
        active.title = Set(title.trim().to_string());
    }
    let updated = active.update(&state.db).await?;
    Ok(Json(SectionResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/sections/{id}",
    tag = "Admin Curriculum",
    operation_id = "adminDeleteSection",
    summary = "Delete a section and its lessons",
    params(("id" = i32, Path, description = "Section ID")),
    responses(
        (status = 204, description = "Section deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Section not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_section(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(section_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    let txn = state.db.begin().await?;
    find_section(&txn, section_id).await?;

    lesson::Entity::delete_many()
        .filter(lesson::Column::SectionId.eq(section_id))
        .exec(&txn)
        .await?;
    section::Entity::delete_by_id(section_id).exec(&txn).await?;

    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/courses/{id}/sections/reorder",
    tag = "Admin Curriculum",
    operation_id = "adminReorderSections",
    summary = "Reorder the sections of a course",
    description = "The body must list every section ID of the course exactly once.",
    params(("id" = i32, Path, description = "Course ID")),
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Sections in their new order", body = [SectionResponse]),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn reorder_sections(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(course_id): Path<i32>,
    AppJson(payload): AppJson<ReorderRequest>,
) -> Result<Json<Vec<SectionResponse>>, AppError> {
    auth_user.require_admin()?;
    validate_reorder_ids(&payload.ordered_ids, "section ID")?;

    let txn = state.db.begin().await?;
    find_course(&txn, course_id).await?;

    let current: Vec<i32> = section::Entity::find()
        .select_only()
        .column(section::Column::Id)
        .filter(section::Column::CourseId.eq(course_id))
        .into_tuple()
        .all(&txn)
        .await?;
    require_permutation(&payload.ordered_ids, &current, "section")?;

    for (pos, id) in payload.ordered_ids.iter().enumerate() {
        section::Entity::update_many()
            .col_expr(section::Column::Position, (pos as i32).into())
            .filter(section::Column::Id.eq(*id))
            .exec(&txn)
            .await?;
    }

    let sections = section::Entity::find()
        .filter(section::Column::CourseId.eq(course_id))
        .order_by(section::Column::Position, Order::Asc)
        .all(&txn)
        .await?;

    txn.commit().await?;

    Ok(Json(sections.into_iter().map(SectionResponse::from).collect()))
}

#[utoipa::path(
    post,
    path = "/sections/{id}/lessons",
    tag = "Admin Curriculum",
    operation_id = "adminCreateLesson",
    summary = "Append a lesson to a section",
    params(("id" = i32, Path, description = "Section ID")),
    request_body = CreateLessonRequest,
    responses(
        (status = 201, description = "Lesson created", body = LessonResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Section not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn create_lesson(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(section_id): Path<i32>,
    AppJson(payload): AppJson<CreateLessonRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;
    validate_title(&payload.title)?;
    if let Some(duration) = payload.duration_sec
        && duration < 0
    {
        return Err(AppError::Validation("durationSec must be >= 0".into()));
    }

    let title = payload.title.trim().to_string();

    let txn = state.db.begin().await?;
    let section = find_section(&txn, section_id).await?;

    let next_position = lesson::Entity::find()
        .filter(lesson::Column::SectionId.eq(section_id))
        .count(&txn)
        .await? as i32;

    let slug = unique_lesson_slug(&txn, section.course_id, &title).await?;
    let created = lesson::ActiveModel {
        title: Set(title),
        slug: Set(slug),
        position: Set(next_position),
        video_url: Set(payload.video_url),
        duration_sec: Set(payload.duration_sec),
        free_preview: Set(payload.free_preview),
        section_id: Set(section_id),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    Ok((StatusCode::CREATED, Json(LessonResponse::from(created))))
}

#[utoipa::path(
    patch,
    path = "/lessons/{id}",
    tag = "Admin Curriculum",
    operation_id = "adminUpdateLesson",
    summary = "Update a lesson",
    params(("id" = i32, Path, description = "Lesson ID")),
    request_body = UpdateLessonRequest,
    responses(
        (status = 200, description = "Updated lesson", body = LessonResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Lesson not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn update_lesson(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(lesson_id): Path<i32>,
    AppJson(payload): AppJson<UpdateLessonRequest>,
) -> Result<Json<LessonResponse>, AppError> {
    auth_user.require_admin()?;

    let lesson = find_lesson(&state.db, lesson_id).await?;
    let mut active: lesson::ActiveModel = lesson.into();
    if let Some(title) = payload.title {
        validate_title(&title)?;
        active.title = Set(title.trim().to_string());
    }
    if let Some(video_url) = payload.video_url {
        active.video_url = Set(video_url);
    }
    if let Some(duration_sec) = payload.duration_sec {
        if let Some(d) = duration_sec
            && d < 0
        {
            return Err(AppError::Validation("durationSec must be >= 0".into()));
        }
        active.duration_sec = Set(duration_sec);
    }
    if let Some(free_preview) = payload.free_preview {
        active.free_preview = Set(free_preview);
    }
    let updated = active.update(&state.db).await?;
    Ok(Json(LessonResponse::from(updated)))
}

#[utoipa::path(
    delete,
    path = "/lessons/{id}",
    tag = "Admin Curriculum",
    operation_id = "adminDeleteLesson",
    summary = "Delete a lesson",
    params(("id" = i32, Path, description = "Lesson ID")),
    responses(
        (status = 204, description = "Lesson deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Lesson not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user))]
pub async fn delete_lesson(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(lesson_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    auth_user.require_admin()?;

    find_lesson(&state.db, lesson_id).await?;
    lesson::Entity::delete_by_id(lesson_id)
        .exec(&state.db)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/sections/{id}/lessons/reorder",
    tag = "Admin Curriculum",
    operation_id = "adminReorderLessons",
    summary = "Reorder the lessons of a section",
    description = "The body must list every lesson ID of the section exactly once.",
    params(("id" = i32, Path, description = "Section ID")),
    request_body = ReorderRequest,
    responses(
        (status = 200, description = "Lessons in their new order", body = [LessonResponse]),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Section not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_user, payload))]
pub async fn reorder_lessons(
    auth_user: AuthUser,
    State(state): State<AppState>,
    Path(section_id): Path<i32>,
    AppJson(payload): AppJson<ReorderRequest>,
) -> Result<Json<Vec<LessonResponse>>, AppError> {
    auth_user.require_admin()?;
    validate_reorder_ids(&payload.ordered_ids, "lesson ID")?;

    let txn = state.db.begin().await?;
    find_section(&txn, section_id).await?;

    let current: Vec<i32> = lesson::Entity::find()
        .select_only()
        .column(lesson::Column::Id)
        .filter(lesson::Column::SectionId.eq(section_id))
        .into_tuple()
        .all(&txn)
        .await?;
    require_permutation(&payload.ordered_ids, &current, "lesson")?;

    for (pos, id) in payload.ordered_ids.iter().enumerate() {
        lesson::Entity::update_many()
            .col_expr(lesson::Column::Position, (pos as i32).into())
            .filter(lesson::Column::Id.eq(*id))
            .exec(&txn)
            .await?;
    }

    let lessons = lesson::Entity::find()
        .filter(lesson::Column::SectionId.eq(section_id))
        .order_by(lesson::Column::Position, Order::Asc)
        .all(&txn)
        .await?;

    txn.commit().await?;

    Ok(Json(lessons.into_iter().map(LessonResponse::from).collect()))
}

async fn find_course<C: ConnectionTrait>(db: &C, id: i32) -> Result<course::Model, AppError> {
    course::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".into()))
}

async fn find_section<C: ConnectionTrait>(db: &C, id: i32) -> Result<section::Model, AppError> {
    section::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Section not found".into()))
}

async fn find_lesson<C: ConnectionTrait>(db: &C, id: i32) -> Result<lesson::Model, AppError> {
    lesson::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Lesson not found".into()))
}

/// The reorder list must contain exactly the current child IDs.
fn require_permutation(requested: &[i32], current: &[i32], name: &str) -> Result<(), AppError> {
    let mut requested_sorted = requested.to_vec();
    let mut current_sorted = current.to_vec();
    requested_sorted.sort_unstable();
    current_sorted.sort_unstable();
    if requested_sorted != current_sorted {
        return Err(AppError::Validation(format!(
            "Reorder list must contain every {name} ID exactly once"
        )));
    }
    Ok(())
}

/// Generate a slug from the title, suffixing on collision.
async fn unique_course_slug<C: ConnectionTrait>(db: &C, title: &str) -> Result<String, AppError> {
    let base = slug::slugify(title);
    let base = if base.is_empty() {
        "course".to_string()
    } else {
        base
    };

    let mut candidate = base.clone();
    let mut n = 2;
    loop {
        let taken = course::Entity::find()
            .filter(course::Column::Slug.eq(&candidate))
            .count(db)
            .await?;
        if taken == 0 {
            return Ok(candidate);
        }
        candidate = slug::with_suffix(&base, n);
        n += 1;
    }
}

/// Lesson slugs are unique within their course.
async fn unique_lesson_slug<C: ConnectionTrait>(
    db: &C,
    course_id: i32,
    title: &str,
) -> Result<String, AppError> {
    let base = slug::slugify(title);
    let base = if base.is_empty() {
        "lesson".to_string()
    } else {
        base
    };

    let mut candidate = base.clone();
    let mut n = 2;
    loop {
        let taken = lesson::Entity::find()
            .inner_join(section::Entity)
            .filter(section::Column::CourseId.eq(course_id))
            .filter(lesson::Column::Slug.eq(&candidate))
            .count(db)
            .await?;
        if taken == 0 {
            return Ok(candidate);
        }
        candidate = slug::with_suffix(&base, n);
        n += 1;
    }
}

/// Replace the course's tag set: upsert tags by name, relink.
async fn replace_course_tags<C: ConnectionTrait>(
    db: &C,
    course_id: i32,
    names: &[String],
) -> Result<(), AppError> {
    course_tag::Entity::delete_many()
        .filter(course_tag::Column::CourseId.eq(course_id))
        .exec(db)
        .await?;

    let names: Vec<String> = names
        .iter()
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .collect();
    if names.is_empty() {
        return Ok(());
    }

    for name in &names {
        tag::Entity::insert(tag::ActiveModel {
            name: Set(name.clone()),
            ..Default::default()
        })
        .on_conflict(OnConflict::column(tag::Column::Name).do_nothing().to_owned())
        .exec_without_returning(db)
        .await?;
    }

    let tags = tag::Entity::find()
        .filter(tag::Column::Name.is_in(names))
        .all(db)
        .await?;

    let links = tags.into_iter().map(|t| course_tag::ActiveModel {
        course_id: Set(course_id),
        tag_id: Set(t.id),
    });
    course_tag::Entity::insert_many(links)
        .on_conflict(
            OnConflict::columns([course_tag::Column::CourseId, course_tag::Column::TagId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(())
}
