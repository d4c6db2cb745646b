use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use sea_orm::{ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder};
use tracing::instrument;

use crate::catalog::{CatalogFilter, fetch_catalog_page};
use crate::entity::{course, enrollment, lesson, section, user};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthUser;
use crate::models::catalog::{CatalogQuery, CourseListResponse, InstructorSummary};
use crate::models::course::{CourseDetailResponse, LessonDetail, SectionDetail};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/public",
    tag = "Catalog",
    operation_id = "listPublicCourses",
    summary = "Browse the public course catalog",
    description = "Returns published courses with derived stats, filtered, sorted and paginated. \
        Invalid parameter values are normalized rather than rejected: pages below 1 are clamped, \
        limits are capped at 100, and unknown sort keys fall back to popularity.",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Catalog page", body = CourseListResponse),
    ),
)]
#[instrument(skip(state, query))]
pub async fn list_public_courses(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CourseListResponse>, AppError> {
    let filter = CatalogFilter::from_query(&query);

    if let Some(page) = state.catalog_cache.get(&filter) {
        return Ok(Json((*page).clone()));
    }

    let page = Arc::new(fetch_catalog_page(&state.db, &filter).await?);
    state.catalog_cache.insert(filter, Arc::clone(&page));

    Ok(Json((*page).clone()))
}

#[utoipa::path(
    get,
    path = "/{course_id}",
    tag = "Catalog",
    operation_id = "getCourseDetail",
    summary = "Get a published course with its curriculum",
    description = "Returns the course with ordered sections and lessons. Lesson video URLs are \
        included only for free previews, enrolled students, and admins.",
    params(("course_id" = String, Path, description = "Course slug or numeric ID")),
    responses(
        (status = 200, description = "Course detail", body = CourseDetailResponse),
        (status = 404, description = "Course not found (NOT_FOUND)", body = ErrorBody),
    ),
)]
#[instrument(skip(state, auth_user))]
pub async fn get_course_detail(
    auth_user: Option<AuthUser>,
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<CourseDetailResponse>, AppError> {
    let mut select =
        course::Entity::find().filter(course::Column::Status.eq(course::STATUS_PUBLISHED));
    select = match key.parse::<i32>() {
        Ok(id) => select.filter(course::Column::Id.eq(id)),
        Err(_) => select.filter(course::Column::Slug.eq(&key)),
    };
    let course = select
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".into()))?;

    let instructor = user::Entity::find_by_id(course.created_by_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::Internal(format!("Missing instructor for course {}", course.id)))?;

    let enrolled = match auth_user {
        Some(ref auth) => {
            enrollment::Entity::find_by_id((course.id, auth.user_id))
                .one(&state.db)
                .await?
                .is_some()
        }
        None => false,
    };
    let is_admin = auth_user.as_ref().is_some_and(AuthUser::is_admin);
    let can_watch_all = enrolled || is_admin;

    let sections = section::Entity::find()
        .filter(section::Column::CourseId.eq(course.id))
        .order_by(section::Column::Position, Order::Asc)
        .all(&state.db)
        .await?;
    let section_ids: HashSet<i32> = sections.iter().map(|s| s.id).collect();

    let lessons = lesson::Entity::find()
        .filter(lesson::Column::SectionId.is_in(section_ids.iter().copied().collect::<Vec<_>>()))
        .order_by(lesson::Column::Position, Order::Asc)
        .all(&state.db)
        .await?;

    let mut by_section: HashMap<i32, Vec<LessonDetail>> = HashMap::new();
    for l in lessons {
        let video_url = if can_watch_all || l.free_preview {
            l.video_url
        } else {
            None
        };
        by_section.entry(l.section_id).or_default().push(LessonDetail {
            id: l.id,
            slug: l.slug,
            title: l.title,
            position: l.position,
            video_url,
            duration_sec: l.duration_sec,
            free_preview: l.free_preview,
        });
    }

    let sections = sections
        .into_iter()
        .map(|s| SectionDetail {
            lessons: by_section.remove(&s.id).unwrap_or_default(),
            id: s.id,
            title: s.title,
            position: s.position,
        })
        .collect();

    Ok(Json(CourseDetailResponse {
        id: course.id,
        slug: course.slug,
        title: course.title,
        subtitle: course.subtitle,
        description: course.description,
        category: course.category,
        level: course.level,
        language: course.language,
        price: course.price_cents,
        thumbnail: course.thumbnail_url,
        instructor: InstructorSummary {
            id: instructor.id,
            name: instructor.name.unwrap_or_default(),
            image: instructor.image,
        },
        enrolled,
        sections,
    }))
}
