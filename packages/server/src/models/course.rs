use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::double_option;
use crate::entity::{course, lesson, section};
use crate::error::AppError;

/// Request body for creating a course. Courses start as drafts.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    #[schema(example = "Introduction to Algorithms")]
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub language: Option<String>,
    /// Price in minor currency units (defaults to 0, i.e. free).
    #[schema(example = 4900)]
    pub price: Option<i32>,
    pub thumbnail: Option<String>,
    pub tags: Option<Vec<String>>,
}

/// Request body for updating a course. All fields optional; nullable
/// fields distinguish "absent" from "set to null".
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(nullable)]
    pub subtitle: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(nullable)]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(nullable)]
    pub category: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(nullable)]
    pub level: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(nullable)]
    pub language: Option<Option<String>>,
    /// `DRAFT` or `PUBLISHED`.
    pub status: Option<String>,
    pub price: Option<i32>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(nullable)]
    pub thumbnail: Option<Option<String>>,
    /// Replaces the full tag set when present.
    pub tags: Option<Vec<String>>,
}

pub fn validate_price(price: Option<i32>) -> Result<(), AppError> {
    if let Some(price) = price
        && price < 0
    {
        return Err(AppError::Validation("Price must be >= 0".into()));
    }
    Ok(())
}

pub fn validate_status(status: &str) -> Result<(), AppError> {
    if status != course::STATUS_DRAFT && status != course::STATUS_PUBLISHED {
        return Err(AppError::Validation(
            "Status must be DRAFT or PUBLISHED".into(),
        ));
    }
    Ok(())
}

/// A course as returned to admin callers.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseResponse {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub language: Option<String>,
    pub status: String,
    pub price: i32,
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<course::Model> for CourseResponse {
    fn from(c: course::Model) -> Self {
        Self {
            id: c.id,
            slug: c.slug,
            title: c.title,
            subtitle: c.subtitle,
            description: c.description,
            category: c.category,
            level: c.level,
            language: c.language,
            status: c.status,
            price: c.price_cents,
            thumbnail: c.thumbnail_url,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct CourseAdminListResponse {
    pub data: Vec<CourseResponse>,
    pub pagination: super::shared::PageMeta,
}

/// Section CRUD bodies.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateSectionRequest {
    #[schema(example = "Getting Started")]
    pub title: String,
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct UpdateSectionRequest {
    pub title: Option<String>,
}

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    /// The complete set of child IDs in their new order.
    pub ordered_ids: Vec<i32>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionResponse {
    pub id: i32,
    pub course_id: i32,
    pub title: String,
    pub position: i32,
}

impl From<section::Model> for SectionResponse {
    fn from(s: section::Model) -> Self {
        Self {
            id: s.id,
            course_id: s.course_id,
            title: s.title,
            position: s.position,
        }
    }
}

/// Lesson CRUD bodies.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateLessonRequest {
    #[schema(example = "Installing the toolchain")]
    pub title: String,
    pub video_url: Option<String>,
    pub duration_sec: Option<i32>,
    #[serde(default)]
    pub free_preview: bool,
}

#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLessonRequest {
    pub title: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(nullable)]
    pub video_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(nullable)]
    pub duration_sec: Option<Option<i32>>,
    pub free_preview: Option<bool>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonResponse {
    pub id: i32,
    pub section_id: i32,
    pub slug: String,
    pub title: String,
    pub position: i32,
    pub video_url: Option<String>,
    pub duration_sec: Option<i32>,
    pub free_preview: bool,
}

impl From<lesson::Model> for LessonResponse {
    fn from(l: lesson::Model) -> Self {
        Self {
            id: l.id,
            section_id: l.section_id,
            slug: l.slug,
            title: l.title,
            position: l.position,
            video_url: l.video_url,
            duration_sec: l.duration_sec,
            free_preview: l.free_preview,
        }
    }
}

/// Public course detail for the player page. `video_url` is present only
/// when the caller may watch the lesson.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetailResponse {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub language: Option<String>,
    pub price: i32,
    pub thumbnail: Option<String>,
    pub instructor: super::catalog::InstructorSummary,
    pub enrolled: bool,
    pub sections: Vec<SectionDetail>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionDetail {
    pub id: i32,
    pub title: String,
    pub position: i32,
    pub lessons: Vec<LessonDetail>,
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LessonDetail {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub position: i32,
    /// Withheld unless the caller is enrolled, an admin, or the lesson
    /// is a free preview.
    pub video_url: Option<String>,
    pub duration_sec: Option<i32>,
    pub free_preview: bool,
}
