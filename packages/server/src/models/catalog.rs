use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::PageMeta;

/// Raw query parameters for the public catalog endpoint.
///
/// Every field is optional and tolerated in any shape; normalization into
/// [`crate::catalog::CatalogFilter`] clamps and defaults instead of rejecting.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// Page number (1-based, values below 1 are clamped).
    pub page: Option<i64>,
    /// Page size (clamped to 1-100, default 20).
    pub limit: Option<i64>,
    /// Exact category match.
    pub category: Option<String>,
    /// Exact level match.
    pub level: Option<String>,
    /// Case-insensitive substring search over title, subtitle and description.
    pub search: Option<String>,
    /// One of `popularity`, `rating`, `newest`, `price-low`, `price-high`.
    /// Unknown values fall back to `popularity`.
    pub sort_by: Option<String>,
    /// Minimum price in whole currency units (non-positive values ignored).
    pub min_price: Option<i64>,
    /// Maximum price in whole currency units (non-positive values ignored).
    pub max_price: Option<i64>,
}

/// Instructor summary embedded in public course listings.
#[derive(Clone, Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstructorSummary {
    pub id: i32,
    pub name: String,
    pub image: Option<String>,
}

/// A published course as shown in the public catalog.
#[derive(Clone, Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PublicCourse {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub language: Option<String>,
    /// Price in minor currency units.
    pub price: i32,
    pub thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
    pub instructor: InstructorSummary,
    pub enrollment_count: u64,
    pub review_count: u64,
    /// Mean review rating rounded to one decimal place, 0 when no reviews.
    pub average_rating: f64,
    pub total_lessons: u64,
    pub tags: Vec<String>,
}

#[derive(Clone, Debug, Serialize, utoipa::ToSchema)]
pub struct CourseListResponse {
    pub courses: Vec<PublicCourse>,
    pub pagination: PageMeta,
}
