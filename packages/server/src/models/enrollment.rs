use chrono::{DateTime, Utc};
use serde::Serialize;

/// One entry in the caller's learning dashboard.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LearningEntry {
    pub course_id: i32,
    pub slug: String,
    pub title: String,
    pub thumbnail: Option<String>,
    pub enrolled_at: DateTime<Utc>,
    pub total_lessons: u64,
    pub completed_lessons: u64,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MyLearningResponse {
    pub courses: Vec<LearningEntry>,
}
