use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::progress;
use crate::error::AppError;

/// Query parameters for reading lesson progress.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProgressQuery {
    pub lesson_id: i32,
}

/// Request body for recording playback progress.
///
/// Absent fields leave the stored value unchanged; `completed: false`
/// never clears a previously stored `true`.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressUpdateRequest {
    pub lesson_id: i32,
    #[schema(example = 120)]
    pub position_sec: Option<i32>,
    pub completed: Option<bool>,
}

pub fn validate_progress_update(payload: &ProgressUpdateRequest) -> Result<(), AppError> {
    if let Some(pos) = payload.position_sec
        && pos < 0
    {
        return Err(AppError::Validation("positionSec must be >= 0".into()));
    }
    Ok(())
}

/// Stored progress for one lesson. Lessons the user never touched read
/// back as position 0, not completed.
#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProgressResponse {
    pub lesson_id: i32,
    pub position_sec: i32,
    pub completed: bool,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProgressResponse {
    pub fn untouched(lesson_id: i32) -> Self {
        Self {
            lesson_id,
            position_sec: 0,
            completed: false,
            updated_at: None,
        }
    }
}

impl From<progress::Model> for ProgressResponse {
    fn from(p: progress::Model) -> Self {
        Self {
            lesson_id: p.lesson_id,
            position_sec: p.position_sec,
            completed: p.completed,
            updated_at: Some(p.updated_at),
        }
    }
}
