use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for creating or replacing the caller's review.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct PutReviewRequest {
    /// 1-5.
    #[schema(example = 5)]
    pub rating: i32,
    pub comment: Option<String>,
}

pub fn validate_review(payload: &PutReviewRequest) -> Result<(), AppError> {
    if !(1..=5).contains(&payload.rating) {
        return Err(AppError::Validation("Rating must be 1-5".into()));
    }
    if let Some(ref comment) = payload.comment
        && comment.chars().count() > 2000
    {
        return Err(AppError::Validation(
            "Comment must be at most 2000 characters".into(),
        ));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub user_id: i32,
    pub user_name: Option<String>,
    pub rating: i32,
    pub comment: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct ReviewListResponse {
    pub reviews: Vec<ReviewResponse>,
}
