use serde::Serialize;

/// Successful upload response.
#[derive(Serialize, utoipa::ToSchema)]
pub struct UploadResponse {
    /// Public URL of the stored file, served by the assets endpoint.
    #[schema(example = "/api/v1/assets/course-videos/video-1724800000000-a1b2.mp4")]
    pub url: String,
}
