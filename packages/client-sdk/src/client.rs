use reqwest::RequestBuilder;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;

use common::progress::ProgressUpdate;

use crate::catalog::CatalogFilters;
use crate::error::ClientError;

/// Thin wrapper over `reqwest` that knows the API routes and error format.
#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

/// A catalog entry. Only the fields the client renders are kept; unknown
/// fields are ignored so server additions don't break old clients.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub price: i32,
    pub thumbnail: Option<String>,
    pub enrollment_count: u64,
    pub review_count: u64,
    pub average_rating: f64,
    pub total_lessons: u64,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u64,
    pub limit: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct CourseList {
    pub courses: Vec<CourseSummary>,
    pub pagination: Pagination,
}

/// Stored playback state for one lesson.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressState {
    pub lesson_id: i32,
    pub position_sec: i32,
    pub completed: bool,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    code: String,
    message: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: None,
        }
    }

    /// Attach a bearer token to every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        res: reqwest::Response,
    ) -> Result<T, ClientError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res.json().await?);
        }

        let body: Option<ApiErrorBody> = res.json().await.ok();
        let (code, message) = body
            .map(|b| (b.code, b.message))
            .unwrap_or_else(|| ("UNKNOWN".to_string(), "Unrecognized error body".to_string()));
        Err(ClientError::Api {
            status: status.as_u16(),
            code,
            message,
        })
    }

    /// Fetch one catalog page. Returns [`ClientError::Cancelled`] as soon as
    /// the token fires, without waiting for the response.
    pub async fn fetch_catalog(
        &self,
        filters: &CatalogFilters,
        cancel: &CancellationToken,
    ) -> Result<CourseList, ClientError> {
        let request = self
            .http
            .get(self.url("/api/v1/courses/public"))
            .query(&filters.query_pairs());

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ClientError::Cancelled),
            res = request.send() => Self::decode(res?).await,
        }
    }

    pub async fn get_progress(&self, lesson_id: i32) -> Result<ProgressState, ClientError> {
        let res = self
            .authorize(self.http.get(self.url("/api/v1/progress")))
            .query(&[("lessonId", lesson_id)])
            .send()
            .await?;
        Self::decode(res).await
    }

    pub async fn post_progress(&self, update: &ProgressUpdate) -> Result<ProgressState, ClientError> {
        let res = self
            .authorize(self.http.post(self.url("/api/v1/progress")))
            .json(update)
            .send()
            .await?;
        Self::decode(res).await
    }
}
