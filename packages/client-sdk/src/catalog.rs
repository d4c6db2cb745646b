use tokio_util::sync::CancellationToken;

use crate::client::{ApiClient, CourseList};
use crate::error::ClientError;

/// Catalog query parameters. Unset fields are omitted from the request so
/// the server applies its own defaults.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogFilters {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub category: Option<String>,
    pub level: Option<String>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
}

impl CatalogFilters {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(ref category) = self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(ref level) = self.level {
            pairs.push(("level", level.clone()));
        }
        if let Some(ref search) = self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(ref sort_by) = self.sort_by {
            pairs.push(("sortBy", sort_by.clone()));
        }
        if let Some(min_price) = self.min_price {
            pairs.push(("minPrice", min_price.to_string()));
        }
        if let Some(max_price) = self.max_price {
            pairs.push(("maxPrice", max_price.to_string()));
        }
        pairs
    }
}

/// Issues catalog queries with last-request-wins semantics.
///
/// Starting a new query cancels the previous in-flight one, so a fast
/// typist never sees results from a stale filter overwrite fresh ones.
pub struct CatalogBrowser {
    client: ApiClient,
    in_flight: Option<CancellationToken>,
}

impl CatalogBrowser {
    pub fn new(client: ApiClient) -> Self {
        Self {
            client,
            in_flight: None,
        }
    }

    /// Fetch a catalog page, superseding any query still in flight.
    pub async fn browse(&mut self, filters: &CatalogFilters) -> Result<CourseList, ClientError> {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }

        let token = CancellationToken::new();
        self.in_flight = Some(token.clone());

        let result = self.client.fetch_catalog(filters, &token).await;
        self.in_flight = None;
        result
    }

    /// Cancel the in-flight query, if any.
    pub fn cancel(&mut self) {
        if let Some(token) = self.in_flight.take() {
            token.cancel();
        }
    }
}
