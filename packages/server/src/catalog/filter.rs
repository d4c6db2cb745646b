use crate::models::catalog::CatalogQuery;

/// Catalog sort order. Unrecognized values silently fall back to
/// [`SortKey::Popularity`]; the catalog never rejects a query parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum SortKey {
    /// Enrollment count, descending.
    #[default]
    Popularity,
    /// Review count, descending.
    Rating,
    /// Creation time, descending.
    Newest,
    /// Price ascending.
    PriceLow,
    /// Price descending.
    PriceHigh,
}

impl SortKey {
    pub fn from_param(param: Option<&str>) -> Self {
        match param {
            Some("rating") => SortKey::Rating,
            Some("newest") => SortKey::Newest,
            Some("price-low") => SortKey::PriceLow,
            Some("price-high") => SortKey::PriceHigh,
            _ => SortKey::Popularity,
        }
    }
}

/// Normalized catalog filter. Doubles as the cache key, so two requests
/// that normalize identically share a cache entry.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CatalogFilter {
    pub page: u64,
    pub limit: u64,
    pub category: Option<String>,
    pub level: Option<String>,
    pub search: Option<String>,
    pub sort: SortKey,
    /// Minimum price in minor currency units.
    pub min_price_cents: Option<i64>,
    /// Maximum price in minor currency units.
    pub max_price_cents: Option<i64>,
}

impl CatalogFilter {
    /// Normalize raw query parameters: clamp the page and limit, trim text
    /// filters, convert whole-unit price bounds to minor units. Only
    /// positive price bounds apply.
    pub fn from_query(query: &CatalogQuery) -> Self {
        let page = Ord::max(query.page.unwrap_or(1), 1) as u64;
        let limit = query.limit.unwrap_or(20).clamp(1, 100) as u64;

        let text = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_owned)
        };

        CatalogFilter {
            page,
            limit,
            category: text(&query.category),
            level: text(&query.level),
            search: text(&query.search),
            sort: SortKey::from_param(query.sort_by.as_deref()),
            min_price_cents: query.min_price.filter(|&p| p > 0).map(|p| p.saturating_mul(100)),
            max_price_cents: query.max_price.filter(|&p| p > 0).map(|p| p.saturating_mul(100)),
        }
    }
}

/// Round to one decimal place for the `averageRating` stat.
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
