//! Public catalog query engine: filter normalization, the database query
//! with derived per-course stats, and a small TTL'd LRU cache in front.

mod cache;
mod filter;
mod query;

pub use cache::CatalogCache;
pub use filter::{CatalogFilter, SortKey, round_one_decimal};
pub use query::fetch_catalog_page;
