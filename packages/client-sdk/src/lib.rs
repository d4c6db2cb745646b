//! Client for the Campus HTTP API.
//!
//! Covers the two client-side protocols: catalog browsing where a new query
//! supersedes the in-flight one, and best-effort lesson progress reporting
//! driven by [`common::progress::PlaybackSampler`].

pub mod catalog;
pub mod client;
pub mod error;
pub mod watcher;

pub use catalog::{CatalogBrowser, CatalogFilters};
pub use client::{ApiClient, CourseList, CourseSummary, Pagination, ProgressState};
pub use error::ClientError;
pub use watcher::LessonWatcher;
