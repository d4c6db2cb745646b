use std::num::NonZeroUsize;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use lru::LruCache;

use super::filter::CatalogFilter;
use crate::models::catalog::CourseListResponse;

struct Entry {
    inserted_at: Instant,
    page: Arc<CourseListResponse>,
}

/// LRU cache over catalog result pages, keyed by the normalized filter.
///
/// Entries are served until their TTL elapses; a stale read within the
/// window is acceptable for the public catalog. Writes race benignly, the
/// last computation for a key wins.
pub struct CatalogCache {
    entries: Mutex<LruCache<CatalogFilter, Entry>>,
    ttl: Duration,
    hits: AtomicU64,
}

impl CatalogCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
        CatalogCache {
            entries: Mutex::new(LruCache::new(capacity)),
            ttl,
            hits: AtomicU64::new(0),
        }
    }

    pub fn get(&self, filter: &CatalogFilter) -> Option<Arc<CourseListResponse>> {
        let mut entries = self.entries.lock().ok()?;
        match entries.get(filter) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(Arc::clone(&entry.page))
            }
            Some(_) => {
                entries.pop(filter);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, filter: CatalogFilter, page: Arc<CourseListResponse>) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.put(
                filter,
                Entry {
                    inserted_at: Instant::now(),
                    page,
                },
            );
        }
    }

    /// Number of cache hits served so far.
    pub fn hit_count(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }
}
