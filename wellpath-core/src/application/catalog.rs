use crate::api::{CatalogQuery, Page};
use crate::domain::Challenge;
use indexmap::IndexMap;
use instant::Instant;
use std::time::Duration;

#[derive(Debug, Clone)]
struct CachedPage {
    page: Page<Challenge>,
    stored_at: Instant,
}

/// Catalog pages keyed by query, with LRU eviction and a freshness window
///
/// Map order is recency order: the front entry is the least recently used.
#[derive(Debug, Clone)]
pub struct CatalogCache {
    entries: IndexMap<CatalogQuery, CachedPage>,
    capacity: usize,
    ttl: Duration,
}

impl CatalogCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
            capacity,
            ttl,
        }
    }

    pub fn get(&mut self, query: &CatalogQuery) -> Option<Page<Challenge>> {
        self.get_at(query, Instant::now())
    }

    pub fn get_at(&mut self, query: &CatalogQuery, now: Instant) -> Option<Page<Challenge>> {
        let index = self.entries.get_index_of(query)?;
        let stored_at = self.entries.get_index(index)?.1.stored_at;
        if now >= stored_at + self.ttl {
            self.entries.shift_remove_index(index);
            return None;
        }
        // Move to the back: most recently used
        let last = self.entries.len() - 1;
        self.entries.move_index(index, last);
        self.entries.get_index(last).map(|(_, cached)| cached.page.clone())
    }

    pub fn insert(&mut self, query: CatalogQuery, page: Page<Challenge>) {
        self.insert_at(query, page, Instant::now());
    }

    pub fn insert_at(&mut self, query: CatalogQuery, page: Page<Challenge>, now: Instant) {
        if self.capacity == 0 {
            return;
        }
        self.entries.shift_remove(&query);
        while self.entries.len() >= self.capacity {
            if let Some((evicted, _)) = self.entries.shift_remove_index(0) {
                tracing::debug!(?evicted, "evicting catalog page");
            }
        }
        self.entries.insert(
            query,
            CachedPage {
                page,
                stored_at: now,
            },
        );
    }

    /// Drop everything (after a registration changes what the user has joined)
    pub fn invalidate_all(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
