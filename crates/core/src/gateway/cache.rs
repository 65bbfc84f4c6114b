//! Provider response cache with single-flight lookups.
//!
//! Each key owns a slot holding a `OnceCell`. The first caller for a key
//! runs the fetch; concurrent callers for the same key await that fetch
//! instead of issuing their own. A failed fetch leaves the cell empty so
//! the next caller retries.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, OnceCell};
use tokio::time::Instant;

/// Exact provider query a cached response belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Discover page, by canonical query signature.
    Discover(String),
    Similar { movie_id: u32, page: u32 },
    Details { movie_id: u32 },
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Discover(signature) => write!(f, "discover?{}", signature),
            CacheKey::Similar { movie_id, page } => {
                write!(f, "movie/{}/similar?page={}", movie_id, page)
            }
            CacheKey::Details { movie_id } => write!(f, "movie/{}", movie_id),
        }
    }
}

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

struct Slot<V> {
    cell: OnceCell<Entry<V>>,
}

impl<V> Slot<V> {
    fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    fn stored_at(&self) -> Option<Instant> {
        self.cell.get().map(|e| e.stored_at)
    }
}

/// TTL-bounded, size-bounded response cache.
pub struct ResponseCache<V> {
    slots: Mutex<HashMap<CacheKey, Arc<Slot<V>>>>,
    ttl: Duration,
    max_entries: usize,
}

impl<V: Clone + Send + Sync> ResponseCache<V> {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            slots: Mutex::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    /// Return the cached value for `key`, or run `fetch` and store its result.
    ///
    /// The flag is `true` when the value came from the cache (including
    /// values produced by a concurrent caller's fetch).
    pub async fn get_or_fetch<F, Fut, E>(&self, key: CacheKey, fetch: F) -> Result<(V, bool), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        let slot = self.slot(key).await;

        if let Some(entry) = slot.cell.get() {
            return Ok((entry.value.clone(), true));
        }

        let mut fetched = false;
        let entry = slot
            .cell
            .get_or_try_init(|| {
                fetched = true;
                async move {
                    let value = fetch().await?;
                    Ok(Entry {
                        value,
                        stored_at: Instant::now(),
                    })
                }
            })
            .await?;

        Ok((entry.value.clone(), !fetched))
    }

    /// Number of slots currently held (stored or in flight).
    pub async fn len(&self) -> usize {
        self.slots.lock().await.len()
    }

    async fn slot(&self, key: CacheKey) -> Arc<Slot<V>> {
        let mut slots = self.slots.lock().await;

        if let Some(slot) = slots.get(&key) {
            let expired = slot
                .stored_at()
                .is_some_and(|stored| stored.elapsed() >= self.ttl);
            if !expired {
                return Arc::clone(slot);
            }
            slots.remove(&key);
        }

        if slots.len() >= self.max_entries {
            self.evict(&mut slots);
        }

        let slot = Arc::new(Slot::new());
        slots.insert(key, Arc::clone(&slot));
        slot
    }

    /// Drop expired and abandoned slots, then the oldest stored entries
    /// until there is room for one more.
    fn evict(&self, slots: &mut HashMap<CacheKey, Arc<Slot<V>>>) {
        slots.retain(|_, slot| match slot.stored_at() {
            Some(stored) => stored.elapsed() < self.ttl,
            // Empty and unreferenced: a failed fetch nobody is retrying.
            None => Arc::strong_count(slot) > 1,
        });

        while slots.len() >= self.max_entries {
            let oldest = slots
                .iter()
                .filter_map(|(key, slot)| slot.stored_at().map(|t| (t, key)))
                .min_by_key(|(t, _)| *t)
                .map(|(_, key)| key.clone());
            match oldest {
                Some(key) => {
                    slots.remove(&key);
                }
                // Only in-flight slots left.
                None => break,
            }
        }
    }
}
