//! Pixmap cache (§4.D): hash-bucketed, reference-counted, bounded,
//! keyed by server-assigned ids.
//!
//! Shared `Arc<Mutex<Inner>>` state with poison-recovery on lock,
//! generalizing the teacher's `EgfxInner`/`lock_shared` pattern
//! (`egfx.rs`) to a cache instead of a GFX pipe.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::Notify;

use crate::error::ResourceError;

#[derive(Debug, Clone)]
pub struct CachedImage {
    pub pixels: Arc<Vec<u8>>,
    pub width: u32,
    pub height: u32,
}

impl CachedImage {
    pub fn byte_len(&self) -> u64 {
        self.pixels.len() as u64
    }
}

struct Entry {
    image: CachedImage,
    refcount: u64,
}

struct Inner {
    entries: HashMap<u64, Entry>,
    /// LRU order among entries with `refcount == 1` (candidates for
    /// eviction); oldest first.
    lru: VecDeque<u64>,
    used_bytes: u64,
    budget_bytes: u64,
    aborted: bool,
}

/// Reference-counted, bounded pixmap cache shared by every display
/// channel of one session.
pub struct PixmapCache {
    inner: Mutex<Inner>,
    notify: Notify,
}

impl PixmapCache {
    pub fn new(budget_bytes: u64) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
                lru: VecDeque::new(),
                used_bytes: 0,
                budget_bytes,
                aborted: false,
            }),
            notify: Notify::new(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// `add(id, image)` is idempotent on `id`: a repeat add increments
    /// the refcount instead of replacing the stored image.
    pub fn add(&self, id: u64, image: CachedImage) -> Result<(), ResourceError> {
        let mut inner = self.lock();
        if let Some(entry) = inner.entries.get_mut(&id) {
            entry.refcount += 1;
            inner.lru.retain(|&x| x != id);
            return Ok(());
        }
        let byte_len = image.byte_len();
        while inner.used_bytes + byte_len > inner.budget_bytes {
            let Some(victim) = inner.lru.pop_front() else {
                return Err(ResourceError::CacheBudgetExceeded {
                    used: inner.used_bytes,
                    budget: inner.budget_bytes,
                });
            };
            if let Some(entry) = inner.entries.remove(&victim) {
                inner.used_bytes -= entry.image.byte_len();
            }
        }
        inner.used_bytes += byte_len;
        inner.entries.insert(
            id,
            Entry {
                image,
                refcount: 1,
            },
        );
        inner.lru.push_back(id);
        drop(inner);
        self.notify.notify_waiters();
        Ok(())
    }

    /// Blocks (yields) until `id` is present or the cache is aborted.
    pub async fn get(&self, id: u64) -> Result<CachedImage, ResourceError> {
        loop {
            {
                let inner = self.lock();
                if inner.aborted {
                    return Err(ResourceError::CacheAborted);
                }
                if let Some(entry) = inner.entries.get(&id) {
                    return Ok(entry.image.clone());
                }
            }
            self.notify.notified().await;
        }
    }

    /// Non-blocking lookup, used by the draw dispatcher for
    /// `FROM_CACHE` references that must already be resident.
    pub fn try_get(&self, id: u64) -> Option<CachedImage> {
        self.lock().entries.get(&id).map(|e| e.image.clone())
    }

    /// `remove(id)` decrements the refcount; at zero, the image is
    /// freed and becomes LRU-evictable immediately (refcount 1 makes
    /// it eligible beforehand too).
    pub fn remove(&self, id: u64) {
        let mut inner = self.lock();
        let Some(entry) = inner.entries.get_mut(&id) else {
            return;
        };
        entry.refcount = entry.refcount.saturating_sub(1);
        if entry.refcount == 0 {
            if let Some(entry) = inner.entries.remove(&id) {
                inner.used_bytes -= entry.image.byte_len();
            }
        } else if entry.refcount == 1 && !inner.lru.contains(&id) {
            inner.lru.push_back(id);
        }
    }

    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.lru.clear();
        inner.used_bytes = 0;
    }

    /// `INVAL_LIST`: remove specific ids outright regardless of
    /// refcount (server has told us it will never reference them
    /// again).
    pub fn invalidate(&self, ids: &[u64]) {
        let mut inner = self.lock();
        for id in ids {
            if let Some(entry) = inner.entries.remove(id) {
                inner.used_bytes -= entry.image.byte_len();
            }
            inner.lru.retain(|x| x != id);
        }
    }

    pub fn abort(&self) {
        self.lock().aborted = true;
        self.notify.notify_waiters();
    }

    pub fn used_bytes(&self) -> u64 {
        self.lock().used_bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn img(len: usize) -> CachedImage {
        CachedImage {
            pixels: Arc::new(vec![0u8; len]),
            width: 1,
            height: 1,
        }
    }

    #[test]
    fn repeat_add_increments_refcount_not_replaces() {
        let cache = PixmapCache::new(1024);
        cache.add(1, img(10)).unwrap();
        cache.add(1, img(999)).unwrap();
        assert_eq!(cache.try_get(1).unwrap().pixels.len(), 10);
    }

    #[test]
    fn remove_frees_at_zero_refcount() {
        let cache = PixmapCache::new(1024);
        cache.add(1, img(10)).unwrap();
        cache.add(1, img(10)).unwrap();
        cache.remove(1);
        assert!(cache.try_get(1).is_some());
        cache.remove(1);
        assert!(cache.try_get(1).is_none());
    }

    #[test]
    fn overflow_evicts_lru_refcount_one_entries() {
        let cache = PixmapCache::new(20);
        cache.add(1, img(10)).unwrap();
        cache.add(2, img(10)).unwrap();
        // Budget is exactly full at 20 bytes; both entries have
        // refcount 1 (eviction-eligible) from the moment they're
        // added. Adding a third forces 1 (oldest) out.
        cache.add(3, img(10)).unwrap();
        assert!(cache.try_get(1).is_none());
        assert!(cache.try_get(2).is_some());
        assert!(cache.try_get(3).is_some());
        assert_eq!(cache.used_bytes(), 20);
    }

    #[test]
    fn a_referenced_entry_is_not_evicted() {
        let cache = PixmapCache::new(20);
        cache.add(1, img(10)).unwrap();
        cache.add(1, img(10)).unwrap(); // refcount 2, pinned
        cache.add(2, img(10)).unwrap();
        // No room for a third entry; 1 is pinned (refcount 2) so 2
        // (the only refcount-1 entry) must be the victim.
        cache.add(3, img(10)).unwrap();
        assert!(cache.try_get(1).is_some());
        assert!(cache.try_get(2).is_none());
        assert!(cache.try_get(3).is_some());
    }

    #[tokio::test]
    async fn get_blocks_until_added_then_resolves() {
        let cache = PixmapCache::new(1024);
        let cache2 = cache.clone();
        let handle = tokio::spawn(async move { cache2.get(5).await });
        tokio::task::yield_now().await;
        cache.add(5, img(4)).unwrap();
        let result = handle.await.unwrap();
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn abort_wakes_blocked_waiters_with_error() {
        let cache = PixmapCache::new(1024);
        let cache2 = cache.clone();
        let handle = tokio::spawn(async move { cache2.get(5).await });
        tokio::task::yield_now().await;
        cache.abort();
        let result = handle.await.unwrap();
        assert!(matches!(result, Err(ResourceError::CacheAborted)));
    }
}
