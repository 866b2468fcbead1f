//! Palette cache (§4.D, §6 "Palette cache ids are 64-bit unique keys
//! assigned by the server"). Storage is immutable after insertion,
//! unlike pixmaps which may be re-added.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Debug, Clone)]
pub struct Palette {
    pub entries: Arc<Vec<u32>>,
}

struct Entry {
    palette: Palette,
    refcount: u64,
}

struct Inner {
    entries: HashMap<u64, Entry>,
}

pub struct PaletteCache {
    inner: Mutex<Inner>,
}

impl PaletteCache {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(Inner {
                entries: HashMap::new(),
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add(&self, id: u64, palette: Palette) {
        let mut inner = self.lock();
        if let Some(entry) = inner.entries.get_mut(&id) {
            entry.refcount += 1;
            return;
        }
        inner.entries.insert(id, Entry { palette, refcount: 1 });
    }

    pub fn get(&self, id: u64) -> Option<Palette> {
        self.lock().entries.get(&id).map(|e| e.palette.clone())
    }

    pub fn remove(&self, id: u64) {
        let mut inner = self.lock();
        let Some(entry) = inner.entries.get_mut(&id) else {
            return;
        };
        entry.refcount = entry.refcount.saturating_sub(1);
        if entry.refcount == 0 {
            inner.entries.remove(&id);
        }
    }

    /// `INVAL_ALL_PALETTES` and `RESET`: clears the whole cache.
    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }
}
