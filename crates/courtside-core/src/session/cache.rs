use lru::LruCache;
use std::num::NonZeroUsize;

/// Exact-input reply cache with least-recently-used eviction.
///
/// The first reply stored for an input is kept; later inserts for the same
/// key are ignored. A capacity of zero disables the cache.
pub struct ResponseCache {
    entries: Option<LruCache<String, String>>,
}

impl ResponseCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: NonZeroUsize::new(capacity).map(LruCache::new),
        }
    }

    pub fn disabled() -> Self {
        Self { entries: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.entries.is_some()
    }

    /// Look up a reply, marking it most recently used.
    pub fn get(&mut self, input: &str) -> Option<String> {
        self.entries.as_mut()?.get(input).cloned()
    }

    pub fn insert(&mut self, input: impl Into<String>, reply: impl Into<String>) {
        let Some(entries) = self.entries.as_mut() else {
            return;
        };
        let input = input.into();
        if entries.contains(&input) {
            return;
        }
        if let Some((evicted, _)) = entries.push(input, reply.into()) {
            tracing::debug!("Response cache full, evicted {:?}", evicted);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.as_ref().map_or(0, |e| e.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.entries.as_ref().map_or(0, |e| e.cap().get())
    }

    pub fn clear(&mut self) {
        if let Some(entries) = self.entries.as_mut() {
            entries.clear();
        }
    }
}
