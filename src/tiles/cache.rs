use lru::LruCache;
use std::num::NonZeroUsize;

const DEFAULT_CAPACITY: usize = 512;

/// In-memory tile cache keyed by tile URL, using LRU eviction.
///
/// Keying by URL keeps entries of different providers and styles apart, so a
/// style swap needs no invalidation.
#[derive(Debug)]
pub struct TileCache<V> {
    cache: LruCache<String, V>,
}

impl<V> TileCache<V> {
    /// Create a new tile cache with the given capacity
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);
        Self {
            cache: LruCache::new(capacity),
        }
    }

    /// Get a tile, marking it recently used
    pub fn get(&mut self, url: &str) -> Option<&V> {
        self.cache.get(url)
    }

    /// Insert a tile, evicting the least recently used one when full
    pub fn insert(&mut self, url: String, tile: V) {
        self.cache.put(url, tile);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.cache.contains(url)
    }

    pub fn clear(&mut self) {
        self.cache.clear();
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.cache.cap().get()
    }
}

impl<V> Default for TileCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
