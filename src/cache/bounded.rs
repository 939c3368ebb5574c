//! Bounded in-memory LRU cache
//!
//! Entries live in a slot arena with intrusive prev/next links forming the
//! recency list (most recently used at the head, least at the tail), plus a
//! hash index from key to slot. Both `get` and `set` are a hash lookup and a
//! constant-time relink. The arena never grows past the capacity: once full,
//! inserting a new key reuses the tail slot.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use super::{Cache, CacheError};

/// A single cached entry and its position in the recency list
struct Slot<V> {
    key: String,
    value: V,
    /// Neighbour closer to the head (more recently used)
    prev: Option<usize>,
    /// Neighbour closer to the tail (less recently used)
    next: Option<usize>,
}

/// Unsynchronized LRU state. Every access goes through the mutex in
/// [`BoundedCache`], which guards the index and the list together.
struct Lru<V> {
    capacity: usize,
    index: HashMap<String, usize>,
    slots: Vec<Slot<V>>,
    head: Option<usize>,
    tail: Option<usize>,
}

impl<V> Lru<V> {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            head: None,
            tail: None,
        }
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    /// Unlinks a slot from the recency list, leaving it dangling
    fn detach(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);

        match prev {
            Some(p) => self.slots[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.slots[n].prev = prev,
            None => self.tail = prev,
        }

        self.slots[idx].prev = None;
        self.slots[idx].next = None;
    }

    /// Links a detached slot in at the head
    fn push_front(&mut self, idx: usize) {
        self.slots[idx].prev = None;
        self.slots[idx].next = self.head;

        match self.head {
            Some(h) => self.slots[h].prev = Some(idx),
            None => self.tail = Some(idx),
        }
        self.head = Some(idx);
    }

    fn promote(&mut self, idx: usize) {
        if self.head != Some(idx) {
            self.detach(idx);
            self.push_front(idx);
        }
    }

    fn get(&mut self, key: &str) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.promote(idx);
        Some(&self.slots[idx].value)
    }

    /// Inserts or updates `key`. Returns the key that was evicted to make
    /// room, if any.
    fn set(&mut self, key: &str, value: V) -> Option<String> {
        if let Some(&idx) = self.index.get(key) {
            self.slots[idx].value = value;
            self.promote(idx);
            return None;
        }

        if self.slots.len() < self.capacity {
            let idx = self.slots.len();
            self.slots.push(Slot {
                key: key.to_owned(),
                value,
                prev: None,
                next: None,
            });
            self.index.insert(key.to_owned(), idx);
            self.push_front(idx);
            return None;
        }

        // Full: the tail slot is taken over by the new entry
        let idx = self.tail?;
        self.detach(idx);

        let evicted = std::mem::replace(&mut self.slots[idx].key, key.to_owned());
        self.slots[idx].value = value;
        self.index.remove(&evicted);
        self.index.insert(key.to_owned(), idx);
        self.push_front(idx);

        Some(evicted)
    }
}

/// Fixed-capacity, thread-safe key-value store with least-recently-used
/// eviction.
///
/// `get` promotes the entry it returns, so it needs the same exclusive lock
/// as `set`. There is no peek and no explicit removal; entries leave only by
/// eviction.
pub struct BoundedCache<V> {
    capacity: usize,
    inner: Mutex<Lru<V>>,
}

impl<V> BoundedCache<V> {
    /// Creates an empty cache holding at most `capacity` entries
    ///
    /// # Returns
    /// * `Ok(BoundedCache)` for any capacity of at least one
    /// * `Err(CacheError::InvalidCapacity)` for zero
    pub fn new(capacity: usize) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::InvalidCapacity(capacity));
        }

        Ok(Self {
            capacity,
            inner: Mutex::new(Lru::new(capacity)),
        })
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of entries currently stored
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> BoundedCache<V> {
    /// Returns a copy of the value for `key` and marks it most recently used
    pub fn get(&self, key: &str) -> Result<V, CacheError> {
        let mut lru = self.inner.lock();
        lru.get(key).cloned().ok_or(CacheError::NotFound)
    }

    /// Inserts or replaces the value for `key`, marking it most recently
    /// used. Inserting a new key into a full cache evicts the least recently
    /// used entry in the same critical section.
    pub fn set(&self, key: &str, value: V) -> Result<(), CacheError> {
        let evicted = self.inner.lock().set(key, value);

        if let Some(evicted) = evicted {
            debug!(evicted = %evicted, inserted = key, "evicted least recently used entry");
        }

        Ok(())
    }
}

impl<V> fmt::Debug for BoundedCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundedCache")
            .field("capacity", &self.capacity)
            .field("len", &self.len())
            .finish()
    }
}

#[async_trait]
impl<V> Cache<V> for BoundedCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Result<V, CacheError> {
        BoundedCache::get(self, key)
    }

    async fn set(&self, key: &str, value: V) -> Result<(), CacheError> {
        BoundedCache::set(self, key, value)
    }
}
