use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use tracing::debug;

/// Where the data of a slot came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provenance {
    /// Written by a server read.
    Authoritative,
    /// Locally transformed and not yet confirmed by the server.
    Optimistic,
    /// A change was attempted against this slot; the data must be re-read.
    Invalidated,
}

/// One cached snapshot. Snapshots are immutable, changes swap the whole `Arc`.
#[derive(Debug)]
pub struct CacheEntry<T> {
    snapshot: Arc<T>,
    provenance: Provenance,
    revision: u64,
}

impl<T> Clone for CacheEntry<T> {
    fn clone(&self) -> Self {
        Self {
            snapshot: self.snapshot.clone(),
            provenance: self.provenance,
            revision: self.revision,
        }
    }
}

impl<T> CacheEntry<T> {
    pub fn snapshot(&self) -> &Arc<T> {
        &self.snapshot
    }

    pub fn provenance(&self) -> Provenance {
        self.provenance
    }

    /// Cache-wide counter value of the change that produced this entry.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn needs_confirmation(&self) -> bool {
        self.provenance != Provenance::Authoritative
    }
}

/// Result of [`ClientCache::mutate`]: the restore point and the revision of the new entry.
#[derive(Debug, Clone)]
pub struct Mutation<T> {
    pub previous: CacheEntry<T>,
    pub revision: u64,
}

struct Slots<K, T> {
    entries: HashMap<K, CacheEntry<T>>,
    next_revision: u64,
}

impl<K, T> Slots<K, T>
where
    K: Eq + Hash,
{
    fn put(&mut self, key: K, snapshot: Arc<T>, provenance: Provenance) -> u64 {
        self.next_revision += 1;
        let revision = self.next_revision;
        self.entries.insert(
            key,
            CacheEntry {
                snapshot,
                provenance,
                revision,
            },
        );
        revision
    }
}

/// Keyed store of the last fetched collection per query key.
///
/// Every operation swaps a complete snapshot under the lock, so readers never
/// observe a half-applied change. The lock is never held across an await.
pub struct ClientCache<K, T> {
    slots: Mutex<Slots<K, T>>,
}

impl<K, T> Default for ClientCache<K, T>
where
    K: Eq + Hash + Clone + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, T> ClientCache<K, T>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new() -> Self {
        Self {
            slots: Mutex::new(Slots {
                entries: HashMap::new(),
                next_revision: 0,
            }),
        }
    }

    pub fn read(&self, key: &K) -> Option<Arc<T>> {
        self.slots
            .lock()
            .entries
            .get(key)
            .map(|entry| entry.snapshot.clone())
    }

    pub fn entry(&self, key: &K) -> Option<CacheEntry<T>> {
        self.slots.lock().entries.get(key).cloned()
    }

    /// Unconditional replace with server data. Returns the stored snapshot.
    pub fn write(&self, key: K, snapshot: T) -> Arc<T> {
        let snapshot = Arc::new(snapshot);
        let mut slots = self.slots.lock();
        debug!(key = ?key, "cache write");
        slots.put(key, snapshot.clone(), Provenance::Authoritative);
        snapshot
    }

    /// Replaces the slot with `updater(current)`; `None` when the slot is empty.
    ///
    /// `updater` runs under the cache lock and must not touch the cache.
    pub fn mutate<F>(&self, key: &K, updater: F) -> Option<Mutation<T>>
    where
        F: FnOnce(&T) -> T,
    {
        let mut slots = self.slots.lock();
        let previous = slots.entries.get(key)?.clone();
        let next = updater(previous.snapshot.as_ref());
        let revision = slots.put(key.clone(), Arc::new(next), Provenance::Optimistic);
        Some(Mutation { previous, revision })
    }

    /// Reinstates a restore point verbatim.
    pub fn restore(&self, key: &K, previous: CacheEntry<T>) -> u64 {
        let mut slots = self.slots.lock();
        debug!(key = ?key, revision = previous.revision, "cache restore");
        slots.put(key.clone(), previous.snapshot, previous.provenance)
    }

    /// Like [`restore`](Self::restore), but only while the slot is still at `expected_revision`.
    pub fn restore_if_unchanged(
        &self,
        key: &K,
        expected_revision: u64,
        previous: CacheEntry<T>,
    ) -> bool {
        let mut slots = self.slots.lock();
        let current = slots.entries.get(key).map(|entry| entry.revision);
        if current != Some(expected_revision) {
            return false;
        }
        debug!(key = ?key, revision = previous.revision, "cache restore");
        slots.put(key.clone(), previous.snapshot, previous.provenance);
        true
    }

    /// Flags the slot as needing a fresh server read; data stays readable.
    pub fn invalidate(&self, key: &K) -> bool {
        let mut slots = self.slots.lock();
        match slots.entries.get(key).cloned() {
            Some(entry) => {
                slots.put(key.clone(), entry.snapshot, Provenance::Invalidated);
                true
            }
            None => false,
        }
    }

    pub fn remove(&self, key: &K) -> Option<CacheEntry<T>> {
        self.slots.lock().entries.remove(key)
    }

    pub fn len(&self) -> usize {
        self.slots.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
