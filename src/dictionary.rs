//! Dictionary: double hashing over two generations with incremental migration.
//!
//! `current` is authoritative; `previous` is drained into it a few slots
//! per operation. A key is live in at most one generation: migrating or
//! overwriting a key that lives in `previous` moves it out and leaves a
//! tombstone behind.

use crate::config::{DictConfig, DEFAULT_CAPACITIES};
use crate::error::DictError;
use crate::hashing::{probe_start, HashPair, SaltedHasher};
use crate::slot_table::SlotTable;
use core::fmt;
use core::hash::Hash;
use core::mem;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Generation {
    Current,
    Previous,
}

pub struct Dictionary<K, V, H = SaltedHasher> {
    current: SlotTable<K, V>,
    previous: SlotTable<K, V>,
    // Total live entries across both generations.
    len: usize,
    // Live entries physically in `current`; drives the resize trigger.
    current_live: usize,
    migration_cursor: usize,
    capacity_index: usize,
    config: DictConfig,
    hashers: H,
}

#[inline]
fn advance(index: usize, step: usize, capacity: usize) -> usize {
    // index, step < capacity <= isize::MAX, so the sum cannot overflow.
    (index + step) % capacity
}

/// Lookup probe: skips tombstones and other keys, stops at the first
/// never-written slot.
fn find_live<K, V, H>(table: &SlotTable<K, V>, hashers: &H, key: &K) -> Option<usize>
where
    K: Eq,
    H: HashPair<K>,
{
    let capacity = table.capacity();
    let (mut index, step) = probe_start(hashers, key, capacity);
    for _ in 0..capacity {
        if !table.is_initialized(index) {
            return None;
        }
        if table.key(index) == Some(key) {
            return Some(index);
        }
        index = advance(index, step, capacity);
    }
    None
}

/// Insert probe: the first slot that is never-written or a tombstone.
fn find_vacant<K, V, H>(table: &SlotTable<K, V>, hashers: &H, key: &K) -> Result<usize, DictError>
where
    H: HashPair<K>,
{
    let capacity = table.capacity();
    let (mut index, step) = probe_start(hashers, key, capacity);
    for _ in 0..capacity {
        if !table.is_initialized(index) || table.is_deleted(index) {
            return Ok(index);
        }
        index = advance(index, step, capacity);
    }
    Err(DictError::ProbeExhausted { capacity })
}

impl<K, V, F1, F2> Dictionary<K, V, (F1, F2)>
where
    K: Eq,
    F1: Fn(&K) -> u64,
    F2: Fn(&K) -> u64,
{
    /// Creates an empty dictionary probing with `hash1` for the home slot and
    /// `hash2` for the stride.
    pub fn new(hash1: F1, hash2: F2) -> Self {
        Self::with_hashers((hash1, hash2))
    }
}

impl<K, V> Default for Dictionary<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::with_hashers(SaltedHasher::default())
    }
}

impl<K, V, H> Dictionary<K, V, H>
where
    K: Eq,
    H: HashPair<K>,
{
    /// Creates an empty dictionary with the default capacity sequence.
    pub fn with_hashers(hashers: H) -> Self {
        Self::from_parts(hashers, DictConfig::default(), DEFAULT_CAPACITIES[0] as usize)
    }

    /// Creates an empty dictionary after validating `config`.
    pub fn with_config(hashers: H, config: DictConfig) -> Result<Self, DictError> {
        config.validate()?;
        let first = usize::try_from(config.capacities[0])
            .ok()
            .filter(|&c| SlotTable::<K, V>::can_allocate(c))
            .ok_or(DictError::InvalidConfig("first capacity cannot be allocated"))?;
        Ok(Self::from_parts(hashers, config, first))
    }

    fn from_parts(hashers: H, config: DictConfig, first: usize) -> Self {
        Self {
            current: SlotTable::new(first),
            previous: SlotTable::new(1),
            len: 0,
            current_live: 0,
            migration_cursor: 0,
            capacity_index: 0,
            config,
            hashers,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Capacity of the current generation.
    pub fn capacity(&self) -> usize {
        self.current.capacity()
    }

    /// Position of the current generation in the capacity sequence.
    pub fn generation(&self) -> usize {
        self.capacity_index
    }

    /// Live entries still waiting in the previous generation.
    pub fn pending_migration(&self) -> usize {
        self.len - self.current_live
    }

    pub fn is_migrating(&self) -> bool {
        self.pending_migration() > 0
    }

    pub fn config(&self) -> &DictConfig {
        &self.config
    }

    /// Inserts or overwrites `key`, returning the value it replaced.
    ///
    /// `Err(CapacityExhausted)` means the entry was stored but the required
    /// resize could not happen.
    pub fn set_item(&mut self, key: K, value: V) -> Result<Option<V>, DictError> {
        self.migrate_step()?;

        if let Some(slot) =
            find_live(&self.current, &self.hashers, &key).and_then(|i| self.current.value_mut(i))
        {
            return Ok(Some(mem::replace(slot, value)));
        }

        let index = find_vacant(&self.current, &self.hashers, &key)?;
        let replaced = find_live(&self.previous, &self.hashers, &key)
            .and_then(|old| self.previous.delete_item(old));
        self.current.set_item(index, key, value);
        self.current_live += 1;
        if replaced.is_none() {
            self.len += 1;
        }

        if self.needs_resize() {
            self.resize()?;
        }
        Ok(replaced.map(|(_, v)| v))
    }

    pub fn get_item(&mut self, key: &K) -> Result<&V, DictError> {
        self.migrate_step()?;
        let (generation, index) = self.locate(key).ok_or(DictError::NotFound)?;
        self.table(generation)
            .value(index)
            .ok_or(DictError::NotFound)
    }

    pub fn get_item_mut(&mut self, key: &K) -> Result<&mut V, DictError> {
        self.migrate_step()?;
        let (generation, index) = self.locate(key).ok_or(DictError::NotFound)?;
        self.table_mut(generation)
            .value_mut(index)
            .ok_or(DictError::NotFound)
    }

    /// Removes `key`, returning its value.
    pub fn delete_item(&mut self, key: &K) -> Result<V, DictError> {
        self.migrate_step()?;
        let (generation, index) = self.locate(key).ok_or(DictError::NotFound)?;
        let (old_key, value) = self
            .table_mut(generation)
            .delete_item(index)
            .ok_or(DictError::NotFound)?;
        self.len -= 1;
        if generation == Generation::Current {
            self.current_live -= 1;
        }
        // Counters are consistent before user drop code runs.
        drop(old_key);
        Ok(value)
    }

    /// Pure lookup across both generations; unlike `get_item` it does not
    /// advance migration, so it cannot fail.
    pub fn contains_key(&self, key: &K) -> bool {
        self.locate(key).is_some()
    }

    fn locate(&self, key: &K) -> Option<(Generation, usize)> {
        if let Some(index) = find_live(&self.current, &self.hashers, key) {
            return Some((Generation::Current, index));
        }
        find_live(&self.previous, &self.hashers, key).map(|index| (Generation::Previous, index))
    }

    fn table(&self, generation: Generation) -> &SlotTable<K, V> {
        match generation {
            Generation::Current => &self.current,
            Generation::Previous => &self.previous,
        }
    }

    fn table_mut(&mut self, generation: Generation) -> &mut SlotTable<K, V> {
        match generation {
            Generation::Current => &mut self.current,
            Generation::Previous => &mut self.previous,
        }
    }

    fn needs_resize(&self) -> bool {
        (self.current.capacity() as u64) / self.config.load_divisor < self.current_live as u64
    }

    fn migrate_step(&mut self) -> Result<(), DictError> {
        let end = self
            .previous
            .capacity()
            .min(self.migration_cursor.saturating_add(self.config.migration_batch));
        self.migrate_until(end)
    }

    /// Moves every live entry in `previous[cursor..end]` into `current`.
    fn migrate_until(&mut self, end: usize) -> Result<(), DictError> {
        if self.migration_cursor >= end {
            return Ok(());
        }
        let start = self.migration_cursor;
        let mut moved = 0usize;
        while self.migration_cursor < end {
            let from = self.migration_cursor;
            if self.previous.is_initialized(from) {
                if let Some(key) = self.previous.key(from) {
                    let to = find_vacant(&self.current, &self.hashers, key)?;
                    if let Some((key, value)) = self.previous.delete_item(from) {
                        self.current.set_item(to, key, value);
                        self.current_live += 1;
                        moved += 1;
                    }
                }
            }
            self.migration_cursor += 1;
        }
        if moved > 0 {
            tracing::trace!(start, end, moved, "migrated previous-generation slots");
        }
        if end == self.previous.capacity() && self.previous.capacity() > 1 {
            tracing::debug!(
                capacity = self.previous.capacity(),
                live = self.len,
                "previous generation drained"
            );
        }
        Ok(())
    }

    /// Promotes `current` to `previous` and allocates the next generation.
    fn resize(&mut self) -> Result<(), DictError> {
        let from = self.current.capacity();
        let next_index = self.capacity_index + 1;
        let to = self
            .config
            .capacities
            .get(next_index)
            .and_then(|&c| usize::try_from(c).ok())
            .filter(|&c| SlotTable::<K, V>::can_allocate(c))
            .ok_or(DictError::CapacityExhausted {
                capacity: from as u64,
            })?;

        if self.is_migrating() {
            tracing::warn!(
                pending = self.pending_migration(),
                cursor = self.migration_cursor,
                "resize before migration finished; draining previous generation"
            );
            self.migrate_until(self.previous.capacity())?;
        }

        let promoted = mem::replace(&mut self.current, SlotTable::new(to));
        let retired = mem::replace(&mut self.previous, promoted);
        drop(retired);
        self.capacity_index = next_index;
        self.migration_cursor = 0;
        self.current_live = 0;

        tracing::debug!(
            from,
            to,
            live = self.len,
            generation = self.capacity_index,
            "dictionary resized"
        );
        Ok(())
    }

    /// Recounts both generations and checks the bookkeeping against them.
    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        let live_in = |t: &SlotTable<K, V>| -> Vec<usize> {
            (0..t.capacity())
                .filter(|&i| t.is_initialized(i) && !t.is_deleted(i))
                .collect()
        };
        let current = live_in(&self.current);
        let previous = live_in(&self.previous);
        assert_eq!(current.len(), self.current_live, "current_live out of sync");
        assert_eq!(current.len() + previous.len(), self.len, "len out of sync");
        for i in previous {
            assert!(i >= self.migration_cursor, "live entry behind the cursor");
            let key = self.previous.key(i).expect("live slot has a key");
            assert!(
                find_live(&self.current, &self.hashers, key).is_none(),
                "key live in both generations"
            );
        }
        for i in current {
            let key = self.current.key(i).expect("live slot has a key");
            assert_eq!(find_live(&self.current, &self.hashers, key), Some(i));
        }
    }
}

impl<K, V, H> fmt::Debug for Dictionary<K, V, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dictionary")
            .field("len", &self.len)
            .field("capacity", &self.current.capacity())
            .field("generation", &self.capacity_index)
            .field("pending_migration", &(self.len - self.current_live))
            .field("migration_cursor", &self.migration_cursor)
            .finish()
    }
}
