//! SlotTable: fixed-capacity open-addressing storage with tombstones.
//!
//! Slots are `MaybeUninit` and stay untouched until first written; the
//! embedded [`LazyInitTracker`] is the only authority on which slots may be
//! read or dropped. An initialized slot is either live (`Some(entry)`) or a
//! tombstone (`None`). Deleting moves the pair out and leaves the tombstone
//! behind so probe chains running through the slot stay intact.
//!
//! All `unsafe` in the crate lives in this module.

use crate::lazy_init::LazyInitTracker;
use core::alloc::Layout;
use core::mem::{self, MaybeUninit};

#[derive(Debug)]
struct Entry<K, V> {
    key: K,
    value: V,
}

// `None` is a tombstone.
type Slot<K, V> = Option<Entry<K, V>>;

pub struct SlotTable<K, V> {
    slots: Box<[MaybeUninit<Slot<K, V>>]>,
    tracker: LazyInitTracker,
}

fn uninit_slice<T>(len: usize) -> Box<[MaybeUninit<T>]> {
    let mut v: Vec<MaybeUninit<T>> = Vec::with_capacity(len);
    // SAFETY: `MaybeUninit<T>` has no validity requirement, and the
    // capacity was reserved just above.
    unsafe { v.set_len(len) };
    v.into_boxed_slice()
}

impl<K, V> SlotTable<K, V> {
    /// Allocates `capacity` slots without initializing any of them.
    ///
    /// Panics on the same conditions as `Vec::with_capacity`; callers that
    /// must not panic check [`SlotTable::can_allocate`] first.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: uninit_slice(capacity),
            tracker: LazyInitTracker::new(capacity),
        }
    }

    /// Whether a table of `capacity` slots has a representable layout.
    pub fn can_allocate(capacity: usize) -> bool {
        capacity > 0
            && Layout::array::<MaybeUninit<Slot<K, V>>>(capacity).is_ok()
            && Layout::array::<usize>(capacity).is_ok()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_initialized(&self, index: usize) -> bool {
        self.tracker.is_initialized(index)
    }

    /// Panics if the slot was never initialized.
    #[inline]
    pub fn is_deleted(&self, index: usize) -> bool {
        self.slot(index).is_none()
    }

    /// Key of a live slot; `None` for a tombstone.
    #[inline]
    pub fn key(&self, index: usize) -> Option<&K> {
        self.slot(index).as_ref().map(|e| &e.key)
    }

    /// Value of a live slot; `None` for a tombstone.
    #[inline]
    pub fn value(&self, index: usize) -> Option<&V> {
        self.slot(index).as_ref().map(|e| &e.value)
    }

    #[inline]
    pub fn value_mut(&mut self, index: usize) -> Option<&mut V> {
        self.slot_mut(index).as_mut().map(|e| &mut e.value)
    }

    /// Writes a live entry at `index`, clearing any tombstone. Whatever the
    /// slot held before is dropped after the new entry is in place.
    pub fn set_item(&mut self, index: usize, key: K, value: V) {
        let entry = Some(Entry { key, value });
        if self.tracker.is_initialized(index) {
            let old = mem::replace(self.slot_mut(index), entry);
            drop(old);
        } else {
            self.slots[index].write(entry);
            self.tracker.initialize(index);
        }
    }

    /// Tombstones `index` and hands back the pair it held, if it was live.
    ///
    /// Panics if the slot was never initialized.
    pub fn delete_item(&mut self, index: usize) -> Option<(K, V)> {
        self.slot_mut(index).take().map(|e| (e.key, e.value))
    }

    /// Number of slots ever written (live plus tombstones).
    pub fn touched(&self) -> usize {
        self.tracker.filled()
    }

    fn slot(&self, index: usize) -> &Slot<K, V> {
        assert!(
            self.tracker.is_initialized(index),
            "slot {index} read before initialization"
        );
        // SAFETY: the tracker only reports slots written by `set_item`.
        unsafe { self.slots[index].assume_init_ref() }
    }

    fn slot_mut(&mut self, index: usize) -> &mut Slot<K, V> {
        assert!(
            self.tracker.is_initialized(index),
            "slot {index} read before initialization"
        );
        // SAFETY: as in `slot`.
        unsafe { self.slots[index].assume_init_mut() }
    }
}

impl<K, V> Drop for SlotTable<K, V> {
    fn drop(&mut self) {
        for index in self.tracker.iter() {
            // SAFETY: each initialized slot appears exactly once in the
            // tracker's order and holds a value written by `set_item`.
            unsafe { self.slots[index].assume_init_drop() };
        }
    }
}

impl<K, V> core::fmt::Debug for SlotTable<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SlotTable")
            .field("capacity", &self.capacity())
            .field("touched", &self.touched())
            .finish()
    }
}
