//! LazyInitTracker: constant-time "has this slot ever been written" flags.
//!
//! The tracker keeps two index arrays of the table's capacity and a fill
//! counter. Slot `i` counts as initialized iff
//! `slot_to_order[i] < filled && order_to_slot[slot_to_order[i]] == i`.
//! Neither array has to hold meaningful values for untouched slots: the
//! check only trusts entries that were written through `initialize`.
//!
//! The arrays come from a zeroed allocation, which the allocator serves
//! from `alloc_zeroed` and the OS commits lazily, so construction does not
//! walk the storage. The zeros themselves carry no meaning here.

/// Tracks which slots of a fixed-capacity array have been written.
#[derive(Debug)]
pub struct LazyInitTracker {
    slot_to_order: Box<[usize]>,
    order_to_slot: Box<[usize]>,
    filled: usize,
}

impl LazyInitTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            slot_to_order: vec![0; capacity].into_boxed_slice(),
            order_to_slot: vec![0; capacity].into_boxed_slice(),
            filled: 0,
        }
    }

    /// Number of distinct slots initialized so far.
    #[inline]
    pub fn filled(&self) -> usize {
        self.filled
    }

    /// Panics if `index >= capacity`.
    #[inline]
    pub fn is_initialized(&self, index: usize) -> bool {
        let order = self.slot_to_order[index];
        order < self.filled && self.order_to_slot[order] == index
    }

    /// Marks `index` as initialized. Returns `true` if this call was the
    /// first to do so; repeated calls are no-ops.
    ///
    /// Panics if `index >= capacity`.
    pub fn initialize(&mut self, index: usize) -> bool {
        if self.is_initialized(index) {
            return false;
        }
        // `filled < capacity` holds here: every order below `filled` maps to
        // a distinct slot, and `index` is not one of them.
        self.slot_to_order[index] = self.filled;
        self.order_to_slot[self.filled] = index;
        self.filled += 1;
        true
    }

    /// Initialized slots in the order they were first written.
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.order_to_slot[..self.filled].iter().copied()
    }
}
