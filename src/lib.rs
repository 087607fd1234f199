//! lazy-dict: an open-addressed dictionary with double hashing,
//! incremental rehashing, and storage that is never zeroed up front.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a dictionary whose resize cost is spread over later operations
//!   and whose tables cost nothing to create beyond the allocation.
//! - Layers:
//!   - LazyInitTracker: answers "was slot i ever written" in O(1) with two
//!     index arrays and a fill counter; no per-slot flag initialization.
//!   - SlotTable<K, V>: fixed-capacity `MaybeUninit` storage plus a
//!     tracker; initialized slots are live or tombstoned.
//!   - Dictionary<K, V, H>: public API. Holds a `current` and a `previous`
//!     SlotTable, probes with double hashing, and drains `previous` into
//!     `current` a batch of slots per operation.
//!
//! Constraints
//! - Single-threaded: no interior synchronization; `&mut self` on every
//!   operation that can migrate.
//! - No per-entry heap allocations beyond the tables themselves.
//! - Capacities come from a fixed, increasing sequence of primes (each
//!   about 10x the last); running off its end is a reported error.
//! - Callers supply the two hash functions (`HashPair`), or use
//!   `SaltedHasher` over any `BuildHasher`.
//!
//! Probing
//! - Home slot is `primary(k) % capacity`, stride is
//!   `secondary(k) % capacity` (zero becomes one). With a prime capacity
//!   every stride visits every slot.
//! - Lookups and deletes skip tombstones and other keys and stop at the
//!   first never-written slot. Inserts take the first never-written or
//!   tombstoned slot.
//!
//! Generations and migration
//! - Every `set_item`/`get_item`/`delete_item` first scans up to
//!   `migration_batch` slots of `previous` from the migration cursor and
//!   moves live entries into `current`, leaving tombstones behind.
//!   Tombstoned entries are never migrated.
//! - A key is live in at most one generation. Overwriting a key that still
//!   lives in `previous` moves it out of `previous`.
//! - `current` resizes once its own live count exceeds
//!   `capacity / load_divisor`. If `previous` still holds live entries at
//!   that point it is drained completely before being retired.
//!
//! Unsafe
//! - Confined to `slot_table`: reads and drops of `MaybeUninit` slots are
//!   gated on the tracker, and table drop visits exactly the written slots.

pub mod config;
mod dictionary;
mod dictionary_proptest;
pub mod error;
pub mod hashing;
mod lazy_init;
mod slot_table;

// Public surface
pub use config::DictConfig;
pub use dictionary::Dictionary;
pub use error::DictError;
pub use hashing::{HashPair, SaltedHasher};
