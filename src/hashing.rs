//! Hash capability: the two hash functions driving double hashing.
//!
//! `primary` picks the home slot, `secondary` the probe stride. Both must be
//! deterministic and must not panic. The stride is reduced modulo the
//! capacity before use; a stride that reduces to zero is replaced by one.

use core::hash::{BuildHasher, Hash, Hasher};
use hashbrown::hash_map::DefaultHashBuilder;

/// A pair of hash functions over `K`.
pub trait HashPair<K: ?Sized> {
    fn primary(&self, key: &K) -> u64;
    fn secondary(&self, key: &K) -> u64;
}

impl<K: ?Sized, F1, F2> HashPair<K> for (F1, F2)
where
    F1: Fn(&K) -> u64,
    F2: Fn(&K) -> u64,
{
    #[inline]
    fn primary(&self, key: &K) -> u64 {
        (self.0)(key)
    }

    #[inline]
    fn secondary(&self, key: &K) -> u64 {
        (self.1)(key)
    }
}

const SECONDARY_SALT: u64 = 0x9e37_79b9_7f4a_7c15;

/// Derives both hashes from one [`BuildHasher`]; the secondary hash salts
/// the hasher state before feeding the key.
#[derive(Clone, Debug, Default)]
pub struct SaltedHasher<S = DefaultHashBuilder> {
    build: S,
}

impl<S> SaltedHasher<S> {
    pub fn new(build: S) -> Self {
        Self { build }
    }
}

impl<K, S> HashPair<K> for SaltedHasher<S>
where
    K: ?Sized + Hash,
    S: BuildHasher,
{
    fn primary(&self, key: &K) -> u64 {
        let mut h = self.build.build_hasher();
        key.hash(&mut h);
        h.finish()
    }

    fn secondary(&self, key: &K) -> u64 {
        let mut h = self.build.build_hasher();
        h.write_u64(SECONDARY_SALT);
        key.hash(&mut h);
        h.finish()
    }
}

/// Home slot and stride for `key` in a table of `capacity` slots.
#[inline]
pub(crate) fn probe_start<K, H>(hashers: &H, key: &K, capacity: usize) -> (usize, usize)
where
    K: ?Sized,
    H: HashPair<K> + ?Sized,
{
    let cap = capacity as u64;
    let base = hashers.primary(key) % cap;
    let step = match hashers.secondary(key) % cap {
        0 => 1,
        s => s,
    };
    (base as usize, step as usize)
}
