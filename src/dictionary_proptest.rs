#![cfg(test)]

// Property tests for Dictionary kept inside the crate so they can check the
// generation bookkeeping, not just the public answers.

use crate::config::DictConfig;
use crate::dictionary::Dictionary;
use crate::error::DictError;
use crate::hashing::{HashPair, SaltedHasher};
use proptest::prelude::*;
use proptest::test_runner::TestCaseError;
use std::collections::HashMap;

// Pool-indexed operations so shrinking moves toward earlier keys.
#[derive(Clone, Debug)]
enum OpI {
    Set(usize, i32),
    Get(usize),
    GetMut(usize, i32),
    Delete(usize),
    Contains(usize),
}

fn arb_scenario() -> impl Strategy<Value = (Vec<u16>, Vec<OpI>)> {
    proptest::collection::vec(any::<u16>(), 1..=40).prop_flat_map(|pool| {
        let idxs: Vec<usize> = (0..pool.len()).collect();
        let idx = proptest::sample::select(idxs);
        let op = prop_oneof![
            3 => (idx.clone(), any::<i32>()).prop_map(|(i, v)| OpI::Set(i, v)),
            2 => idx.clone().prop_map(OpI::Get),
            1 => (idx.clone(), any::<i32>()).prop_map(|(i, d)| OpI::GetMut(i, d)),
            2 => idx.clone().prop_map(OpI::Delete),
            1 => idx.clone().prop_map(OpI::Contains),
        ];
        proptest::collection::vec(op, 1..150).prop_map(move |ops| (pool.clone(), ops))
    })
}

// Small primes and a small batch so scenarios cross several generations and
// keep migrations in flight.
fn small_config() -> DictConfig {
    DictConfig::default()
        .capacities(vec![7, 71, 719, 7_193])
        .load_divisor(2)
        .migration_batch(3)
}

fn run_against_model<H>(hashers: H, pool: &[u16], ops: Vec<OpI>) -> Result<(), TestCaseError>
where
    H: HashPair<u16>,
{
    let mut sut: Dictionary<u16, i32, H> =
        Dictionary::with_config(hashers, small_config()).expect("valid config");
    let mut model: HashMap<u16, i32> = HashMap::new();

    for op in ops {
        match op {
            OpI::Set(i, v) => {
                let k = pool[i];
                let prev = sut.set_item(k, v).expect("no capacity limits in range");
                prop_assert_eq!(prev, model.insert(k, v));
            }
            OpI::Get(i) => {
                let k = pool[i];
                match model.get(&k) {
                    Some(v) => {
                        prop_assert_eq!(sut.get_item(&k), Ok(v));
                    }
                    None => {
                        prop_assert_eq!(sut.get_item(&k), Err(DictError::NotFound));
                    }
                }
            }
            OpI::GetMut(i, d) => {
                let k = pool[i];
                match (sut.get_item_mut(&k), model.get_mut(&k)) {
                    (Ok(v), Some(mv)) => {
                        *v = v.wrapping_add(d);
                        *mv = mv.wrapping_add(d);
                    }
                    (Err(DictError::NotFound), None) => {}
                    (got, want) => {
                        prop_assert!(false, "get_item_mut {:?} vs model {:?}", got, want);
                    }
                }
            }
            OpI::Delete(i) => {
                let k = pool[i];
                match model.remove(&k) {
                    Some(v) => {
                        prop_assert_eq!(sut.delete_item(&k), Ok(v));
                    }
                    None => {
                        prop_assert_eq!(sut.delete_item(&k), Err(DictError::NotFound));
                    }
                }
            }
            OpI::Contains(i) => {
                let k = pool[i];
                prop_assert_eq!(sut.contains_key(&k), model.contains_key(&k));
            }
        }

        // Post-conditions after each op
        sut.check_invariants();
        prop_assert_eq!(sut.len(), model.len());
        prop_assert_eq!(sut.is_empty(), model.is_empty());
        prop_assert!(sut.pending_migration() <= sut.len());
    }

    // Every surviving key is still reachable once migration has settled.
    for (k, v) in &model {
        prop_assert_eq!(sut.get_item(k), Ok(v));
    }
    Ok(())
}

// Property: state-machine equivalence against std::collections::HashMap.
// - set_item returns the replaced value exactly when the model has one.
// - get/delete report NotFound iff the model lacks the key.
// - Deleted keys never reappear, across resizes and migrations.
// - len/current_live bookkeeping matches a full recount of both generations.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine((pool, ops) in arb_scenario()) {
        run_against_model(<SaltedHasher>::default(), &pool, ops)?;
    }
}

// Property: same invariants with every key on one probe chain, so lookups
// walk long runs of live slots and tombstones.
proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]
    #[test]
    fn prop_state_machine_with_collisions((pool, ops) in arb_scenario()) {
        let hashers = (|_: &u16| 0u64, |_: &u16| 1u64);
        run_against_model(hashers, &pool, ops)?;
    }
}
