// Dictionary integration suite (public API only).
//
// Each test documents what behavior is being verified and which
// invariants are assumed or asserted. The core invariants exercised:
// - Round-trip: a set key reads back its latest value until deleted.
// - Deletion: a deleted key reports NotFound until it is set again.
// - Growth: crossing capacity/10 live entries moves to the next capacity
//   exactly once, and every key survives the move.
// - Migration: the previous generation drains within a bounded number of
//   operations and nothing deleted comes back.
use lazy_dict::{DictConfig, DictError, Dictionary, SaltedHasher};
use std::collections::hash_map::RandomState;

fn identity(k: &u64) -> u64 {
    *k
}

fn unit_step(_: &u64) -> u64 {
    1
}

// Test: concrete growth scenario.
// Assumes: capacities start at 337, 3371; hash1(k) = k, hash2(k) = 1.
// Verifies: 33 live entries stay in 337, the 34th triggers one resize,
// keys 1..=40 all read back, key 5 in particular.
#[test]
fn resize_at_337_over_10() {
    let mut d = Dictionary::new(identity, unit_step);
    for k in 1..=33u64 {
        d.set_item(k, k * 100).unwrap();
    }
    assert_eq!(d.capacity(), 337);
    assert_eq!(d.generation(), 0);

    d.set_item(34, 3400).unwrap();
    assert_eq!(d.capacity(), 3371);
    assert_eq!(d.generation(), 1);

    for k in 35..=40u64 {
        d.set_item(k, k * 100).unwrap();
    }
    assert_eq!(d.generation(), 1, "no second resize below 3371/10");
    assert_eq!(d.get_item(&5), Ok(&500));
    for k in 1..=40u64 {
        assert_eq!(d.get_item(&k), Ok(&(k * 100)));
    }
    assert_eq!(d.len(), 40);
}

// Test: round-trip and overwrite.
// Assumes: set_item is an upsert.
// Verifies: the second set returns the first value, reads see the second,
// and len counts the key once.
#[test]
fn overwrite_returns_previous_value() {
    let mut d = Dictionary::new(identity, unit_step);
    assert_eq!(d.set_item(9, "v1"), Ok(None));
    assert_eq!(d.set_item(9, "v2"), Ok(Some("v1")));
    assert_eq!(d.get_item(&9), Ok(&"v2"));
    assert_eq!(d.len(), 1);
}

// Test: overwrite survives a generation change.
// Assumes: the key was written before a resize and overwritten after.
// Verifies: migration never brings back the stale value.
#[test]
fn overwrite_across_resize() {
    let mut d = Dictionary::new(identity, unit_step);
    for k in 0..34u64 {
        d.set_item(k, 0).unwrap();
    }
    assert_eq!(d.generation(), 1);
    for k in 0..34u64 {
        assert_eq!(d.set_item(k, k + 1), Ok(Some(0)));
    }
    for k in 0..34u64 {
        assert_eq!(d.get_item(&k), Ok(&(k + 1)));
    }
    assert_eq!(d.len(), 34);
}

// Test: delete then lookup.
// Verifies: delete returns the value; later get/delete report NotFound;
// setting again makes the key visible.
#[test]
fn delete_then_lookup() {
    let mut d = Dictionary::new(identity, unit_step);
    d.set_item(3, 30).unwrap();
    assert_eq!(d.delete_item(&3), Ok(30));
    for _ in 0..5 {
        assert_eq!(d.get_item(&3), Err(DictError::NotFound));
    }
    assert_eq!(d.delete_item(&3), Err(DictError::NotFound));
    assert!(d.is_empty());

    d.set_item(3, 31).unwrap();
    assert_eq!(d.get_item(&3), Ok(&31));
}

// Test: deleting an absent key.
// Verifies: NotFound on an empty dictionary.
#[test]
fn delete_absent_key_on_empty() {
    let mut d: Dictionary<u64, u64, _> = Dictionary::new(identity, unit_step);
    assert_eq!(d.delete_item(&999), Err(DictError::NotFound));
    assert_eq!(d.get_item(&999), Err(DictError::NotFound));
    assert_eq!(d.len(), 0);
}

// Test: deletes spread over both generations.
// Assumes: a resize just happened, so half the keys are still in previous.
// Verifies: deleted keys stay gone once migration finishes; survivors are
// all readable and len is exact.
#[test]
fn deletes_during_migration_are_permanent() {
    let mut d = Dictionary::new(identity, unit_step);
    for k in 0..34u64 {
        d.set_item(k, k).unwrap();
    }
    assert!(d.is_migrating());
    for k in (0..34u64).step_by(2) {
        assert_eq!(d.delete_item(&k), Ok(k));
    }
    while d.is_migrating() {
        let _ = d.get_item(&1);
    }
    for k in 0..34u64 {
        if k % 2 == 0 {
            assert_eq!(d.get_item(&k), Err(DictError::NotFound));
        } else {
            assert_eq!(d.get_item(&k), Ok(&k));
        }
    }
    assert_eq!(d.len(), 17);
}

// Test: migration completeness.
// Assumes: default batch of 20 slots per operation.
// Verifies: ceil(337 / 20) operations after the resize drain the previous
// generation.
#[test]
fn migration_drains_in_bounded_steps() {
    let mut d = Dictionary::new(identity, unit_step);
    for k in 0..34u64 {
        d.set_item(k, k).unwrap();
    }
    assert_eq!(d.pending_migration(), 34);
    for _ in 0..17 {
        let _ = d.get_item(&0);
    }
    assert_eq!(d.pending_migration(), 0);
    assert!(!d.is_migrating());
}

// Test: several generations with a hashed key type.
// Verifies: thousands of string keys survive three resizes; a probe never
// spins even with a std RandomState behind SaltedHasher.
#[test]
fn many_string_keys_through_several_generations() {
    let hasher = SaltedHasher::new(RandomState::new());
    let mut d: Dictionary<String, u32, _> = Dictionary::with_hashers(hasher);
    for i in 0..5_000u32 {
        d.set_item(format!("key-{i}"), i).unwrap();
    }
    assert_eq!(d.generation(), 3);
    assert_eq!(d.capacity(), 337_153);
    for i in (0..5_000u32).rev() {
        assert_eq!(d.get_item(&format!("key-{i}")), Ok(&i));
    }
    for i in 0..2_500u32 {
        assert_eq!(d.delete_item(&format!("key-{i}")), Ok(i));
    }
    assert_eq!(d.len(), 2_500);
    assert!(!d.contains_key(&"key-0".to_string()));
    assert!(d.contains_key(&"key-4999".to_string()));
}

// Test: configuration validation.
// Verifies: with_config rejects invalid sequences and a first capacity that
// cannot be allocated, and accepts a custom one.
#[test]
fn config_is_validated() {
    let bad = DictConfig::default().capacities(vec![13, 11]);
    assert!(matches!(
        Dictionary::<u64, u64, _>::with_config((identity, unit_step), bad),
        Err(DictError::InvalidConfig(_))
    ));

    // A sequence can be well-formed yet unallocatable for the entry type.
    let huge = DictConfig::default().capacities(vec![u64::MAX]);
    assert_eq!(huge.validate(), Ok(()));
    assert_eq!(
        Dictionary::<u64, u64, _>::with_config((identity, unit_step), huge).err(),
        Some(DictError::InvalidConfig("first capacity cannot be allocated"))
    );

    let good = DictConfig::default().capacities(vec![11, 113]).load_divisor(2);
    let mut d: Dictionary<u64, u64, _> =
        Dictionary::with_config((identity, unit_step), good).unwrap();
    for k in 0..6u64 {
        d.set_item(k, k).unwrap();
    }
    assert_eq!(d.capacity(), 113);
    assert_eq!(d.config().validate(), Ok(()));
}

// Test: capacity sequence exhaustion.
// Assumes: a two-entry sequence.
// Verifies: the failing set reports CapacityExhausted instead of reading
// past the sequence, and the dictionary still serves reads.
#[test]
fn running_out_of_capacities_is_fatal_but_reported() {
    let config = DictConfig::default().capacities(vec![5, 11]).load_divisor(2);
    let mut d: Dictionary<u64, u64, _> =
        Dictionary::with_config((identity, unit_step), config).unwrap();
    let mut failed_at = None;
    for k in 0..11u64 {
        if let Err(e) = d.set_item(k, k) {
            assert_eq!(e, DictError::CapacityExhausted { capacity: 11 });
            failed_at = Some(k);
            break;
        }
    }
    let k = failed_at.expect("sequence must run out");
    assert_eq!(d.capacity(), 11);
    for j in 0..=k {
        assert_eq!(d.get_item(&j), Ok(&j));
    }
}
