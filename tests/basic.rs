use ahash::AHasher;
use striped_cuckoo_set::{CuckooSet, CuckooSetBuilder, Error};

// Helper function to create test data
fn test_values(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("test_value_{i}")).collect()
}

// Deterministic pseudo-random stream for selection decisions
fn lcg(state: &mut u64) -> u64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    *state >> 33
}

#[test]
fn test_new_set() {
    let set = CuckooSet::<u64>::new();
    assert_eq!(set.len(), 0);
    assert!(set.is_empty());
    assert_eq!(set.capacity(), 1024); // Default capacity
}

#[test]
fn test_with_capacity() {
    let set = CuckooSet::<u64>::with_capacity(16);
    assert_eq!(set.len(), 0);
    assert!(set.is_empty());
    assert_eq!(set.capacity(), 16);
}

#[test]
fn test_builder_default() {
    let set = CuckooSet::<u64>::builder().build().unwrap();
    assert_eq!(set.len(), 0);
    assert!(set.is_empty());
}

#[test]
fn test_builder_custom_config() {
    let set = CuckooSet::<u64>::builder()
        .initial_capacity(64)
        .build()
        .unwrap();

    assert_eq!(set.len(), 0);
    assert_eq!(set.capacity(), 64);
}

#[test]
fn test_builder_validation_zero_capacity() {
    let result = CuckooSet::<u64>::builder().initial_capacity(0).build();

    assert!(result.is_err());
    assert!(
        result
            .unwrap_err()
            .to_string()
            .contains("initial_capacity must be greater than zero")
    );
}

#[test]
fn test_empty_set_operations() {
    let set = CuckooSet::<i32>::with_capacity(16);

    assert!(!set.contains(&42));
    assert!(!set.remove(&42));
    assert_eq!(set.len(), 0);
    assert!(set.is_empty());
}

#[test]
fn test_add_contains_remove_cycle() {
    let set = CuckooSet::with_capacity(16);

    assert!(set.add(7));
    assert!(set.contains(&7));
    assert!(!set.add(7));
    assert!(set.remove(&7));
    assert!(!set.contains(&7));
    assert_eq!(set.len(), 0);
}

#[test]
fn test_add_is_idempotent() {
    let set = CuckooSet::with_capacity(16);

    assert!(set.add("duplicate"));
    assert_eq!(set.len(), 1);
    // A second add of the same value reports it as present and changes nothing
    assert!(!set.add("duplicate"));
    assert_eq!(set.len(), 1);
    assert!(set.contains(&"duplicate"));
}

#[test]
fn test_remove_is_idempotent() {
    let set = CuckooSet::with_capacity(16);

    assert!(set.add(9));
    assert!(set.remove(&9));
    assert!(!set.remove(&9));
    assert_eq!(set.len(), 0);
}

#[test]
fn test_membership_follows_last_write() {
    let set = CuckooSet::with_capacity(32);

    for value in 0..64u64 {
        assert!(set.add(value));
        assert!(set.contains(&value));
        assert!(set.remove(&value));
        assert!(!set.contains(&value));
    }
    assert_eq!(set.len(), 0);
}

#[test]
fn test_remove_missing_value() {
    let set = CuckooSet::with_capacity(16);

    set.populate(1..=8u64).unwrap();
    assert!(!set.remove(&999));
    assert_eq!(set.len(), 8);
}

#[test]
fn test_populate_empty_input() {
    let set = CuckooSet::<u64>::with_capacity(16);

    assert_eq!(set.populate([]), Ok(()));
    assert_eq!(set.len(), 0);
}

#[test]
fn test_populate_duplicate_aborts() {
    let set = CuckooSet::with_capacity(16);

    let result = set.populate([1u64, 2, 3, 2, 4]);
    assert_eq!(result, Err(Error::AlreadyPresent));
    // Everything before the duplicate stays in the set
    assert_eq!(set.len(), 3);
    assert!(set.contains(&1));
    assert!(set.contains(&2));
    assert!(set.contains(&3));
    assert!(!set.contains(&4));
}

#[test]
fn test_retain_random_half() {
    let set = CuckooSet::with_capacity(8);
    let values: Vec<u64> = (0..32).collect();

    for &value in &values {
        assert!(set.add(value));
    }

    let mut state = 0x5eed_u64;
    let mut removed = Vec::new();
    let mut retained = Vec::new();
    for &value in &values {
        if lcg(&mut state) % 2 == 0 {
            assert!(set.remove(&value));
            removed.push(value);
        } else {
            retained.push(value);
        }
    }

    assert_eq!(set.len(), retained.len());
    for value in &retained {
        assert!(set.contains(value));
    }
    for value in &removed {
        assert!(!set.contains(value));
    }
}

#[test]
fn test_serial_conservation() {
    let set = CuckooSet::with_capacity(16);
    set.populate(0..100u64).unwrap();

    let mut state = 0xfeed_u64;
    let mut added = 0usize;
    let mut removed = 0usize;
    for _ in 0..10_000 {
        let roll = lcg(&mut state);
        let key = (roll >> 8) % 200;
        match roll % 4 {
            0 | 1 => {
                set.contains(&key);
            }
            2 => {
                if set.add(key) {
                    added += 1;
                }
            }
            _ => {
                if set.remove(&key) {
                    removed += 1;
                }
            }
        }
    }

    assert_eq!(set.len(), 100 + added - removed);
}

#[test]
fn test_string_values() {
    let set = CuckooSet::with_capacity(64);
    let values = test_values(100);

    for value in &values {
        assert!(set.add(value.clone()));
    }
    for value in &values {
        assert!(set.contains(value));
    }
    assert_eq!(set.len(), 100);
}

#[test]
fn test_custom_hasher() {
    // Test that we can use different hashers
    let set = CuckooSetBuilder::<String, AHasher>::default()
        .initial_capacity(64)
        .build()
        .unwrap();

    let values = test_values(100);
    for value in &values {
        assert!(set.add(value.clone()));
    }

    for value in &values {
        assert!(set.contains(value));
    }

    assert_eq!(set.len(), 100);
}
