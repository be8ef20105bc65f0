mod common;

use std::collections::BTreeMap;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rbt_map::{CachedRBTreeMap, CursorError, RBTreeMap};

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 5_000;

/// Keys drawn from a range smaller than `TEST_SIZE` so inserts collide.
fn key_strategy() -> impl Strategy<Value = i64> {
    -2_000i64..2_000i64
}

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

fn keys_of<V>(map: &RBTreeMap<i64, V>) -> Vec<i64> {
    map.keys().copied().collect()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum MapOp {
    Insert(i64, i64),
    Remove(i64),
    Get(i64),
    ContainsKey(i64),
    GetKeyValue(i64),
    FirstKeyValue,
    LastKeyValue,
    PopFirst,
    PopLast,
}

fn map_op_strategy() -> impl Strategy<Value = MapOp> {
    prop_oneof![
        5 => (key_strategy(), value_strategy()).prop_map(|(k, v)| MapOp::Insert(k, v)),
        3 => key_strategy().prop_map(MapOp::Remove),
        2 => key_strategy().prop_map(MapOp::Get),
        1 => key_strategy().prop_map(MapOp::ContainsKey),
        1 => key_strategy().prop_map(MapOp::GetKeyValue),
        1 => Just(MapOp::FirstKeyValue),
        1 => Just(MapOp::LastKeyValue),
        1 => Just(MapOp::PopFirst),
        1 => Just(MapOp::PopLast),
    ]
}

// ─── Core CRUD operations ────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both RBTreeMap and a BTreeMap
    /// model that never overwrites, and asserts identical results at every step.
    #[test]
    fn map_ops_match_btreemap(ops in proptest::collection::vec(map_op_strategy(), TEST_SIZE)) {
        let mut rb_map: RBTreeMap<i64, i64> = RBTreeMap::new();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();

        for op in &ops {
            match op {
                MapOp::Insert(k, v) => {
                    let was_present = bt_map.contains_key(k);
                    let bt_value = *bt_map.entry(*k).or_insert(*v);
                    let (rb_value, found) = rb_map.insert(*k, *v);
                    prop_assert_eq!(*rb_value, bt_value, "insert({}, {})", k, v);
                    prop_assert_eq!(found, was_present, "insert({}, {}) found flag", k, v);
                }
                MapOp::Remove(k) => {
                    prop_assert_eq!(rb_map.remove(k), bt_map.remove(k), "remove({})", k);
                }
                MapOp::Get(k) => {
                    prop_assert_eq!(rb_map.get(k), bt_map.get(k), "get({})", k);
                }
                MapOp::ContainsKey(k) => {
                    prop_assert_eq!(rb_map.contains_key(k), bt_map.contains_key(k), "contains_key({})", k);
                }
                MapOp::GetKeyValue(k) => {
                    prop_assert_eq!(rb_map.get_key_value(k), bt_map.get_key_value(k), "get_key_value({})", k);
                }
                MapOp::FirstKeyValue => {
                    prop_assert_eq!(rb_map.first_key_value(), bt_map.first_key_value(), "first_key_value");
                }
                MapOp::LastKeyValue => {
                    prop_assert_eq!(rb_map.last_key_value(), bt_map.last_key_value(), "last_key_value");
                }
                MapOp::PopFirst => {
                    prop_assert_eq!(rb_map.pop_first(), bt_map.pop_first(), "pop_first");
                }
                MapOp::PopLast => {
                    prop_assert_eq!(rb_map.pop_last(), bt_map.pop_last(), "pop_last");
                }
            }
            prop_assert_eq!(rb_map.len(), bt_map.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(rb_map.is_empty(), bt_map.is_empty(), "is_empty mismatch after {:?}", op);
        }

        let rb_items: Vec<_> = rb_map.iter().map(|(&k, &v)| (k, v)).collect();
        let bt_items: Vec<_> = bt_map.iter().map(|(&k, &v)| (k, v)).collect();
        prop_assert_eq!(rb_items, bt_items);
    }

    /// Inserts unique keys, removes a random subset, and checks the in-order walk
    /// against the sorted survivors after every removal.
    #[test]
    fn erase_subset_keeps_sorted_survivors(
        keys in proptest::collection::btree_set(key_strategy(), 1..1_000),
        seed in any::<u64>(),
    ) {
        let mut shuffled: Vec<i64> = keys.iter().copied().collect();
        // Deterministic Fisher-Yates driven by the generated seed.
        let mut state = seed | 1;
        for i in (1..shuffled.len()).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            let j = usize::try_from(state % (i as u64 + 1)).unwrap();
            shuffled.swap(i, j);
        }

        let mut map: RBTreeMap<i64, ()> = shuffled.iter().map(|&k| (k, ())).collect();
        let mut survivors = keys.clone();
        prop_assert_eq!(keys_of(&map), survivors.iter().copied().collect::<Vec<_>>());

        for k in shuffled.iter().step_by(2) {
            let before = map.len();
            prop_assert_eq!(map.remove(k), Some(()));
            prop_assert_eq!(map.len(), before - 1);
            prop_assert!(!map.contains_key(k));
            survivors.remove(k);
            prop_assert_eq!(keys_of(&map), survivors.iter().copied().collect::<Vec<_>>());
        }
    }

    /// Tests that iteration order matches BTreeMap after random insertions.
    #[test]
    fn iter_matches_btreemap(entries in proptest::collection::vec((key_strategy(), value_strategy()), TEST_SIZE)) {
        let rb_map: RBTreeMap<i64, i64> = entries.iter().copied().collect();
        let mut bt_map: BTreeMap<i64, i64> = BTreeMap::new();
        for (k, v) in &entries {
            bt_map.entry(*k).or_insert(*v);
        }

        let rb_keys: Vec<_> = rb_map.keys().copied().collect();
        let bt_keys: Vec<_> = bt_map.keys().copied().collect();
        prop_assert_eq!(&rb_keys, &bt_keys, "keys() mismatch");

        let rb_vals: Vec<_> = rb_map.values().copied().collect();
        let bt_vals: Vec<_> = bt_map.values().copied().collect();
        prop_assert_eq!(&rb_vals, &bt_vals, "values() mismatch");

        let rb_into: Vec<_> = rb_map.clone().into_iter().collect();
        let bt_into: Vec<_> = bt_map.into_iter().collect();
        prop_assert_eq!(&rb_into, &bt_into, "into_iter() mismatch");

        prop_assert_eq!(rb_map.iter().len(), rb_map.len());
    }

    /// Walking with a cursor visits the same entries as the borrowing iterator.
    #[test]
    fn cursor_walk_matches_iter(entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..500)) {
        let map: RBTreeMap<i64, i64> = entries.into_iter().collect();
        let mut walked = Vec::new();
        let mut cursor = map.cursor_front();
        while let Some((k, v)) = cursor.get(&map).unwrap() {
            walked.push((*k, *v));
            cursor.advance(&map).unwrap();
        }
        prop_assert!(cursor.is_end());
        prop_assert_eq!(walked, map.iter().map(|(&k, &v)| (k, v)).collect::<Vec<_>>());
    }

    /// A cached map answers every lookup exactly like the plain map it wraps.
    #[test]
    fn cached_map_matches_plain_map(
        entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..500),
        probes in proptest::collection::vec(key_strategy(), 0..500),
    ) {
        let plain: RBTreeMap<i64, i64> = entries.into_iter().collect();
        let cached = CachedRBTreeMap::from(plain.clone());
        for k in &probes {
            prop_assert_eq!(cached.get(k), plain.get(k));
            prop_assert_eq!(cached.get(k), plain.get(k));
        }
        prop_assert_eq!(cached.hits() + cached.misses(), 2 * probes.len() as u64);
    }

    /// Cloned maps compare equal, and diverge independently afterwards.
    #[test]
    fn clone_produces_equal_map(entries in proptest::collection::vec((key_strategy(), value_strategy()), 0..TEST_SIZE)) {
        let original: RBTreeMap<i64, i64> = entries.into_iter().collect();
        let mut copy = original.clone();
        prop_assert_eq!(&copy, &original);
        if let Some((&k, _)) = original.first_key_value() {
            copy.remove(&k);
            prop_assert_ne!(&copy, &original);
            prop_assert!(original.contains_key(&k));
        }
    }
}

// ─── Concrete scenarios ──────────────────────────────────────────────────────

#[test]
fn two_child_and_leaf_removals() {
    common::init_tracing();
    let mut map = RBTreeMap::new();
    for k in [5, 3, 8, 1, 4, 7, 9] {
        let (value, found) = map.insert(k, k * 10);
        assert!(!found);
        assert_eq!(*value, k * 10);
    }
    assert_eq!(keys_of(&map), [1, 3, 4, 5, 7, 8, 9]);

    assert_eq!(map.remove(&5), Some(50));
    assert_eq!(keys_of(&map), [1, 3, 4, 7, 8, 9]);
    assert_eq!(map.len(), 6);
    assert_eq!(map.get(&7), Some(&70));

    assert_eq!(map.remove(&1), Some(10));
    assert_eq!(keys_of(&map), [3, 4, 7, 8, 9]);
    assert_eq!(map.len(), 5);
}

#[test]
fn duplicate_insert_keeps_original_value() {
    let mut map = RBTreeMap::new();
    map.insert("k", String::from("first"));
    let (value, found) = map.insert("k", String::from("second"));
    assert!(found);
    assert_eq!(value.as_str(), "first");
    assert_eq!(map.len(), 1);
}

#[test]
fn erase_of_absent_key_changes_nothing() {
    let mut map: RBTreeMap<i64, ()> = (0..10).map(|k| (k, ())).collect();
    assert_eq!(map.remove(&42), None);
    assert_eq!(map.len(), 10);
    assert_eq!(keys_of(&map), (0..10).collect::<Vec<_>>());
}

#[test]
fn clear_leaves_an_empty_walk() {
    common::init_tracing();
    let mut map: RBTreeMap<i64, i64> = (0..100).map(|k| (k, k)).collect();
    map.clear();
    assert_eq!(map.len(), 0);
    assert!(map.is_empty());
    assert_eq!(map.iter().next(), None);
    assert!(map.cursor_front().is_end());

    // The cleared map is fully usable again.
    map.insert(1, 1);
    assert_eq!(keys_of(&map), [1]);
}

#[test]
fn get_or_insert_default_counts_words() {
    let text = "the quick brown fox jumps over the lazy dog the end";
    let mut counts: RBTreeMap<&str, usize> = RBTreeMap::new();
    for word in text.split_whitespace() {
        *counts.get_or_insert_default(word) += 1;
    }
    assert_eq!(counts["the"], 3);
    assert_eq!(counts.first_key_value(), Some((&"brown", &1)));
    assert_eq!(counts.last_key_value(), Some((&"the", &3)));
}

#[test]
fn stale_cursor_reports_invalidation() {
    common::init_tracing();
    let mut map: RBTreeMap<i64, i64> = (0..4).map(|k| (k, k)).collect();
    let mut cursor = map.cursor_front();
    cursor.advance(&map).unwrap();

    map.remove(&0);
    match cursor.get(&map) {
        Err(CursorError::Invalidated { created, current }) => assert!(current > created),
        other => panic!("expected invalidation, got {other:?}"),
    }

    let fresh = map.cursor_front();
    assert_eq!(fresh.get(&map), Ok(Some((&1, &1))));
}

#[test]
fn cached_map_round_trips_through_plain_map() {
    common::init_tracing();
    let mut cached: CachedRBTreeMap<i64, &str> = CachedRBTreeMap::new();
    cached.insert(2, "two");
    cached.insert(1, "one");
    assert_eq!(cached.get(&1), Some(&"one"));
    assert_eq!(cached.remove(&1), Some("one"));
    assert_eq!(cached.get(&1), None);

    let plain = cached.into_inner();
    assert_eq!(plain.into_iter().collect::<Vec<_>>(), [(2, "two")]);
}

#[test]
fn to_dot_draws_every_node() {
    let map: RBTreeMap<i64, ()> = [5, 3, 8, 1, 4, 7, 9].into_iter().map(|k| (k, ())).collect();
    let dot = map.to_dot();
    assert!(dot.starts_with("graph \"\" {\n"));
    assert!(dot.ends_with("}\n"));
    for k in [5, 3, 8, 1, 4, 7, 9] {
        assert!(dot.contains(&format!("[label=\"{k}\"")), "missing node {k}");
    }
    // A tree of n nodes has n + 1 empty child slots.
    assert_eq!(dot.matches("shape=square").count(), 8);
}
