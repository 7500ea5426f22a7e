use bplus_index::{BPlusIndex, IndexError};
use paste::paste;

fn keys_of(index: &BPlusIndex<i32>) -> Vec<i32> {
    index.iter().copied().collect()
}

fn build(degree: usize, keys: impl IntoIterator<Item = i32>) -> BPlusIndex<i32> {
    let index = BPlusIndex::from_keys(degree, keys).unwrap();
    index.check_invariants().unwrap();
    index
}

// ============================================================================
// CONCRETE SCENARIO
// ============================================================================

#[test]
fn test_insert_range_delete_scenario() {
    let mut index = BPlusIndex::new(2).unwrap();
    for key in [10, 20, 5, 6, 12, 30, 7, 17] {
        assert!(index.insert(key));
        index.check_invariants().unwrap();
    }

    assert_eq!(index.range_query(&6, &17), vec![6, 7, 10, 12, 17]);
    assert!(index.delete(&6));
    index.check_invariants().unwrap();
    assert_eq!(index.range_query(&6, &17), vec![7, 10, 12, 17]);
}

#[test]
fn test_scenario_shape() {
    let index = build(2, [10, 20, 5, 6, 12, 30, 7, 17]);
    assert_eq!(
        index.levels(),
        vec![
            vec![vec![10, 12, 20]],
            vec![vec![5, 6, 7], vec![10], vec![12, 17], vec![20, 30]],
        ]
    );
}

// ============================================================================
// EDGE-CHILD REBALANCING
// ============================================================================

#[test]
fn test_first_child_merges_with_right_sibling_t2() {
    let mut index = build(2, 1..=5);
    assert_eq!(
        index.levels(),
        vec![vec![vec![2, 3]], vec![vec![1], vec![2], vec![3, 4, 5]]]
    );

    // [1] is minimal and [2] cannot donate: the first child merges rightwards.
    assert!(index.delete(&1));
    assert_eq!(index.levels(), vec![vec![vec![3]], vec![vec![2], vec![3, 4, 5]]]);
    index.check_invariants().unwrap();
}

#[test]
fn test_first_child_borrows_from_right_sibling_t2() {
    let mut index = build(2, 1..=5);
    index.delete(&1);

    // [2] is minimal and [3 4 5] can donate.
    assert!(index.delete(&2));
    assert_eq!(index.levels(), vec![vec![vec![4]], vec![vec![3], vec![4, 5]]]);
    index.check_invariants().unwrap();
}

#[test]
fn test_last_child_merges_with_left_sibling_t3() {
    let mut index = build(3, 1..=6);
    assert_eq!(index.levels(), vec![vec![vec![3]], vec![vec![1, 2], vec![3, 4, 5, 6]]]);
    index.delete(&6);
    index.delete(&5);

    // Last child [3 4] is minimal and has no right sibling; [1 2] cannot donate.
    assert!(index.delete(&4));
    assert_eq!(index.levels(), vec![vec![vec![1, 2, 3]]]);
    assert_eq!(index.height(), 1);
    index.check_invariants().unwrap();
}

#[test]
fn test_last_child_borrows_from_left_sibling_t3() {
    let mut index = build(3, 1..=6);
    index.insert(0);
    index.delete(&6);
    index.delete(&5);
    assert_eq!(index.levels(), vec![vec![vec![3]], vec![vec![0, 1, 2], vec![3, 4]]]);

    assert!(index.delete(&4));
    assert_eq!(index.levels(), vec![vec![vec![2]], vec![vec![0, 1], vec![2, 3]]]);
    index.check_invariants().unwrap();
}

#[test]
fn test_separator_with_rich_right_child_promotes_successor() {
    let mut index = build(2, [1, 2, 3, 4]);
    assert!(index.delete(&2));
    assert_eq!(index.levels(), vec![vec![vec![3]], vec![vec![1], vec![3, 4]]]);
}

#[test]
fn test_separator_with_minimal_children_merges() {
    let mut index = build(3, 1..=6);
    index.delete(&6);
    index.delete(&5);

    // Both sides of separator 3 are minimal.
    assert!(index.delete(&3));
    assert_eq!(index.levels(), vec![vec![vec![1, 2, 4]]]);
    index.check_invariants().unwrap();
}

#[test]
fn test_internal_levels_rebalance_on_deletes() {
    let mut index = build(2, 0..64);
    assert!(index.height() >= 4);
    let mut expected: Vec<i32> = (0..64).collect();
    for key in [0, 63, 31, 32, 1, 62, 15, 47, 16, 48] {
        assert!(index.delete(&key));
        expected.retain(|k| *k != key);
        index.check_invariants().unwrap();
        assert_eq!(keys_of(&index), expected);
    }
}

// ============================================================================
// POLICIES AND ERRORS
// ============================================================================

#[test]
fn test_duplicate_policy() {
    let mut index = build(2, [1, 2, 3]);
    let before = index.levels();
    assert!(!index.insert(2));
    assert_eq!(index.levels(), before);
    assert_eq!(index.try_insert(3), Err(IndexError::DuplicateKey));
    assert_eq!(index.len(), 3);
}

#[test]
fn test_missing_key_reporting() {
    let mut index = build(2, [1, 2, 3]);
    assert!(index.search(&9).is_none());
    assert!(index.try_search(&9).unwrap_err().is_not_found());
    assert!(!index.delete(&9));
    assert_eq!(index.try_delete(&9), Err(IndexError::KeyNotFound));
    assert_eq!(index.try_delete(&2), Ok(()));
}

#[test]
fn test_invalid_degree_is_configuration_error() {
    let err = BPlusIndex::<i32>::new(1).unwrap_err();
    assert!(err.is_configuration_error());
}

#[test]
fn test_string_keys() {
    let mut index = BPlusIndex::new(2).unwrap();
    for word in ["pear", "apple", "fig", "kiwi", "banana", "cherry", "date"] {
        index.insert(word.to_string());
    }
    let fruit = index.range_query(&"b".to_string(), &"g".to_string());
    assert_eq!(fruit, vec!["banana", "cherry", "date", "fig"]);
    assert!(index.contains(&"kiwi".to_string()));
}

// ============================================================================
// PER-DEGREE FAMILIES
// ============================================================================

fn ascending_inserts_then_deletes(degree: usize) {
    let mut index = BPlusIndex::new(degree).unwrap();
    for key in 0..300 {
        index.insert(key);
    }
    index.check_invariants().unwrap();
    for key in 0..300 {
        assert!(index.delete(&key));
        index.check_invariants().unwrap();
    }
    assert!(index.is_empty());
    assert_eq!(index.height(), 1);
}

fn interleaved_churn(degree: usize) {
    let mut index = BPlusIndex::new(degree).unwrap();
    for round in 0..5 {
        for key in (0..400).filter(|k| k % 5 == round) {
            index.insert(key);
        }
        for key in (0..400).filter(|k| k % 7 == round) {
            index.delete(&key);
        }
        index.check_invariants().unwrap();
    }
    // Key k goes in during round k % 5 and is dropped if a later (or the
    // same) round r < 5 has r == k % 7.
    for key in 0..400 {
        let inserted_in = key % 5;
        let deleted_in = key % 7;
        let expected = !(deleted_in >= inserted_in && deleted_in < 5);
        assert_eq!(index.contains(&key), expected, "key {}", key);
    }
}

fn height_grows_and_shrinks(degree: usize) {
    let mut index = BPlusIndex::new(degree).unwrap();
    let mut heights = vec![index.height()];
    for key in 0..1000 {
        index.insert(key);
        heights.push(index.height());
    }
    assert!(heights.windows(2).all(|w| w[1] == w[0] || w[1] == w[0] + 1));
    assert!(index.height() > 2);

    heights.clear();
    heights.push(index.height());
    for key in (0..1000).rev() {
        index.delete(&key);
        heights.push(index.height());
    }
    assert!(heights.windows(2).all(|w| w[1] == w[0] || w[1] + 1 == w[0]));
    assert_eq!(index.height(), 1);
}

fn range_edges(degree: usize) {
    let index = BPlusIndex::from_keys(degree, (0..200).map(|k| k * 2)).unwrap();
    assert_eq!(index.range_query(&-5, &-1), Vec::<i32>::new());
    assert_eq!(index.range_query(&398, &1000), vec![398]);
    assert_eq!(index.range_query(&11, &11), Vec::<i32>::new());
    assert_eq!(index.range_query(&12, &12), vec![12]);
    assert_eq!(index.range_query(&13, &19), vec![14, 16, 18]);
    assert!(index.range_query(&100, &50).is_empty());
    assert_eq!(index.range_query(&0, &398).len(), 200);
}

macro_rules! degree_suite {
    ($($degree:literal),* $(,)?) => {
        paste! {
            $(
                #[test]
                fn [<test_ascending_inserts_then_deletes_t $degree>]() {
                    ascending_inserts_then_deletes($degree);
                }

                #[test]
                fn [<test_interleaved_churn_t $degree>]() {
                    interleaved_churn($degree);
                }

                #[test]
                fn [<test_height_grows_and_shrinks_t $degree>]() {
                    height_grows_and_shrinks($degree);
                }

                #[test]
                fn [<test_range_edges_t $degree>]() {
                    range_edges($degree);
                }
            )*
        }
    };
}

degree_suite!(2, 3, 4, 5, 8);
