//! Generational handle behavior of `SparseSet`.

use strata_core::alloc::sparse_set::{IndexSlot, SparseSet};

#[test]
fn test_handles_stay_valid_across_pushes() {
    let mut set = SparseSet::new();

    let first = set.push("first");
    let second = set.push("second");

    assert_eq!(*set.get(first), "first");
    assert_eq!(*set.get(second), "second");
    assert_eq!(set.len(), 2);
}

#[test]
fn test_get_mut_writes_through() {
    let mut set = SparseSet::new();
    let idx = set.push(1);
    *set.get_mut(idx) += 41;
    assert_eq!(set.try_get(idx), Some(&42));
}

#[test]
fn test_removed_handle_is_stale_after_slot_reuse() {
    let mut set = SparseSet::new();

    let old = set.push(1);
    assert_eq!(set.remove(old), 1);

    let new = set.push(2);
    assert_eq!(new.index(), old.index());
    assert_eq!(new.generation(), old.generation() + 1);

    assert_eq!(set.try_get(old), None);
    assert_eq!(set.try_get_mut(old), None);
    assert!(!set.contains(old));
    assert_eq!(*set.get(new), 2);
}

#[test]
fn test_try_remove_is_idempotent() {
    let mut set = SparseSet::new();
    let idx = set.push(7);

    assert_eq!(set.try_remove(idx), Some(7));
    assert_eq!(set.try_remove(idx), None);
    assert!(set.is_empty());
}

#[test]
#[should_panic(expected = "invalid generation")]
fn test_get_after_remove_panics() {
    let mut set = SparseSet::new();
    let idx = set.push(42);
    set.remove(idx);
    let _ = set.get(idx);
}

#[test]
fn test_unknown_index_returns_none() {
    let set = SparseSet::<i32>::with_capacity(4);
    assert_eq!(set.try_get(IndexSlot::new(0, 999)), None);
}

#[test]
fn test_iter_yields_live_handles_in_slot_order() {
    let mut set = SparseSet::new();
    let a = set.push(10);
    let b = set.push(20);
    let c = set.push(30);
    set.remove(b);

    let live: Vec<_> = set.iter().collect();
    assert_eq!(live, vec![(a, &10), (c, &30)]);
    assert_eq!(set.keys().collect::<Vec<_>>(), vec![a, c]);
}

#[test]
fn test_to_bits_is_unique_per_generation() {
    let mut set = SparseSet::new();
    let a = set.push(());
    set.remove(a);
    let b = set.push(());
    assert_ne!(a.to_bits(), b.to_bits());
}
