//! # Invariant Testing for the Bramble B-Tree
//!
//! This module contains tests specifically designed to validate tree
//! invariants around structural changes. It focuses on:
//!
//! - Boundary conditions for splits and merges, at several orders
//! - Borrowing through the parent in both directions
//! - Randomized operations with invariant validation
//! - Edge cases in tree structure modifications

use bramble::{Tree, MIN_ORDER};
use rand::prelude::*;
use std::collections::BTreeMap;

fn sorted_keys(tree: &Tree<'_, i32, i32>) -> Vec<i32> {
	tree.iter().map(|(k, _)| *k).collect()
}

// ===========================================================================
// Split Boundary Tests
// ===========================================================================

/// Fill the root leaf to exactly `order - 1` keys, then add one more to
/// trigger the first split.
#[test]
fn split_at_exact_leaf_capacity() {
	for order in MIN_ORDER..=12 {
		let mut tree: Tree<'_, i32, i32> = Tree::natural(order).unwrap();
		let capacity = (order - 1) as i32;

		for i in 0..capacity {
			tree.insert(i, i * 10);
		}

		tree.assert_invariants();
		assert_eq!(tree.height(), 1, "Order {} split before reaching capacity", order);

		tree.insert(capacity, capacity * 10);

		tree.assert_invariants();
		assert_eq!(tree.height(), 2, "Order {} did not split at capacity", order);

		// Sequential keys always land after the pivot
		let left = order / 2;
		let right = order - 1 - left;
		assert_eq!(tree.level_shapes(), vec![vec![1], vec![left, right]]);

		for i in 0..=capacity {
			assert_eq!(tree.lookup(&i, |v| *v), Some(i * 10), "Key {} not found after split", i);
		}
	}
}

/// The root splits into an interior node once its leaf children fill up.
#[test]
fn split_at_exact_interior_capacity() {
	// Order 4: an interior node holds at most three keys and four children
	let mut tree: Tree<'_, i32, i32> = Tree::natural(4).unwrap();
	let mut last_height = 1;
	let mut grew_at = Vec::new();

	for i in 0..200 {
		tree.insert(i, i);
		tree.assert_invariants();

		let height = tree.height();
		assert!(height == last_height || height == last_height + 1, "Height jumped from {} to {}", last_height, height);
		if height > last_height {
			grew_at.push(i);
		}
		last_height = height;
	}

	assert!(grew_at.len() >= 3, "Expected several root splits, saw {:?}", grew_at);
	assert_eq!(sorted_keys(&tree), (0..200).collect::<Vec<_>>());
}

/// Every root split creates a new root with exactly one key.
#[test]
fn root_split_leaf_to_interior() {
	let mut tree: Tree<'_, i32, i32> = Tree::natural(5).unwrap();
	assert_eq!(tree.height(), 1);

	let mut last_height = 1;
	for i in 0..500 {
		tree.insert(i, i);
		if tree.height() > last_height {
			last_height = tree.height();
			assert_eq!(tree.level_shapes()[0], vec![1], "Fresh root after inserting {} holds more than one key", i);
		}
	}

	tree.assert_invariants();
	assert!(last_height >= 3);
}

/// Splits that cascade through several interior levels in one insertion.
#[test]
fn cascading_splits() {
	// Order 3 with 1..=7 is a perfect tree of height 3, the 7th insert
	// splits a leaf, an interior node and the root.
	let mut tree: Tree<'_, i32, i32> = Tree::natural(3).unwrap();
	for i in 1..=6 {
		tree.insert(i, i);
	}
	assert_eq!(tree.height(), 2);

	tree.insert(7, 7);
	tree.assert_invariants();
	assert_eq!(tree.height(), 3);
	assert_eq!(tree.level_shapes(), vec![vec![1], vec![1, 1], vec![1, 1, 1, 1]]);
}

/// Splits driven by descending keys, which always land before the pivot.
#[test]
fn splits_with_reverse_order() {
	for order in MIN_ORDER..=9 {
		let mut tree: Tree<'_, i32, i32> = Tree::natural(order).unwrap();

		for i in (0..1000).rev() {
			tree.insert(i, i);
		}

		tree.assert_invariants();
		assert_eq!(tree.len(), 1000);
		assert_eq!(sorted_keys(&tree), (0..1000).collect::<Vec<_>>());
	}
}

/// Keys landing exactly on the pivot become the separator themselves.
#[test]
fn splits_with_middle_insertions() {
	for order in MIN_ORDER..=9 {
		let mut tree: Tree<'_, i32, i32> = Tree::natural(order).unwrap();

		// Alternate ends towards the middle so new keys land near the pivot
		let (mut lo, mut hi) = (0, 999);
		while lo <= hi {
			tree.insert(lo, lo);
			if lo != hi {
				tree.insert(hi, hi);
			}
			lo += 1;
			hi -= 1;
		}

		tree.assert_invariants();
		assert_eq!(tree.len(), 1000);
	}
}

// ===========================================================================
// Borrow Boundary Tests
// ===========================================================================

/// An underfull leaf takes a key from its right sibling through the parent.
#[test]
fn borrow_from_right_at_minimum_occupancy() {
	let mut tree: Tree<'_, i32, i32> = Tree::natural(5).unwrap();
	for k in [10, 20, 30, 40, 50, 60] {
		tree.insert(k, k);
	}
	assert_eq!(tree.level_shapes(), vec![vec![1], vec![2, 3]]);

	tree.remove(&10);
	tree.assert_invariants();
	assert_eq!(tree.level_shapes(), vec![vec![1], vec![2, 2]]);
	assert_eq!(sorted_keys(&tree), vec![20, 30, 40, 50, 60]);
}

/// An underfull leaf with no right sibling to spare borrows from the left.
#[test]
fn borrow_from_left_at_minimum_occupancy() {
	let mut tree: Tree<'_, i32, i32> = Tree::natural(5).unwrap();
	for k in [10, 20, 40, 50, 60, 30] {
		tree.insert(k, k);
	}
	assert_eq!(tree.level_shapes(), vec![vec![1], vec![3, 2]]);

	tree.remove(&50);
	tree.assert_invariants();
	assert_eq!(tree.level_shapes(), vec![vec![1], vec![2, 2]]);
	assert_eq!(sorted_keys(&tree), vec![10, 20, 30, 40, 60]);
}

/// Borrowing at interior level moves a whole subtree between siblings.
#[test]
fn interior_borrow_moves_children() {
	for order in MIN_ORDER..=7 {
		let mut tree: Tree<'_, i32, i32> = Tree::natural(order).unwrap();
		for i in 0..400 {
			tree.insert(i, i);
		}

		// Thin out the left edge, forcing interior rebalancing there while
		// the right side still has plenty to lend
		for i in 0..200 {
			assert!(tree.remove(&i));
			tree.assert_invariants();
		}

		assert_eq!(sorted_keys(&tree), (200..400).collect::<Vec<_>>());
	}
}

// ===========================================================================
// Merge Boundary Tests
// ===========================================================================

/// Two minimal leaves and their separator fold into one node.
#[test]
fn merge_at_minimum_occupancy() {
	let mut tree: Tree<'_, i32, i32> = Tree::natural(5).unwrap();
	for k in [10, 20, 30, 40, 50] {
		tree.insert(k, k);
	}
	assert_eq!(tree.level_shapes(), vec![vec![1], vec![2, 2]]);

	tree.remove(&40);
	tree.assert_invariants();
	assert_eq!(tree.level_shapes(), vec![vec![4]]);
	assert_eq!(sorted_keys(&tree), vec![10, 20, 30, 50]);
}

/// A single removal merges at every level and shrinks the tree by one.
#[test]
fn cascading_merges() {
	let mut tree: Tree<'_, i32, i32> = Tree::natural(3).unwrap();
	for i in 1..=7 {
		tree.insert(i, i);
	}
	assert_eq!(tree.height(), 3);

	tree.remove(&1);
	tree.assert_invariants();
	assert_eq!(tree.height(), 2);
	assert_eq!(tree.level_shapes(), vec![vec![2], vec![2, 1, 1]]);
	assert_eq!(sorted_keys(&tree), vec![2, 3, 4, 5, 6, 7]);
}

/// Height drops one level at a time while draining a deep tree.
#[test]
fn height_shrinks_gradually() {
	let mut tree: Tree<'_, i32, i32> = Tree::natural(3).unwrap();
	for i in 0..2000 {
		tree.insert(i, i);
	}

	let mut last_height = tree.height();
	for i in 0..2000 {
		tree.remove(&i);
		let height = tree.height();
		assert!(height == last_height || height + 1 == last_height, "Height fell from {} to {}", last_height, height);
		last_height = height;
	}

	tree.assert_invariants();
	assert_eq!(tree.height(), 1);
}

/// Merge then split in the same region.
#[test]
fn merge_then_split_same_region() {
	let mut tree: Tree<'_, i32, i32> = Tree::natural(4).unwrap();

	for i in 0..300 {
		tree.insert(i, i);
	}

	// Empty a band in the middle, merging its nodes away
	for i in 100..200 {
		tree.remove(&i);
	}
	tree.assert_invariants();

	// Refill it, splitting the survivors again
	for i in 100..200 {
		tree.insert(i, i * 2);
	}
	tree.assert_invariants();

	assert_eq!(tree.len(), 300);
	for i in 100..200 {
		assert_eq!(tree.get(&i), Some(i * 2));
	}
}

// ===========================================================================
// Iterator Boundary Tests
// ===========================================================================

/// Cursor traversal after structural changes visits each key once.
#[test]
fn cursor_after_structure_changes() {
	let mut tree: Tree<'_, i32, i32> = Tree::natural(3).unwrap();

	for i in 0..1000 {
		tree.insert(i, i);
	}
	for i in (0..1000).filter(|i| i % 3 != 0) {
		tree.remove(&i);
	}
	tree.assert_invariants();

	let mut cursor = tree.cursor();
	let mut expected = (0..1000).filter(|i| i % 3 == 0);
	while cursor.next() {
		assert_eq!(cursor.key().copied(), expected.next());
	}
	assert_eq!(expected.next(), None);
	assert!(cursor.is_exhausted());
}

/// The cursor climbs several levels between the last key of a subtree and
/// the interior key that follows it.
#[test]
fn cursor_across_levels() {
	for order in MIN_ORDER..=6 {
		let mut tree: Tree<'_, i32, i32> = Tree::natural(order).unwrap();
		for i in 0..3000 {
			tree.insert(i, i);
		}
		assert!(tree.height() >= 4);

		let mut cursor = tree.cursor();
		let mut next = 0;
		while cursor.next() {
			assert_eq!(cursor.get_key(), Some(next));
			next += 1;
		}
		assert_eq!(next, 3000);
	}
}

// ===========================================================================
// Randomized Invariant Tests
// ===========================================================================

/// Randomized operations with periodic invariant validation.
#[test]
fn random_operations_with_invariant_checks() {
	let mut rng = rand::rng();

	for order in [3, 4, 5, 8, 16] {
		let mut tree: Tree<'_, i32, i32> = Tree::natural(order).unwrap();
		let mut expected: BTreeMap<i32, i32> = BTreeMap::new();

		for op in 0..10_000 {
			let key: i32 = rng.random_range(0..1000);

			match rng.random_range(0..3) {
				0 => {
					// Insert
					let fresh = !expected.contains_key(&key);
					assert_eq!(tree.insert(key, key * 10), fresh);
					expected.entry(key).or_insert(key * 10);
				}
				1 => {
					// Remove
					assert_eq!(tree.remove(&key), expected.remove(&key).is_some());
				}
				2 => {
					// Lookup
					assert_eq!(tree.get(&key), expected.get(&key).copied());
				}
				_ => unreachable!(),
			}

			// Validate every 100 operations
			if op % 100 == 0 {
				tree.assert_invariants();
				assert_eq!(tree.len(), expected.len());
			}
		}

		// Final validation
		tree.assert_invariants();
		assert_eq!(tree.len(), expected.len());

		for (k, v) in &expected {
			assert_eq!(tree.get(k), Some(*v), "Key {} not found at order {}", k, order);
		}
	}
}

/// Heavy random workload with validation checkpoints.
#[test]
fn stress_random_workload() {
	let mut tree: Tree<'_, i32, i32> = Tree::natural(6).unwrap();
	let mut rng = rand::rng();

	// Phase 1: Heavy insertions
	for _ in 0..5000 {
		let key: i32 = rng.random_range(0..10_000);
		tree.insert(key, key);
	}
	tree.assert_invariants();

	// Phase 2: Mixed operations
	for _ in 0..5000 {
		let key: i32 = rng.random_range(0..10_000);
		if rng.random_bool(0.5) {
			tree.insert(key, key);
		} else {
			tree.remove(&key);
		}
	}
	tree.assert_invariants();

	// Phase 3: Heavy deletions
	for _ in 0..3000 {
		let key: i32 = rng.random_range(0..10_000);
		tree.remove(&key);
	}
	tree.assert_invariants();

	// Verify iteration matches length
	let mut count = 0;
	let mut cursor = tree.cursor();
	while cursor.next() {
		count += 1;
	}
	assert_eq!(count, tree.len());
}

// ===========================================================================
// Edge Case Tests
// ===========================================================================

/// Sequential inserts and random deletes.
#[test]
fn sequential_insert_random_delete() {
	let mut tree: Tree<'_, i32, i32> = Tree::natural(4).unwrap();
	let mut rng = rand::rng();

	for i in 0..1000 {
		tree.insert(i, i);
	}

	tree.assert_invariants();

	let mut keys: Vec<i32> = (0..1000).collect();
	keys.shuffle(&mut rng);

	for key in keys.iter().take(500) {
		assert!(tree.remove(key));
	}

	tree.assert_invariants();

	for key in keys.iter().take(500) {
		assert_eq!(tree.get(key), None);
	}
	for key in keys.iter().skip(500) {
		assert_eq!(tree.get(key), Some(*key));
	}
}

/// The same key inserted over and over keeps its first value.
#[test]
fn repeated_same_key_inserts() {
	let mut tree: Tree<'_, i32, i32> = Tree::natural(3).unwrap();

	assert!(tree.insert(42, 0));
	for i in 1..1000 {
		assert!(!tree.insert(42, i));
	}

	tree.assert_invariants();
	assert_eq!(tree.len(), 1);
	assert_eq!(tree.get(&42), Some(0));
}

/// Extreme key values sort and look up like any other.
#[test]
fn boundary_key_values() {
	let mut tree: Tree<'_, i32, i32> = Tree::natural(3).unwrap();

	tree.insert(i32::MIN, 1);
	tree.insert(i32::MAX, 2);
	tree.insert(0, 3);

	tree.assert_invariants();

	assert_eq!(tree.get(&i32::MIN), Some(1));
	assert_eq!(tree.get(&i32::MAX), Some(2));
	assert_eq!(tree.get(&0), Some(3));

	assert_eq!(sorted_keys(&tree), vec![i32::MIN, 0, i32::MAX]);
}

/// Operations on an empty tree.
#[test]
fn empty_tree_invariants() {
	let mut tree: Tree<'_, i32, i32> = Tree::natural(3).unwrap();

	tree.assert_invariants();
	assert!(tree.is_empty());
	assert_eq!(tree.height(), 1);

	assert!(!tree.remove(&1));
	assert_eq!(tree.get(&1), None);
	assert!(!tree.cursor().next());

	tree.assert_invariants();
}

/// A drained tree is a single empty leaf and accepts new entries.
#[test]
fn tree_after_removing_all() {
	let mut tree: Tree<'_, i32, i32> = Tree::natural(5).unwrap();

	for i in 0..500 {
		tree.insert(i, i);
	}

	tree.assert_invariants();

	for i in 0..500 {
		tree.remove(&i);
	}

	tree.assert_invariants();
	assert!(tree.is_empty());
	assert_eq!(tree.level_shapes(), vec![vec![0]]);

	tree.insert(1, 10);
	tree.assert_invariants();
	assert_eq!(tree.len(), 1);
}
