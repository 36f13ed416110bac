//! # Tree Nodes
//!
//! A node is the tree's unit of storage. Every node keeps its keys and
//! values in two parallel, insertion-sorted arrays, plus the identifiers of
//! its children. Nodes live in the tree's arena and refer to each other by
//! [`NodeId`]:
//!
//! ```text
//!                  parent (non-owning back-link)
//!                    ▲
//!                    │ position = index of this node in parent.children
//!          ┌─────────┴─────────┐
//!          │ keys:   [K0, K1]  │
//!          │ values: [V0, V1]  │
//!          │ children:         │
//!          │   [C0, C1, C2]    │  <- exclusively owned
//!          └───────────────────┘
//! ```
//!
//! # Invariants
//!
//! - A node is a **leaf** iff `children` is empty.
//! - An **interior** node with `n` keys has exactly `n + 1` children.
//! - The subtree under `children[i]` holds keys `< keys[i]` (and
//!   `> keys[i - 1]` when `i > 0`); `children[n]` holds keys `> keys[n - 1]`.
//! - `parent` is `None` iff the node is the root; `position` is only
//!   meaningful when `parent` is set.

use std::cmp::Ordering;
use std::fmt;

use smallvec::SmallVec;

use crate::descriptor::KeyDescriptor;

/// Index of a node in the tree's arena.
pub(crate) type NodeId = usize;

/// Entries kept inline before a node spills to the heap. Covers every order
/// up to 9 without a second allocation per node.
pub(crate) type Keys<K> = SmallVec<[K; 8]>;
pub(crate) type Values<V> = SmallVec<[V; 8]>;
pub(crate) type Children = SmallVec<[NodeId; 9]>;

pub(crate) struct Node<K, V> {
	/// Sorted keys, no duplicates.
	pub(crate) keys: Keys<K>,
	/// Values corresponding to keys (same index).
	pub(crate) values: Values<V>,
	/// Child identifiers; empty for leaves.
	pub(crate) children: Children,
	/// The owning node, `None` for the root.
	pub(crate) parent: Option<NodeId>,
	/// This node's index in `parent.children`.
	pub(crate) position: usize,
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Node<K, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Node")
			.field("keys", &self.keys)
			.field("values", &self.values)
			.field("children", &self.children)
			.field("parent", &self.parent)
			.field("position", &self.position)
			.finish()
	}
}

impl<K, V> Node<K, V> {
	/// Creates a new, empty leaf.
	pub(crate) fn new() -> Node<K, V> {
		Node {
			keys: SmallVec::new(),
			values: SmallVec::new(),
			children: SmallVec::new(),
			parent: None,
			position: 0,
		}
	}

	/// Number of keys stored in this node.
	#[inline]
	pub(crate) fn len(&self) -> usize {
		self.keys.len()
	}

	#[inline]
	pub(crate) fn is_leaf(&self) -> bool {
		self.children.is_empty()
	}

	/// Child at `idx`, or `None` for leaves and out-of-range slots.
	#[inline]
	pub(crate) fn child(&self, idx: usize) -> Option<NodeId> {
		self.children.get(idx).copied()
	}

	/// Linear scan for `key`.
	///
	/// Returns `Ok(pos)` if `keys[pos]` compares equal to `key`, otherwise
	/// `Err(pos)` where `pos` is the index of the first key greater than
	/// `key` (the insertion position, and also the child to descend into).
	pub(crate) fn search(&self, key: &K, cmp: &dyn KeyDescriptor<K>) -> Result<usize, usize> {
		for (pos, k) in self.keys.iter().enumerate() {
			match cmp.compare(key, k) {
				Ordering::Equal => return Ok(pos),
				Ordering::Less => return Err(pos),
				Ordering::Greater => {}
			}
		}
		Err(self.keys.len())
	}

	/// Inserts a key-value pair at `pos`, shifting later entries right.
	#[inline]
	pub(crate) fn insert_entry(&mut self, pos: usize, key: K, value: V) {
		self.keys.insert(pos, key);
		self.values.insert(pos, value);
	}

	/// Removes the key-value pair at `pos`, shifting later entries left.
	#[inline]
	pub(crate) fn remove_entry(&mut self, pos: usize) -> (K, V) {
		(self.keys.remove(pos), self.values.remove(pos))
	}

	/// Removes the last key-value pair.
	#[inline]
	pub(crate) fn pop_entry(&mut self) -> Option<(K, V)> {
		Some((self.keys.pop()?, self.values.pop()?))
	}

	/// Replaces the key-value pair at `pos`, returning the old one.
	#[inline]
	pub(crate) fn replace_entry(&mut self, pos: usize, key: K, value: V) -> (K, V) {
		(std::mem::replace(&mut self.keys[pos], key), std::mem::replace(&mut self.values[pos], value))
	}
}
