//! # Bramble: An Order-Configurable B-Tree Map
//!
//! This crate provides a classic B-tree (not a B+ tree: keys and values live
//! in interior nodes as well as leaves) whose **order** is chosen at runtime
//! and whose keys and values are described by caller-supplied
//! [descriptors](descriptor).
//!
//! ## Design Overview
//!
//! **Order**: a tree of order `m` has nodes with at most `m` children and
//! `m - 1` keys. Every node except the root holds at least
//! `ceil(m / 2) - 1` keys, and all leaves sit at the same depth.
//!
//! **Descriptors**: comparison, copying and pre-destruction hooks are not
//! taken from trait bounds on `K` and `V` but from a [`KeyDescriptor`] and a
//! [`Descriptor`] borrowed for the lifetime of the tree. [`Natural`] covers
//! the common case of `Ord + Clone` types.
//!
//! **Arena storage with back-links**: nodes live in a [`slab::Slab`] owned by
//! the tree. A parent owns its children by id; each child keeps a
//! non-owning link to its parent together with its own index in the
//! parent's child array. Those links are what let the [`Cursor`] walk the
//! tree in order without recursion or an explicit stack, and what let splits
//! and merges propagate upward.
//!
//! ### Tree Structure
//!
//! ```text
//!                        ┌──────────────┐
//!                        │    [M]       │  <- root (parent = None)
//!                        └──┬────────┬──┘
//!                 ┌─────────┘        └─────────┐
//!                 ▼                            ▼
//!          ┌─────────────┐              ┌─────────────┐
//!          │   [D, H]    │              │   [Q, U]    │  <- interior keys
//!          └┬─────┬─────┬┘              └┬─────┬─────┬┘     are real entries
//!           ▼     ▼     ▼                ▼     ▼     ▼
//!         [A,B] [E,F] [J,K]            [N,O] [R,S] [W,X]  <- leaves
//! ```
//!
//! ## Basic Usage
//!
//! ```
//! use bramble::Tree;
//!
//! let mut tree: Tree<'_, u32, &str> = Tree::natural(4).unwrap();
//!
//! assert!(tree.insert(2, "two"));
//! assert!(tree.insert(1, "one"));
//! assert!(!tree.insert(1, "uno")); // duplicates are rejected
//!
//! assert_eq!(tree.get(&1), Some("one"));
//! assert!(tree.contains_key(&2));
//!
//! let keys: Vec<u32> = tree.iter().map(|(k, _)| *k).collect();
//! assert_eq!(keys, vec![1, 2]);
//!
//! assert!(tree.remove(&1));
//! assert_eq!(tree.len(), 1);
//! ```
//!
//! ## Thread Safety
//!
//! None. The tree performs no internal synchronization; share it across
//! threads only behind an external lock. A [`Cursor`] borrows its tree, so
//! the tree cannot be mutated while one is alive.

use std::cmp::Ordering;
use std::fmt;

use slab::Slab;
use smallvec::smallvec;
use tracing::trace;

pub mod descriptor;
pub mod error;
pub mod iter;
mod node;

pub use descriptor::{Descriptor, KeyDescriptor, Natural, NATURAL};
pub use error::{Error, Result};
pub use iter::{Cursor, Iter};

use descriptor::same_descriptor;
use node::{Node, NodeId};

// ---------------------------------------------------------------------------
// Configuration Constants
// ---------------------------------------------------------------------------

/// The smallest order a tree can be created with.
pub const MIN_ORDER: usize = 3;

// ---------------------------------------------------------------------------
// Core Tree Structure
// ---------------------------------------------------------------------------

/// An ordered map backed by a B-tree of runtime-configurable order.
///
/// # Type Parameters
///
/// - `'d`: Lifetime of the borrowed descriptors. They must outlive the tree.
/// - `K`: The key type, ordered by the key descriptor.
/// - `V`: The value type.
///
/// # Internal Structure
///
/// - `nodes`: arena holding every node reachable from `root`, and nothing else.
/// - `root`: always present; an empty tree is a single leaf with no keys.
/// - `len`: total number of entries across all nodes.
pub struct Tree<'d, K, V> {
	nodes: Slab<Node<K, V>>,
	root: NodeId,
	len: usize,
	order: usize,
	keys: &'d dyn KeyDescriptor<K>,
	values: &'d dyn Descriptor<V>,
}

// ---------------------------------------------------------------------------
// Tree Lifecycle
// ---------------------------------------------------------------------------

impl<'d, K, V> Tree<'d, K, V> {
	/// Creates a new, empty tree of the given order.
	///
	/// The tree starts as a single empty leaf. The descriptors are borrowed,
	/// never owned: they must stay alive until the tree is dropped.
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidOrder`] if `order < 3`.
	///
	/// # Example
	///
	/// ```
	/// use bramble::{Natural, Tree};
	///
	/// let natural = Natural;
	/// let tree: Tree<'_, String, i32> = Tree::new(5, &natural, &natural).unwrap();
	/// assert!(tree.is_empty());
	/// assert_eq!(tree.height(), 1);
	///
	/// assert!(Tree::<String, i32>::new(2, &natural, &natural).is_err());
	/// ```
	pub fn new(
		order: usize,
		keys: &'d dyn KeyDescriptor<K>,
		values: &'d dyn Descriptor<V>,
	) -> Result<Self> {
		if order < MIN_ORDER {
			return Err(Error::InvalidOrder {
				order,
			});
		}

		let mut nodes = Slab::new();
		let root = nodes.insert(Node::new());

		Ok(Tree {
			nodes,
			root,
			len: 0,
			order,
			keys,
			values,
		})
	}

	/// The order the tree was created with.
	#[inline]
	pub fn order(&self) -> usize {
		self.order
	}

	/// The descriptor used to compare and copy keys.
	#[inline]
	pub fn key_descriptor(&self) -> &'d dyn KeyDescriptor<K> {
		self.keys
	}

	/// The descriptor used to copy and release values.
	#[inline]
	pub fn value_descriptor(&self) -> &'d dyn Descriptor<V> {
		self.values
	}

	/// Returns the number of entries in the tree.
	#[inline]
	pub fn len(&self) -> usize {
		self.len
	}

	/// Returns `true` if the tree contains no entries.
	#[inline]
	pub fn is_empty(&self) -> bool {
		self.len == 0
	}

	/// Returns the number of levels in the tree.
	///
	/// - Height 1: the root is a leaf
	/// - Height N: N-1 levels of interior nodes above one level of leaves
	pub fn height(&self) -> usize {
		let mut height = 1;
		let mut id = self.root;
		while let Some(child) = self.nodes[id].child(0) {
			height += 1;
			id = child;
		}
		height
	}

	/// Removes all entries from the tree.
	///
	/// Every stored key and value goes through its descriptor's
	/// `pre_destroy` hook exactly once, then all nodes are released and the
	/// tree is reset to a single empty leaf of the same order.
	pub fn clear(&mut self) {
		self.destroy_subtree(self.root);
		self.nodes.clear();
		self.root = self.nodes.insert(Node::new());
		trace!(released = self.len, "cleared tree");
		self.len = 0;
	}

	/// Runs the pre-destroy hooks for every entry under `id`, node by node
	/// in pre-order.
	fn destroy_subtree(&mut self, id: NodeId) {
		let node = &mut self.nodes[id];
		for (key, value) in node.keys.iter_mut().zip(node.values.iter_mut()) {
			self.keys.pre_destroy(key);
			self.values.pre_destroy(value);
		}

		for idx in 0..self.nodes[id].children.len() {
			let child = self.nodes[id].children[idx];
			self.destroy_subtree(child);
		}
	}

	// -----------------------------------------------------------------------
	// Node Helpers
	// -----------------------------------------------------------------------

	/// Maximum keys per node.
	#[inline]
	fn max_keys(&self) -> usize {
		self.order - 1
	}

	/// Minimum keys per non-root node: `ceil(order / 2) - 1`.
	#[inline]
	fn min_keys(&self) -> usize {
		self.order.div_ceil(2) - 1
	}

	/// Split point of a full node: `ceil((order - 1) / 2)`.
	#[inline]
	fn pivot(&self) -> usize {
		self.order / 2
	}

	/// Follows first-child links from `id` down to a leaf.
	pub(crate) fn leftmost_leaf(&self, mut id: NodeId) -> NodeId {
		while let Some(child) = self.nodes[id].child(0) {
			id = child;
		}
		id
	}

	/// Follows last-child links from `id` down to a leaf.
	pub(crate) fn rightmost_leaf(&self, mut id: NodeId) -> NodeId {
		while let Some(&child) = self.nodes[id].children.last() {
			id = child;
		}
		id
	}

	/// Points the parent link and position of `id`'s children, starting at
	/// `from`, back at `id`.
	fn adopt_children(&mut self, id: NodeId, from: usize) {
		for idx in from..self.nodes[id].children.len() {
			let child = self.nodes[id].children[idx];
			let node = &mut self.nodes[child];
			node.parent = Some(id);
			node.position = idx;
		}
	}

	// -----------------------------------------------------------------------
	// Lookup Operations
	// -----------------------------------------------------------------------

	/// Descends from the root towards `key`.
	///
	/// The search stops at the first node holding an equal key (which may be
	/// an interior node) or at a leaf. Returns that node together with the
	/// result of scanning it: `Ok(pos)` for a match, `Err(pos)` for the
	/// insertion position.
	fn find_node_for_key(&self, key: &K) -> (NodeId, std::result::Result<usize, usize>) {
		let mut id = self.root;
		loop {
			let node = &self.nodes[id];
			let found = node.search(key, self.keys);
			match found {
				Ok(_) => return (id, found),
				Err(pos) => match node.child(pos) {
					Some(child) => id = child,
					None => return (id, found),
				},
			}
		}
	}

	/// Looks up a key and calls `f` with a reference to its value.
	///
	/// # Example
	///
	/// ```
	/// use bramble::Tree;
	///
	/// let mut tree: Tree<'_, i32, String> = Tree::natural(3).unwrap();
	/// tree.insert(1, "one".to_string());
	///
	/// assert_eq!(tree.lookup(&1, |v| v.len()), Some(3));
	/// assert_eq!(tree.lookup(&2, |v| v.len()), None);
	/// ```
	pub fn lookup<R, F>(&self, key: &K, f: F) -> Option<R>
	where
		F: FnOnce(&V) -> R,
	{
		let (id, found) = self.find_node_for_key(key);
		let pos = found.ok()?;
		Some(f(&self.nodes[id].values[pos]))
	}

	/// Returns a copy of the value for `key`, made by the value descriptor.
	pub fn get(&self, key: &K) -> Option<V>
	where
		V: Clone,
	{
		self.lookup(key, |v| self.values.copy(v))
	}

	/// Returns `true` if the tree contains `key`.
	pub fn contains_key(&self, key: &K) -> bool {
		self.find_node_for_key(key).1.is_ok()
	}

	/// Returns the entry with the smallest key.
	pub fn first_key_value(&self) -> Option<(&K, &V)> {
		let node = &self.nodes[self.leftmost_leaf(self.root)];
		Some((node.keys.first()?, node.values.first()?))
	}

	/// Returns the entry with the largest key.
	pub fn last_key_value(&self) -> Option<(&K, &V)> {
		let node = &self.nodes[self.rightmost_leaf(self.root)];
		Some((node.keys.last()?, node.values.last()?))
	}

	// -----------------------------------------------------------------------
	// Insertion
	// -----------------------------------------------------------------------

	/// Inserts a key-value pair.
	///
	/// Returns `false`, leaving the tree untouched, if an equal key is
	/// already present: the stored value is **not** replaced.
	///
	/// # Example
	///
	/// ```
	/// use bramble::Tree;
	///
	/// let mut tree: Tree<'_, i32, &str> = Tree::natural(3).unwrap();
	/// assert!(tree.insert(1, "one"));
	/// assert!(!tree.insert(1, "uno"));
	/// assert_eq!(tree.get(&1), Some("one"));
	/// ```
	pub fn insert(&mut self, key: K, value: V) -> bool {
		let (id, found) = self.find_node_for_key(&key);
		let Err(pos) = found else {
			return false;
		};

		// A failed search always ends in a leaf
		self.insert_into(id, pos, key, value, None);
		self.len += 1;
		true
	}

	/// Inserts an entry at `pos` in node `id`, splitting as needed.
	///
	/// `right` is the child that goes immediately after the new key: `None`
	/// when inserting into a leaf, the freshly split sibling when a
	/// separator is pushed up into an interior node.
	fn insert_into(&mut self, id: NodeId, pos: usize, key: K, value: V, right: Option<NodeId>) {
		if self.nodes[id].len() < self.max_keys() {
			let node = &mut self.nodes[id];
			node.insert_entry(pos, key, value);
			if let Some(right) = right {
				node.children.insert(pos + 1, right);
				self.adopt_children(id, pos + 1);
			}
			return;
		}

		let (sep_key, sep_value, sibling) = self.split(id, pos, key, value, right);

		match self.nodes[id].parent {
			None => self.grow_root(sep_key, sep_value, sibling),
			Some(parent) => {
				let position = self.nodes[id].position;
				self.insert_into(parent, position, sep_key, sep_value, Some(sibling));
			}
		}
	}

	/// Splits the full node `id` while inserting a new entry at `pos`.
	///
	/// The node keeps the lower half; a new right sibling receives the upper
	/// half. Which entry becomes the separator depends on where `pos` falls
	/// relative to the pivot:
	///
	/// ```text
	/// order = 5, pivot = 2, node = [a, b, c, d]
	///
	/// pos > pivot  (insert x at 3):  [a, b]  c  [x, d]
	/// pos < pivot  (insert x at 0):  [x, a]  b  [c, d]
	/// pos == pivot (insert x at 2):  [a, b]  x  [c, d]
	/// ```
	///
	/// Child links are partitioned the same way, with `child` placed right
	/// after the new key.
	///
	/// # Returns
	///
	/// The separator entry and the id of the new right sibling.
	fn split(
		&mut self,
		id: NodeId,
		pos: usize,
		key: K,
		value: V,
		child: Option<NodeId>,
	) -> (K, V, NodeId) {
		let pivot = self.pivot();
		let node = &mut self.nodes[id];
		let mut right = Node::new();

		let (sep_key, sep_value) = match pos.cmp(&pivot) {
			Ordering::Greater => {
				// Entries after the pivot move right, the new one among them
				right.keys.extend(node.keys.drain(pivot + 1..));
				right.values.extend(node.values.drain(pivot + 1..));
				right.insert_entry(pos - pivot - 1, key, value);
				if let Some(child) = child {
					right.children.extend(node.children.drain(pivot + 1..));
					right.children.insert(pos - pivot, child);
				}
				node.remove_entry(pivot)
			}
			Ordering::Less => {
				// Entries from the pivot on move right, the new one stays left
				right.keys.extend(node.keys.drain(pivot..));
				right.values.extend(node.values.drain(pivot..));
				if let Some(child) = child {
					right.children.extend(node.children.drain(pivot..));
					node.children.insert(pos + 1, child);
				}
				let separator = node.remove_entry(pivot - 1);
				node.insert_entry(pos, key, value);
				separator
			}
			Ordering::Equal => {
				// The new entry itself is the separator
				right.keys.extend(node.keys.drain(pivot..));
				right.values.extend(node.values.drain(pivot..));
				if let Some(child) = child {
					right.children.extend(node.children.drain(pivot + 1..));
					right.children.insert(0, child);
				}
				(key, value)
			}
		};

		let interior = !right.is_leaf();
		let sibling = self.nodes.insert(right);
		if interior {
			self.adopt_children(id, 0);
			self.adopt_children(sibling, 0);
		}

		trace!(node = id, sibling, pos, pivot, interior, "split full node");

		(sep_key, sep_value, sibling)
	}

	/// Replaces the root with a new one holding only the separator, with the
	/// old root and its new sibling as children. The tree grows by one level.
	fn grow_root(&mut self, key: K, value: V, sibling: NodeId) {
		let old_root = self.root;

		let mut root = Node::new();
		root.insert_entry(0, key, value);
		root.children = smallvec![old_root, sibling];

		self.root = self.nodes.insert(root);
		self.adopt_children(self.root, 0);

		trace!(root = self.root, old_root, sibling, "grew new root");
	}

	// -----------------------------------------------------------------------
	// Deletion
	// -----------------------------------------------------------------------

	/// Removes `key` from the tree.
	///
	/// Returns `false`, leaving the tree untouched, if the key is absent.
	/// Otherwise the stored key and value go through their descriptors'
	/// `pre_destroy` hooks and are dropped.
	///
	/// # Example
	///
	/// ```
	/// use bramble::Tree;
	///
	/// let mut tree: Tree<'_, i32, i32> = Tree::natural(3).unwrap();
	/// tree.insert(1, 10);
	/// assert!(tree.remove(&1));
	/// assert!(!tree.remove(&1));
	/// assert!(tree.is_empty());
	/// ```
	pub fn remove(&mut self, key: &K) -> bool {
		let (id, found) = self.find_node_for_key(key);
		let Ok(pos) = found else {
			return false;
		};

		let node = &mut self.nodes[id];
		self.keys.pre_destroy(&mut node.keys[pos]);
		self.values.pre_destroy(&mut node.values[pos]);

		let underfull = if node.is_leaf() {
			node.remove_entry(pos);
			id
		} else {
			// Replace with the predecessor, the last entry of the rightmost
			// leaf in the subtree left of the key
			let left_child = node.children[pos];
			let leaf = self.rightmost_leaf(left_child);
			let (pred_key, pred_value) =
				self.nodes[leaf].pop_entry().expect("non-root leaf must hold at least one key");
			self.nodes[id].replace_entry(pos, pred_key, pred_value);
			leaf
		};

		self.len -= 1;
		self.rebalance(underfull);
		true
	}

	/// Restores the minimum occupancy of `id` after it lost a key.
	///
	/// In order of preference:
	/// 1. Borrow through the parent from the right sibling
	/// 2. Borrow through the parent from the left sibling
	/// 3. Merge with a sibling and rebalance the parent
	///
	/// An empty interior root is replaced by its only child.
	fn rebalance(&mut self, id: NodeId) {
		let min = self.min_keys();
		let node = &self.nodes[id];
		if node.len() >= min {
			return;
		}

		let Some(parent) = node.parent else {
			if node.len() == 0 && !node.is_leaf() {
				self.collapse_root();
			}
			return;
		};

		let position = node.position;

		if let Some(right) = self.nodes[parent].child(position + 1) {
			if self.nodes[right].len() > min {
				self.borrow_from_right(parent, position);
				return;
			}
		}

		if position > 0 {
			let left = self.nodes[parent].children[position - 1];
			if self.nodes[left].len() > min {
				self.borrow_from_left(parent, position);
				return;
			}
		}

		if position == 0 {
			self.merge_children(parent, 0);
		} else {
			self.merge_children(parent, position - 1);
		}

		self.rebalance(parent);
	}

	/// Rotates the first entry of child `idx + 1` up into the parent and the
	/// separator down into child `idx`.
	///
	/// ```text
	///        [.. S ..]                 [.. R0 ..]
	///        /       \        =>       /        \
	///   [a, b]     [R0, R1, R2]   [a, b, S]    [R1, R2]
	/// ```
	fn borrow_from_right(&mut self, parent: NodeId, idx: usize) {
		let node = self.nodes[parent].children[idx];
		let right = self.nodes[parent].children[idx + 1];

		let sibling = &mut self.nodes[right];
		let (key, value) = sibling.remove_entry(0);
		let child = if sibling.is_leaf() {
			None
		} else {
			Some(sibling.children.remove(0))
		};
		if child.is_some() {
			self.adopt_children(right, 0);
		}

		let (sep_key, sep_value) = self.nodes[parent].replace_entry(idx, key, value);

		let target = &mut self.nodes[node];
		target.keys.push(sep_key);
		target.values.push(sep_value);
		if let Some(child) = child {
			target.children.push(child);
			let last = target.children.len() - 1;
			self.adopt_children(node, last);
		}

		trace!(node, sibling = right, "borrowed from right sibling");
	}

	/// Mirror image of [`Self::borrow_from_right`]: rotates the last entry of
	/// child `idx - 1` up into the parent and the separator down into child
	/// `idx`.
	fn borrow_from_left(&mut self, parent: NodeId, idx: usize) {
		let node = self.nodes[parent].children[idx];
		let left = self.nodes[parent].children[idx - 1];

		let sibling = &mut self.nodes[left];
		let (key, value) = sibling.pop_entry().expect("sibling with spare keys is not empty");
		let child = sibling.children.pop();

		let (sep_key, sep_value) = self.nodes[parent].replace_entry(idx - 1, key, value);

		let target = &mut self.nodes[node];
		target.insert_entry(0, sep_key, sep_value);
		if let Some(child) = child {
			target.children.insert(0, child);
			self.adopt_children(node, 0);
		}

		trace!(node, sibling = left, "borrowed from left sibling");
	}

	/// Folds child `idx + 1` and the separator between them into child `idx`.
	///
	/// ```text
	///        [.. S ..]
	///        /       \         =>     [.. ..]
	///     [a]        [c, d]              |
	///                                [a, S, c, d]
	/// ```
	///
	/// The parent loses one key and one child; the right node is freed.
	fn merge_children(&mut self, parent: NodeId, idx: usize) {
		let (sep_key, sep_value) = self.nodes[parent].remove_entry(idx);
		let right = self.nodes[parent].children.remove(idx + 1);
		self.adopt_children(parent, idx + 1);

		let left = self.nodes[parent].children[idx];
		let absorbed = self.nodes.remove(right);

		let target = &mut self.nodes[left];
		let base = target.children.len();
		target.keys.push(sep_key);
		target.values.push(sep_value);
		target.keys.extend(absorbed.keys);
		target.values.extend(absorbed.values);
		target.children.extend(absorbed.children);
		self.adopt_children(left, base);

		trace!(node = left, absorbed = right, parent, "merged siblings");
	}

	/// Promotes the only child of an empty interior root. The tree shrinks by
	/// one level.
	fn collapse_root(&mut self) {
		let old_root = self.root;
		let child = self.nodes[old_root].children[0];
		self.nodes.remove(old_root);

		let node = &mut self.nodes[child];
		node.parent = None;
		node.position = 0;
		self.root = child;

		trace!(root = child, old_root, "collapsed root");
	}

	// -----------------------------------------------------------------------
	// Equality
	// -----------------------------------------------------------------------

	/// Structural equality of two trees.
	///
	/// Trees are equal when they share the same order, the same descriptor
	/// objects (by address) and the same length, and their nodes match
	/// position by position: same key counts, keys comparing equal under the
	/// key descriptor, and the same child layout. Values are not compared.
	///
	/// Two trees holding the same entries but built in different insertion
	/// orders may have different shapes and then compare unequal.
	///
	/// Descriptors are identified by address and implementing type.
	/// Zero-sized descriptors such as [`Natural`] carry no address of their
	/// own, so two distinct instances of the *same* type may or may not count
	/// as the same descriptor; descriptors of different types never do.
	/// Share one instance (or [`NATURAL`]) between trees that are meant to be
	/// compared.
	///
	/// # Example
	///
	/// ```
	/// use bramble::Tree;
	///
	/// let mut a: Tree<'_, i32, i32> = Tree::natural(4).unwrap();
	/// let mut b: Tree<'_, i32, i32> = Tree::natural(4).unwrap();
	/// for i in 0..20 {
	///     a.insert(i, i);
	///     b.insert(i, -i);
	/// }
	/// assert!(Tree::equals(&a, &b));
	///
	/// b.remove(&7);
	/// assert!(!Tree::equals(&a, &b));
	/// ```
	pub fn equals(a: &Tree<'_, K, V>, b: &Tree<'_, K, V>) -> bool {
		if a.order != b.order
			|| !same_descriptor(a.keys, b.keys)
			|| !same_descriptor(a.values, b.values)
			|| a.len != b.len
		{
			return false;
		}

		a.node_equals(a.root, b, b.root)
	}

	fn node_equals(&self, id: NodeId, other: &Tree<'_, K, V>, other_id: NodeId) -> bool {
		let left = &self.nodes[id];
		let right = &other.nodes[other_id];

		left.len() == right.len()
			&& left.keys.iter().zip(&right.keys).all(|(a, b)| self.keys.compare(a, b).is_eq())
			&& left.children.len() == right.children.len()
			&& left
				.children
				.iter()
				.zip(&right.children)
				.all(|(&a, &b)| self.node_equals(a, other, b))
	}

	// -----------------------------------------------------------------------
	// Iteration
	// -----------------------------------------------------------------------

	/// Returns a cursor positioned before the first entry.
	///
	/// # Example
	///
	/// ```
	/// use bramble::Tree;
	///
	/// let mut tree: Tree<'_, char, u32> = Tree::natural(3).unwrap();
	/// for c in ['b', 'c', 'a'] {
	///     tree.insert(c, c as u32);
	/// }
	///
	/// let mut cursor = tree.cursor();
	/// let mut seen = Vec::new();
	/// while cursor.next() {
	///     seen.push(cursor.get_key().unwrap());
	/// }
	/// assert_eq!(seen, vec!['a', 'b', 'c']);
	/// ```
	pub fn cursor(&self) -> Cursor<'_, 'd, K, V> {
		Cursor::new(self)
	}

	/// Returns an iterator over the entries, in ascending key order.
	pub fn iter(&self) -> Iter<'_, 'd, K, V> {
		Iter::new(self)
	}
}

impl<K: Ord, V> Tree<'static, K, V> {
	/// Creates a new, empty tree that orders and copies with [`Natural`].
	///
	/// # Errors
	///
	/// Returns [`Error::InvalidOrder`] if `order < 3`.
	pub fn natural(order: usize) -> Result<Self> {
		Tree::new(order, &NATURAL, &NATURAL)
	}
}

impl<K, V> Drop for Tree<'_, K, V> {
	fn drop(&mut self) {
		self.destroy_subtree(self.root);
	}
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for Tree<'_, K, V> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_map().entries(self.iter()).finish()
	}
}

impl<'t, 'd, K, V> IntoIterator for &'t Tree<'d, K, V> {
	type Item = (&'t K, &'t V);
	type IntoIter = Iter<'t, 'd, K, V>;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

// ===========================================================================
// Test-Only Validation Module
// ===========================================================================

/// Invariant validation for testing.
#[cfg(any(test, feature = "test-utils"))]
impl<K: fmt::Debug, V> Tree<'_, K, V> {
	/// Validates all tree invariants. Panics with diagnostic info if any
	/// invariant is violated.
	///
	/// # Invariants Checked
	///
	/// 1. Root: has no parent link
	/// 2. Occupancy: every node holds at most `order - 1` keys, every
	///    non-root node at least `ceil(order / 2) - 1`
	/// 3. Shape: interior nodes with `n` keys have `n + 1` children
	/// 4. Depth: all leaves at the same depth
	/// 5. Ordering: keys strictly ascending within each node and within the
	///    bounds set by the parent's separators
	/// 6. Back-links: every child points at its parent and knows its index
	/// 7. Accounting: `len` and the arena size match what is reachable
	pub fn assert_invariants(&self) {
		let root = &self.nodes[self.root];
		assert_eq!(root.parent, None, "Root {} has a parent link", self.root);

		let height = self.height();
		let (entries, nodes) = self.validate_node_recursive(self.root, 1, height, None, None);

		assert_eq!(entries, self.len, "Tree len {} != reachable entries {}", self.len, entries);
		assert_eq!(
			nodes,
			self.nodes.len(),
			"Reachable nodes {} != arena size {}",
			nodes,
			self.nodes.len()
		);
	}

	/// Recursively validates a node and its subtree.
	///
	/// # Arguments
	/// * `id` - The node to validate
	/// * `depth` - Current depth (1 = root)
	/// * `height` - Total tree height
	/// * `lower` - Exclusive lower bound from the parent, None if leftmost
	/// * `upper` - Exclusive upper bound from the parent, None if rightmost
	///
	/// Returns the number of entries and nodes in the subtree.
	fn validate_node_recursive(
		&self,
		id: NodeId,
		depth: usize,
		height: usize,
		lower: Option<&K>,
		upper: Option<&K>,
	) -> (usize, usize) {
		let node = &self.nodes[id];
		let len = node.len();

		assert_eq!(
			len,
			node.values.len(),
			"Node {} keys.len() {} != values.len() {}",
			id,
			len,
			node.values.len()
		);
		assert!(len <= self.max_keys(), "Node {} holds {} keys, max is {}", id, len, self.max_keys());
		if id != self.root {
			assert!(
				len >= self.min_keys(),
				"Node {} holds {} keys, min is {}",
				id,
				len,
				self.min_keys()
			);
		}

		for i in 1..len {
			assert!(
				self.keys.compare(&node.keys[i - 1], &node.keys[i]).is_lt(),
				"Keys not sorted in node {} at positions {} and {}: {:?} >= {:?}",
				id,
				i - 1,
				i,
				node.keys[i - 1],
				node.keys[i]
			);
		}

		for key in &node.keys[..] {
			if let Some(lower) = lower {
				assert!(
					self.keys.compare(key, lower).is_gt(),
					"Key {:?} in node {} not greater than parent lower bound {:?}",
					key,
					id,
					lower
				);
			}
			if let Some(upper) = upper {
				assert!(
					self.keys.compare(key, upper).is_lt(),
					"Key {:?} in node {} not less than parent upper bound {:?}",
					key,
					id,
					upper
				);
			}
		}

		if node.is_leaf() {
			assert_eq!(depth, height, "Leaf {} at depth {} but height is {}", id, depth, height);
			return (len, 1);
		}

		assert_eq!(
			node.children.len(),
			len + 1,
			"Interior node {} with {} keys has {} children",
			id,
			len,
			node.children.len()
		);

		let mut entries = len;
		let mut nodes = 1;
		for (i, &child) in node.children.iter().enumerate() {
			let child_node = &self.nodes[child];
			assert_eq!(child_node.parent, Some(id), "Child {} of {} has parent link {:?}", child, id, child_node.parent);
			assert_eq!(child_node.position, i, "Child {} of {} recorded at position {}", child, id, child_node.position);

			let child_lower = if i == 0 {
				lower
			} else {
				Some(&node.keys[i - 1])
			};
			let child_upper = if i == len {
				upper
			} else {
				Some(&node.keys[i])
			};

			let (e, n) = self.validate_node_recursive(child, depth + 1, height, child_lower, child_upper);
			entries += e;
			nodes += n;
		}

		(entries, nodes)
	}

	/// Key counts of every node, level by level from the root, left to right.
	///
	/// ```text
	///        [M]            =>  [[1], [2, 2]]
	///     [D, H] [Q, U]
	/// ```
	pub fn level_shapes(&self) -> Vec<Vec<usize>> {
		let mut shapes = Vec::new();
		let mut level = vec![self.root];
		while !level.is_empty() {
			shapes.push(level.iter().map(|&id| self.nodes[id].len()).collect());
			level = level.iter().flat_map(|&id| self.nodes[id].children.iter().copied()).collect();
		}
		shapes
	}
}
