//! Cursors and iterators for the `Tree` data structure
//!
//! The [`Cursor`] walks the tree in key order using nothing but the node it
//! currently sits on, a position inside that node, and the parent links each
//! node keeps. No stack, no recursion and no allocation is involved.
//!
//! ## Successor Walk
//!
//! ```text
//!                 [M]
//!               /     \
//!         [D, H]       [Q]
//!        /  |   \      /  \
//!     [A,B][E,F][J,K][N,O][R,S]
//!
//! A -> B                 next key in the same leaf
//! B -> D                 leaf exhausted: climb while the node was the last
//!                        child, stop at the first ancestor key to its right
//! D -> E                 interior key: descend into the child after it,
//!                        then follow first children down to a leaf
//! K -> M                 climb two levels
//! S -> (end)             climbed past the root
//! ```
//!
//! Each step costs O(1) amortized; a full traversal touches every edge twice.
//!
//! [`Iter`] adapts a cursor to [`std::iter::Iterator`].

use std::iter::FusedIterator;

use crate::node::NodeId;
use crate::Tree;

/// An in-order cursor over a [`Tree`].
///
/// A new cursor sits *before* the first entry; the first call to
/// [`next`](Cursor::next) moves it onto the smallest key. Once `next`
/// returns `false` the cursor is exhausted and stays so.
///
/// The cursor borrows the tree, so the tree cannot change underneath it.
pub struct Cursor<'t, 'd, K, V> {
	tree: &'t Tree<'d, K, V>,
	/// Current node, `None` before the first step and once exhausted.
	node: Option<NodeId>,
	/// Key index within `node`.
	position: usize,
	started: bool,
}

impl<'t, 'd, K, V> Cursor<'t, 'd, K, V> {
	pub(crate) fn new(tree: &'t Tree<'d, K, V>) -> Cursor<'t, 'd, K, V> {
		Cursor {
			tree,
			node: None,
			position: 0,
			started: false,
		}
	}

	/// Advances to the next entry in key order.
	///
	/// Returns `false` when there is no further entry.
	pub fn next(&mut self) -> bool {
		if !self.started {
			self.started = true;
			let leaf = self.tree.leftmost_leaf(self.tree.root);
			if self.tree.nodes[leaf].len() == 0 {
				// Only the root can be an empty leaf
				return false;
			}
			self.node = Some(leaf);
			self.position = 0;
			return true;
		}

		let Some(id) = self.node else {
			return false;
		};
		let node = &self.tree.nodes[id];

		match node.child(self.position + 1) {
			Some(child) => {
				// Interior key: its successor is the leftmost entry of the
				// subtree to its right
				self.node = Some(self.tree.leftmost_leaf(child));
				self.position = 0;
				true
			}
			None => {
				self.position += 1;
				if self.position < node.len() {
					return true;
				}
				self.ascend(id)
			}
		}
	}

	/// Climbs from the exhausted node `id` to the first ancestor with a key
	/// to the right of the path, or marks the cursor exhausted.
	fn ascend(&mut self, mut id: NodeId) -> bool {
		loop {
			let node = &self.tree.nodes[id];
			let Some(parent) = node.parent else {
				self.node = None;
				return false;
			};

			if node.position < self.tree.nodes[parent].len() {
				self.node = Some(parent);
				self.position = node.position;
				return true;
			}
			id = parent;
		}
	}

	/// Returns `true` once the cursor has moved past the last entry.
	pub fn is_exhausted(&self) -> bool {
		self.started && self.node.is_none()
	}

	/// The key and value under the cursor.
	pub fn entry(&self) -> Option<(&'t K, &'t V)> {
		let tree: &'t Tree<'d, K, V> = self.tree;
		let node = &tree.nodes[self.node?];
		Some((node.keys.get(self.position)?, node.values.get(self.position)?))
	}

	/// The key under the cursor.
	pub fn key(&self) -> Option<&'t K> {
		self.entry().map(|(k, _)| k)
	}

	/// The value under the cursor.
	pub fn value(&self) -> Option<&'t V> {
		self.entry().map(|(_, v)| v)
	}

	/// A copy of the key under the cursor, made by the key descriptor.
	///
	/// Returns `None` before the first step and once exhausted.
	pub fn get_key(&self) -> Option<K>
	where
		K: Clone,
	{
		self.key().map(|k| self.tree.keys.copy(k))
	}

	/// A copy of the value under the cursor, made by the value descriptor.
	///
	/// Returns `None` before the first step and once exhausted.
	pub fn get_value(&self) -> Option<V>
	where
		V: Clone,
	{
		self.value().map(|v| self.tree.values.copy(v))
	}
}

/// An iterator over the entries of a [`Tree`], in ascending key order.
///
/// Created by [`Tree::iter`].
pub struct Iter<'t, 'd, K, V> {
	cursor: Cursor<'t, 'd, K, V>,
	remaining: usize,
}

impl<'t, 'd, K, V> Iter<'t, 'd, K, V> {
	pub(crate) fn new(tree: &'t Tree<'d, K, V>) -> Iter<'t, 'd, K, V> {
		Iter {
			cursor: Cursor::new(tree),
			remaining: tree.len(),
		}
	}
}

impl<'t, K, V> Iterator for Iter<'t, '_, K, V> {
	type Item = (&'t K, &'t V);

	fn next(&mut self) -> Option<Self::Item> {
		if !self.cursor.next() {
			return None;
		}
		self.remaining = self.remaining.saturating_sub(1);
		self.cursor.entry()
	}

	fn size_hint(&self) -> (usize, Option<usize>) {
		(self.remaining, Some(self.remaining))
	}
}

impl<K, V> ExactSizeIterator for Iter<'_, '_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, '_, K, V> {}
