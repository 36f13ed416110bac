//! # Behavior Descriptors
//!
//! A tree never assumes anything about its keys and values beyond what a
//! descriptor tells it. Descriptors are supplied by the caller at
//! construction time and are *borrowed* for the tree's whole lifetime: the
//! tree never owns or frees them.
//!
//! ## Hooks
//!
//! | Hook          | Required        | Default                        |
//! |---------------|-----------------|--------------------------------|
//! | `compare`     | keys only       | -                              |
//! | `copy`        | no              | `Clone::clone`                 |
//! | `pre_destroy` | no              | no-op                          |
//! | `size`        | no              | `size_of::<T>()`               |
//!
//! `compare` lives on [`KeyDescriptor`], so a key descriptor without a
//! comparison cannot be constructed in the first place. Value descriptors
//! only need [`Descriptor`].
//!
//! `pre_destroy` runs exactly once for each stored key and value when it
//! leaves the tree through [`Tree::remove`](crate::Tree::remove),
//! [`Tree::clear`](crate::Tree::clear) or when the tree is dropped. It is
//! meant for elements that own resources outside of Rust's ownership model
//! (handles, pooled buffers, counters); ordinary owned data is released by
//! `Drop` as usual, right after the hook.

use std::cmp::Ordering;
use std::mem;

/// Per-type behavior used by a tree for stored keys and values.
pub trait Descriptor<T> {
	/// Produces a caller-owned copy of a stored element.
	///
	/// Used whenever the tree hands out an element by value, e.g.
	/// [`Tree::get`](crate::Tree::get) or
	/// [`Cursor::get_key`](crate::iter::Cursor::get_key).
	///
	/// Only available for `Clone` elements. Elements that cannot be cloned
	/// are still stored, compared and destroyed normally; read them in place
	/// through [`Tree::lookup`](crate::Tree::lookup),
	/// [`Tree::iter`](crate::Tree::iter) or
	/// [`Cursor::entry`](crate::iter::Cursor::entry) instead.
	fn copy(&self, src: &T) -> T
	where
		T: Clone,
	{
		src.clone()
	}

	/// Called on a stored element right before it leaves the tree.
	fn pre_destroy(&self, item: &mut T) {
		let _ = item;
	}

	/// The footprint of one element, in bytes.
	///
	/// Informational only: nodes store elements by value, so the tree never
	/// consults this hook.
	fn size(&self) -> usize {
		mem::size_of::<T>()
	}

	/// Name of the implementing type. Together with the object's address it
	/// identifies a descriptor in [`Tree::equals`](crate::Tree::equals).
	#[doc(hidden)]
	fn descriptor_type(&self) -> &'static str {
		std::any::type_name::<Self>()
	}
}

/// A [`Descriptor`] that can also order its elements, as keys require.
pub trait KeyDescriptor<T>: Descriptor<T> {
	/// Total ordering of two keys.
	fn compare(&self, a: &T, b: &T) -> Ordering;
}

/// The descriptor for types that already know how to order and copy
/// themselves: `Ord` for comparison, `Clone` for copying, no destroy hook.
///
/// ```
/// use bramble::{Natural, Tree};
///
/// let natural = Natural;
/// let mut tree: Tree<'_, u32, String> = Tree::new(4, &natural, &natural).unwrap();
/// assert!(tree.insert(7, "seven".to_string()));
/// assert_eq!(tree.get(&7), Some("seven".to_string()));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

/// Shared instance backing [`Tree::natural`](crate::Tree::natural).
pub static NATURAL: Natural = Natural;

impl<T> Descriptor<T> for Natural {}

impl<T: Ord> KeyDescriptor<T> for Natural {
	#[inline]
	fn compare(&self, a: &T, b: &T) -> Ordering {
		a.cmp(b)
	}
}

/// Returns `true` if both references point at the same descriptor object.
///
/// The data address alone is not enough: every zero-sized descriptor lives at
/// the same dangling address. The implementing type must match as well. The
/// vtable pointer is left out, since one type may get several vtables.
#[inline]
pub(crate) fn same_descriptor<T, A, B>(a: &A, b: &B) -> bool
where
	A: Descriptor<T> + ?Sized,
	B: Descriptor<T> + ?Sized,
{
	std::ptr::addr_eq(a as *const A, b as *const B) && a.descriptor_type() == b.descriptor_type()
}
