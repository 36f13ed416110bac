//! # Error Types for the B-Tree
//!
//! Almost every tree operation reports its outcome as a `bool` or an
//! `Option`: a duplicate insert, or a lookup/removal of a missing key, is an
//! expected result rather than an error. The only failure that is surfaced
//! as an [`Error`] is construction with an unusable configuration.
//!
//! ```
//! use bramble::{error::Error, Natural, Tree};
//!
//! let natural = Natural;
//! let result = Tree::<i32, i32>::new(2, &natural, &natural);
//! assert!(matches!(result, Err(Error::InvalidOrder { order: 2 })));
//! ```

use thiserror::Error;

/// Errors that can occur while building a tree.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
	/// The requested order is too small to form a B-tree.
	///
	/// A node of order `m` holds up to `m - 1` keys and splits around a
	/// pivot, so both halves of a split need at least one key. That requires
	/// `m >= 3`.
	#[error("invalid tree order {order}: must be at least {}", crate::MIN_ORDER)]
	InvalidOrder {
		/// The order that was requested.
		order: usize,
	},
}

/// A Result type alias using our custom Error type.
pub type Result<T> = std::result::Result<T, Error>;
