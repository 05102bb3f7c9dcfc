//! Strided N-dimensional arrays with borrowed views and basic linear algebra.
//!
//! An [`Array`] owns its elements in a [`HybridVec`](nykdtb_hybrid_vec::HybridVec)
//! that keeps small arrays off the heap. [`Slice`] and [`SliceMut`] are
//! windows onto an array, chosen with one [`IndexRange`] per dimension.
//! Both sides implement [`ArrayView`] (and [`ArrayViewMut`] when writable),
//! so everything in [`ops`] works on arrays and slices alike.
//!
//! ```
//! use nykdtb::{Array, IndexRange, ops};
//!
//! let m = Array::from_shape([1.0, 2.0, 3.0, 4.0], &[2, 2])?;
//! let inv = ops::inverse(&m)?;
//! assert_eq!(inv.as_slice(), &[-2.0, 1.0, 1.5, -0.5]);
//!
//! let row = m.slice(&[IndexRange::single(1), IndexRange::all()])?;
//! assert_eq!(ops::dot(&row, &row)?, 25.0);
//! # Ok::<(), nykdtb::Error>(())
//! ```

pub mod array;
pub mod error;
pub mod ops;
pub mod options;
pub mod shape;
pub mod slice;
pub mod view;

pub use array::{Array, Storage};
pub use error::{Error, Result};
pub use options::{InverseOptions, InverseOptionsOverride};
pub use shape::Shape;
pub use slice::{IndexRange, Slice, SliceMut};
pub use view::{ArrayView, ArrayViewMut, Cursor, Iter};

/// Number of elements an [`Array`] stores without allocating.
pub const INLINE_ELEMENTS: usize = 8;

/// Number of dimensions a [`Shape`] stores without allocating.
pub const INLINE_RANK: usize = 4;
