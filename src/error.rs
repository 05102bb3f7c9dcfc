use thiserror::Error;

use crate::shape::Shape;

/// Crate-wide result alias.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported by array construction, slicing and the numeric operations.
///
/// Every variant is raised before the operation mutates anything, so a
/// failed call leaves its inputs exactly as they were.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error(
        "shape {shape:?} holds {} elements but the storage has {size}",
        crate::shape::size(shape)
    )]
    ShapeDoesNotMatchSize { shape: Shape, size: usize },

    #[error("shapes do not match: {lhs:?} vs {rhs:?}")]
    ShapesDoNotMatch { lhs: Shape, rhs: Shape },

    #[error("sizes do not match: {lhs} vs {rhs}")]
    SizesDoNotMatch { lhs: usize, rhs: usize },

    #[error("{ranges} index ranges given for an array of rank {rank}")]
    InvalidSliceShape { ranges: usize, rank: usize },

    #[error("range {begin}..{end} is out of bounds for dimension {dim} of extent {extent}")]
    SliceOutOfBounds {
        dim: usize,
        begin: usize,
        end: usize,
        extent: usize,
    },

    #[error("expected a {expected} matrix, got shape {shape:?}")]
    MatrixShape { shape: Shape, expected: &'static str },

    #[error("division by zero")]
    DivisionByZero,

    #[error("matrix is singular (no usable pivot in column {column})")]
    SingularMatrix { column: usize },
}
