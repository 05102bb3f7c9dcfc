//! Numeric operations over anything implementing [`ArrayView`].
//!
//! Binary operations require equal shapes (or, for [`dot`], equal sizes) and
//! check them before touching any element.

mod elementwise;
mod matrix;
mod vector;

pub use elementwise::*;
pub use matrix::{identity, inverse, inverse_with, is_square, mat_mul, rot_angle_mx};
pub use vector::{cross3, dot, magnitude, normalize, normalize_assign};

use num_traits::Float;

use crate::{
    error::{Error, Result},
    shape::Shape,
    view::ArrayView,
};

pub(crate) fn ensure_same_shape(lhs: &[usize], rhs: &[usize]) -> Result<()> {
    if lhs != rhs {
        return Err(Error::ShapesDoNotMatch {
            lhs: Shape::from_slice(lhs),
            rhs: Shape::from_slice(rhs),
        });
    }
    Ok(())
}

/// Whether `lhs` and `rhs` have the same shape and equal elements.
pub fn eq<T, L, R>(lhs: &L, rhs: &R) -> bool
where
    T: PartialEq,
    L: ArrayView<T> + ?Sized,
    R: ArrayView<T> + ?Sized,
{
    lhs.shape() == rhs.shape() && lhs.iter().eq(rhs.iter())
}

/// Like [`eq`], allowing each pair of elements to differ by `epsilon`.
pub fn approx_eq<T, L, R>(lhs: &L, rhs: &R, epsilon: T) -> bool
where
    T: Float,
    L: ArrayView<T> + ?Sized,
    R: ArrayView<T> + ?Sized,
{
    lhs.shape() == rhs.shape()
        && lhs.iter().zip(rhs.iter()).all(|(&l, &r)| (l - r).abs() <= epsilon)
}
