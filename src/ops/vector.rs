use core::ops::{Mul, Sub};

use num_traits::{Float, Zero};

use crate::{
    Array,
    error::{Error, Result},
    view::{ArrayView, ArrayViewMut},
};

/// Sum of elementwise products. Only the sizes must agree, not the shapes.
pub fn dot<T, L, R>(lhs: &L, rhs: &R) -> Result<T>
where
    T: Copy + Zero + Mul<Output = T>,
    L: ArrayView<T> + ?Sized,
    R: ArrayView<T> + ?Sized,
{
    if lhs.size() != rhs.size() {
        return Err(Error::SizesDoNotMatch {
            lhs: lhs.size(),
            rhs: rhs.size(),
        });
    }
    Ok(lhs.iter().zip(rhs.iter()).fold(T::zero(), |acc, (&l, &r)| acc + l * r))
}

/// Euclidean norm over all elements.
pub fn magnitude<T, A>(array: &A) -> T
where
    T: Float,
    A: ArrayView<T> + ?Sized,
{
    array.iter().fold(T::zero(), |acc, &x| acc + x * x).sqrt()
}

/// Scales `array` to unit magnitude in place.
pub fn normalize_assign<T, A>(array: &mut A) -> Result<()>
where
    T: Float,
    A: ArrayViewMut<T> + ?Sized,
{
    let magnitude = magnitude(&*array);
    if magnitude.is_zero() {
        return Err(Error::DivisionByZero);
    }
    array.for_each_mut(|x| *x = *x / magnitude);
    Ok(())
}

/// A copy of `array` scaled to unit magnitude.
pub fn normalize<T, A>(array: &A) -> Result<Array<T>>
where
    T: Float,
    A: ArrayView<T> + ?Sized,
{
    let mut result = array.materialize();
    normalize_assign(&mut result)?;
    Ok(result)
}

/// Cross product of two 3-element vectors, as a `[1, 3]` array.
///
/// Reads the first three elements of each operand in row-major order;
/// both must hold at least three.
pub fn cross3<T, L, R>(lhs: &L, rhs: &R) -> Array<T>
where
    T: Copy + Mul<Output = T> + Sub<Output = T>,
    L: ArrayView<T> + ?Sized,
    R: ArrayView<T> + ?Sized,
{
    debug_assert!(lhs.size() >= 3 && rhs.size() >= 3);
    let (a0, a1, a2) = (*lhs.get(0), *lhs.get(1), *lhs.get(2));
    let (b0, b1, b2) = (*rhs.get(0), *rhs.get(1), *rhs.get(2));
    let storage = [a1 * b2 - a2 * b1, a2 * b0 - a0 * b2, a0 * b1 - a1 * b0];
    Array::from_parts(storage.into(), [1, 3].into())
}
