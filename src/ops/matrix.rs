use core::ops::{AddAssign, Mul};

use num_traits::{Float, NumAssign, One, Zero};
use tracing::debug;

use super::{mul_scalar, normalize, sub_assign};
use crate::{
    Array,
    error::{Error, Result},
    options::{InverseOptions, InverseOptionsOverride},
    shape::Shape,
    slice::IndexRange,
    view::{ArrayView, ArrayViewMut},
};

/// Whether `shape` describes a rank-2 matrix with equal extents.
pub fn is_square(shape: &[usize]) -> bool {
    matches!(shape, [rows, cols] if rows == cols)
}

fn square_extent(shape: &[usize]) -> Result<usize> {
    match shape {
        [rows, cols] if rows == cols => Ok(*rows),
        _ => Err(Error::MatrixShape {
            shape: Shape::from_slice(shape),
            expected: "square",
        }),
    }
}

/// The identity matrix of a square `shape`.
pub fn identity<T>(shape: &[usize]) -> Result<Array<T>>
where
    T: Zero + One + Clone,
{
    let n = square_extent(shape)?;
    let mut result = Array::zeros(shape);
    for i in 0..n {
        result[[i, i]] = T::one();
    }
    Ok(result)
}

/// Inverse of a square matrix, using the default [`InverseOptions`].
pub fn inverse<T, M>(matrix: &M) -> Result<Array<T>>
where
    T: Float + NumAssign,
    M: ArrayView<T> + ?Sized,
{
    inverse_with(matrix, InverseOptionsOverride::default())
}

/// Inverse of a square matrix by Gauss-Jordan elimination.
///
/// The matrix is augmented with the identity, then a forward pass scales
/// each pivot row to a unit pivot and clears the column below it, and a
/// backward pass clears the column above it. The right half of the
/// augmented matrix is the inverse.
///
/// Row updates go through slices of the augmented matrix. The pivot row is
/// copied out first, since it cannot be read while another row of the same
/// matrix is borrowed for writing.
pub fn inverse_with<T, M>(
    matrix: &M,
    options_override: InverseOptionsOverride<T>,
) -> Result<Array<T>>
where
    T: Float + NumAssign,
    M: ArrayView<T> + ?Sized,
{
    let mut options = InverseOptions::default();
    options.override_with(&options_override);

    let n = square_extent(matrix.shape())?;
    let mut augmented = Array::zeros(&[n, 2 * n]);
    for i in 0..n {
        for j in 0..n {
            augmented[[i, j]] = *matrix.at(&[i, j]);
        }
        augmented[[i, n + i]] = T::one();
    }

    for col in 0..n {
        ensure_pivot(&mut augmented, col, &options)?;

        let pivot = augmented[[col, col]];
        let mut pivot_row = augmented.slice_mut(&[IndexRange::single(col), IndexRange::all()])?;
        pivot_row.for_each_mut(|x| *x /= pivot);

        eliminate(&mut augmented, col, col + 1..n)?;
    }

    for col in (0..n).rev() {
        eliminate(&mut augmented, col, 0..col)?;
    }

    augmented.slice(&[IndexRange::all(), IndexRange::after(n)]).map(|inverse| inverse.materialize())
}

/// Subtracts multiples of row `col` from each row in `rows` so that their
/// entries in column `col` become zero. Row `col` must have a unit pivot.
fn eliminate<T>(augmented: &mut Array<T>, col: usize, rows: core::ops::Range<usize>) -> Result<()>
where
    T: Float + NumAssign,
{
    let pivot_row = row(augmented, col)?.materialize();
    for r in rows {
        let factor = augmented[[r, col]];
        if factor.is_zero() {
            continue;
        }
        let scaled = mul_scalar(&pivot_row, factor);
        let mut target = augmented.slice_mut(&[IndexRange::single(r), IndexRange::all()])?;
        sub_assign(&mut target, &scaled)?;
    }
    Ok(())
}

/// Makes sure row `col` has a usable pivot, swapping in a lower row when
/// pivoting is enabled.
fn ensure_pivot<T>(augmented: &mut Array<T>, col: usize, options: &InverseOptions<T>) -> Result<()>
where
    T: Float + NumAssign,
{
    let usable = |value: T| value.abs() > options.pivot_tolerance;
    if usable(augmented[[col, col]]) {
        return Ok(());
    }

    if options.pivoting {
        let n = augmented.shape()[0];
        let candidate = (col + 1..n)
            .filter(|&r| usable(augmented[[r, col]]))
            .max_by(|&a, &b| {
                let (a, b) = (augmented[[a, col]].abs(), augmented[[b, col]].abs());
                a.partial_cmp(&b).unwrap_or(core::cmp::Ordering::Equal)
            });
        if let Some(swap) = candidate {
            debug!(column = col, row = swap, "swapping pivot row");
            swap_rows(augmented, col, swap)?;
            return Ok(());
        }
    }

    debug!(column = col, "no usable pivot; matrix is singular");
    Err(Error::SingularMatrix { column: col })
}

fn row<T>(matrix: &Array<T>, index: usize) -> Result<crate::Slice<'_, T>> {
    matrix.slice(&[IndexRange::single(index), IndexRange::all()])
}

fn swap_rows<T: Clone>(matrix: &mut Array<T>, a: usize, b: usize) -> Result<()> {
    let row_a = row(matrix, a)?.materialize();
    let row_b = row(matrix, b)?.materialize();
    matrix.slice_mut(&[IndexRange::single(a), IndexRange::all()])?.assign(&row_b)?;
    matrix.slice_mut(&[IndexRange::single(b), IndexRange::all()])?.assign(&row_a)?;
    Ok(())
}

/// Matrix product of a `[m, k]` and a `[k, n]` matrix.
pub fn mat_mul<T, L, R>(lhs: &L, rhs: &R) -> Result<Array<T>>
where
    T: Copy + Zero + Mul<Output = T> + AddAssign,
    L: ArrayView<T> + ?Sized,
    R: ArrayView<T> + ?Sized,
{
    let (m, k, n) = match (lhs.shape(), rhs.shape()) {
        (&[m, k], &[k2, n]) if k == k2 => (m, k, n),
        (&[_, _], &[_, _]) => {
            return Err(Error::ShapesDoNotMatch {
                lhs: Shape::from_slice(lhs.shape()),
                rhs: Shape::from_slice(rhs.shape()),
            });
        }
        (&[_, _], shape) | (shape, _) => {
            return Err(Error::MatrixShape {
                shape: Shape::from_slice(shape),
                expected: "rank-2",
            });
        }
    };

    let mut result = Array::zeros(&[m, n]);
    for i in 0..m {
        for j in 0..n {
            let mut sum = T::zero();
            for p in 0..k {
                sum += *lhs.at(&[i, p]) * *rhs.at(&[p, j]);
            }
            result[[i, j]] = sum;
        }
    }
    Ok(result)
}

/// Rotation by `angle` radians around `axis`, as a `[3, 3]` matrix
/// (Rodrigues' formula). The axis is normalized first and must not be zero.
pub fn rot_angle_mx<T, A>(axis: &A, angle: T) -> Result<Array<T>>
where
    T: Float,
    A: ArrayView<T> + ?Sized,
{
    let unit = normalize(axis)?;
    let (x, y, z) = (unit[0], unit[1], unit[2]);
    let (s, c) = angle.sin_cos();
    let t = T::one() - c;

    let storage = [
        c + x * x * t,
        x * y * t - z * s,
        x * z * t + y * s,
        y * x * t + z * s,
        c + y * y * t,
        y * z * t - x * s,
        z * x * t - y * s,
        z * y * t + x * s,
        c + z * z * t,
    ];
    Ok(Array::from_parts(storage.into(), [3, 3].into()))
}
