//! Shape and stride arithmetic.
//!
//! All functions take plain `&[usize]` so they work the same for a
//! dynamic [`Shape`] and for fixed-rank `[usize; R]` arrays. The `const fn`
//! variants compute the same values at compile time.

use nykdtb_hybrid_vec::HybridVec;

use crate::INLINE_RANK;

/// Extents of an array, one per dimension. Also used for strides and
/// coordinates.
pub type Shape = HybridVec<usize, INLINE_RANK>;

/// Number of elements described by `shape`; an empty shape describes none.
pub fn size(shape: &[usize]) -> usize {
    if shape.is_empty() {
        0
    } else {
        shape.iter().product()
    }
}

/// Row-major strides for `shape`: the last dimension is contiguous.
pub fn strides(shape: &[usize]) -> Shape {
    let mut strides = Shape::from_elem(shape.len(), 1);
    for i in (0..shape.len().saturating_sub(1)).rev() {
        strides[i] = strides[i + 1] * shape[i + 1];
    }
    strides
}

/// Dot product of `coord` and `strides`. Not bounds checked.
#[inline]
pub fn raw_index(strides: &[usize], coord: &[usize]) -> usize {
    debug_assert_eq!(strides.len(), coord.len());
    strides.iter().zip(coord).map(|(stride, c)| stride * c).sum()
}

/// Splits a flat row-major `index` into a coordinate, using row-major
/// `strides`. `coord` must have one slot per dimension.
pub fn unravel(strides: &[usize], mut index: usize, coord: &mut [usize]) {
    debug_assert_eq!(strides.len(), coord.len());
    for (c, &stride) in coord.iter_mut().zip(strides) {
        // A zero stride only occurs in an empty shape, which has no valid index.
        *c = index / stride;
        index %= stride;
    }
}

/// Compares two shapes under numpy-style broadcasting.
///
/// Shapes are aligned at their trailing dimension; a missing leading
/// dimension counts as extent 1. Each aligned pair must be equal or contain
/// a 1.
pub fn broadcast_compatible(lhs: &[usize], rhs: &[usize]) -> bool {
    let rank = lhs.len().max(rhs.len());
    let extent = |shape: &[usize], i: usize| {
        let pad = rank - shape.len();
        if i < pad { 1 } else { shape[i - pad] }
    };
    (0..rank).all(|i| {
        let (l, r) = (extent(lhs, i), extent(rhs, i));
        l == r || l == 1 || r == 1
    })
}

pub const fn static_size<const R: usize>(shape: [usize; R]) -> usize {
    if R == 0 {
        return 0;
    }
    let mut size = 1;
    let mut i = 0;
    while i < R {
        size *= shape[i];
        i += 1;
    }
    size
}

pub const fn static_strides<const R: usize>(shape: [usize; R]) -> [usize; R] {
    let mut strides = [1; R];
    let mut i = R;
    while i > 1 {
        i -= 1;
        strides[i - 1] = strides[i] * shape[i];
    }
    strides
}

/// Geometry of a fixed-rank shape, computed at compile time.
///
/// ```
/// use nykdtb::shape::ShapeMeta;
///
/// const META: ShapeMeta<3> = ShapeMeta::new([2, 4, 3]);
/// assert_eq!(META.size, 24);
/// assert_eq!(META.strides, [12, 3, 1]);
/// assert_eq!(META.stride(), 12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShapeMeta<const R: usize> {
    pub shape: [usize; R],
    pub strides: [usize; R],
    pub size: usize,
}

impl<const R: usize> ShapeMeta<R> {
    pub const fn new(shape: [usize; R]) -> Self {
        Self {
            shape,
            strides: static_strides(shape),
            size: static_size(shape),
        }
    }

    pub const fn depth(&self) -> usize {
        R
    }

    /// Stride of the outermost dimension, or 0 for rank 0.
    pub const fn stride(&self) -> usize {
        if R == 0 { 0 } else { self.strides[0] }
    }
}

#[cfg(test)]
#[path = "shape_test.rs"]
mod shape_test;
