//! The capability traits shared by owned arrays and slices, plus row-major
//! traversal.
//!
//! Every operation in [`crate::ops`] is written once against [`ArrayView`]
//! (read access) or [`ArrayViewMut`] (write access) and therefore accepts an
//! [`Array`], a [`Slice`](crate::Slice) or a [`SliceMut`](crate::SliceMut).

use core::iter::FusedIterator;

use crate::{
    Array,
    error::{Error, Result},
    shape::{self, Shape},
};

/// Read access to an N-dimensional array of `T`.
pub trait ArrayView<T> {
    /// Extent of each dimension as seen through this view.
    fn shape(&self) -> &[usize];

    /// Row-major strides of [`shape`](Self::shape).
    fn strides(&self) -> &[usize];

    /// The whole backing storage, which may extend past this view.
    fn storage(&self) -> &[T];

    /// Maps a coordinate of this view to an offset into [`storage`](Self::storage).
    fn storage_offset(&self, coord: &[usize]) -> usize;

    /// A cursor positioned on the first element of this view.
    fn cursor(&self) -> Cursor;

    fn rank(&self) -> usize {
        self.shape().len()
    }

    fn size(&self) -> usize {
        shape::size(self.shape())
    }

    fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Element at row-major position `index` of this view.
    ///
    /// Panics if `index` does not address storage.
    fn get(&self, index: usize) -> &T {
        let mut coord = Shape::from_elem(self.rank(), 0);
        shape::unravel(self.strides(), index, &mut coord);
        &self.storage()[self.storage_offset(&coord)]
    }

    /// Element at `coord`. Panics if `coord` does not address storage.
    fn at(&self, coord: &[usize]) -> &T {
        &self.storage()[self.storage_offset(coord)]
    }

    /// Row-major iterator over the elements of this view.
    fn iter(&self) -> Iter<'_, T> {
        Iter::new(self.storage(), self.cursor(), self.size())
    }

    /// Copies the elements of this view into a new owned array of the same
    /// shape.
    fn materialize(&self) -> Array<T>
    where
        T: Clone,
    {
        Array::from_parts(self.iter().cloned().collect(), Shape::from_slice(self.shape()))
    }
}

/// Write access on top of [`ArrayView`].
pub trait ArrayViewMut<T>: ArrayView<T> {
    fn storage_mut(&mut self) -> &mut [T];

    fn get_mut(&mut self, index: usize) -> &mut T {
        let mut coord = Shape::from_elem(self.rank(), 0);
        shape::unravel(self.strides(), index, &mut coord);
        let offset = self.storage_offset(&coord);
        &mut self.storage_mut()[offset]
    }

    fn at_mut(&mut self, coord: &[usize]) -> &mut T {
        let offset = self.storage_offset(coord);
        &mut self.storage_mut()[offset]
    }

    /// Applies `f` to every element of this view in row-major order.
    fn for_each_mut<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut T),
    {
        let mut cursor = self.cursor();
        let size = self.size();
        let storage = self.storage_mut();
        for i in 0..size {
            if i > 0 {
                cursor.advance();
            }
            f(&mut storage[cursor.offset()]);
        }
    }

    /// Walks this view and `other` together in row-major order, calling `f`
    /// on each pair. Stops at the end of the shorter one.
    fn zip_mut_with<V, F>(&mut self, other: &V, mut f: F)
    where
        V: ArrayView<T> + ?Sized,
        F: FnMut(&mut T, &T),
    {
        let count = self.size().min(other.size());
        let mut cursor = self.cursor();
        let storage = self.storage_mut();
        for (i, value) in other.iter().take(count).enumerate() {
            if i > 0 {
                cursor.advance();
            }
            f(&mut storage[cursor.offset()], value);
        }
    }

    /// Overwrites every element of this view with the matching element of
    /// `source`. The shapes must be equal.
    fn assign<V>(&mut self, source: &V) -> Result<()>
    where
        V: ArrayView<T> + ?Sized,
        T: Clone,
    {
        if self.shape() != source.shape() {
            return Err(Error::ShapesDoNotMatch {
                lhs: Shape::from_slice(self.shape()),
                rhs: Shape::from_slice(source.shape()),
            });
        }
        self.zip_mut_with(source, |dst, src| dst.clone_from(src));
        Ok(())
    }
}

/// Odometer over the coordinates of a view.
///
/// Tracks the current coordinate and its storage offset. A step that stays
/// within the last dimension adds that dimension's stride to the cached
/// offset; the offset is recomputed from scratch only when a dimension
/// carries into the one before it.
#[derive(Debug, Clone)]
pub struct Cursor {
    shape: Shape,
    origin: Shape,
    strides: Shape,
    coord: Shape,
    offset: usize,
    done: bool,
}

impl Cursor {
    /// A cursor over `shape`, whose coordinate `c` lives at storage offset
    /// `raw_index(strides, origin + c)`.
    pub fn new(shape: &[usize], origin: &[usize], strides: &[usize]) -> Self {
        debug_assert_eq!(shape.len(), origin.len());
        debug_assert_eq!(shape.len(), strides.len());
        Self {
            shape: Shape::from_slice(shape),
            origin: Shape::from_slice(origin),
            strides: Shape::from_slice(strides),
            coord: Shape::from_elem(shape.len(), 0),
            offset: shape::raw_index(strides, origin),
            done: shape::size(shape) == 0,
        }
    }

    /// Storage offset of the current coordinate.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn coord(&self) -> &[usize] {
        &self.coord
    }

    /// Whether the cursor has moved past the last coordinate.
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Moves to the next coordinate in row-major order. Returns `false` once
    /// the cursor has run past the last one.
    pub fn advance(&mut self) -> bool {
        if self.done {
            return false;
        }
        let Some(last) = self.shape.len().checked_sub(1) else {
            self.done = true;
            return false;
        };

        self.coord[last] += 1;
        if self.coord[last] < self.shape[last] {
            self.offset += self.strides[last];
            return true;
        }

        let mut dim = last;
        loop {
            self.coord[dim] = 0;
            if dim == 0 {
                self.done = true;
                return false;
            }
            dim -= 1;
            self.coord[dim] += 1;
            if self.coord[dim] < self.shape[dim] {
                break;
            }
        }
        self.offset = self.recompute_offset();
        true
    }

    fn recompute_offset(&self) -> usize {
        self.origin
            .iter()
            .zip(&self.coord)
            .zip(&self.strides)
            .map(|((origin, c), stride)| (origin + c) * stride)
            .sum()
    }
}

/// Row-major iterator over the elements of an [`ArrayView`].
#[derive(Debug, Clone)]
pub struct Iter<'a, T> {
    storage: &'a [T],
    cursor: Cursor,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub fn new(storage: &'a [T], cursor: Cursor, len: usize) -> Self {
        Self {
            storage,
            cursor,
            remaining: len,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let item = &self.storage[self.cursor.offset()];
        self.remaining -= 1;
        if self.remaining > 0 {
            self.cursor.advance();
        }
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

#[cfg(test)]
#[path = "view_test.rs"]
mod view_test;
