//! Non-owning windows onto an [`Array`].
//!
//! A slice is described by one [`IndexRange`] per dimension. Its shape is
//! the extent of each range; a view coordinate `c` addresses the array
//! element at `range.begin + c`. The geometry is fixed when the slice is
//! built, and building it checks every range against the array's extents,
//! so any in-bounds view coordinate maps to an in-bounds array offset.

use core::{
    fmt,
    ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive},
};

use crate::{
    Array,
    error::{Error, Result},
    shape::{self, Shape},
    view::{ArrayView, ArrayViewMut, Cursor},
};

/// Upper bound of an [`IndexRange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum End {
    /// Exclusive concrete bound.
    At(usize),
    /// The extent of the dimension the range is applied to.
    Open,
}

/// A half-open range over one dimension.
///
/// ```
/// use nykdtb::IndexRange;
///
/// assert_eq!(IndexRange::from(2..5), IndexRange::between(2, 5));
/// assert_eq!(IndexRange::from(3), IndexRange::single(3));
/// assert_eq!(IndexRange::from(..), IndexRange::all());
/// assert_eq!(IndexRange::all().extent(7), 7);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IndexRange {
    begin: usize,
    end: End,
}

impl IndexRange {
    /// The whole dimension.
    pub const fn all() -> Self {
        Self { begin: 0, end: End::Open }
    }

    /// Nothing.
    pub const fn none() -> Self {
        Self { begin: 0, end: End::At(0) }
    }

    /// From the start of the dimension up to `end`, exclusive.
    pub const fn until(end: usize) -> Self {
        Self { begin: 0, end: End::At(end) }
    }

    /// From `begin` to the end of the dimension.
    pub const fn after(begin: usize) -> Self {
        Self { begin, end: End::Open }
    }

    pub const fn between(begin: usize, end: usize) -> Self {
        Self { begin, end: End::At(end) }
    }

    /// Just `index`; the dimension is kept with extent 1.
    pub const fn single(index: usize) -> Self {
        Self {
            begin: index,
            end: End::At(index.saturating_add(1)),
        }
    }

    pub const fn begin(&self) -> usize {
        self.begin
    }

    /// The exclusive end once applied to a dimension of `extent`.
    pub const fn end(&self, extent: usize) -> usize {
        match self.end {
            End::At(end) => end,
            End::Open => extent,
        }
    }

    /// Number of indices selected from a dimension of `extent`.
    pub const fn extent(&self, extent: usize) -> usize {
        self.end(extent).saturating_sub(self.begin)
    }
}

impl From<usize> for IndexRange {
    fn from(index: usize) -> Self {
        Self::single(index)
    }
}

impl From<Range<usize>> for IndexRange {
    fn from(range: Range<usize>) -> Self {
        Self::between(range.start, range.end)
    }
}

impl From<RangeInclusive<usize>> for IndexRange {
    fn from(range: RangeInclusive<usize>) -> Self {
        Self::between(*range.start(), range.end().saturating_add(1))
    }
}

impl From<RangeFrom<usize>> for IndexRange {
    fn from(range: RangeFrom<usize>) -> Self {
        Self::after(range.start)
    }
}

impl From<RangeTo<usize>> for IndexRange {
    fn from(range: RangeTo<usize>) -> Self {
        Self::until(range.end)
    }
}

impl From<RangeToInclusive<usize>> for IndexRange {
    fn from(range: RangeToInclusive<usize>) -> Self {
        Self::until(range.end.saturating_add(1))
    }
}

impl From<RangeFull> for IndexRange {
    fn from(_: RangeFull) -> Self {
        Self::all()
    }
}

/// Resolved geometry of a slice: where it starts in the array and how far
/// it extends.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Window {
    origin: Shape,
    shape: Shape,
    strides: Shape,
}

impl Window {
    /// The window over a whole array of `shape`.
    fn full(shape: &[usize]) -> Self {
        Self {
            origin: Shape::from_elem(shape.len(), 0),
            shape: Shape::from_slice(shape),
            strides: shape::strides(shape),
        }
    }

    /// Narrows this window by `ranges`, given relative to its own shape.
    fn narrow(&self, ranges: &[IndexRange]) -> Result<Self> {
        let rank = self.shape.len();
        if ranges.len() != rank {
            return Err(Error::InvalidSliceShape {
                ranges: ranges.len(),
                rank,
            });
        }

        let mut origin = Shape::from_elem(rank, 0);
        let mut shape = Shape::from_elem(rank, 0);
        for (dim, range) in ranges.iter().enumerate() {
            let extent = self.shape[dim];
            let (begin, end) = (range.begin(), range.end(extent));
            if begin > end || end > extent {
                return Err(Error::SliceOutOfBounds {
                    dim,
                    begin,
                    end,
                    extent,
                });
            }
            origin[dim] = self.origin[dim] + begin;
            shape[dim] = end - begin;
        }

        let strides = shape::strides(&shape);
        Ok(Self {
            origin,
            shape,
            strides,
        })
    }

    #[inline]
    fn storage_offset(&self, array_strides: &[usize], coord: &[usize]) -> usize {
        debug_assert_eq!(coord.len(), self.origin.len());
        self.origin
            .iter()
            .zip(coord)
            .zip(array_strides)
            .map(|((origin, c), stride)| (origin + c) * stride)
            .sum()
    }

    fn cursor(&self, array_strides: &[usize]) -> Cursor {
        Cursor::new(&self.shape, &self.origin, array_strides)
    }
}

/// A read-only view of part of an [`Array`].
pub struct Slice<'a, T> {
    array: &'a Array<T>,
    window: Window,
}

impl<'a, T> Slice<'a, T> {
    /// A view of `array` selecting `ranges`, one per dimension.
    pub fn new(array: &'a Array<T>, ranges: &[IndexRange]) -> Result<Self> {
        let window = Window::full(array.shape()).narrow(ranges)?;
        Ok(Self { array, window })
    }

    /// A view of this view's `ranges`, borrowing the same array.
    pub fn slice(&self, ranges: &[IndexRange]) -> Result<Slice<'a, T>> {
        let window = self.window.narrow(ranges)?;
        Ok(Slice {
            array: self.array,
            window,
        })
    }

    /// Position of this view's first element within the array.
    pub fn origin(&self) -> &[usize] {
        &self.window.origin
    }

    pub fn array(&self) -> &'a Array<T> {
        self.array
    }
}

impl<T> Clone for Slice<'_, T> {
    fn clone(&self) -> Self {
        Self {
            array: self.array,
            window: self.window.clone(),
        }
    }
}

impl<T> ArrayView<T> for Slice<'_, T> {
    fn shape(&self) -> &[usize] {
        &self.window.shape
    }

    fn strides(&self) -> &[usize] {
        &self.window.strides
    }

    fn storage(&self) -> &[T] {
        self.array.as_slice()
    }

    fn storage_offset(&self, coord: &[usize]) -> usize {
        self.window.storage_offset(self.array.strides(), coord)
    }

    fn cursor(&self) -> Cursor {
        self.window.cursor(self.array.strides())
    }
}

impl<T: fmt::Debug> fmt::Debug for Slice<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slice")
            .field("origin", &self.window.origin.as_slice())
            .field("shape", &self.window.shape.as_slice())
            .field("elements", &DebugElements(self))
            .finish()
    }
}

/// A writable view of part of an [`Array`].
pub struct SliceMut<'a, T> {
    array: &'a mut Array<T>,
    window: Window,
}

impl<'a, T> SliceMut<'a, T> {
    /// A writable view of `array` selecting `ranges`, one per dimension.
    pub fn new(array: &'a mut Array<T>, ranges: &[IndexRange]) -> Result<Self> {
        let window = Window::full(array.shape()).narrow(ranges)?;
        Ok(Self { array, window })
    }

    /// A writable view of this view's `ranges`.
    pub fn slice_mut(&mut self, ranges: &[IndexRange]) -> Result<SliceMut<'_, T>> {
        let window = self.window.narrow(ranges)?;
        Ok(SliceMut {
            array: &mut *self.array,
            window,
        })
    }

    /// Reborrows this view as read-only.
    pub fn view(&self) -> Slice<'_, T> {
        Slice {
            array: &*self.array,
            window: self.window.clone(),
        }
    }

    pub fn origin(&self) -> &[usize] {
        &self.window.origin
    }
}

impl<T> ArrayView<T> for SliceMut<'_, T> {
    fn shape(&self) -> &[usize] {
        &self.window.shape
    }

    fn strides(&self) -> &[usize] {
        &self.window.strides
    }

    fn storage(&self) -> &[T] {
        self.array.as_slice()
    }

    fn storage_offset(&self, coord: &[usize]) -> usize {
        self.window.storage_offset(self.array.strides(), coord)
    }

    fn cursor(&self) -> Cursor {
        self.window.cursor(self.array.strides())
    }
}

impl<T> ArrayViewMut<T> for SliceMut<'_, T> {
    fn storage_mut(&mut self) -> &mut [T] {
        self.array.as_mut_slice()
    }
}

impl<T: fmt::Debug> fmt::Debug for SliceMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.view(), f)
    }
}

struct DebugElements<'s, 'a, T>(&'s Slice<'a, T>);

impl<T: fmt::Debug> fmt::Debug for DebugElements<'_, '_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.0.iter()).finish()
    }
}

static_assertions::assert_impl_all!(Slice<'static, f64>: Send, Sync, Clone);
static_assertions::assert_impl_all!(SliceMut<'static, f64>: Send, Sync);

#[cfg(test)]
#[path = "slice_test.rs"]
mod slice_test;
