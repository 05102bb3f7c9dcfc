//! The owning N-dimensional array.

use core::ops::{Index, IndexMut};

use nykdtb_hybrid_vec::HybridVec;
use num_traits::{One, Zero};

use crate::{
    INLINE_ELEMENTS,
    error::{Error, Result},
    shape::{self, Shape},
    slice::{IndexRange, Slice, SliceMut},
    view::{ArrayView, ArrayViewMut, Cursor},
};

/// Flat element storage of an [`Array`].
pub type Storage<T> = HybridVec<T, INLINE_ELEMENTS>;

/// An owned, row-major N-dimensional array.
///
/// The storage always holds exactly `size(shape)` elements and the strides
/// are always the row-major strides of the shape.
///
/// ```
/// use nykdtb::Array;
///
/// let arr = Array::from_shape([1, 2, 3, 4], &[2, 2]).unwrap();
/// assert_eq!(arr.strides(), &[2, 1]);
/// assert_eq!(arr[[1, 0]], 3);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Array<T> {
    storage: Storage<T>,
    shape: Shape,
    strides: Shape,
}

static_assertions::assert_impl_all!(Array<f64>: Send, Sync, Clone, Default);

impl<T> Array<T> {
    /// A one-dimensional array over `storage`.
    pub fn new(storage: impl Into<Storage<T>>) -> Self {
        let storage = storage.into();
        let shape = Shape::from([storage.len()]);
        Self::from_parts(storage, shape)
    }

    /// An array over `storage` with the given `shape`.
    ///
    /// Fails without keeping the storage when the shape does not describe
    /// exactly `storage.len()` elements.
    pub fn from_shape(storage: impl Into<Storage<T>>, shape: &[usize]) -> Result<Self> {
        let storage = storage.into();
        if shape::size(shape) != storage.len() {
            return Err(Error::ShapeDoesNotMatchSize {
                shape: Shape::from_slice(shape),
                size: storage.len(),
            });
        }
        Ok(Self::from_parts(storage, Shape::from_slice(shape)))
    }

    /// A one-dimensional array holding the elements of `values`.
    pub fn from_vec(values: Vec<T>) -> Self {
        Self::new(values.into_iter().collect::<Storage<T>>())
    }

    /// An array of `shape` where every element is `value`.
    pub fn filled(shape: &[usize], value: T) -> Self
    where
        T: Clone,
    {
        Self::from_parts(Storage::from_elem(shape::size(shape), value), Shape::from_slice(shape))
    }

    pub fn zeros(shape: &[usize]) -> Self
    where
        T: Zero + Clone,
    {
        Self::filled(shape, T::zero())
    }

    pub fn ones(shape: &[usize]) -> Self
    where
        T: One + Clone,
    {
        Self::filled(shape, T::one())
    }

    /// Callers guarantee `size(shape) == storage.len()`.
    pub(crate) fn from_parts(storage: Storage<T>, shape: Shape) -> Self {
        debug_assert_eq!(shape::size(&shape), storage.len());
        let strides = shape::strides(&shape);
        Self {
            storage,
            shape,
            strides,
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn size(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// The elements in row-major order.
    pub fn as_slice(&self) -> &[T] {
        &self.storage
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.storage
    }

    pub fn into_storage(self) -> Storage<T> {
        self.storage
    }

    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.storage.iter()
    }

    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.storage.iter_mut()
    }

    /// Replaces the shape, keeping the elements in the same row-major order.
    ///
    /// Fails and leaves the array untouched when `new_shape` describes a
    /// different number of elements.
    pub fn reshape(&mut self, new_shape: &[usize]) -> Result<()> {
        if shape::size(new_shape) != self.size() {
            return Err(Error::ShapeDoesNotMatchSize {
                shape: Shape::from_slice(new_shape),
                size: self.size(),
            });
        }
        self.shape = Shape::from_slice(new_shape);
        self.strides = shape::strides(&self.shape);
        Ok(())
    }

    /// Replaces the shape and grows or truncates the storage to match.
    /// New slots are filled with `value`.
    pub fn resize(&mut self, new_shape: &[usize], value: T)
    where
        T: Clone,
    {
        self.storage.resize(shape::size(new_shape), value);
        self.shape = Shape::from_slice(new_shape);
        self.strides = shape::strides(&self.shape);
    }

    /// Applies `f` to every element, keeping the shape.
    pub fn map<U, F>(&self, f: F) -> Array<U>
    where
        F: FnMut(&T) -> U,
    {
        Array {
            storage: self.storage.map(f),
            shape: self.shape.clone(),
            strides: self.strides.clone(),
        }
    }

    /// A read-only view selecting `ranges`, one per dimension.
    pub fn slice(&self, ranges: &[IndexRange]) -> Result<Slice<'_, T>> {
        Slice::new(self, ranges)
    }

    /// A writable view selecting `ranges`, one per dimension.
    pub fn slice_mut(&mut self, ranges: &[IndexRange]) -> Result<SliceMut<'_, T>> {
        SliceMut::new(self, ranges)
    }
}

impl<T> Default for Array<T> {
    /// The empty array: rank 0, no elements.
    fn default() -> Self {
        Self {
            storage: Storage::new(),
            shape: Shape::new(),
            strides: Shape::new(),
        }
    }
}

impl<T: core::fmt::Debug> core::fmt::Debug for Array<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Array")
            .field("shape", &self.shape.as_slice())
            .field("elements", &self.storage.as_slice())
            .finish()
    }
}

impl<T> ArrayView<T> for Array<T> {
    fn shape(&self) -> &[usize] {
        &self.shape
    }

    fn strides(&self) -> &[usize] {
        &self.strides
    }

    fn storage(&self) -> &[T] {
        &self.storage
    }

    fn storage_offset(&self, coord: &[usize]) -> usize {
        shape::raw_index(&self.strides, coord)
    }

    fn cursor(&self) -> Cursor {
        Cursor::new(&self.shape, &Shape::from_elem(self.rank(), 0), &self.strides)
    }

    fn size(&self) -> usize {
        self.storage.len()
    }

    fn get(&self, index: usize) -> &T {
        &self.storage[index]
    }
}

impl<T> ArrayViewMut<T> for Array<T> {
    fn storage_mut(&mut self) -> &mut [T] {
        &mut self.storage
    }

    fn get_mut(&mut self, index: usize) -> &mut T {
        &mut self.storage[index]
    }

    fn for_each_mut<F>(&mut self, f: F)
    where
        F: FnMut(&mut T),
    {
        self.storage.iter_mut().for_each(f);
    }
}

impl<T> From<Storage<T>> for Array<T> {
    fn from(storage: Storage<T>) -> Self {
        Self::new(storage)
    }
}

impl<T, const M: usize> From<[T; M]> for Array<T> {
    fn from(values: [T; M]) -> Self {
        Self::new(values)
    }
}

impl<T> FromIterator<T> for Array<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect::<Storage<T>>())
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.storage.iter()
    }
}

impl<T> Index<usize> for Array<T> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.storage[index]
    }
}

impl<T> IndexMut<usize> for Array<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.storage[index]
    }
}

impl<T> Index<&[usize]> for Array<T> {
    type Output = T;

    fn index(&self, coord: &[usize]) -> &T {
        &self.storage[shape::raw_index(&self.strides, coord)]
    }
}

impl<T> IndexMut<&[usize]> for Array<T> {
    fn index_mut(&mut self, coord: &[usize]) -> &mut T {
        let offset = shape::raw_index(&self.strides, coord);
        &mut self.storage[offset]
    }
}

impl<T, const R: usize> Index<[usize; R]> for Array<T> {
    type Output = T;

    fn index(&self, coord: [usize; R]) -> &T {
        &self[&coord[..]]
    }
}

impl<T, const R: usize> IndexMut<[usize; R]> for Array<T> {
    fn index_mut(&mut self, coord: [usize; R]) -> &mut T {
        &mut self[&coord[..]]
    }
}

#[cfg(test)]
#[path = "array_test.rs"]
mod array_test;
