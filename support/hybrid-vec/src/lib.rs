#![allow(unsafe_code)]
#![cfg_attr(not(test), no_std)]

//! HybridVec: a growable vector with a fixed inline capacity.
//!
//! `HybridVec<T, N>` keeps up to `N` elements inside the value itself and
//! spills to a heap buffer once a request exceeds that. It:
//! - Stays inline (no allocation) while `len <= N`
//! - Grows the heap buffer to twice the requested size when it runs out
//! - Moves back inline as soon as the live elements fit again
//! - Never runs element code on relocation (elements are moved bitwise)
//!
//! Element lifecycle is explicit: clones happen only where the API asks for
//! a copy (`clone`, `clone_from`, `from_slice`, `insert_from_slice`,
//! `resize`) and each element is dropped exactly once.
//!
//! ```
//! use nykdtb_hybrid_vec::HybridVec;
//!
//! let mut v: HybridVec<u32, 2> = HybridVec::new();
//! v.push(1);
//! v.push(2);
//! assert!(v.is_inline());
//! v.push(3);
//! assert!(!v.is_inline());
//! assert_eq!(v.capacity(), 6);
//! v.erase(1..);
//! assert!(v.is_inline());
//! assert_eq!(v.as_slice(), &[1]);
//! ```

extern crate alloc;

mod into_iter;

use alloc::alloc::{Layout, alloc, dealloc, handle_alloc_error};
use core::{
    borrow::{Borrow, BorrowMut},
    fmt,
    hash::{Hash, Hasher},
    mem::{self, MaybeUninit},
    ops::{Bound, Deref, DerefMut, RangeBounds},
    ptr::{self, NonNull},
    slice,
};

pub use into_iter::IntoIter;

/// Heap capacity is the requested size times this factor.
const GROWTH_FACTOR: usize = 2;

/// Refits the storage to the live elements when dropped during an unwind.
struct FitOnUnwind<'a, T, const N: usize, const ALIGN: usize>(&'a mut HybridVec<T, N, ALIGN>);

impl<T, const N: usize, const ALIGN: usize> Drop for FitOnUnwind<'_, T, N, ALIGN> {
    fn drop(&mut self) {
        let len = self.0.len;
        self.0.ensure_capacity(len);
    }
}

/// Where the live elements of a [`HybridVec`] currently reside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HybridVecKind {
    Inline,
    Heap,
}

enum Storage<T, const N: usize> {
    Inline([MaybeUninit<T>; N]),
    Heap { ptr: NonNull<T>, cap: usize },
}

/// A vector storing up to `N` elements inline before spilling to the heap.
///
/// `ALIGN` raises the alignment of the heap buffer above `align_of::<T>()`;
/// it must be a power of two.
///
/// While on the heap the vector always holds more than `N` elements: any
/// operation that brings the length back to `N` or below relocates the
/// elements inline and frees the buffer.
pub struct HybridVec<T, const N: usize, const ALIGN: usize = 1> {
    len: usize,
    storage: Storage<T, N>,
}

// SAFETY: the vector owns its elements; sharing or sending it is exactly as
// safe as sharing or sending the elements.
unsafe impl<T: Send, const N: usize, const ALIGN: usize> Send for HybridVec<T, N, ALIGN> {}
unsafe impl<T: Sync, const N: usize, const ALIGN: usize> Sync for HybridVec<T, N, ALIGN> {}

static_assertions::assert_impl_all!(HybridVec<u32, 4>: Send, Sync, Clone, Default);
static_assertions::assert_not_impl_any!(HybridVec<core::cell::Cell<u8>, 4>: Sync);
static_assertions::assert_not_impl_any!(HybridVec<alloc::rc::Rc<u8>, 4>: Send);

impl<T, const N: usize, const ALIGN: usize> HybridVec<T, N, ALIGN> {
    /// Number of elements held without allocating.
    pub const INLINE_CAPACITY: usize = N;

    const ALIGN_IS_POWER_OF_TWO: () =
        assert!(ALIGN.is_power_of_two(), "ALIGN must be a power of two");

    pub const fn new() -> Self {
        let () = Self::ALIGN_IS_POWER_OF_TWO;
        Self {
            len: 0,
            storage: Storage::Inline([const { MaybeUninit::uninit() }; N]),
        }
    }

    /// Creates a vector holding `len` clones of `value`.
    pub fn from_elem(len: usize, value: T) -> Self
    where
        T: Clone,
    {
        let mut vec = Self::new();
        vec.resize(len, value);
        vec
    }

    /// Creates a vector by cloning every element of `values`, in order.
    pub fn from_slice(values: &[T]) -> Self
    where
        T: Clone,
    {
        let mut vec = Self::new();
        vec.ensure_capacity(values.len());
        for value in values {
            // SAFETY: capacity for `values.len()` elements was ensured above.
            unsafe { vec.push_unchecked(value.clone()) };
        }
        vec
    }

    #[inline(always)]
    pub fn kind(&self) -> HybridVecKind {
        match self.storage {
            Storage::Inline(_) => HybridVecKind::Inline,
            Storage::Heap { .. } => HybridVecKind::Heap,
        }
    }

    #[inline(always)]
    pub fn is_inline(&self) -> bool {
        self.kind() == HybridVecKind::Inline
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        match self.storage {
            Storage::Inline(_) => N,
            Storage::Heap { cap, .. } => cap,
        }
    }

    #[inline(always)]
    pub fn as_ptr(&self) -> *const T {
        match &self.storage {
            Storage::Inline(buf) => buf.as_ptr().cast(),
            Storage::Heap { ptr, .. } => ptr.as_ptr(),
        }
    }

    #[inline(always)]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        match &mut self.storage {
            Storage::Inline(buf) => buf.as_mut_ptr().cast(),
            Storage::Heap { ptr, .. } => ptr.as_ptr(),
        }
    }

    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `len` slots are initialized.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: the first `len` slots are initialized.
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// Appends `value` at the end.
    pub fn push(&mut self, value: T) {
        self.ensure_capacity(self.len + 1);
        // SAFETY: room for one more element was ensured above.
        unsafe { self.push_unchecked(value) };
    }

    /// Appends the element produced by `make`.
    ///
    /// Capacity is secured before `make` runs, so the new element is built
    /// straight into its final slot. If `make` panics, a storage that just
    /// spilled to the heap is moved back inline.
    pub fn push_with<F>(&mut self, make: F)
    where
        F: FnOnce() -> T,
    {
        self.ensure_capacity(self.len + 1);
        let guard = FitOnUnwind(&mut *self);
        let value = make();
        mem::forget(guard);
        // SAFETY: room for one more element was ensured above.
        unsafe { self.push_unchecked(value) };
    }

    /// Removes and returns the last element.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was initialized and is no longer counted as live.
        let value = unsafe { ptr::read(self.as_ptr().add(self.len)) };
        self.ensure_capacity(self.len);
        Some(value)
    }

    /// Inserts `value` at `index`, shifting every later element one slot
    /// towards the end.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) {
        let len = self.len;
        assert!(index <= len, "insertion index (is {index}) should be <= len (is {len})");
        self.ensure_capacity(len + 1);
        // SAFETY: capacity covers `len + 1`; the tail is shifted into
        // uninitialized space before the gap is written.
        unsafe {
            let gap = self.as_mut_ptr().add(index);
            ptr::copy(gap, gap.add(1), len - index);
            ptr::write(gap, value);
        }
        self.len = len + 1;
    }

    /// Inserts clones of `values` at `index`, shifting the tail back by
    /// `values.len()` slots.
    ///
    /// If a clone panics, the shifted tail is leaked rather than dropped.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert_from_slice(&mut self, index: usize, values: &[T])
    where
        T: Clone,
    {
        let len = self.len;
        let count = values.len();
        assert!(index <= len, "insertion index (is {index}) should be <= len (is {len})");
        let new_len = len.checked_add(count).unwrap_or_else(|| capacity_overflow());
        self.ensure_capacity(new_len);
        // SAFETY: capacity covers `new_len`. While the gap is open only the
        // prefix is counted as live.
        unsafe {
            let gap = self.as_mut_ptr().add(index);
            ptr::copy(gap, gap.add(count), len - index);
            self.len = index;
            for (offset, value) in values.iter().enumerate() {
                ptr::write(gap.add(offset), value.clone());
            }
        }
        self.len = new_len;
    }

    /// Removes the elements in `range`, moving the tail down to close the
    /// gap. Returns the index of the first element after the erased range.
    ///
    /// # Panics
    ///
    /// Panics if the range is inverted or ends past `len`.
    pub fn erase<R>(&mut self, range: R) -> usize
    where
        R: RangeBounds<usize>,
    {
        let len = self.len;
        let (start, end) = resolve_range(range, len);
        let count = end - start;
        // SAFETY: `start..end` is in bounds. The erased elements are dropped
        // before the tail overwrites them, and `len` only counts the prefix
        // while that happens.
        unsafe {
            self.len = start;
            let base = self.as_mut_ptr();
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base.add(start), count));
            ptr::copy(base.add(end), base.add(start), len - end);
        }
        self.len = len - count;
        self.ensure_capacity(self.len);
        start
    }

    /// Removes and returns the element at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.len;
        assert!(index < len, "removal index (is {index}) should be < len (is {len})");
        // SAFETY: `index` is in bounds; the value is read out before the
        // tail is moved over its slot.
        let value = unsafe {
            let slot = self.as_mut_ptr().add(index);
            let value = ptr::read(slot);
            ptr::copy(slot.add(1), slot, len - index - 1);
            value
        };
        self.len = len - 1;
        self.ensure_capacity(self.len);
        value
    }

    /// Drops every element past `new_len`. Does nothing if `new_len >= len`.
    pub fn truncate(&mut self, new_len: usize) {
        let len = self.len;
        if new_len >= len {
            return;
        }
        // SAFETY: `new_len..len` are live; they stop being counted before
        // they are dropped.
        unsafe {
            self.len = new_len;
            let tail = ptr::slice_from_raw_parts_mut(self.as_mut_ptr().add(new_len), len - new_len);
            ptr::drop_in_place(tail);
        }
        self.ensure_capacity(new_len);
    }

    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Resizes to `new_len`, filling new slots with clones of `value`.
    pub fn resize(&mut self, new_len: usize, value: T)
    where
        T: Clone,
    {
        let len = self.len;
        if new_len <= len {
            self.truncate(new_len);
            return;
        }
        self.ensure_capacity(new_len);
        for _ in len + 1..new_len {
            // SAFETY: capacity covers `new_len`.
            unsafe { self.push_unchecked(value.clone()) };
        }
        // SAFETY: as above, one slot is still free.
        unsafe { self.push_unchecked(value) };
    }

    /// Makes room for at least `additional` more elements.
    pub fn reserve(&mut self, additional: usize) {
        let requested = self.len.checked_add(additional).unwrap_or_else(|| capacity_overflow());
        self.ensure_capacity(requested);
    }

    /// Returns a new vector with `f` applied to every element.
    pub fn map<U, F>(&self, mut f: F) -> HybridVec<U, N, ALIGN>
    where
        F: FnMut(&T) -> U,
    {
        let mut result = HybridVec::new();
        result.ensure_capacity(self.len);
        for value in self.iter() {
            // SAFETY: capacity for `self.len` elements was ensured above.
            unsafe { result.push_unchecked(f(value)) };
        }
        result
    }

    /// # Safety
    ///
    /// The caller must have ensured `capacity() > len()`.
    #[inline(always)]
    unsafe fn push_unchecked(&mut self, value: T) {
        debug_assert!(self.len < self.capacity());
        unsafe { ptr::write(self.as_mut_ptr().add(self.len), value) };
        self.len += 1;
    }

    /// Makes the storage fit `size` elements: spills to the heap when `size`
    /// exceeds the inline capacity, grows the heap buffer when it is too
    /// small, and moves back inline when `size` fits there again.
    ///
    /// # Panics
    ///
    /// Panics if `size` is smaller than the number of live elements.
    fn ensure_capacity(&mut self, size: usize) {
        assert!(
            self.len <= size,
            "incorrect size allocation: {} live elements do not fit in {}",
            self.len,
            size
        );
        match self.storage {
            Storage::Inline(_) if size > N => self.move_to_heap(grown_capacity(size)),
            Storage::Inline(_) => {}
            Storage::Heap { cap, .. } if size > N => {
                if size > cap {
                    self.move_to_heap(grown_capacity(size));
                }
            }
            Storage::Heap { .. } => self.move_to_inline(),
        }
    }

    #[cold]
    fn move_to_heap(&mut self, new_cap: usize) {
        let old_cap = self.capacity();
        let new_ptr = Self::allocate(new_cap);
        // SAFETY: the new buffer holds `new_cap >= len` elements and does not
        // overlap the current one. Ownership of the elements moves with the
        // bytes; the old slots are treated as uninitialized afterwards.
        unsafe { ptr::copy_nonoverlapping(self.as_ptr(), new_ptr.as_ptr(), self.len) };
        let old = mem::replace(&mut self.storage, Storage::Heap { ptr: new_ptr, cap: new_cap });
        if let Storage::Heap { ptr, cap } = old {
            // SAFETY: the old buffer came from `allocate(cap)`.
            unsafe { Self::deallocate(ptr, cap) };
        }
        tracing::trace!(len = self.len, old_cap, new_cap, "hybrid vec moved to heap");
    }

    #[cold]
    fn move_to_inline(&mut self) {
        let Storage::Heap { ptr, cap } = self.storage else {
            return;
        };
        debug_assert!(self.len <= N);
        let mut buf = [const { MaybeUninit::uninit() }; N];
        // SAFETY: `len <= N` elements fit the inline buffer.
        unsafe { ptr::copy_nonoverlapping(ptr.as_ptr(), buf.as_mut_ptr().cast::<T>(), self.len) };
        self.storage = Storage::Inline(buf);
        // SAFETY: the heap buffer came from `allocate(cap)` and holds no
        // live elements anymore.
        unsafe { Self::deallocate(ptr, cap) };
        tracing::trace!(len = self.len, old_cap = cap, "hybrid vec moved inline");
    }

    fn layout(cap: usize) -> Layout {
        match Layout::array::<T>(cap).and_then(|layout| layout.align_to(ALIGN)) {
            Ok(layout) => layout,
            Err(_) => capacity_overflow(),
        }
    }

    fn allocate(cap: usize) -> NonNull<T> {
        let layout = Self::layout(cap);
        if layout.size() == 0 {
            // SAFETY: alignments are never zero.
            return unsafe { NonNull::new_unchecked(ptr::without_provenance_mut(layout.align())) };
        }
        // SAFETY: the layout has a non-zero size.
        let raw = unsafe { alloc(layout) };
        match NonNull::new(raw.cast::<T>()) {
            Some(ptr) => ptr,
            None => handle_alloc_error(layout),
        }
    }

    /// # Safety
    ///
    /// `ptr` must come from `allocate(cap)` and not be used afterwards.
    unsafe fn deallocate(ptr: NonNull<T>, cap: usize) {
        let layout = Self::layout(cap);
        if layout.size() != 0 {
            unsafe { dealloc(ptr.as_ptr().cast(), layout) };
        }
    }
}

#[inline]
fn grown_capacity(size: usize) -> usize {
    size.checked_mul(GROWTH_FACTOR).unwrap_or_else(|| capacity_overflow())
}

#[cold]
#[track_caller]
fn capacity_overflow() -> ! {
    panic!("capacity overflow");
}

#[track_caller]
fn resolve_range<R: RangeBounds<usize>>(range: R, len: usize) -> (usize, usize) {
    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.checked_add(1).unwrap_or_else(|| capacity_overflow()),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end.checked_add(1).unwrap_or_else(|| capacity_overflow()),
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };
    assert!(start <= end, "range start {start} is past range end {end}");
    assert!(end <= len, "range end {end} is out of bounds for length {len}");
    (start, end)
}

impl<T, const N: usize, const ALIGN: usize> Drop for HybridVec<T, N, ALIGN> {
    fn drop(&mut self) {
        // SAFETY: the first `len` slots are live and dropped exactly once.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) };
        if let Storage::Heap { ptr, cap } = self.storage {
            // SAFETY: the buffer came from `allocate(cap)`.
            unsafe { Self::deallocate(ptr, cap) };
        }
    }
}

impl<T, const N: usize, const ALIGN: usize> Default for HybridVec<T, N, ALIGN> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone, const N: usize, const ALIGN: usize> Clone for HybridVec<T, N, ALIGN> {
    fn clone(&self) -> Self {
        Self::from_slice(self.as_slice())
    }

    /// Element-wise copy assignment: the shared prefix is assigned with
    /// `T::clone_from`, surplus elements of `self` are dropped, and the
    /// remaining elements of `source` are cloned onto the end.
    fn clone_from(&mut self, source: &Self) {
        if source.len > self.len {
            self.ensure_capacity(source.len);
        }
        let common = self.len.min(source.len);
        for (dst, src) in self.as_mut_slice()[..common].iter_mut().zip(&source[..common]) {
            dst.clone_from(src);
        }
        self.truncate(source.len);
        for value in &source[common..] {
            // SAFETY: capacity for `source.len` elements was ensured above.
            unsafe { self.push_unchecked(value.clone()) };
        }
    }
}

impl<T, const N: usize, const ALIGN: usize> Deref for HybridVec<T, N, ALIGN> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize, const ALIGN: usize> DerefMut for HybridVec<T, N, ALIGN> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, const N: usize, const ALIGN: usize> AsRef<[T]> for HybridVec<T, N, ALIGN> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize, const ALIGN: usize> AsMut<[T]> for HybridVec<T, N, ALIGN> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T, const N: usize, const ALIGN: usize> Borrow<[T]> for HybridVec<T, N, ALIGN> {
    fn borrow(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, const N: usize, const ALIGN: usize> BorrowMut<[T]> for HybridVec<T, N, ALIGN> {
    fn borrow_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: fmt::Debug, const N: usize, const ALIGN: usize> fmt::Debug for HybridVec<T, N, ALIGN> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T, U, const N: usize, const M: usize, const A: usize, const B: usize>
    PartialEq<HybridVec<U, M, B>> for HybridVec<T, N, A>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &HybridVec<U, M, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T, U, const N: usize, const ALIGN: usize> PartialEq<[U]> for HybridVec<T, N, ALIGN>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U]) -> bool {
        self.as_slice() == other
    }
}

impl<T, U, const N: usize, const M: usize, const ALIGN: usize> PartialEq<[U; M]>
    for HybridVec<T, N, ALIGN>
where
    T: PartialEq<U>,
{
    fn eq(&self, other: &[U; M]) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq, const N: usize, const ALIGN: usize> Eq for HybridVec<T, N, ALIGN> {}

impl<T: Hash, const N: usize, const ALIGN: usize> Hash for HybridVec<T, N, ALIGN> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash(state);
    }
}

impl<T, const N: usize, const ALIGN: usize> Extend<T> for HybridVec<T, N, ALIGN> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        for value in iter {
            self.push(value);
        }
    }
}

impl<'a, T: Copy + 'a, const N: usize, const ALIGN: usize> Extend<&'a T>
    for HybridVec<T, N, ALIGN>
{
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        self.extend(iter.into_iter().copied());
    }
}

impl<T, const N: usize, const ALIGN: usize> FromIterator<T> for HybridVec<T, N, ALIGN> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut vec = Self::new();
        vec.extend(iter);
        vec
    }
}

impl<T, const N: usize, const M: usize, const ALIGN: usize> From<[T; M]>
    for HybridVec<T, N, ALIGN>
{
    fn from(values: [T; M]) -> Self {
        let mut vec = Self::new();
        vec.ensure_capacity(M);
        for value in values {
            // SAFETY: capacity for `M` elements was ensured above.
            unsafe { vec.push_unchecked(value) };
        }
        vec
    }
}

impl<T: Clone, const N: usize, const ALIGN: usize> From<&[T]> for HybridVec<T, N, ALIGN> {
    fn from(values: &[T]) -> Self {
        Self::from_slice(values)
    }
}

impl<'a, T, const N: usize, const ALIGN: usize> IntoIterator for &'a HybridVec<T, N, ALIGN> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, const N: usize, const ALIGN: usize> IntoIterator for &'a mut HybridVec<T, N, ALIGN> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, const N: usize, const ALIGN: usize> IntoIterator for HybridVec<T, N, ALIGN> {
    type Item = T;
    type IntoIter = IntoIter<T, N, ALIGN>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self)
    }
}
