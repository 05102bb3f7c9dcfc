//! By-value iteration over a [`HybridVec`].

use core::{fmt, iter::FusedIterator, ptr};

use crate::HybridVec;

/// An iterator that moves elements out of a [`HybridVec`].
///
/// Elements not yielded are dropped together with the iterator.
pub struct IntoIter<T, const N: usize, const ALIGN: usize> {
    // `vec.len` is kept at zero so the vector only frees its buffer on drop;
    // the live elements are tracked by `front..back`.
    vec: HybridVec<T, N, ALIGN>,
    front: usize,
    back: usize,
}

impl<T, const N: usize, const ALIGN: usize> IntoIter<T, N, ALIGN> {
    pub(crate) fn new(mut vec: HybridVec<T, N, ALIGN>) -> Self {
        let back = vec.len;
        vec.len = 0;
        Self { vec, front: 0, back }
    }

    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `front..back` are live and owned by the iterator.
        unsafe {
            core::slice::from_raw_parts(self.vec.as_ptr().add(self.front), self.back - self.front)
        }
    }
}

impl<T, const N: usize, const ALIGN: usize> Iterator for IntoIter<T, N, ALIGN> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        // SAFETY: `front` is live and leaves the live range right away.
        let value = unsafe { ptr::read(self.vec.as_ptr().add(self.front)) };
        self.front += 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T, const N: usize, const ALIGN: usize> DoubleEndedIterator for IntoIter<T, N, ALIGN> {
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: `back` was live and is no longer part of the live range.
        Some(unsafe { ptr::read(self.vec.as_ptr().add(self.back)) })
    }
}

impl<T, const N: usize, const ALIGN: usize> ExactSizeIterator for IntoIter<T, N, ALIGN> {}

impl<T, const N: usize, const ALIGN: usize> FusedIterator for IntoIter<T, N, ALIGN> {}

impl<T, const N: usize, const ALIGN: usize> Drop for IntoIter<T, N, ALIGN> {
    fn drop(&mut self) {
        let (front, remaining) = (self.front, self.back - self.front);
        self.front = self.back;
        // SAFETY: the remaining elements were never yielded and are dropped
        // once; `vec` then frees its buffer with a length of zero.
        unsafe {
            let rest = ptr::slice_from_raw_parts_mut(self.vec.as_mut_ptr().add(front), remaining);
            ptr::drop_in_place(rest);
        }
    }
}

impl<T: fmt::Debug, const N: usize, const ALIGN: usize> fmt::Debug for IntoIter<T, N, ALIGN> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}
