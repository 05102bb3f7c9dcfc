//! Element lifecycle tests for HybridVec.
//!
//! `Tracker` records every clone, clone-assignment and drop on a shared
//! event list, so the tests can assert exactly which elements were copied or
//! destroyed by each operation. Moves are bitwise in Rust and leave no
//! trace: a relocated element shows no new events at all.

use std::{cell::RefCell, rc::Rc, slice};

use nykdtb_hybrid_vec::HybridVec;
use pretty_assertions::assert_eq;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Default,
    Copy,
    Copied,
    CopyAssign,
    Destructed,
}

struct Tracker {
    ops: Rc<RefCell<Vec<Op>>>,
}

impl Tracker {
    fn new() -> Self {
        Self {
            ops: Rc::new(RefCell::new(vec![Op::Default])),
        }
    }

    /// A second handle onto the same event list, without recording anything.
    fn track(&self) -> Self {
        Self {
            ops: Rc::clone(&self.ops),
        }
    }

    fn ops(&self) -> Vec<Op> {
        self.ops.borrow().clone()
    }

    fn same(&self, other: &Tracker) -> bool {
        Rc::ptr_eq(&self.ops, &other.ops)
    }
}

impl Clone for Tracker {
    fn clone(&self) -> Self {
        let mut ops = self.ops();
        ops.push(Op::Copy);
        self.ops.borrow_mut().push(Op::Copied);
        Self {
            ops: Rc::new(RefCell::new(ops)),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        self.ops.borrow_mut().push(Op::CopyAssign);
        let mut ops = source.ops();
        ops.push(Op::Copy);
        source.ops.borrow_mut().push(Op::Copied);
        self.ops = Rc::new(RefCell::new(ops));
    }
}

impl Drop for Tracker {
    fn drop(&mut self) {
        self.ops.borrow_mut().push(Op::Destructed);
    }
}

type TestVec<const N: usize> = HybridVec<Tracker, N>;

fn refs<const M: usize>() -> [Tracker; M] {
    std::array::from_fn(|_| Tracker::new())
}

fn tracked<const N: usize>(refs: &[Tracker]) -> TestVec<N> {
    let mut vec = TestVec::<N>::new();
    for r in refs {
        vec.push_with(|| r.track());
    }
    vec
}

#[test]
fn test_default_construct() {
    let vec = TestVec::<4>::new();
    assert!(vec.is_empty());
    assert_eq!(vec.len(), 0);
    assert!(vec.is_inline());
}

#[test]
fn test_from_slice_one_element_inline() {
    let vec = TestVec::<4>::from_slice(&[Tracker::new()]);
    assert_eq!(vec.len(), 1);
    assert!(vec.is_inline());
    assert_eq!(vec[0].ops(), vec![Op::Default, Op::Copy]);
}

#[test]
fn test_from_slice_fills_inline_capacity() {
    let vec = TestVec::<2>::from_slice(&[Tracker::new(), Tracker::new()]);
    assert_eq!(vec.len(), 2);
    assert!(vec.is_inline());
    assert_eq!(vec[0].ops(), vec![Op::Default, Op::Copy]);
    assert_eq!(vec[1].ops(), vec![Op::Default, Op::Copy]);
}

#[test]
fn test_from_slice_spills_before_copying() {
    let vec = TestVec::<2>::from_slice(&[Tracker::new(), Tracker::new(), Tracker::new()]);
    assert_eq!(vec.len(), 3);
    assert!(!vec.is_inline());
    for element in vec.iter() {
        assert_eq!(element.ops(), vec![Op::Default, Op::Copy]);
    }
}

#[test]
fn test_push_with_inline() {
    let mut vec = TestVec::<2>::from_slice(&[Tracker::new()]);
    vec.push_with(Tracker::new);
    assert_eq!(vec.len(), 2);
    assert!(vec.is_inline());
    assert_eq!(vec[0].ops(), vec![Op::Default, Op::Copy]);
    assert_eq!(vec[1].ops(), vec![Op::Default]);
}

#[test]
fn test_push_spills_to_heap_without_copies() {
    let mut vec = TestVec::<1>::from_slice(&[Tracker::new()]);
    vec.push(Tracker::new());
    assert_eq!(vec.len(), 2);
    assert!(!vec.is_inline());
    assert_eq!(vec[0].ops(), vec![Op::Default, Op::Copy]);
    assert_eq!(vec[1].ops(), vec![Op::Default]);

    // Heap to larger heap.
    vec.push(Tracker::new());
    vec.push(Tracker::new());
    vec.push(Tracker::new());
    assert_eq!(vec.len(), 5);
    assert_eq!(vec[0].ops(), vec![Op::Default, Op::Copy]);
    for element in &vec[1..] {
        assert_eq!(element.ops(), vec![Op::Default]);
    }
}

#[test]
fn test_spill_happens_once_and_relocates_every_element() {
    let refs = refs::<5>();
    let mut vec = tracked::<4>(&refs[..4]);
    assert!(vec.is_inline());

    vec.push_with(|| refs[4].track());
    assert!(!vec.is_inline());
    assert_eq!(vec.capacity(), 10);
    for (r, element) in refs.iter().zip(vec.iter()) {
        assert!(r.same(element));
        assert_eq!(r.ops(), vec![Op::Default]);
    }
}

#[test]
fn test_erase_one_element_inline() {
    let refs = refs::<4>();
    let mut vec = tracked::<4>(&refs);

    vec.erase(1..2);
    assert!(vec.is_inline());
    assert_eq!(vec.len(), 3);
    assert!(refs[0].same(&vec[0]));
    assert!(refs[2].same(&vec[1]));
    assert!(refs[3].same(&vec[2]));
    assert_eq!(refs[0].ops(), vec![Op::Default]);
    assert_eq!(refs[1].ops(), vec![Op::Default, Op::Destructed]);
    assert_eq!(refs[2].ops(), vec![Op::Default]);
    assert_eq!(refs[3].ops(), vec![Op::Default]);
}

#[test]
fn test_erase_two_elements_inline() {
    let refs = refs::<6>();
    let mut vec = tracked::<6>(&refs);

    vec.erase(1..3);
    assert!(vec.is_inline());
    assert_eq!(vec.len(), 4);
    for (r, element) in [&refs[0], &refs[3], &refs[4], &refs[5]].into_iter().zip(vec.iter()) {
        assert!(r.same(element));
        assert_eq!(r.ops(), vec![Op::Default]);
    }
    assert_eq!(refs[1].ops(), vec![Op::Default, Op::Destructed]);
    assert_eq!(refs[2].ops(), vec![Op::Default, Op::Destructed]);
}

#[test]
fn test_erase_on_heap_stays_on_heap() {
    let refs = refs::<6>();
    let mut vec = tracked::<2>(&refs);

    vec.erase(1..3);
    assert!(!vec.is_inline());
    assert_eq!(vec.len(), 4);
    assert!(refs[3].same(&vec[1]));
    assert_eq!(refs[1].ops(), vec![Op::Default, Op::Destructed]);
    assert_eq!(refs[2].ops(), vec![Op::Default, Op::Destructed]);
    assert_eq!(refs[3].ops(), vec![Op::Default]);
}

#[test]
fn test_erase_on_heap_moves_back_inline() {
    let refs = refs::<6>();
    let mut vec = tracked::<4>(&refs);
    assert!(!vec.is_inline());

    vec.erase(1..3);
    assert!(vec.is_inline());
    assert_eq!(vec.len(), 4);
    for (r, element) in [&refs[0], &refs[3], &refs[4], &refs[5]].into_iter().zip(vec.iter()) {
        assert!(r.same(element));
        assert_eq!(r.ops(), vec![Op::Default]);
    }
}

#[test]
fn test_erase_reduces_len_by_erased_count() {
    for (start, end) in [(0, 0), (0, 3), (2, 5), (4, 7), (0, 7)] {
        let refs = refs::<7>();
        let mut vec = tracked::<3>(&refs);
        vec.erase(start..end);
        assert_eq!(vec.len(), 7 - (end - start));
        let destructed = refs.iter().filter(|r| r.ops().contains(&Op::Destructed)).count();
        assert_eq!(destructed, end - start);
        assert!(refs.iter().all(|r| !r.ops().contains(&Op::Copy)));
    }
}

#[test]
fn test_clone_inline() {
    let refs = refs::<2>();
    let vec = tracked::<2>(&refs);

    let observed: Vec<Tracker> = {
        let copy = vec.clone();
        assert!(copy.is_inline());
        assert_eq!(copy.len(), 2);
        copy.iter().map(Tracker::track).collect()
    };

    assert!(refs[0].same(&vec[0]));
    assert!(refs[1].same(&vec[1]));
    assert_eq!(refs[0].ops(), vec![Op::Default, Op::Copied]);
    assert_eq!(refs[1].ops(), vec![Op::Default, Op::Copied]);
    assert_eq!(observed[0].ops(), vec![Op::Default, Op::Copy, Op::Destructed]);
    assert_eq!(observed[1].ops(), vec![Op::Default, Op::Copy, Op::Destructed]);
}

#[test]
fn test_clone_heap() {
    let refs = refs::<2>();
    let vec = tracked::<1>(&refs);

    let observed: Vec<Tracker> = {
        let copy = vec.clone();
        assert!(!copy.is_inline());
        copy.iter().map(Tracker::track).collect()
    };

    assert_eq!(refs[0].ops(), vec![Op::Default, Op::Copied]);
    assert_eq!(refs[1].ops(), vec![Op::Default, Op::Copied]);
    assert_eq!(observed[0].ops(), vec![Op::Default, Op::Copy, Op::Destructed]);
    assert_eq!(observed[1].ops(), vec![Op::Default, Op::Copy, Op::Destructed]);
}

#[test]
fn test_move_inline_runs_no_element_code() {
    let refs = refs::<2>();
    let vec = tracked::<2>(&refs);

    {
        let moved = vec;
        assert!(moved.is_inline());
        assert_eq!(moved.len(), 2);
        assert!(refs[0].same(&moved[0]));
    }

    assert_eq!(refs[0].ops(), vec![Op::Default, Op::Destructed]);
    assert_eq!(refs[1].ops(), vec![Op::Default, Op::Destructed]);
}

#[test]
fn test_move_heap_transfers_buffer() {
    let refs = refs::<2>();
    let vec = tracked::<1>(&refs);
    let buffer = vec.as_ptr();

    {
        let moved = vec;
        assert!(!moved.is_inline());
        assert_eq!(moved.as_ptr(), buffer);
    }

    assert_eq!(refs[0].ops(), vec![Op::Default, Op::Destructed]);
    assert_eq!(refs[1].ops(), vec![Op::Default, Op::Destructed]);
}

#[test]
fn test_clone_from_into_smaller_inline() {
    let refs = refs::<2>();
    let source = tracked::<2>(&refs);

    let (old, observed) = {
        let mut target = TestVec::<2>::from_slice(&[Tracker::new()]);
        let old: Vec<Tracker> = target.iter().map(Tracker::track).collect();
        target.clone_from(&source);
        assert!(target.is_inline());
        assert_eq!(target.len(), 2);
        let observed: Vec<Tracker> = target.iter().map(Tracker::track).collect();
        (old, observed)
    };

    assert_eq!(old[0].ops(), vec![Op::Default, Op::Copy, Op::CopyAssign]);
    assert_eq!(refs[0].ops(), vec![Op::Default, Op::Copied]);
    assert_eq!(refs[1].ops(), vec![Op::Default, Op::Copied]);
    assert_eq!(observed[0].ops(), vec![Op::Default, Op::Copy, Op::Destructed]);
    assert_eq!(observed[1].ops(), vec![Op::Default, Op::Copy, Op::Destructed]);
}

#[test]
fn test_clone_from_into_smaller_spills_first() {
    let refs = refs::<2>();
    let source = tracked::<1>(&refs);

    let old = {
        let mut target = TestVec::<1>::from_slice(&[Tracker::new()]);
        let old: Vec<Tracker> = target.iter().map(Tracker::track).collect();
        target.clone_from(&source);
        assert!(!target.is_inline());
        assert_eq!(target.len(), 2);
        old
    };

    assert_eq!(old[0].ops(), vec![Op::Default, Op::Copy, Op::CopyAssign]);
    assert_eq!(refs[0].ops(), vec![Op::Default, Op::Copied]);
    assert_eq!(refs[1].ops(), vec![Op::Default, Op::Copied]);
}

#[test]
fn test_clone_from_into_larger_drops_surplus() {
    let refs = refs::<3>();
    let source = TestVec::<1>::from_slice(&[Tracker::new()]);

    let mut target = tracked::<1>(&refs);
    target.clone_from(&source);
    assert!(target.is_inline());
    assert_eq!(target.len(), 1);
    assert_eq!(refs[0].ops(), vec![Op::Default, Op::CopyAssign]);
    assert_eq!(refs[1].ops(), vec![Op::Default, Op::Destructed]);
    assert_eq!(refs[2].ops(), vec![Op::Default, Op::Destructed]);
    assert_eq!(target[0].ops(), vec![Op::Default, Op::Copy, Op::Copy]);
    assert_eq!(source[0].ops(), vec![Op::Default, Op::Copy, Op::Copied]);
}

#[test]
fn test_insert_one_element_inline() {
    let refs = refs::<2>();
    let mut vec = tracked::<4>(&refs);
    let inserted = Tracker::new();

    vec.insert_from_slice(1, slice::from_ref(&inserted));
    assert!(vec.is_inline());
    assert_eq!(vec.len(), 3);
    assert!(refs[0].same(&vec[0]));
    assert!(refs[1].same(&vec[2]));
    assert_eq!(refs[0].ops(), vec![Op::Default]);
    assert_eq!(refs[1].ops(), vec![Op::Default]);
    assert_eq!(vec[1].ops(), vec![Op::Default, Op::Copy]);
    assert_eq!(inserted.ops(), vec![Op::Default, Op::Copied]);
}

#[test]
fn test_insert_one_element_heap() {
    let refs = refs::<2>();
    let mut vec = tracked::<1>(&refs);
    let inserted = Tracker::new();

    vec.insert_from_slice(1, slice::from_ref(&inserted));
    assert!(!vec.is_inline());
    assert_eq!(vec.len(), 3);
    assert!(refs[0].same(&vec[0]));
    assert!(refs[1].same(&vec[2]));
    assert_eq!(vec[1].ops(), vec![Op::Default, Op::Copy]);
    assert_eq!(inserted.ops(), vec![Op::Default, Op::Copied]);
}

#[test]
fn test_insert_many_elements_inline() {
    let refs = refs::<2>();
    let mut vec = tracked::<5>(&refs);
    let inserted = crate::refs::<2>();

    vec.insert_from_slice(1, &inserted);
    assert!(vec.is_inline());
    assert_eq!(vec.len(), 4);
    assert!(refs[0].same(&vec[0]));
    assert!(refs[1].same(&vec[3]));
    assert_eq!(refs[0].ops(), vec![Op::Default]);
    assert_eq!(refs[1].ops(), vec![Op::Default]);
    for (i, source) in inserted.iter().enumerate() {
        assert_eq!(vec[1 + i].ops(), vec![Op::Default, Op::Copy]);
        assert_eq!(source.ops(), vec![Op::Default, Op::Copied]);
    }
}

#[test]
fn test_insert_many_elements_while_spilling() {
    let refs = refs::<3>();
    let mut vec = tracked::<3>(&refs);
    let inserted = crate::refs::<3>();

    vec.insert_from_slice(1, &inserted);
    assert!(!vec.is_inline());
    assert_eq!(vec.len(), 6);
    assert!(refs[0].same(&vec[0]));
    assert!(refs[1].same(&vec[4]));
    assert!(refs[2].same(&vec[5]));
    for r in &refs {
        assert_eq!(r.ops(), vec![Op::Default]);
    }
    for (i, source) in inserted.iter().enumerate() {
        assert_eq!(vec[1 + i].ops(), vec![Op::Default, Op::Copy]);
        assert_eq!(source.ops(), vec![Op::Default, Op::Copied]);
    }
}

#[test]
fn test_insert_while_spilling() {
    let refs = refs::<2>();
    let mut vec = tracked::<2>(&refs);
    let inserted = Tracker::new();

    vec.insert(1, inserted.track());
    assert!(!vec.is_inline());
    assert_eq!(vec.len(), 3);
    assert!(refs[0].same(&vec[0]));
    assert!(inserted.same(&vec[1]));
    assert!(refs[1].same(&vec[2]));
    assert_eq!(refs[0].ops(), vec![Op::Default]);
    assert_eq!(refs[1].ops(), vec![Op::Default]);
    assert_eq!(inserted.ops(), vec![Op::Default]);
}

#[test]
fn test_resize_clones_fill_value() {
    let mut vec = TestVec::<2>::new();
    let fill = Tracker::new();
    vec.resize(3, fill.track());
    assert_eq!(vec.len(), 3);
    // Each clone starts from the fill value's history at that moment.
    assert_eq!(vec[0].ops(), vec![Op::Default, Op::Copy]);
    assert_eq!(vec[1].ops(), vec![Op::Default, Op::Copied, Op::Copy]);
    assert!(fill.same(&vec[2]));
    assert_eq!(fill.ops(), vec![Op::Default, Op::Copied, Op::Copied]);
}

#[test]
fn test_drop_destructs_each_element_once() {
    let refs = refs::<5>();
    drop(tracked::<2>(&refs));
    for r in &refs {
        assert_eq!(r.ops(), vec![Op::Default, Op::Destructed]);
    }
}

#[test]
fn test_into_iter_drops_unyielded() {
    let refs = refs::<4>();
    let vec = tracked::<2>(&refs);
    let mut iter = vec.into_iter();
    let first = iter.next();
    drop(iter);

    assert_eq!(refs[0].ops(), vec![Op::Default]);
    for r in &refs[1..] {
        assert_eq!(r.ops(), vec![Op::Default, Op::Destructed]);
    }
    drop(first);
    assert_eq!(refs[0].ops(), vec![Op::Default, Op::Destructed]);
}
