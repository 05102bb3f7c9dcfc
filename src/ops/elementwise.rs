use core::ops::{AddAssign, DivAssign, MulAssign, SubAssign};

use super::ensure_same_shape;
use crate::{
    Array,
    error::Result,
    view::{ArrayView, ArrayViewMut},
};

macro_rules! elementwise_ops {
    ($(
        $bound:ident, $op:tt, $name:literal =>
            $assign:ident, $value:ident, $scalar_assign:ident, $scalar:ident;
    )*) => {$(
        #[doc = concat!("`lhs[i] ", stringify!($op), " rhs[i]` for every element.")]
        ///
        /// The shapes must be equal.
        pub fn $assign<T, L, R>(lhs: &mut L, rhs: &R) -> Result<()>
        where
            T: Copy + $bound,
            L: ArrayViewMut<T> + ?Sized,
            R: ArrayView<T> + ?Sized,
        {
            ensure_same_shape(lhs.shape(), rhs.shape())?;
            lhs.zip_mut_with(rhs, |l, &r| *l $op r);
            Ok(())
        }

        #[doc = concat!("Elementwise ", $name, " into a new array. The shapes must be equal.")]
        pub fn $value<T, L, R>(lhs: &L, rhs: &R) -> Result<Array<T>>
        where
            T: Copy + $bound,
            L: ArrayView<T> + ?Sized,
            R: ArrayView<T> + ?Sized,
        {
            ensure_same_shape(lhs.shape(), rhs.shape())?;
            let mut result = lhs.materialize();
            result.zip_mut_with(rhs, |l, &r| *l $op r);
            Ok(result)
        }

        #[doc = concat!("`lhs[i] ", stringify!($op), " scalar` for every element.")]
        pub fn $scalar_assign<T, L>(lhs: &mut L, scalar: T)
        where
            T: Copy + $bound,
            L: ArrayViewMut<T> + ?Sized,
        {
            lhs.for_each_mut(|l| *l $op scalar);
        }

        #[doc = concat!("Scalar ", $name, " into a new array.")]
        pub fn $scalar<T, L>(lhs: &L, scalar: T) -> Array<T>
        where
            T: Copy + $bound,
            L: ArrayView<T> + ?Sized,
        {
            let mut result = lhs.materialize();
            result.for_each_mut(|l| *l $op scalar);
            result
        }
    )*};
}

elementwise_ops! {
    AddAssign, +=, "addition" => add_assign, add, add_scalar_assign, add_scalar;
    SubAssign, -=, "subtraction" => sub_assign, sub, sub_scalar_assign, sub_scalar;
    MulAssign, *=, "multiplication" => mul_assign, mul, mul_scalar_assign, mul_scalar;
    DivAssign, /=, "division" => div_assign, div, div_scalar_assign, div_scalar;
}
