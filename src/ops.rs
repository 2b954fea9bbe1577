//! `std::ops` operators over sequences.
//!
//! `+ - * / %` and unary `-` / `!` build the same lazy nodes as the named
//! wrappers in [`functional`](crate::functional). A sequence may appear on
//! either side; the other side is any [`Operand`], and primitive numbers may
//! also appear on the left:
//!
//! ```rust
//! use seqview::{vector, Vector};
//!
//! let a = vector![1, 2, 3];
//! let b = vector![10, 20, 30];
//! let c = Vector::from_sequence(100 - (&a + &b) * 2).unwrap();
//! assert_eq!(c, vector![78, 56, 34]);
//! ```
//!
//! Comparisons and logical and/or have no operator form: `PartialEq` and
//! `PartialOrd` must return `bool`. Use [`eq`](crate::eq), [`lt`](crate::lt),
//! [`and`](crate::and), and the rest of the catalogue.

use std::ops::{Add, Div, Mul, Neg, Not, Rem, Sub};

use crate::expr::{BinaryExpr, UnaryExpr};
use crate::functional::{
    apply, apply2, AddOp, BinaryFn, DivOp, MulOp, NegOp, NotOp, RemOp, SubOp, UnaryFn,
};
use crate::traits::{Operand, Sequence};
use crate::vector::Vector;
use crate::view::{DenseView, StridedView};

// ============================================================================
// Sequence on the left
// ============================================================================

macro_rules! impl_binary_op {
    ([$($gen:tt)*] $ty:ty, $trait:ident, $method:ident, $op:ident) => {
        impl<$($gen)* R> $trait<R> for $ty
        where
            Self: Sequence,
            R: Operand,
            $op: BinaryFn<<Self as Sequence>::Item, R::Item>,
        {
            type Output = BinaryExpr<Self, R, $op>;

            #[inline]
            fn $method(self, rhs: R) -> Self::Output {
                apply2(self, rhs, $op)
            }
        }
    };
}

macro_rules! impl_unary_op {
    ([$($gen:tt)*] $ty:ty, $trait:ident, $method:ident, $op:ident) => {
        impl<$($gen)*> $trait for $ty
        where
            Self: Sequence,
            $op: UnaryFn<<Self as Sequence>::Item>,
        {
            type Output = UnaryExpr<Self, $op>;

            #[inline]
            fn $method(self) -> Self::Output {
                apply(self, $op)
            }
        }
    };
}

macro_rules! impl_sequence_ops {
    ($([$($gen:tt)*] $ty:ty;)*) => {
        $(
            impl_binary_op!([$($gen)*] $ty, Add, add, AddOp);
            impl_binary_op!([$($gen)*] $ty, Sub, sub, SubOp);
            impl_binary_op!([$($gen)*] $ty, Mul, mul, MulOp);
            impl_binary_op!([$($gen)*] $ty, Div, div, DivOp);
            impl_binary_op!([$($gen)*] $ty, Rem, rem, RemOp);
            impl_unary_op!([$($gen)*] $ty, Neg, neg, NegOp);
            impl_unary_op!([$($gen)*] $ty, Not, not, NotOp);
        )*
    };
}

impl_sequence_ops! {
    ['a, T,] DenseView<'a, T>;
    ['a, T,] StridedView<'a, T>;
    ['a, T,] &'a Vector<T>;
    [T,] Vector<T>;
    [A, F,] UnaryExpr<A, F>;
    [A, B, F,] BinaryExpr<A, B, F>;
}

// ============================================================================
// Primitive scalar on the left
// ============================================================================

macro_rules! impl_scalar_lhs_op {
    ([$($gen:tt)*] $ty:ty, $prim:ty, $trait:ident, $method:ident, $op:ident) => {
        impl<$($gen)*> $trait<$ty> for $prim
        where
            $ty: Sequence,
            $op: BinaryFn<$prim, <$ty as Sequence>::Item>,
        {
            type Output = BinaryExpr<$prim, $ty, $op>;

            #[inline]
            fn $method(self, rhs: $ty) -> Self::Output {
                apply2(self, rhs, $op)
            }
        }
    };
}

macro_rules! impl_scalar_lhs_ops {
    ([$($gen:tt)*] $ty:ty, $prim:ty) => {
        impl_scalar_lhs_op!([$($gen)*] $ty, $prim, Add, add, AddOp);
        impl_scalar_lhs_op!([$($gen)*] $ty, $prim, Sub, sub, SubOp);
        impl_scalar_lhs_op!([$($gen)*] $ty, $prim, Mul, mul, MulOp);
        impl_scalar_lhs_op!([$($gen)*] $ty, $prim, Div, div, DivOp);
        impl_scalar_lhs_op!([$($gen)*] $ty, $prim, Rem, rem, RemOp);
    };
}

macro_rules! impl_scalar_lhs {
    ($($prim:ty),* $(,)?) => {
        $(
            impl_scalar_lhs_ops!(['a, T,] DenseView<'a, T>, $prim);
            impl_scalar_lhs_ops!(['a, T,] StridedView<'a, T>, $prim);
            impl_scalar_lhs_ops!(['a, T,] &'a Vector<T>, $prim);
            impl_scalar_lhs_ops!([T,] Vector<T>, $prim);
            impl_scalar_lhs_ops!([A, F,] UnaryExpr<A, F>, $prim);
            impl_scalar_lhs_ops!([A, B, F,] BinaryExpr<A, B, F>, $prim);
        )*
    };
}

impl_scalar_lhs!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slice::StridedSlice;
    use crate::traits::Scalar;
    use approx::assert_relative_eq;

    fn eval<S: Sequence>(seq: S) -> Vec<S::Item> {
        seq.into_elements().collect()
    }

    #[test]
    fn test_view_operators() {
        let x = [1.0, 2.0, 3.0, 4.0];
        let y = [0.5, 0.5, 0.5, 0.5];
        let xv = DenseView::new(&x);
        let yv = DenseView::new(&y);
        assert_eq!(eval(xv + yv), vec![1.5, 2.5, 3.5, 4.5]);
        assert_eq!(eval(xv - 1.0), vec![0.0, 1.0, 2.0, 3.0]);
        assert_eq!(eval(xv * yv), vec![0.5, 1.0, 1.5, 2.0]);
        assert_eq!(eval(xv / 2.0), vec![0.5, 1.0, 1.5, 2.0]);
        assert_eq!(eval(-xv), vec![-1.0, -2.0, -3.0, -4.0]);
    }

    #[test]
    fn test_scalar_on_left() {
        let x = [1, 2, 4];
        let xv = DenseView::new(&x);
        assert_eq!(eval(8 / xv), vec![8, 4, 2]);
        assert_eq!(eval(10 - xv), vec![9, 8, 6]);
        assert_eq!(eval(7 % xv), vec![0, 1, 3]);
        let s = StridedView::new(&x, 2, 2);
        assert_eq!(eval(3 * s), vec![3, 12]);
    }

    #[test]
    fn test_vector_operands() {
        let a = Vector::from([1u32, 2, 3]);
        let b = Vector::from([3u32, 2, 1]);
        assert_eq!(eval(&a + &b), vec![4, 4, 4]);
        assert_eq!(eval(&a * b.view()), vec![3, 4, 3]);
        // By value, the vector is consumed.
        assert_eq!(eval(a % 2u32), vec![1, 0, 1]);
    }

    #[test]
    fn test_chained_expressions() {
        let data: Vec<f64> = (0..10).map(f64::from).collect();
        let v = DenseView::new(&data);
        let even = v.slice(StridedSlice::new(0, 5, 2));
        let e = (even * 2.0 + 1.0) / (even + 1.0);
        let out = eval(e);
        assert_eq!(out.len(), 5);
        for (i, value) in out.iter().enumerate() {
            let x = (2 * i) as f64;
            assert_relative_eq!(*value, (x * 2.0 + 1.0) / (x + 1.0));
        }
    }

    #[test]
    fn test_not_operator() {
        let flags = [true, false];
        assert_eq!(eval(!DenseView::new(&flags)), vec![false, true]);
        let x = [1, 2];
        assert_eq!(eval(!crate::functional::eq(DenseView::new(&x), 1)), vec![false, true]);
    }

    #[test]
    fn test_wrapped_scalar_on_right() {
        let words = [String::from("a"), String::from("b")];
        let e = DenseView::new(&words) + Scalar("!");
        assert_eq!(eval(e), vec!["a!", "b!"]);
    }
}
