//! Function values and the `apply` primitives.
//!
//! Every elementwise operation in the crate is one of two calls:
//! [`apply`] for unary functions and [`apply2`] for binary ones. The named
//! wrappers ([`add`], [`lt`], [`not`], ...) pass a catalogue function value
//! ([`AddOp`], [`LtOp`], [`NotOp`], ...), and the `std::ops` operators forward
//! to the same wrappers.
//!
//! Any closure is a function value too:
//!
//! ```rust
//! use seqview::{apply2, vector, Vector};
//!
//! let x = vector![3, 4];
//! let y = vector![4, 3];
//! let hyp = apply2(&x, &y, |a: i32, b: i32| ((a * a + b * b) as f64).sqrt());
//! assert_eq!(Vector::from_sequence(hyp).unwrap(), vector![5.0, 5.0]);
//! ```

use std::ops::{Add, Div, Mul, Neg, Rem, Sub};

use crate::expr::{BinaryExpr, UnaryExpr};
use crate::traits::Operand;

// ============================================================================
// Function traits
// ============================================================================

/// A function of one argument.
pub trait UnaryFn<A> {
    type Output;

    fn call(&mut self, a: A) -> Self::Output;
}

/// A function of two arguments.
pub trait BinaryFn<A, B> {
    type Output;

    fn call(&mut self, a: A, b: B) -> Self::Output;
}

impl<A, R, F> UnaryFn<A> for F
where
    F: FnMut(A) -> R,
{
    type Output = R;

    #[inline]
    fn call(&mut self, a: A) -> R {
        self(a)
    }
}

impl<A, B, R, F> BinaryFn<A, B> for F
where
    F: FnMut(A, B) -> R,
{
    type Output = R;

    #[inline]
    fn call(&mut self, a: A, b: B) -> R {
        self(a, b)
    }
}

// ============================================================================
// Catalogue
// ============================================================================

macro_rules! arith_op {
    ($(#[$doc:meta])* $name:ident, $trait:ident, $method:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl<A: $trait<B>, B> BinaryFn<A, B> for $name {
            type Output = A::Output;

            #[inline]
            fn call(&mut self, a: A, b: B) -> A::Output {
                a.$method(b)
            }
        }
    };
}

arith_op!(
    /// `a + b`
    AddOp, Add, add
);
arith_op!(
    /// `a - b`
    SubOp, Sub, sub
);
arith_op!(
    /// `a * b`
    MulOp, Mul, mul
);
arith_op!(
    /// `a / b`
    DivOp, Div, div
);
arith_op!(
    /// `a % b`
    RemOp, Rem, rem
);

macro_rules! compare_op {
    ($(#[$doc:meta])* $name:ident, $trait:ident, $method:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
        pub struct $name;

        impl<A: $trait<B>, B> BinaryFn<A, B> for $name {
            type Output = bool;

            #[inline]
            fn call(&mut self, a: A, b: B) -> bool {
                a.$method(&b)
            }
        }
    };
}

compare_op!(
    /// `a == b`
    EqOp, PartialEq, eq
);
compare_op!(
    /// `a != b`
    NeOp, PartialEq, ne
);
compare_op!(
    /// `a < b`
    LtOp, PartialOrd, lt
);
compare_op!(
    /// `a <= b`
    LeOp, PartialOrd, le
);
compare_op!(
    /// `a > b`
    GtOp, PartialOrd, gt
);
compare_op!(
    /// `a >= b`
    GeOp, PartialOrd, ge
);

/// Logical `a && b` over anything convertible to `bool`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AndOp;

impl<A: Into<bool>, B: Into<bool>> BinaryFn<A, B> for AndOp {
    type Output = bool;

    #[inline]
    fn call(&mut self, a: A, b: B) -> bool {
        a.into() && b.into()
    }
}

/// Logical `a || b`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrOp;

impl<A: Into<bool>, B: Into<bool>> BinaryFn<A, B> for OrOp {
    type Output = bool;

    #[inline]
    fn call(&mut self, a: A, b: B) -> bool {
        a.into() || b.into()
    }
}

/// `-a`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NegOp;

impl<A: Neg> UnaryFn<A> for NegOp {
    type Output = A::Output;

    #[inline]
    fn call(&mut self, a: A) -> A::Output {
        -a
    }
}

/// Logical `!a`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotOp;

impl<A: Into<bool>> UnaryFn<A> for NotOp {
    type Output = bool;

    #[inline]
    fn call(&mut self, a: A) -> bool {
        !a.into()
    }
}

// ============================================================================
// apply
// ============================================================================

/// Lazily apply `f` to every element of `a`.
///
/// Nothing is evaluated until the returned expression is consumed.
#[inline]
pub fn apply<A, F>(a: A, f: F) -> UnaryExpr<A, F>
where
    A: Operand,
    F: UnaryFn<A::Item>,
{
    UnaryExpr::new(a, f)
}

/// Lazily apply `f` to corresponding elements of `a` and `b`.
///
/// Either side may be a scalar, which is broadcast. Operand lengths are
/// checked when the expression is consumed.
#[inline]
pub fn apply2<A, B, F>(a: A, b: B, f: F) -> BinaryExpr<A, B, F>
where
    A: Operand,
    B: Operand,
    F: BinaryFn<A::Item, B::Item>,
{
    BinaryExpr::new(a, b, f)
}

macro_rules! binary_wrappers {
    ($($(#[$doc:meta])* $name:ident => $op:ident;)*) => {
        $(
            $(#[$doc])*
            #[inline]
            pub fn $name<A, B>(a: A, b: B) -> BinaryExpr<A, B, $op>
            where
                A: Operand,
                B: Operand,
                $op: BinaryFn<A::Item, B::Item>,
            {
                apply2(a, b, $op)
            }
        )*
    };
}

binary_wrappers! {
    /// Elementwise `a + b`.
    add => AddOp;
    /// Elementwise `a - b`.
    sub => SubOp;
    /// Elementwise `a * b`.
    mul => MulOp;
    /// Elementwise `a / b`.
    div => DivOp;
    /// Elementwise `a % b`.
    rem => RemOp;
    /// Elementwise logical and.
    and => AndOp;
    /// Elementwise logical or.
    or => OrOp;
    /// Elementwise `a == b`.
    eq => EqOp;
    /// Elementwise `a != b`.
    ne => NeOp;
    /// Elementwise `a < b`.
    lt => LtOp;
    /// Elementwise `a <= b`.
    le => LeOp;
    /// Elementwise `a > b`.
    gt => GtOp;
    /// Elementwise `a >= b`.
    ge => GeOp;
}

/// Elementwise `-a`.
#[inline]
pub fn neg<A>(a: A) -> UnaryExpr<A, NegOp>
where
    A: Operand,
    NegOp: UnaryFn<A::Item>,
{
    apply(a, NegOp)
}

/// Elementwise logical not.
#[inline]
pub fn not<A>(a: A) -> UnaryExpr<A, NotOp>
where
    A: Operand,
    NotOp: UnaryFn<A::Item>,
{
    apply(a, NotOp)
}
