//! Lazy expression nodes.
//!
//! [`UnaryExpr`] and [`BinaryExpr`] hold their operands and a function value
//! and nothing else. Building one does O(1) work and calls the function zero
//! times. Consuming one (assigning it, collecting it into a
//! [`Vector`](crate::Vector), or reducing it) runs a single forward pass that
//! calls the function once per element.
//!
//! Nodes are neither `Clone` nor `Copy`, and every consumer takes them by
//! value, so an expression is evaluated at most once.

use crate::functional::{BinaryFn, UnaryFn};
use crate::traits::{Operand, Sequence};
use crate::{Result, SeqError};

// ============================================================================
// UnaryExpr
// ============================================================================

/// `f(a)` for every element of `a`.
pub struct UnaryExpr<A, F> {
    operand: A,
    f: F,
}

impl<A, F> UnaryExpr<A, F>
where
    A: Operand,
    F: UnaryFn<A::Item>,
{
    #[inline]
    pub fn new(operand: A, f: F) -> Self {
        Self { operand, f }
    }
}

impl<A, F> Sequence for UnaryExpr<A, F>
where
    A: Operand,
    F: UnaryFn<A::Item>,
{
    type Item = F::Output;
    type Elements = UnaryElements<A::Elements, F>;

    /// The operand's length, or 1 for a scalar operand.
    #[inline]
    fn len(&self) -> usize {
        self.operand.extent().unwrap_or(1)
    }

    #[inline]
    fn check_shape(&self) -> Result<()> {
        Operand::check_shape(&self.operand)
    }

    fn into_elements(self) -> Self::Elements {
        let remaining = Sequence::len(&self);
        UnaryElements {
            elements: Operand::into_elements(self.operand),
            f: self.f,
            remaining,
        }
    }
}

/// Element iterator of a [`UnaryExpr`].
pub struct UnaryElements<I, F> {
    elements: I,
    f: F,
    remaining: usize,
}

impl<I, F> Iterator for UnaryElements<I, F>
where
    I: Iterator,
    F: UnaryFn<I::Item>,
{
    type Item = F::Output;

    #[inline]
    fn next(&mut self) -> Option<F::Output> {
        if self.remaining == 0 {
            return None;
        }
        let Some(a) = self.elements.next() else {
            self.remaining = 0;
            return None;
        };
        self.remaining -= 1;
        Some(self.f.call(a))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<I, F> ExactSizeIterator for UnaryElements<I, F>
where
    I: Iterator,
    F: UnaryFn<I::Item>,
{
}

// ============================================================================
// BinaryExpr
// ============================================================================

/// `f(a, b)` for corresponding elements of `a` and `b`.
///
/// A scalar operand is broadcast to the other operand's length; two scalars
/// make a one-element expression.
pub struct BinaryExpr<A, B, F> {
    lhs: A,
    rhs: B,
    f: F,
}

impl<A, B, F> BinaryExpr<A, B, F>
where
    A: Operand,
    B: Operand,
    F: BinaryFn<A::Item, B::Item>,
{
    #[inline]
    pub fn new(lhs: A, rhs: B, f: F) -> Self {
        Self { lhs, rhs, f }
    }
}

impl<A, B, F> Sequence for BinaryExpr<A, B, F>
where
    A: Operand,
    B: Operand,
    F: BinaryFn<A::Item, B::Item>,
{
    type Item = F::Output;
    type Elements = BinaryElements<A::Elements, B::Elements, F>;

    #[inline]
    fn len(&self) -> usize {
        match (self.lhs.extent(), self.rhs.extent()) {
            (Some(n), _) | (None, Some(n)) => n,
            (None, None) => 1,
        }
    }

    /// Check both operands, then that their lengths agree.
    fn check_shape(&self) -> Result<()> {
        Operand::check_shape(&self.lhs)?;
        Operand::check_shape(&self.rhs)?;
        match (self.lhs.extent(), self.rhs.extent()) {
            (Some(expected), Some(found)) if expected != found => {
                log::debug!("operand sizes mismatch: {expected} vs {found}");
                Err(SeqError::SizeMismatch { expected, found })
            }
            _ => Ok(()),
        }
    }

    fn into_elements(self) -> Self::Elements {
        let remaining = Sequence::len(&self);
        BinaryElements {
            lhs: Operand::into_elements(self.lhs),
            rhs: Operand::into_elements(self.rhs),
            f: self.f,
            remaining,
        }
    }
}

/// Element iterator of a [`BinaryExpr`]. Advances both operands in lockstep.
pub struct BinaryElements<I, J, F> {
    lhs: I,
    rhs: J,
    f: F,
    remaining: usize,
}

impl<I, J, F> Iterator for BinaryElements<I, J, F>
where
    I: Iterator,
    J: Iterator,
    F: BinaryFn<I::Item, J::Item>,
{
    type Item = F::Output;

    #[inline]
    fn next(&mut self) -> Option<F::Output> {
        if self.remaining == 0 {
            return None;
        }
        let (Some(a), Some(b)) = (self.lhs.next(), self.rhs.next()) else {
            self.remaining = 0;
            return None;
        };
        self.remaining -= 1;
        Some(self.f.call(a, b))
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<I, J, F> ExactSizeIterator for BinaryElements<I, J, F>
where
    I: Iterator,
    J: Iterator,
    F: BinaryFn<I::Item, J::Item>,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functional::{AddOp, MulOp, NegOp};
    use crate::traits::Scalar;
    use crate::view::{DenseView, StridedView};
    use std::cell::Cell;

    #[test]
    fn test_unary_len_and_values() {
        let x = [1, 2, 3, 4];
        let e = UnaryExpr::new(DenseView::new(&x), NegOp);
        assert_eq!(Sequence::len(&e), 4);
        let mut it = Sequence::into_elements(e);
        assert_eq!(it.len(), 4);
        assert_eq!(it.next(), Some(-1));
        assert_eq!(it.len(), 3);
        assert_eq!(it.collect::<Vec<_>>(), vec![-2, -3, -4]);
    }

    #[test]
    fn test_scalar_broadcast_lengths() {
        let x = [1.0, 2.0, 3.0];
        let v = DenseView::new(&x);
        assert_eq!(Sequence::len(&BinaryExpr::new(v, 2.0, MulOp)), 3);
        assert_eq!(Sequence::len(&BinaryExpr::new(2.0, v, MulOp)), 3);

        let both = BinaryExpr::new(2, 3, AddOp);
        assert_eq!(Sequence::len(&both), 1);
        assert_eq!(Sequence::into_elements(both).collect::<Vec<_>>(), vec![5]);

        let unit = UnaryExpr::new(Scalar(4i8), NegOp);
        assert_eq!(Sequence::into_elements(unit).collect::<Vec<_>>(), vec![-4]);
    }

    #[test]
    fn test_shape_mismatch_detected_before_evaluation() {
        let calls = Cell::new(0);
        let x = [1, 2, 3];
        let y = [1, 2];
        let e = BinaryExpr::new(DenseView::new(&x), DenseView::new(&y), |a: i32, b: i32| {
            calls.set(calls.get() + 1);
            a + b
        });
        assert_eq!(
            Sequence::check_shape(&e),
            Err(SeqError::SizeMismatch {
                expected: 3,
                found: 2
            })
        );
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_nested_shape_check() {
        let x = [1, 2, 3, 4];
        let y = [1, 2, 3];
        let data = [0; 8];
        // Outer operands agree (4 and 4); the inner pair does not.
        let inner = BinaryExpr::new(DenseView::new(&x), DenseView::new(&y), AddOp);
        let strided = StridedView::new(&data, 4, 2);
        let outer = BinaryExpr::new(strided, UnaryExpr::new(inner, NegOp), AddOp);
        assert_eq!(
            Sequence::check_shape(&outer),
            Err(SeqError::SizeMismatch {
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn test_lockstep_evaluation_order() {
        let seen = Cell::new(Vec::new());
        let x = [10, 20, 30];
        let y = [1, 2, 3];
        let e = BinaryExpr::new(DenseView::new(&x), DenseView::new(&y), |a: i32, b: i32| {
            let mut log = seen.take();
            log.push((a, b));
            seen.set(log);
            a - b
        });
        let out: Vec<i32> = Sequence::into_elements(e).collect();
        assert_eq!(out, vec![9, 18, 27]);
        assert_eq!(seen.take(), vec![(10, 1), (20, 2), (30, 3)]);
    }
}
