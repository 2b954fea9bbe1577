//! Capability traits.
//!
//! - [`Sequence`]: a length plus a single forward pass over owned items.
//! - [`View`]: a `Copy` sequence over borrowed storage with positional and
//!   slice access. Owning types ([`Vector`](crate::Vector),
//!   [`Builder`](crate::Builder)) are sequences but never views.
//! - [`Operand`]: anything an elementwise operation accepts, i.e. a sequence
//!   or a broadcast scalar.

use std::iter::{repeat, Repeat};

use crate::slice::SliceIndex;
use crate::view::StridedView;
use crate::Result;

/// A finite, single-pass source of elements with a known length.
///
/// `into_elements` consumes the sequence. Views and `&Vector` are `Copy`, so
/// consuming them is free; expression nodes are consumed for good.
pub trait Sequence: Sized {
    type Item;
    type Elements: Iterator<Item = Self::Item>;

    /// Number of elements `into_elements` yields.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Validate operand lengths before anything is evaluated.
    ///
    /// Storage-backed sequences are always well formed. Expression nodes
    /// override this to check their operands recursively.
    fn check_shape(&self) -> Result<()> {
        Ok(())
    }

    fn into_elements(self) -> Self::Elements;
}

/// A borrowed, non-owning sequence that supports positional access and
/// narrowing by any [`SliceIndex`].
pub trait View<'a>: Sequence + Copy {
    type Elem: Clone + 'a;

    fn at(&self, index: usize) -> &'a Self::Elem;

    fn stride(&self) -> usize;

    /// Narrow by any descriptor. The result is strided regardless of kind.
    fn narrow<I: SliceIndex>(&self, index: I) -> StridedView<'a, Self::Elem>;
}

/// Marks a value to be broadcast across every position of an expression.
///
/// Primitive numbers and `bool` broadcast without the wrapper; `Scalar` is for
/// any other element type.
///
/// ```rust
/// use num_complex::Complex64;
/// use seqview::{vector, Scalar, Vector};
///
/// let v = vector![Complex64::new(1.0, 1.0), Complex64::new(0.0, 2.0)];
/// let shifted = Vector::from_sequence(&v + Scalar(Complex64::new(1.0, 0.0))).unwrap();
/// assert_eq!(shifted[1], Complex64::new(1.0, 2.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Scalar<T>(pub T);

/// An argument of an elementwise operation.
pub trait Operand {
    type Item;
    type Elements: Iterator<Item = Self::Item>;

    /// Element count, or `None` for a broadcast scalar.
    fn extent(&self) -> Option<usize>;

    fn check_shape(&self) -> Result<()>;

    /// Elements in order. Scalars repeat forever; the enclosing expression
    /// bounds the traversal.
    fn into_elements(self) -> Self::Elements;
}

impl<S: Sequence> Operand for S {
    type Item = S::Item;
    type Elements = S::Elements;

    #[inline]
    fn extent(&self) -> Option<usize> {
        Some(self.len())
    }

    #[inline]
    fn check_shape(&self) -> Result<()> {
        Sequence::check_shape(self)
    }

    #[inline]
    fn into_elements(self) -> S::Elements {
        Sequence::into_elements(self)
    }
}

impl<T: Clone> Operand for Scalar<T> {
    type Item = T;
    type Elements = Repeat<T>;

    #[inline]
    fn extent(&self) -> Option<usize> {
        None
    }

    #[inline]
    fn check_shape(&self) -> Result<()> {
        Ok(())
    }

    #[inline]
    fn into_elements(self) -> Repeat<T> {
        repeat(self.0)
    }
}

macro_rules! impl_scalar_operand {
    ($($t:ty),* $(,)?) => {
        $(
            impl Operand for $t {
                type Item = $t;
                type Elements = Repeat<$t>;

                #[inline]
                fn extent(&self) -> Option<usize> {
                    None
                }

                #[inline]
                fn check_shape(&self) -> Result<()> {
                    Ok(())
                }

                #[inline]
                fn into_elements(self) -> Repeat<$t> {
                    repeat(self)
                }
            }
        )*
    };
}

impl_scalar_operand!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64,
);
