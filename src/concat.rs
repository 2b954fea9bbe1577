//! Concatenation of sequences and scalars into a new [`Vector`].
//!
//! The element type is fixed by the first piece; every later piece must
//! convert into it. A scalar piece contributes one element.
//!
//! ```rust
//! use seqview::{cat, vector};
//!
//! let v = cat![vector![1, 2], 3, vector![4, 5, 6]].unwrap();
//! assert_eq!(v, vector![1, 2, 3, 4, 5, 6]);
//! ```

use std::marker::PhantomData;

use crate::builder::Builder;
use crate::traits::Operand;
use crate::vector::Vector;
use crate::Result;

/// Concatenate sequences and scalars into a new [`Vector`].
///
/// Expands to a [`Concat`] chain and evaluates to `Result<Vector<T>>`.
#[macro_export]
macro_rules! cat {
    ($first:expr $(, $rest:expr)* $(,)?) => {
        $crate::Concat::start($first)$(.then($rest))*.finish()
    };
}

/// Element count a piece contributes.
fn piece_len<P: Operand>(piece: &P) -> usize {
    piece.extent().unwrap_or(1)
}

/// A type-level list of concatenation pieces, written as nested pairs
/// `(((), a), b)`.
pub trait Pieces<T> {
    /// Total element count.
    fn count(&self) -> usize;

    fn check_shape(&self) -> Result<()>;

    /// Push every element of every piece, in order.
    fn write_into(self, builder: &mut Builder<T>) -> Result<()>;
}

impl<T> Pieces<T> for () {
    #[inline]
    fn count(&self) -> usize {
        0
    }

    #[inline]
    fn check_shape(&self) -> Result<()> {
        Ok(())
    }

    #[inline]
    fn write_into(self, _builder: &mut Builder<T>) -> Result<()> {
        Ok(())
    }
}

impl<T, Rest, P> Pieces<T> for (Rest, P)
where
    Rest: Pieces<T>,
    P: Operand,
    P::Item: Into<T>,
{
    #[inline]
    fn count(&self) -> usize {
        self.0.count() + piece_len(&self.1)
    }

    fn check_shape(&self) -> Result<()> {
        self.0.check_shape()?;
        Operand::check_shape(&self.1)
    }

    fn write_into(self, builder: &mut Builder<T>) -> Result<()> {
        let (rest, piece) = self;
        rest.write_into(builder)?;
        let len = piece_len(&piece);
        for value in Operand::into_elements(piece).take(len) {
            builder.push(value.into())?;
        }
        Ok(())
    }
}

/// A pending concatenation. Nothing is allocated until [`finish`](Concat::finish).
pub struct Concat<T, P> {
    pieces: P,
    _marker: PhantomData<fn() -> T>,
}

impl<P: Operand> Concat<P::Item, ((), P)> {
    /// Begin with `first`, whose element type becomes the result's.
    pub fn start(first: P) -> Self {
        Self {
            pieces: ((), first),
            _marker: PhantomData,
        }
    }
}

impl<T> Concat<T, ()> {
    /// Begin with no pieces.
    pub fn new() -> Self {
        Self {
            pieces: (),
            _marker: PhantomData,
        }
    }
}

impl<T> Default for Concat<T, ()> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Pieces<T>> Concat<T, P> {
    /// Append a piece.
    pub fn then<Q>(self, piece: Q) -> Concat<T, (P, Q)>
    where
        Q: Operand,
        Q::Item: Into<T>,
    {
        Concat {
            pieces: (self.pieces, piece),
            _marker: PhantomData,
        }
    }

    /// Element count of the result.
    pub fn len(&self) -> usize {
        self.pieces.count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Allocate the result and copy every piece into it.
    ///
    /// # Errors
    /// [`SeqError::SizeMismatch`](crate::SeqError::SizeMismatch) if an
    /// expression piece has operands of different lengths. Nothing is
    /// allocated in that case.
    pub fn finish(self) -> Result<Vector<T>> {
        self.pieces.check_shape()?;
        let count = self.pieces.count();
        log::trace!("concatenating {count} elements");
        let mut builder = Builder::new(count)?;
        self.pieces.write_into(&mut builder)?;
        Vector::from_builder(builder)
    }
}
