//! Reductions. Each one validates the shape of its input and then drives a
//! single evaluation pass.

use num_traits::Zero;

use crate::traits::Sequence;
use crate::Result;

fn elements<S: Sequence>(seq: S) -> Result<S::Elements> {
    seq.check_shape()?;
    log::trace!("reducing {} elements", seq.len());
    Ok(seq.into_elements())
}

/// True if every element is true. Stops at the first false element.
///
/// ```rust
/// use seqview::{all, any, eq, none, vector};
///
/// let a = vector![1, 2, 2];
/// assert!(!all(eq(&a, 2)).unwrap());
/// assert!(any(eq(&a, 2)).unwrap());
/// assert!(none(eq(&a, 0)).unwrap());
/// ```
pub fn all<S>(seq: S) -> Result<bool>
where
    S: Sequence,
    S::Item: Into<bool>,
{
    Ok(elements(seq)?.all(Into::into))
}

/// True if some element is true. Stops at the first true element.
pub fn any<S>(seq: S) -> Result<bool>
where
    S: Sequence,
    S::Item: Into<bool>,
{
    Ok(elements(seq)?.any(Into::into))
}

/// True if no element is true.
pub fn none<S>(seq: S) -> Result<bool>
where
    S: Sequence,
    S::Item: Into<bool>,
{
    any(seq).map(|found| !found)
}

/// Fold `map_fn(x)` over every element with `reduce_fn`, starting from `init`.
pub fn reduce<S, M, R, U>(seq: S, map_fn: M, reduce_fn: R, init: U) -> Result<U>
where
    S: Sequence,
    M: Fn(S::Item) -> U,
    R: Fn(U, U) -> U,
{
    Ok(elements(seq)?.fold(init, |acc, x| reduce_fn(acc, map_fn(x))))
}

/// Sum of every element; zero for an empty sequence.
pub fn sum<S>(seq: S) -> Result<S::Item>
where
    S: Sequence,
    S::Item: Zero,
{
    Ok(elements(seq)?.fold(<S::Item as Zero>::zero(), |acc, x| acc + x))
}
