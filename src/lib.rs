//! Owning vectors, non-owning views, and lazy elementwise expressions.
//!
//! This crate provides one-dimensional sequence types that separate memory
//! management from access:
//!
//! # Core Types
//!
//! - [`MemoryBlock`] / [`Allocator`]: Raw typed storage and the orthogonal
//!   allocate / construct / destroy / deallocate operations over it
//! - [`Builder`]: Staged, exactly-N construction of an owned block
//! - [`Vector`]: Owning contiguous storage (deep copy on clone, O(1) move)
//! - [`DenseView`] / [`StridedView`] (and their `Mut` counterparts): Zero-copy
//!   windows over someone else's storage
//!
//! # Slicing
//!
//! Views are narrowed with slice descriptors ([`Whole`], [`Slice`],
//! [`StridedSlice`], [`BoundedSlice`], [`StridedBoundedSlice`]) or Rust ranges.
//! Slicing only recomputes `(data, len, stride)` and never copies elements.
//! Dense slicing of a dense view stays dense; strided slicing yields a strided view.
//!
//! # Lazy Expressions
//!
//! - [`apply`], [`apply2`]: Build a [`UnaryExpr`] / [`BinaryExpr`] from operands and a function
//! - [`add`], [`sub`], [`eq`], [`lt`], ...: Named wrappers over the fixed function catalogue
//! - `+ - * / % - !`: Operator overloads over the same catalogue
//! - [`all`], [`any`], [`none`], [`reduce`], [`sum`]: Reductions that drive evaluation
//! - [`cat!`]: Concatenate sequences and scalars into a new [`Vector`]
//!
//! Expressions compute nothing until consumed, and they are consumed exactly once.
//!
//! # Example
//!
//! ```rust
//! use seqview::{all, gt, vector, StridedSlice, Vector};
//!
//! let a = vector![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
//! let b = Vector::filled(10.0, 3);
//!
//! // Every other element of `a`, as a strided view (no copy).
//! let odd = a.slice(StridedSlice::new(0, 3, 2));
//!
//! // Lazily evaluated: nothing is computed until `from_sequence` runs.
//! let c = Vector::from_sequence(odd * 2.0 + &b).unwrap();
//! assert_eq!(c, vector![12.0, 16.0, 20.0]);
//! assert!(all(gt(&c, 11.0)).unwrap());
//! ```
//!
//! # Error Handling
//!
//! Data-dependent failures (size mismatch, builder protocol, allocation) are
//! reported through [`SeqError`]. Index and slice bounds are contract checks:
//! they panic in debug builds or with the `checked` feature.

/// Contract check for caller preconditions.
///
/// Active in debug builds and with the `checked` feature.
macro_rules! contract {
    ($cond:expr, $($arg:tt)+) => {
        if cfg!(any(debug_assertions, feature = "checked")) {
            assert!($cond, $($arg)+);
        }
    };
}

mod allocator;
mod block;
mod builder;
pub mod concat;
mod expr;
pub mod functional;
mod ops;
mod reduce;
pub mod slice;
mod traits;
mod vector;
pub mod view;

// ============================================================================
// Memory lifecycle
// ============================================================================
pub use allocator::Allocator;
pub use block::MemoryBlock;
pub use builder::Builder;
pub use vector::{IntoIter, Vector};

// ============================================================================
// Views and slicing
// ============================================================================
pub use slice::{
    at_most, Bound, BoundedSlice, Dense, Kind, Slice, SliceIndex, Span, Strided,
    StridedBoundedSlice, StridedSlice, Whole,
};
pub use view::{DenseView, DenseViewMut, StridedIter, StridedView, StridedViewMut};

// ============================================================================
// Capability traits
// ============================================================================
pub use traits::{Operand, Scalar, Sequence, View};

// ============================================================================
// Expression evaluation
// ============================================================================
pub use expr::{BinaryElements, BinaryExpr, UnaryElements, UnaryExpr};
pub use functional::{
    add, and, apply, apply2, div, eq, ge, gt, le, lt, mul, ne, neg, not, or, rem, sub, AddOp,
    AndOp, BinaryFn, DivOp, EqOp, GeOp, GtOp, LeOp, LtOp, MulOp, NeOp, NegOp, NotOp, OrOp, RemOp,
    SubOp, UnaryFn,
};

// ============================================================================
// Reductions and concatenation
// ============================================================================
pub use concat::{Concat, Pieces};
pub use reduce::{all, any, none, reduce, sum};

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during sequence operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SeqError {
    /// Element counts differ where they must be equal.
    #[error("sizes mismatch: expected {expected}, found {found}")]
    SizeMismatch { expected: usize, found: usize },

    /// A builder was pushed to after all of its slots were filled.
    #[error("builder is already complete (capacity {capacity})")]
    BuilderComplete { capacity: usize },

    /// A builder was released before all of its slots were filled.
    #[error("builder is not complete: {filled} of {capacity} slots filled")]
    BuilderIncomplete { filled: usize, capacity: usize },

    /// The global allocator could not satisfy a request.
    #[error("out of memory: failed to allocate {bytes} bytes (align {align})")]
    OutOfMemory { bytes: usize, align: usize },

    /// The requested element count does not fit in a memory layout.
    #[error("capacity overflow for {len} elements")]
    CapacityOverflow { len: usize },
}

/// Result type for sequence operations.
pub type Result<T> = std::result::Result<T, SeqError>;
