//! Slice descriptors and the slicing algebra.
//!
//! A descriptor resolves against the length of the view it is applied to and
//! yields a [`Span`]: the first selected position, the number of selected
//! elements, and the step between them, all in the view's own index space.
//! The view then turns the span into a new `(data, len, stride)` triple in
//! O(1); element storage is never touched.
//!
//! Every descriptor also names the [`Kind`] of view it produces. Contiguous
//! descriptors are [`Dense`] and keep a dense view dense; stepped descriptors
//! are [`Strided`].
//!
//! | Descriptor | Rust range form | Kind |
//! |---|---|---|
//! | [`Whole`] | `..` | `Dense` |
//! | [`Slice`] | `a..b`, `..b`, `a..=b`, `..=b` | `Dense` |
//! | [`BoundedSlice`] | `a..` | `Dense` |
//! | [`StridedSlice`] | | `Strided` |
//! | [`StridedBoundedSlice`] | | `Strided` |
//!
//! Out-of-range descriptors are contract violations: they panic in debug
//! builds or with the `checked` feature.

use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo, RangeToInclusive};

use crate::view::{DenseView, DenseViewMut, StridedView, StridedViewMut};

// ============================================================================
// Resolved spans and view kinds
// ============================================================================

/// A resolved selection: `len` positions starting at `start`, `stride` apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub len: usize,
    pub stride: usize,
}

impl Span {
    /// Number of underlying positions covered, from the first selected
    /// element through the last.
    #[inline]
    pub fn extent(&self) -> usize {
        extent(self.len, self.stride)
    }
}

/// Positions spanned by `len` elements placed `stride` apart.
#[inline]
pub(crate) fn extent(len: usize, stride: usize) -> usize {
    if len == 0 {
        0
    } else {
        (len - 1) * stride + 1
    }
}

mod sealed {
    pub trait Sealed {}
}

/// The family of view a descriptor produces.
///
/// Implemented by the markers [`Dense`] and [`Strided`]. The associated view
/// types are built from a data slice that already starts at the first
/// selected element and is trimmed to the selection's extent.
pub trait Kind: sealed::Sealed {
    type View<'a, T: 'a>;
    type ViewMut<'a, T: 'a>;

    fn view<'a, T>(data: &'a [T], len: usize, stride: usize) -> Self::View<'a, T>;

    fn view_mut<'a, T>(data: &'a mut [T], len: usize, stride: usize) -> Self::ViewMut<'a, T>;
}

/// Marker for unit-stride results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dense {}

/// Marker for arbitrary-stride results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strided {}

impl sealed::Sealed for Dense {}
impl sealed::Sealed for Strided {}

impl Kind for Dense {
    type View<'a, T: 'a> = DenseView<'a, T>;
    type ViewMut<'a, T: 'a> = DenseViewMut<'a, T>;

    #[inline]
    fn view<'a, T>(data: &'a [T], len: usize, stride: usize) -> DenseView<'a, T> {
        debug_assert!(stride == 1 || len <= 1);
        debug_assert_eq!(data.len(), len);
        DenseView::new(data)
    }

    #[inline]
    fn view_mut<'a, T>(data: &'a mut [T], len: usize, stride: usize) -> DenseViewMut<'a, T> {
        debug_assert!(stride == 1 || len <= 1);
        debug_assert_eq!(data.len(), len);
        DenseViewMut::new(data)
    }
}

impl Kind for Strided {
    type View<'a, T: 'a> = StridedView<'a, T>;
    type ViewMut<'a, T: 'a> = StridedViewMut<'a, T>;

    #[inline]
    fn view<'a, T>(data: &'a [T], len: usize, stride: usize) -> StridedView<'a, T> {
        StridedView::from_parts(data, len, stride)
    }

    #[inline]
    fn view_mut<'a, T>(data: &'a mut [T], len: usize, stride: usize) -> StridedViewMut<'a, T> {
        StridedViewMut::from_parts(data, len, stride)
    }
}

// ============================================================================
// SliceIndex
// ============================================================================

/// Types that can narrow a view.
pub trait SliceIndex {
    /// Kind of view produced when slicing a dense view.
    type Kind: Kind;

    /// Resolve against a view of `len` elements.
    ///
    /// # Panics
    /// On a selection outside the view, when contract checks are active.
    fn resolve(&self, len: usize) -> Span;
}

#[inline]
fn check_start(start: usize, len: usize) {
    contract!(start < len, "slice start {start} out of range for length {len}");
}

#[inline]
fn check_stride(stride: usize) {
    contract!(stride > 0, "slice stride must be positive");
}

/// The entire extent, unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Whole;

impl SliceIndex for Whole {
    type Kind = Dense;

    #[inline]
    fn resolve(&self, len: usize) -> Span {
        Span {
            start: 0,
            len,
            stride: 1,
        }
    }
}

/// `len` contiguous elements starting at `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slice {
    pub start: usize,
    pub len: usize,
}

impl Slice {
    pub const fn new(start: usize, len: usize) -> Self {
        Self { start, len }
    }
}

impl SliceIndex for Slice {
    type Kind = Dense;

    #[inline]
    fn resolve(&self, len: usize) -> Span {
        check_start(self.start, len);
        contract!(
            self.len <= len.saturating_sub(self.start),
            "slice {}..{} out of range for length {len}",
            self.start,
            self.start.saturating_add(self.len)
        );
        Span {
            start: self.start,
            len: self.len,
            stride: 1,
        }
    }
}

/// `len` elements starting at `start`, taking every `stride`-th one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StridedSlice {
    pub start: usize,
    pub len: usize,
    pub stride: usize,
}

impl StridedSlice {
    pub const fn new(start: usize, len: usize, stride: usize) -> Self {
        Self { start, len, stride }
    }
}

impl From<Slice> for StridedSlice {
    fn from(s: Slice) -> Self {
        Self::new(s.start, s.len, 1)
    }
}

impl SliceIndex for StridedSlice {
    type Kind = Strided;

    #[inline]
    fn resolve(&self, len: usize) -> Span {
        check_stride(self.stride);
        check_start(self.start, len);
        contract!(
            self.len
                .checked_mul(self.stride)
                .and_then(|span| span.checked_add(self.start))
                .is_some_and(|end| end <= len),
            "strided slice (start {}, len {}, stride {}) out of range for length {len}",
            self.start,
            self.len,
            self.stride
        );
        Span {
            start: self.start,
            len: self.len,
            stride: self.stride,
        }
    }
}

/// Upper limit on the element count of an open-ended slice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Bound {
    /// Everything up to the end of the view.
    #[default]
    Unbounded,
    /// At most this many elements.
    AtMost(usize),
}

/// Shorthand for [`Bound::AtMost`].
#[inline]
pub const fn at_most(n: usize) -> Bound {
    Bound::AtMost(n)
}

impl Bound {
    /// Effective count when `available` elements remain.
    #[inline]
    pub fn clamp(self, available: usize) -> usize {
        match self {
            Bound::Unbounded => available,
            Bound::AtMost(n) => n.min(available),
        }
    }
}

impl From<Whole> for Bound {
    fn from(_: Whole) -> Self {
        Bound::Unbounded
    }
}

impl From<usize> for Bound {
    fn from(n: usize) -> Self {
        Bound::AtMost(n)
    }
}

/// Elements from `start` to the end of the view, limited by `bound`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundedSlice {
    pub start: usize,
    pub bound: Bound,
}

impl BoundedSlice {
    pub fn new(start: usize, bound: impl Into<Bound>) -> Self {
        Self {
            start,
            bound: bound.into(),
        }
    }
}

impl SliceIndex for BoundedSlice {
    type Kind = Dense;

    #[inline]
    fn resolve(&self, len: usize) -> Span {
        check_start(self.start, len);
        let count = self.bound.clamp(len.saturating_sub(self.start));
        Span {
            start: self.start,
            len: count,
            stride: 1,
        }
    }
}

/// Every `stride`-th element from `start` to the end of the view, limited by
/// `bound`.
///
/// The count is `ceil((len - start) / stride)` before the bound applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StridedBoundedSlice {
    pub start: usize,
    pub bound: Bound,
    pub stride: usize,
}

impl StridedBoundedSlice {
    pub fn new(start: usize, bound: impl Into<Bound>, stride: usize) -> Self {
        Self {
            start,
            bound: bound.into(),
            stride,
        }
    }
}

impl From<BoundedSlice> for StridedBoundedSlice {
    fn from(s: BoundedSlice) -> Self {
        Self {
            start: s.start,
            bound: s.bound,
            stride: 1,
        }
    }
}

impl SliceIndex for StridedBoundedSlice {
    type Kind = Strided;

    #[inline]
    fn resolve(&self, len: usize) -> Span {
        check_stride(self.stride);
        check_start(self.start, len);
        let available = len.saturating_sub(self.start).div_ceil(self.stride.max(1));
        let count = self.bound.clamp(available);
        Span {
            start: self.start,
            len: count,
            stride: self.stride,
        }
    }
}

// ============================================================================
// Rust ranges
// ============================================================================

impl SliceIndex for RangeFull {
    type Kind = Dense;

    #[inline]
    fn resolve(&self, len: usize) -> Span {
        Whole.resolve(len)
    }
}

impl SliceIndex for Range<usize> {
    type Kind = Dense;

    #[inline]
    fn resolve(&self, len: usize) -> Span {
        contract!(
            self.start <= self.end,
            "slice index starts at {} but ends at {}",
            self.start,
            self.end
        );
        Slice::new(self.start, self.end.saturating_sub(self.start)).resolve(len)
    }
}

impl SliceIndex for RangeFrom<usize> {
    type Kind = Dense;

    #[inline]
    fn resolve(&self, len: usize) -> Span {
        BoundedSlice::new(self.start, Whole).resolve(len)
    }
}

impl SliceIndex for RangeTo<usize> {
    type Kind = Dense;

    #[inline]
    fn resolve(&self, len: usize) -> Span {
        Slice::new(0, self.end).resolve(len)
    }
}

impl SliceIndex for RangeInclusive<usize> {
    type Kind = Dense;

    #[inline]
    fn resolve(&self, len: usize) -> Span {
        (*self.start()..*self.end() + 1).resolve(len)
    }
}

impl SliceIndex for RangeToInclusive<usize> {
    type Kind = Dense;

    #[inline]
    fn resolve(&self, len: usize) -> Span {
        Slice::new(0, self.end + 1).resolve(len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(start: usize, len: usize, stride: usize) -> Span {
        Span { start, len, stride }
    }

    #[test]
    fn test_whole_and_slice() {
        assert_eq!(Whole.resolve(7), span(0, 7, 1));
        assert_eq!((..).resolve(7), span(0, 7, 1));
        assert_eq!(Slice::new(2, 3).resolve(7), span(2, 3, 1));
        assert_eq!((2usize..5).resolve(7), span(2, 3, 1));
        assert_eq!((..4usize).resolve(7), span(0, 4, 1));
        assert_eq!((1usize..=3).resolve(7), span(1, 3, 1));
        assert_eq!((..=6usize).resolve(7), span(0, 7, 1));
    }

    #[test]
    fn test_strided_slice() {
        assert_eq!(StridedSlice::new(1, 3, 3).resolve(10), span(1, 3, 3));
        // start + stride * len may reach the length exactly.
        assert_eq!(StridedSlice::new(0, 3, 3).resolve(9), span(0, 3, 3));
        assert_eq!(StridedSlice::from(Slice::new(1, 2)).resolve(7), span(1, 2, 1));
    }

    #[test]
    fn test_bounded_slice() {
        assert_eq!(BoundedSlice::new(3, Whole).resolve(10), span(3, 7, 1));
        assert_eq!(BoundedSlice::new(3, at_most(4)).resolve(10), span(3, 4, 1));
        assert_eq!(BoundedSlice::new(3, at_most(40)).resolve(10), span(3, 7, 1));
        assert_eq!((4usize..).resolve(10), span(4, 6, 1));
        assert_eq!(BoundedSlice::new(9, at_most(0)).resolve(10), span(9, 0, 1));
    }

    #[test]
    fn test_strided_bounded_count() {
        // ceil((10 - 1) / 3) = 3
        assert_eq!(StridedBoundedSlice::new(1, Whole, 3).resolve(10), span(1, 3, 3));
        // ceil((10 - 0) / 3) = 4
        assert_eq!(StridedBoundedSlice::new(0, Whole, 3).resolve(10), span(0, 4, 3));
        assert_eq!(StridedBoundedSlice::new(0, 2usize, 3).resolve(10), span(0, 2, 3));
        let widened = StridedBoundedSlice::from(BoundedSlice::new(2, at_most(5)));
        assert_eq!(widened.resolve(10), span(2, 5, 1));
    }

    #[test]
    fn test_bound_conversions() {
        assert_eq!(Bound::from(Whole), Bound::Unbounded);
        assert_eq!(Bound::from(3), at_most(3));
        assert_eq!(Bound::default().clamp(9), 9);
        assert_eq!(at_most(2).clamp(9), 2);
    }

    #[test]
    fn test_span_extent() {
        assert_eq!(span(0, 0, 4).extent(), 0);
        assert_eq!(span(0, 1, 4).extent(), 1);
        assert_eq!(span(5, 3, 4).extent(), 9);
    }

    #[test]
    fn test_empty_slices_inside_view() {
        assert_eq!((2usize..2).resolve(3), span(2, 0, 1));
        assert_eq!(Slice::new(0, 0).resolve(1), span(0, 0, 1));
        assert_eq!(StridedSlice::new(2, 0, 2).resolve(3), span(2, 0, 2));
    }

    #[cfg(any(debug_assertions, feature = "checked"))]
    mod contracts {
        use super::super::*;

        #[test]
        #[should_panic(expected = "out of range")]
        fn test_slice_past_end() {
            Slice::new(2, 6).resolve(7);
        }

        #[test]
        #[should_panic(expected = "slice start 7 out of range")]
        fn test_start_past_end() {
            Slice::new(7, 1).resolve(7);
        }

        #[test]
        #[should_panic(expected = "out of range")]
        fn test_strided_slice_past_end() {
            // Positions 1, 4, 7: the last one is outside a length-7 view.
            StridedSlice::new(1, 3, 3).resolve(7);
        }

        #[test]
        #[should_panic(expected = "strided slice (start 0, len 3, stride 3) out of range")]
        fn test_strided_slice_end_past_length() {
            // Positions 0, 3, 6 all exist, but 0 + 3 * 3 exceeds 7.
            StridedSlice::new(0, 3, 3).resolve(7);
        }

        #[test]
        #[should_panic(expected = "slice start 7 out of range for length 7")]
        fn test_empty_slice_at_end() {
            Slice::new(7, 0).resolve(7);
        }

        #[test]
        #[should_panic(expected = "slice start 4 out of range for length 4")]
        fn test_empty_strided_slice_at_end() {
            StridedSlice::new(4, 0, 2).resolve(4);
        }

        #[test]
        #[should_panic(expected = "slice start 10 out of range for length 10")]
        fn test_open_slice_at_end() {
            (10usize..).resolve(10);
        }

        #[test]
        #[should_panic(expected = "stride must be positive")]
        fn test_zero_stride() {
            StridedBoundedSlice::new(0, Whole, 0).resolve(4);
        }

        #[test]
        #[should_panic(expected = "starts at 4 but ends at 2")]
        fn test_reversed_range() {
            (4usize..2).resolve(7);
        }
    }
}
