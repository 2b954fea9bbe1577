//! Non-owning dense and strided views.
//!
//! A view is a window over storage owned by someone else: a [`Vector`], a
//! `Vec`, an array, or another view. Views never allocate. Narrowing a view
//! with a [slice descriptor](crate::slice) produces another view over the same
//! storage.
//!
//! | Type | Stride | Access |
//! |---|---|---|
//! | [`DenseView`] | 1 | read-only, `Copy` |
//! | [`DenseViewMut`] | 1 | exclusive |
//! | [`StridedView`] | any | read-only, `Copy` |
//! | [`StridedViewMut`] | any | exclusive |
//!
//! Every view stores its data as a slice that starts at its first element
//! and ends at its last, so all element access goes through ordinary slice
//! bounds checks.
//!
//! [`Vector`]: crate::Vector

use std::fmt;
use std::iter::{Cloned, FusedIterator, StepBy};
use std::ops::{Index, IndexMut};
use std::slice;

use crate::slice::{extent, Kind, SliceIndex, Span, Strided};
use crate::traits::{Sequence, View};
use crate::{Result, SeqError};

// ============================================================================
// Shared helpers
// ============================================================================

/// Narrow `data` (a view with `stride`) to `span`.
///
/// Returns the trimmed data and the composed stride.
#[inline]
fn window<T>(data: &[T], stride: usize, span: Span) -> (&[T], usize) {
    let composed = span.stride * stride;
    if span.len == 0 {
        return (&data[..0], composed);
    }
    let offset = span.start * stride;
    (&data[offset..offset + extent(span.len, composed)], composed)
}

#[inline]
fn window_mut<T>(data: &mut [T], stride: usize, span: Span) -> (&mut [T], usize) {
    let composed = span.stride * stride;
    if span.len == 0 {
        return (&mut data[..0], composed);
    }
    let offset = span.start * stride;
    (&mut data[offset..offset + extent(span.len, composed)], composed)
}

#[inline]
fn check_position(index: usize, len: usize) {
    contract!(index < len, "index {index} out of bounds for length {len}");
}

/// Validate that `seq` can be written into `len` slots.
pub(crate) fn check_assign<S: Sequence>(len: usize, seq: &S) -> Result<()> {
    seq.check_shape()?;
    if seq.len() != len {
        log::debug!("assignment of {} elements into {len} slots", seq.len());
        return Err(SeqError::SizeMismatch {
            expected: len,
            found: seq.len(),
        });
    }
    Ok(())
}

// ============================================================================
// DenseView
// ============================================================================

/// Read-only unit-stride view.
pub struct DenseView<'a, T> {
    data: &'a [T],
}

impl<'a, T> Clone for DenseView<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for DenseView<'a, T> {}

impl<'a, T> DenseView<'a, T> {
    #[inline]
    pub fn new(data: &'a [T]) -> Self {
        Self { data }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Always 1.
    #[inline]
    pub fn stride(&self) -> usize {
        1
    }

    #[inline]
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Reference to the element at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> &'a T {
        check_position(index, self.len());
        &self.data[index]
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'a, T> {
        self.data.iter()
    }

    /// Narrow the view.
    ///
    /// Contiguous descriptors give a [`DenseView`]; stepped ones give a
    /// [`StridedView`].
    ///
    /// ```rust
    /// use seqview::{DenseView, StridedSlice};
    ///
    /// let data = [0, 1, 2, 3, 4, 5, 6, 7];
    /// let v = DenseView::new(&data);
    /// let mid: DenseView<'_, i32> = v.slice(2..6);
    /// assert_eq!(mid.as_slice(), &[2, 3, 4, 5]);
    /// let even = v.slice(StridedSlice::new(0, 4, 2));
    /// assert_eq!(even.to_vec(), vec![0, 2, 4, 6]);
    /// ```
    #[inline]
    pub fn slice<I: SliceIndex>(&self, index: I) -> <I::Kind as Kind>::View<'a, T> {
        let span = index.resolve(self.len());
        let (data, stride) = window(self.data, 1, span);
        <I::Kind as Kind>::view(data, span.len, stride)
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.data.to_vec()
    }
}

impl<'a, T> From<&'a [T]> for DenseView<'a, T> {
    fn from(data: &'a [T]) -> Self {
        Self::new(data)
    }
}

impl<'a, T> Index<usize> for DenseView<'a, T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        self.get(index)
    }
}

impl<'a, 'b, T> IntoIterator for &'b DenseView<'a, T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, 'b, T: PartialEq<U>, U> PartialEq<DenseView<'b, U>> for DenseView<'a, T> {
    fn eq(&self, other: &DenseView<'b, U>) -> bool {
        self.data == other.data
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for DenseView<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// ============================================================================
// StridedView
// ============================================================================

/// Read-only view with an arbitrary positive stride.
pub struct StridedView<'a, T> {
    data: &'a [T],
    len: usize,
    stride: usize,
}

impl<'a, T> Clone for StridedView<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for StridedView<'a, T> {}

impl<'a, T> StridedView<'a, T> {
    /// View `len` elements of `data`, `stride` apart, starting at `data[0]`.
    ///
    /// # Panics
    /// If the last selected element lies outside `data` or `stride` is zero
    /// (the latter only when contract checks are active).
    pub fn new(data: &'a [T], len: usize, stride: usize) -> Self {
        contract!(stride > 0, "view stride must be positive");
        let end = extent(len, stride);
        assert!(
            end <= data.len(),
            "strided view of {len} elements with stride {stride} exceeds length {}",
            data.len()
        );
        Self::from_parts(&data[..end], len, stride)
    }

    /// `data` must already be trimmed to the extent of the view.
    #[inline]
    pub(crate) fn from_parts(data: &'a [T], len: usize, stride: usize) -> Self {
        debug_assert_eq!(data.len(), extent(len, stride));
        Self { data, len, stride }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn get(&self, index: usize) -> &'a T {
        check_position(index, self.len);
        &self.data[index * self.stride]
    }

    #[inline]
    pub fn iter(&self) -> StridedIter<'a, T> {
        StridedIter {
            data: self.data,
            stride: self.stride,
            front: 0,
            back: self.len,
        }
    }

    /// Narrow the view. The result is always strided; its stride is the
    /// product of this view's stride and the descriptor's.
    #[inline]
    pub fn slice<I: SliceIndex>(&self, index: I) -> StridedView<'a, T> {
        let span = index.resolve(self.len);
        let (data, stride) = window(self.data, self.stride, span);
        Strided::view(data, span.len, stride)
    }

    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.iter().cloned().collect()
    }
}

impl<'a, T> From<DenseView<'a, T>> for StridedView<'a, T> {
    fn from(view: DenseView<'a, T>) -> Self {
        Self::from_parts(view.data, view.len(), 1)
    }
}

impl<'a, T> Index<usize> for StridedView<'a, T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        self.get(index)
    }
}

impl<'a, 'b, T> IntoIterator for &'b StridedView<'a, T> {
    type Item = &'a T;
    type IntoIter = StridedIter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, 'b, T: PartialEq<U>, U> PartialEq<StridedView<'b, U>> for StridedView<'a, T> {
    fn eq(&self, other: &StridedView<'b, U>) -> bool {
        self.len == other.len && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for StridedView<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// ============================================================================
// Iterator support
// ============================================================================

/// Iterator over the elements of a [`StridedView`].
pub struct StridedIter<'a, T> {
    data: &'a [T],
    stride: usize,
    front: usize,
    back: usize,
}

impl<'a, T> Clone for StridedIter<'a, T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data,
            stride: self.stride,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, T> Iterator for StridedIter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        let item = &self.data[self.front * self.stride];
        self.front += 1;
        Some(item)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    #[inline]
    fn nth(&mut self, n: usize) -> Option<&'a T> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<'a, T> DoubleEndedIterator for StridedIter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(&self.data[self.back * self.stride])
    }
}

impl<'a, T> ExactSizeIterator for StridedIter<'a, T> {}

impl<'a, T> FusedIterator for StridedIter<'a, T> {}

// ============================================================================
// DenseViewMut
// ============================================================================

/// Exclusive unit-stride view.
pub struct DenseViewMut<'a, T> {
    data: &'a mut [T],
}

impl<'a, T> DenseViewMut<'a, T> {
    #[inline]
    pub fn new(data: &'a mut [T]) -> Self {
        Self { data }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn stride(&self) -> usize {
        1
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self.data
    }

    /// Read-only view of the same elements.
    #[inline]
    pub fn as_view(&self) -> DenseView<'_, T> {
        DenseView::new(self.data)
    }

    #[inline]
    pub fn get(&self, index: usize) -> &T {
        check_position(index, self.len());
        &self.data[index]
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> &mut T {
        check_position(index, self.len());
        &mut self.data[index]
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.data.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    /// Read-only narrowing.
    #[inline]
    pub fn slice<I: SliceIndex>(&self, index: I) -> <I::Kind as Kind>::View<'_, T> {
        self.as_view().slice(index)
    }

    /// Mutable narrowing that reborrows this view.
    #[inline]
    pub fn slice_mut<I: SliceIndex>(&mut self, index: I) -> <I::Kind as Kind>::ViewMut<'_, T> {
        let span = index.resolve(self.len());
        let (data, stride) = window_mut(&mut *self.data, 1, span);
        <I::Kind as Kind>::view_mut(data, span.len, stride)
    }

    /// Mutable narrowing that consumes this view.
    #[inline]
    pub fn into_slice<I: SliceIndex>(self, index: I) -> <I::Kind as Kind>::ViewMut<'a, T> {
        let span = index.resolve(self.len());
        let (data, stride) = window_mut(self.data, 1, span);
        <I::Kind as Kind>::view_mut(data, span.len, stride)
    }

    #[inline]
    pub fn into_strided(self) -> StridedViewMut<'a, T> {
        let len = self.data.len();
        StridedViewMut::from_parts(self.data, len, 1)
    }

    /// Copy `seq` into the view, element by element.
    ///
    /// # Errors
    /// [`SeqError::SizeMismatch`] if the lengths differ or `seq` is an
    /// expression over operands of different lengths. Nothing is written.
    pub fn assign<S>(&mut self, seq: S) -> Result<()>
    where
        S: Sequence,
        S::Item: Into<T>,
    {
        check_assign(self.len(), &seq)?;
        for (slot, value) in self.data.iter_mut().zip(seq.into_elements()) {
            *slot = value.into();
        }
        Ok(())
    }

    /// Set every element to `value`.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.data.fill(value);
    }
}

impl<'a, T> From<&'a mut [T]> for DenseViewMut<'a, T> {
    fn from(data: &'a mut [T]) -> Self {
        Self::new(data)
    }
}

impl<'a, T> Index<usize> for DenseViewMut<'a, T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        self.get(index)
    }
}

impl<'a, T> IndexMut<usize> for DenseViewMut<'a, T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        self.get_mut(index)
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for DenseViewMut<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// ============================================================================
// StridedViewMut
// ============================================================================

/// Exclusive view with an arbitrary positive stride.
pub struct StridedViewMut<'a, T> {
    data: &'a mut [T],
    len: usize,
    stride: usize,
}

impl<'a, T> StridedViewMut<'a, T> {
    /// See [`StridedView::new`].
    pub fn new(data: &'a mut [T], len: usize, stride: usize) -> Self {
        contract!(stride > 0, "view stride must be positive");
        let end = extent(len, stride);
        assert!(
            end <= data.len(),
            "strided view of {len} elements with stride {stride} exceeds length {}",
            data.len()
        );
        Self::from_parts(&mut data[..end], len, stride)
    }

    #[inline]
    pub(crate) fn from_parts(data: &'a mut [T], len: usize, stride: usize) -> Self {
        debug_assert_eq!(data.len(), extent(len, stride));
        Self { data, len, stride }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    pub fn as_view(&self) -> StridedView<'_, T> {
        StridedView::from_parts(self.data, self.len, self.stride)
    }

    #[inline]
    pub fn get(&self, index: usize) -> &T {
        check_position(index, self.len);
        &self.data[index * self.stride]
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> &mut T {
        check_position(index, self.len);
        &mut self.data[index * self.stride]
    }

    #[inline]
    pub fn iter(&self) -> StridedIter<'_, T> {
        self.as_view().iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> StepBy<slice::IterMut<'_, T>> {
        self.data.iter_mut().step_by(self.stride)
    }

    #[inline]
    pub fn slice<I: SliceIndex>(&self, index: I) -> StridedView<'_, T> {
        self.as_view().slice(index)
    }

    #[inline]
    pub fn slice_mut<I: SliceIndex>(&mut self, index: I) -> StridedViewMut<'_, T> {
        let span = index.resolve(self.len);
        let (data, stride) = window_mut(&mut *self.data, self.stride, span);
        Strided::view_mut(data, span.len, stride)
    }

    #[inline]
    pub fn into_slice<I: SliceIndex>(self, index: I) -> StridedViewMut<'a, T> {
        let span = index.resolve(self.len);
        let (data, stride) = window_mut(self.data, self.stride, span);
        Strided::view_mut(data, span.len, stride)
    }

    /// See [`DenseViewMut::assign`].
    pub fn assign<S>(&mut self, seq: S) -> Result<()>
    where
        S: Sequence,
        S::Item: Into<T>,
    {
        check_assign(self.len, &seq)?;
        for (slot, value) in self.iter_mut().zip(seq.into_elements()) {
            *slot = value.into();
        }
        Ok(())
    }

    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        for slot in self.iter_mut() {
            *slot = value.clone();
        }
    }
}

impl<'a, T> From<DenseViewMut<'a, T>> for StridedViewMut<'a, T> {
    fn from(view: DenseViewMut<'a, T>) -> Self {
        view.into_strided()
    }
}

impl<'a, T> Index<usize> for StridedViewMut<'a, T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        self.get(index)
    }
}

impl<'a, T> IndexMut<usize> for StridedViewMut<'a, T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        self.get_mut(index)
    }
}

impl<'a, T: fmt::Debug> fmt::Debug for StridedViewMut<'a, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// ============================================================================
// Sequence and View
// ============================================================================

impl<'a, T: Clone> Sequence for DenseView<'a, T> {
    type Item = T;
    type Elements = Cloned<slice::Iter<'a, T>>;

    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    fn into_elements(self) -> Self::Elements {
        self.data.iter().cloned()
    }
}

impl<'a, T: Clone> Sequence for StridedView<'a, T> {
    type Item = T;
    type Elements = Cloned<StridedIter<'a, T>>;

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn into_elements(self) -> Self::Elements {
        self.iter().cloned()
    }
}

impl<'a, 'b, T: Clone> Sequence for &'b DenseViewMut<'a, T> {
    type Item = T;
    type Elements = Cloned<slice::Iter<'b, T>>;

    #[inline]
    fn len(&self) -> usize {
        self.data.len()
    }

    fn into_elements(self) -> Self::Elements {
        self.data.iter().cloned()
    }
}

impl<'a, 'b, T: Clone> Sequence for &'b StridedViewMut<'a, T> {
    type Item = T;
    type Elements = Cloned<StridedIter<'b, T>>;

    #[inline]
    fn len(&self) -> usize {
        self.len
    }

    fn into_elements(self) -> Self::Elements {
        self.iter().cloned()
    }
}

impl<'a, T: Clone + 'a> View<'a> for DenseView<'a, T> {
    type Elem = T;

    #[inline]
    fn at(&self, index: usize) -> &'a T {
        self.get(index)
    }

    #[inline]
    fn stride(&self) -> usize {
        1
    }

    #[inline]
    fn narrow<I: SliceIndex>(&self, index: I) -> StridedView<'a, T> {
        StridedView::from(*self).slice(index)
    }
}

impl<'a, T: Clone + 'a> View<'a> for StridedView<'a, T> {
    type Elem = T;

    #[inline]
    fn at(&self, index: usize) -> &'a T {
        self.get(index)
    }

    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }

    #[inline]
    fn narrow<I: SliceIndex>(&self, index: I) -> StridedView<'a, T> {
        self.slice(index)
    }
}
