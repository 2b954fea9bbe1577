//! Owning contiguous storage.

use std::alloc::{handle_alloc_error, Layout};
use std::fmt;
use std::iter::{Cloned, FusedIterator};
use std::mem::{self, ManuallyDrop, MaybeUninit};
use std::ops::{Index, IndexMut};
use std::ptr::{self, NonNull};
use std::slice;

use crate::allocator::Allocator;
use crate::block::MemoryBlock;
use crate::builder::Builder;
use crate::slice::{Kind, SliceIndex};
use crate::traits::Sequence;
use crate::view::{DenseView, DenseViewMut};
use crate::{Result, SeqError};

/// Creates a [`Vector`] from a list of elements or a `value; count` pair.
///
/// ```rust
/// use seqview::vector;
///
/// let v = vector![1, 2, 3];
/// assert_eq!(v.len(), 3);
/// let z = vector![0.5; 4];
/// assert_eq!(z.as_slice(), &[0.5; 4]);
/// ```
#[macro_export]
macro_rules! vector {
    () => {
        $crate::Vector::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::Vector::filled($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {
        $crate::Vector::from([$($x),+])
    };
}

/// A fixed-length, heap-allocated sequence that owns its elements.
///
/// Cloning deep-copies into fresh storage; moving transfers the storage.
/// A `Vector` is a [`Sequence`] but not a [`View`](crate::View): it exposes
/// its storage directly through [`as_slice`](Vector::as_slice) and
/// [`as_mut_slice`](Vector::as_mut_slice). Borrow it as a view with
/// [`view`](Vector::view), [`view_mut`](Vector::view_mut), or
/// [`slice`](Vector::slice).
pub struct Vector<T> {
    block: MemoryBlock<T>,
    allocator: Allocator<T>,
}

// SAFETY: `Vector<T>` uniquely owns its elements, like `Vec<T>`.
unsafe impl<T: Send> Send for Vector<T> {}
unsafe impl<T: Sync> Sync for Vector<T> {}

/// Turn an allocation error into the `Vec`-style abort or panic.
fn infallible<V>(result: Result<V>) -> V {
    match result {
        Ok(value) => value,
        Err(SeqError::OutOfMemory { bytes, align }) => match Layout::from_size_align(bytes, align) {
            Ok(layout) => handle_alloc_error(layout),
            Err(_) => panic!("out of memory allocating {bytes} bytes"),
        },
        Err(err) => panic!("{err}"),
    }
}

/// Frees an allocated block whose construction did not complete.
struct Unconstructed<T> {
    block: MemoryBlock<T>,
}

impl<T> Drop for Unconstructed<T> {
    fn drop(&mut self) {
        // SAFETY: the block came from `Allocator::allocate` and holds no
        // constructed elements (partial construction cleans up after itself).
        unsafe { Allocator::new().deallocate(self.block) }
    }
}

impl<T> Vector<T> {
    /// The empty vector. Does not allocate.
    pub const fn new() -> Self {
        Self {
            block: MemoryBlock::empty(),
            allocator: Allocator::new(),
        }
    }

    /// Allocate `len` slots and construct them with `construct`.
    fn try_build<F>(len: usize, construct: F) -> Result<Self>
    where
        F: FnOnce(Allocator<T>, MemoryBlock<T>) -> Result<()>,
    {
        let allocator = Allocator::new();
        let guard = Unconstructed {
            block: allocator.allocate(len)?,
        };
        construct(allocator, guard.block)?;
        let block = guard.block;
        mem::forget(guard);
        Ok(Self { block, allocator })
    }

    /// `len` default-valued elements.
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        // SAFETY: the block is freshly allocated and unconstructed.
        infallible(Self::try_build(len, |a, block| unsafe {
            a.construct_default(block);
            Ok(())
        }))
    }

    /// `len` clones of `value`.
    pub fn filled(value: T, len: usize) -> Self
    where
        T: Clone,
    {
        // SAFETY: as in `with_len`.
        infallible(Self::try_build(len, |a, block| unsafe {
            a.construct_fill(block, &value);
            Ok(())
        }))
    }

    /// Collect an iterator that reports its exact length up front.
    ///
    /// # Errors
    /// [`SeqError::SizeMismatch`] if the iterator yields fewer elements than
    /// it reported.
    pub fn from_exact_iter<I>(values: I) -> Result<Self>
    where
        I: IntoIterator,
        I::IntoIter: ExactSizeIterator<Item = T>,
    {
        let values = values.into_iter();
        // SAFETY: as in `with_len`.
        Self::try_build(values.len(), |a, block| unsafe { a.construct_from(block, values) })
    }

    /// Evaluate `seq` into fresh storage.
    ///
    /// This is the usual way to materialize an expression:
    ///
    /// ```rust
    /// use seqview::{vector, Vector};
    ///
    /// let x = vector![1.0, 2.0];
    /// let y = Vector::from_sequence(&x * 3.0).unwrap();
    /// assert_eq!(y, vector![3.0, 6.0]);
    /// ```
    ///
    /// # Errors
    /// [`SeqError::SizeMismatch`] if `seq` is an expression over operands of
    /// different lengths; allocation errors otherwise.
    pub fn from_sequence<S>(seq: S) -> Result<Self>
    where
        S: Sequence<Item = T>,
    {
        seq.check_shape()?;
        let len = seq.len();
        log::trace!("evaluating {len} elements into a new vector");
        // SAFETY: as in `with_len`.
        Self::try_build(len, |a, block| unsafe { a.construct_from(block, seq.into_elements()) })
    }

    /// Take ownership of a completed builder's block.
    ///
    /// # Errors
    /// [`SeqError::BuilderIncomplete`] if the builder is not complete. The
    /// builder, and everything pushed into it, is dropped.
    pub fn from_builder(mut builder: Builder<T>) -> Result<Self> {
        let block = builder.release()?;
        Ok(Self {
            block,
            allocator: Allocator::new(),
        })
    }

    /// Trivially-constructible elements from zeroed memory.
    pub fn zeroed(len: usize) -> Self
    where
        T: bytemuck::Zeroable,
    {
        let allocator = Allocator::new();
        // All-zero bytes are a valid `T`, so the block counts as constructed.
        let block = infallible(allocator.allocate_zeroed(len));
        Self { block, allocator }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.block.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.block.is_empty()
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.block.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.block.as_ptr()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: every slot is constructed; the borrow of `self` guards
        // against mutable aliasing.
        unsafe { self.block.as_slice() }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above, with exclusive access through `&mut self`.
        unsafe { self.block.as_mut_slice() }
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    #[inline]
    pub fn view(&self) -> DenseView<'_, T> {
        DenseView::new(self.as_slice())
    }

    #[inline]
    pub fn view_mut(&mut self) -> DenseViewMut<'_, T> {
        DenseViewMut::new(self.as_mut_slice())
    }

    /// Borrow part of the vector as a view.
    ///
    /// ```rust
    /// use seqview::{vector, StridedBoundedSlice, Whole};
    ///
    /// let v = vector![0, 1, 2, 3, 4, 5, 6];
    /// assert_eq!(v.slice(2..4).as_slice(), &[2, 3]);
    /// assert_eq!(v.slice(StridedBoundedSlice::new(1, Whole, 3)).to_vec(), vec![1, 4]);
    /// ```
    #[inline]
    pub fn slice<I: SliceIndex>(&self, index: I) -> <I::Kind as Kind>::View<'_, T> {
        self.view().slice(index)
    }

    #[inline]
    pub fn slice_mut<I: SliceIndex>(&mut self, index: I) -> <I::Kind as Kind>::ViewMut<'_, T> {
        self.view_mut().into_slice(index)
    }

    /// Copy `seq` into the vector; see [`DenseViewMut::assign`].
    pub fn assign<S>(&mut self, seq: S) -> Result<()>
    where
        S: Sequence,
        S::Item: Into<T>,
    {
        self.view_mut().assign(seq)
    }

    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.as_mut_slice().fill(value);
    }

    /// Move the contents out, leaving `self` empty.
    #[inline]
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    #[inline]
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }
}

impl<T: Copy> Vector<T> {
    /// `len` slots whose contents are undefined until written.
    ///
    /// ```rust
    /// use seqview::Vector;
    ///
    /// let mut v = Vector::<u16>::new_uninit(3);
    /// for (i, slot) in v.iter_mut().enumerate() {
    ///     slot.write(i as u16 * 2);
    /// }
    /// let v = unsafe { v.assume_init() };
    /// assert_eq!(v.as_slice(), &[0, 2, 4]);
    /// ```
    pub fn new_uninit(len: usize) -> Vector<MaybeUninit<T>> {
        let allocator = Allocator::<MaybeUninit<T>>::new();
        // `MaybeUninit` needs no construction.
        let block = infallible(allocator.allocate(len));
        Vector { block, allocator }
    }
}

impl<T> Vector<MaybeUninit<T>> {
    /// # Safety
    /// Every element must have been written.
    pub unsafe fn assume_init(self) -> Vector<T> {
        let this = ManuallyDrop::new(self);
        let len = this.block.len();
        // `MaybeUninit<T>` has the layout of `T`, so the allocation matches.
        let ptr = NonNull::new_unchecked(this.block.as_ptr().cast::<T>());
        Vector {
            block: MemoryBlock::from_raw_parts(ptr, len),
            allocator: Allocator::new(),
        }
    }
}

impl<T> Drop for Vector<T> {
    fn drop(&mut self) {
        // SAFETY: every slot is constructed and the block came from
        // `self.allocator` (or is empty).
        unsafe {
            self.allocator.destroy(self.block);
            self.allocator.deallocate(self.block);
        }
    }
}

impl<T> Default for Vector<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Vector<T> {
    fn clone(&self) -> Self {
        Self::from(self.as_slice())
    }

    /// Builds the replacement first, then drops the old contents. If a clone
    /// panics, `self` is left as it was.
    fn clone_from(&mut self, source: &Self) {
        let fresh = source.clone();
        *self = fresh;
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    fn from(values: &[T]) -> Self {
        infallible(Self::from_exact_iter(values.iter().cloned()))
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T> {
    fn from(values: [T; N]) -> Self {
        infallible(Self::from_exact_iter(values))
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(values: Vec<T>) -> Self {
        infallible(Self::from_exact_iter(values))
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<T>>())
    }
}

impl<T> TryFrom<Builder<T>> for Vector<T> {
    type Error = SeqError;

    fn try_from(builder: Builder<T>) -> Result<Self> {
        Self::from_builder(builder)
    }
}

impl<T> AsRef<[T]> for Vector<T> {
    fn as_ref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> AsMut<[T]> for Vector<T> {
    fn as_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    #[inline]
    fn index(&self, index: usize) -> &T {
        contract!(
            index < self.len(),
            "index {index} out of bounds for length {}",
            self.len()
        );
        &self.as_slice()[index]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut T {
        contract!(
            index < self.len(),
            "index {index} out of bounds for length {}",
            self.len()
        );
        &mut self.as_mut_slice()[index]
    }
}

impl<T: PartialEq> PartialEq for Vector<T> {
    fn eq(&self, other: &Self) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Eq> Eq for Vector<T> {}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for Vector<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.as_slice() == other
    }
}

impl<T: fmt::Debug> fmt::Debug for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

// ============================================================================
// Iteration
// ============================================================================

/// Owning iterator over a [`Vector`]. Elements not yet yielded are dropped
/// with the iterator.
pub struct IntoIter<T> {
    block: MemoryBlock<T>,
    allocator: Allocator<T>,
    front: usize,
    back: usize,
}

// SAFETY: the iterator uniquely owns the remaining elements.
unsafe impl<T: Send> Send for IntoIter<T> {}
unsafe impl<T: Sync> Sync for IntoIter<T> {}

impl<T> IntoIter<T> {
    /// The elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots `front..back` are constructed.
        unsafe { slice::from_raw_parts(self.block.slot(self.front), self.back - self.front) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        // SAFETY: slot `front` is constructed and is read exactly once.
        let value = unsafe { ptr::read(self.block.slot(self.front)) };
        self.front += 1;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        // SAFETY: as in `next`.
        Some(unsafe { ptr::read(self.block.slot(self.back)) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        // SAFETY: exactly the slots `front..back` are still constructed.
        unsafe {
            let rest = MemoryBlock::from_raw_parts(
                NonNull::new_unchecked(self.block.slot(self.front)),
                self.back - self.front,
            );
            self.allocator.destroy(rest);
            self.allocator.deallocate(self.block);
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> IntoIterator for Vector<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let this = ManuallyDrop::new(self);
        IntoIter {
            block: this.block,
            allocator: this.allocator,
            front: 0,
            back: this.block.len(),
        }
    }
}

impl<'a, T> IntoIterator for &'a Vector<T> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut Vector<T> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

// ============================================================================
// Sequence
// ============================================================================

impl<T> Sequence for Vector<T> {
    type Item = T;
    type Elements = IntoIter<T>;

    #[inline]
    fn len(&self) -> usize {
        self.block.len()
    }

    fn into_elements(self) -> IntoIter<T> {
        self.into_iter()
    }
}

impl<'a, T: Clone> Sequence for &'a Vector<T> {
    type Item = T;
    type Elements = Cloned<slice::Iter<'a, T>>;

    #[inline]
    fn len(&self) -> usize {
        self.block.len()
    }

    fn into_elements(self) -> Self::Elements {
        self.iter().cloned()
    }
}
