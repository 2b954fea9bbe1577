//! Raw typed storage handles.

use std::fmt;
use std::ptr::NonNull;

/// A raw, non-owning handle over a typed extent: a pointer plus an element count.
///
/// A block says nothing about whether its slots are constructed. Whoever holds
/// it (a [`Builder`](crate::Builder) or a [`Vector`](crate::Vector)) tracks that,
/// and uses an [`Allocator`](crate::Allocator) to construct, destroy, and free it.
pub struct MemoryBlock<T> {
    ptr: NonNull<T>,
    len: usize,
}

impl<T> Clone for MemoryBlock<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MemoryBlock<T> {}

impl<T> fmt::Debug for MemoryBlock<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryBlock")
            .field("ptr", &self.ptr)
            .field("len", &self.len)
            .finish()
    }
}

impl<T> PartialEq for MemoryBlock<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr == other.ptr && self.len == other.len
    }
}

impl<T> Eq for MemoryBlock<T> {}

impl<T> Default for MemoryBlock<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> MemoryBlock<T> {
    /// The empty block: dangling pointer, zero length.
    #[inline]
    pub const fn empty() -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
        }
    }

    /// Wrap a raw extent.
    ///
    /// # Safety
    /// `ptr` must be valid for `len` slots of `T` (or dangling when no bytes
    /// are addressed), and the caller must track whether they are constructed.
    #[inline]
    pub const unsafe fn from_raw_parts(ptr: NonNull<T>, len: usize) -> Self {
        Self { ptr, len }
    }

    /// Pointer to the first slot.
    #[inline]
    pub const fn as_ptr(&self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Number of slots.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The sub-block covering the first `len` slots.
    ///
    /// # Panics
    /// Panics if `len` exceeds the block length.
    #[inline]
    pub fn prefix(&self, len: usize) -> Self {
        assert!(len <= self.len, "prefix {len} exceeds block length {}", self.len);
        Self { ptr: self.ptr, len }
    }

    /// Pointer to slot `index`.
    ///
    /// # Safety
    /// `index` must be at most the block length.
    #[inline]
    pub(crate) unsafe fn slot(&self, index: usize) -> *mut T {
        debug_assert!(index <= self.len);
        self.ptr.as_ptr().add(index)
    }

    /// View the block as a slice.
    ///
    /// # Safety
    /// Every slot must be constructed, and no mutable access may alias the
    /// returned slice for `'a`.
    #[inline]
    pub unsafe fn as_slice<'a>(&self) -> &'a [T] {
        std::slice::from_raw_parts(self.ptr.as_ptr(), self.len)
    }

    /// View the block as a mutable slice.
    ///
    /// # Safety
    /// Every slot must be constructed, and the returned slice must be the only
    /// access to the block for `'a`.
    #[inline]
    pub unsafe fn as_mut_slice<'a>(&self) -> &'a mut [T] {
        std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len)
    }
}
