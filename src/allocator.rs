//! Allocation and in-place construction over [`MemoryBlock`]s.
//!
//! The four operations are orthogonal: allocation never constructs,
//! construction never allocates, destruction never deallocates.

use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::mem;
use std::ptr::{self, NonNull};

use crate::block::MemoryBlock;
use crate::{Result, SeqError};

/// Stateless allocation policy for blocks of `T`.
///
/// Backed by the global allocator. The type is zero-sized and carries no
/// ownership: every block it hands out must be returned to
/// [`deallocate`](Allocator::deallocate) by whoever owns it.
pub struct Allocator<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Allocator<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Allocator<T> {}

impl<T> Default for Allocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Allocator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Allocator<{}>", std::any::type_name::<T>())
    }
}

impl<T> Allocator<T> {
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }

    fn layout(len: usize) -> Result<Layout> {
        Layout::array::<T>(len).map_err(|_| SeqError::CapacityOverflow { len })
    }

    /// Acquire uninitialized storage for `len` elements.
    ///
    /// # Errors
    /// [`SeqError::CapacityOverflow`] if the byte size overflows, and
    /// [`SeqError::OutOfMemory`] if the global allocator fails.
    pub fn allocate(&self, len: usize) -> Result<MemoryBlock<T>> {
        // SAFETY: `allocate_with` only calls this with a non-zero-sized layout.
        self.allocate_with(len, |layout| unsafe { alloc::alloc(layout) })
    }

    /// Acquire storage for `len` elements with every byte set to zero.
    pub fn allocate_zeroed(&self, len: usize) -> Result<MemoryBlock<T>> {
        // SAFETY: as above.
        self.allocate_with(len, |layout| unsafe { alloc::alloc_zeroed(layout) })
    }

    fn allocate_with(
        &self,
        len: usize,
        raw_alloc: impl FnOnce(Layout) -> *mut u8,
    ) -> Result<MemoryBlock<T>> {
        let layout = Self::layout(len)?;
        if layout.size() == 0 {
            // SAFETY: no bytes are addressed, a dangling pointer is valid.
            return Ok(unsafe { MemoryBlock::from_raw_parts(NonNull::dangling(), len) });
        }
        match NonNull::new(raw_alloc(layout).cast::<T>()) {
            Some(ptr) => {
                log::trace!(
                    "allocated {len} x {} ({} bytes) at {ptr:p}",
                    std::any::type_name::<T>(),
                    layout.size()
                );
                // SAFETY: freshly allocated for exactly `len` slots.
                Ok(unsafe { MemoryBlock::from_raw_parts(ptr, len) })
            }
            None => Err(SeqError::OutOfMemory {
                bytes: layout.size(),
                align: layout.align(),
            }),
        }
    }

    /// Release storage. Slots are not dropped; call [`destroy`](Self::destroy) first.
    ///
    /// # Safety
    /// `block` must come from `allocate`/`allocate_zeroed` of this element type
    /// with the same length, and must not be used afterwards.
    pub unsafe fn deallocate(&self, block: MemoryBlock<T>) {
        let Ok(layout) = Layout::array::<T>(block.len()) else {
            unreachable!("block of {} elements was never allocated", block.len());
        };
        if layout.size() == 0 {
            return;
        }
        log::trace!(
            "deallocating {} x {} at {:p}",
            block.len(),
            std::any::type_name::<T>(),
            block.as_ptr()
        );
        alloc::dealloc(block.as_ptr().cast::<u8>(), layout);
    }

    /// Construct every slot from `init(index)`.
    ///
    /// If `init` panics, the slots constructed so far are dropped before the
    /// panic propagates.
    ///
    /// # Safety
    /// Every slot of `block` must be allocated and unconstructed.
    pub unsafe fn construct_with<F>(&self, block: MemoryBlock<T>, mut init: F)
    where
        F: FnMut(usize) -> T,
    {
        let mut guard = PartialInit {
            block,
            initialized: 0,
        };
        while guard.initialized < block.len() {
            let value = init(guard.initialized);
            ptr::write(block.slot(guard.initialized), value);
            guard.initialized += 1;
        }
        mem::forget(guard);
    }

    /// Default-construct every slot.
    ///
    /// # Safety
    /// See [`construct_with`](Self::construct_with).
    pub unsafe fn construct_default(&self, block: MemoryBlock<T>)
    where
        T: Default,
    {
        self.construct_with(block, |_| T::default());
    }

    /// Fill-construct every slot with a clone of `value`.
    ///
    /// # Safety
    /// See [`construct_with`](Self::construct_with).
    pub unsafe fn construct_fill(&self, block: MemoryBlock<T>, value: &T)
    where
        T: Clone,
    {
        self.construct_with(block, |_| value.clone());
    }

    /// Construct the slots from the first `block.len()` items of `values`.
    ///
    /// # Errors
    /// [`SeqError::SizeMismatch`] if `values` runs out early. The slots
    /// constructed before that are dropped, leaving the block unconstructed.
    ///
    /// # Safety
    /// See [`construct_with`](Self::construct_with).
    pub unsafe fn construct_from<I>(&self, block: MemoryBlock<T>, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        let mut values = values.into_iter();
        let mut guard = PartialInit {
            block,
            initialized: 0,
        };
        while guard.initialized < block.len() {
            let Some(value) = values.next() else {
                let found = guard.initialized;
                drop(guard);
                return Err(SeqError::SizeMismatch {
                    expected: block.len(),
                    found,
                });
            };
            ptr::write(block.slot(guard.initialized), value);
            guard.initialized += 1;
        }
        mem::forget(guard);
        Ok(())
    }

    /// Drop every slot in place. The storage stays allocated.
    ///
    /// # Safety
    /// Every slot of `block` must be constructed; afterwards none is.
    pub unsafe fn destroy(&self, block: MemoryBlock<T>) {
        if mem::needs_drop::<T>() {
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(block.as_ptr(), block.len()));
        }
    }
}

/// Drops the constructed prefix of a block if construction unwinds.
struct PartialInit<T> {
    block: MemoryBlock<T>,
    initialized: usize,
}

impl<T> Drop for PartialInit<T> {
    fn drop(&mut self) {
        // SAFETY: exactly the first `initialized` slots are constructed.
        unsafe { Allocator::new().destroy(self.block.prefix(self.initialized)) }
    }
}
