//! Staged, exactly-N construction of an owned block.

use std::fmt;
use std::ptr;

use crate::allocator::Allocator;
use crate::block::MemoryBlock;
use crate::{Result, SeqError};

/// An owning buffer filled one element at a time.
///
/// The capacity is fixed at creation. Elements are constructed in place by
/// [`push`](Builder::push) or [`emplace_with`](Builder::emplace_with) until the
/// builder [is complete](Builder::is_complete); only then can the block be
/// [released](Builder::release). Dropping a builder early drops exactly the
/// elements pushed so far and frees the storage.
///
/// # Example
/// ```rust
/// use seqview::{Builder, Vector};
///
/// let mut builder = Builder::new(3).unwrap();
/// while !builder.is_complete() {
///     builder.push(builder.count() * 10).unwrap();
/// }
/// let v = Vector::from_builder(builder).unwrap();
/// assert_eq!(v.as_slice(), &[0, 10, 20]);
/// ```
pub struct Builder<T> {
    block: MemoryBlock<T>,
    count: usize,
    allocator: Allocator<T>,
}

impl<T> fmt::Debug for Builder<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("capacity", &self.block.len())
            .field("count", &self.count)
            .finish()
    }
}

impl<T> Default for Builder<T> {
    fn default() -> Self {
        Self {
            block: MemoryBlock::empty(),
            count: 0,
            allocator: Allocator::new(),
        }
    }
}

impl<T> Builder<T> {
    /// Allocate room for exactly `capacity` elements.
    pub fn new(capacity: usize) -> Result<Self> {
        let allocator = Allocator::new();
        let block = allocator.allocate(capacity)?;
        Ok(Self {
            block,
            count: 0,
            allocator,
        })
    }

    /// Total number of slots.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.block.len()
    }

    /// Number of slots constructed so far.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.block.len() - self.count
    }

    /// True once every slot is constructed.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.count == self.block.len()
    }

    fn ensure_room(&self) -> Result<()> {
        if self.is_complete() {
            log::debug!("push into complete builder (capacity {})", self.capacity());
            return Err(SeqError::BuilderComplete {
                capacity: self.capacity(),
            });
        }
        Ok(())
    }

    /// Construct the next slot from `value`.
    ///
    /// # Errors
    /// [`SeqError::BuilderComplete`] if every slot is already filled; `value`
    /// is dropped.
    pub fn push(&mut self, value: T) -> Result<()> {
        self.ensure_room()?;
        // SAFETY: slot `count` is allocated and unconstructed.
        unsafe { ptr::write(self.block.slot(self.count), value) };
        self.count += 1;
        Ok(())
    }

    /// Construct the next slot from the value returned by `init`.
    ///
    /// `init` only runs when there is room.
    pub fn emplace_with<F>(&mut self, init: F) -> Result<()>
    where
        F: FnOnce() -> T,
    {
        self.ensure_room()?;
        let value = init();
        // SAFETY: as in `push`; a panic in `init` leaves `count` untouched.
        unsafe { ptr::write(self.block.slot(self.count), value) };
        self.count += 1;
        Ok(())
    }

    /// Push every item of `values`, stopping at the first error.
    pub fn extend_from<I>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.push(value)?;
        }
        Ok(())
    }

    /// The constructed prefix.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the first `count` slots are constructed.
        unsafe { self.block.prefix(self.count).as_slice() }
    }

    /// Transfer the completed block to the caller and reset to the empty state.
    ///
    /// The caller becomes responsible for destroying and deallocating the
    /// block, usually by handing it to a [`Vector`](crate::Vector) through
    /// [`Vector::from_builder`](crate::Vector::from_builder).
    ///
    /// # Errors
    /// [`SeqError::BuilderIncomplete`] if some slots are still unconstructed;
    /// the builder is left unchanged.
    pub fn release(&mut self) -> Result<MemoryBlock<T>> {
        if !self.is_complete() {
            log::debug!(
                "release of incomplete builder ({} of {})",
                self.count,
                self.capacity()
            );
            return Err(SeqError::BuilderIncomplete {
                filled: self.count,
                capacity: self.capacity(),
            });
        }
        self.count = 0;
        let block = std::mem::replace(&mut self.block, MemoryBlock::empty());
        log::trace!("builder released {} elements", block.len());
        Ok(block)
    }
}

impl<T> Drop for Builder<T> {
    fn drop(&mut self) {
        // SAFETY: the first `count` slots are constructed and the block came
        // from `self.allocator` (or is the empty block, which is a no-op).
        unsafe {
            self.allocator.destroy(self.block.prefix(self.count));
            self.allocator.deallocate(self.block);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct DropCounter(Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    fn free<T>(block: MemoryBlock<T>) {
        let allocator = Allocator::<T>::new();
        unsafe {
            allocator.destroy(block);
            allocator.deallocate(block);
        }
    }

    #[test]
    fn test_building_in_parts() {
        let mut a = Builder::<f64>::new(10).unwrap();
        assert!(a.release().is_err());

        let b = Builder::<f64>::new(0).unwrap();
        assert!(b.is_complete());

        let mut c = Builder::<f64>::new(20).unwrap();
        while !c.is_complete() {
            c.push(0.0).unwrap();
        }
        let block = c.release().unwrap();
        assert_eq!(block.len(), 20);
        free(block);
    }

    #[test]
    fn test_builder_protocol() {
        let mut builder = Builder::new(3).unwrap();
        builder.push(1).unwrap();
        builder.push(2).unwrap();
        assert_eq!(
            builder.release().unwrap_err(),
            SeqError::BuilderIncomplete {
                filled: 2,
                capacity: 3
            }
        );
        // A failed release leaves the builder intact.
        assert_eq!(builder.as_slice(), &[1, 2]);

        builder.push(3).unwrap();
        assert!(builder.is_complete());
        assert_eq!(
            builder.push(4).unwrap_err(),
            SeqError::BuilderComplete { capacity: 3 }
        );

        let block = builder.release().unwrap();
        assert_eq!(unsafe { block.as_slice() }, &[1, 2, 3]);
        free(block);

        // Released builders are empty and complete.
        assert_eq!(builder.capacity(), 0);
        assert_eq!(builder.count(), 0);
        assert!(builder.is_complete());
    }

    #[test]
    fn test_emplace_with_skips_init_when_full() {
        let mut builder = Builder::new(1).unwrap();
        builder.emplace_with(|| String::from("one")).unwrap();
        let called = Cell::new(false);
        let err = builder.emplace_with(|| {
            called.set(true);
            String::from("two")
        });
        assert!(err.is_err());
        assert!(!called.get());
        assert_eq!(builder.as_slice(), &["one"]);
    }

    #[test]
    fn test_extend_from_stops_at_capacity() {
        let mut builder = Builder::new(4).unwrap();
        let err = builder.extend_from(0..10).unwrap_err();
        assert_eq!(err, SeqError::BuilderComplete { capacity: 4 });
        assert_eq!(builder.as_slice(), &[0, 1, 2, 3]);
        assert_eq!(builder.remaining(), 0);
    }

    #[test]
    fn test_drop_partial_builder() {
        let drops = Rc::new(Cell::new(0));
        {
            let mut builder = Builder::new(5).unwrap();
            for _ in 0..3 {
                builder.push(DropCounter(drops.clone())).unwrap();
            }
        }
        assert_eq!(drops.get(), 3);
    }

    #[test]
    fn test_builder_move() {
        let mut builder = Builder::new(2).unwrap();
        builder.push(7u8).unwrap();
        let mut moved = builder;
        moved.push(8).unwrap();
        let block = moved.release().unwrap();
        assert_eq!(unsafe { block.as_slice() }, &[7, 8]);
        free(block);
    }
}
