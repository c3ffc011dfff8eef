//! The allocation capability threaded through decoding.
//!
//! Deserializing a variable-length value (a sequence, a string) needs memory.
//! Instead of reaching for the global heap implicitly, every call that may
//! allocate receives an [`Allocator`] from its caller. The caller therefore
//! decides how much memory an untrusted input may claim ([`Limited`]) and can
//! observe that a failed decode released everything it reserved.
//!
//! Buffers are plain [`Vec`]s. An allocator hands them out, grows and shrinks
//! them, and takes them back. Decoders that fail half-way return every buffer
//! they obtained through [`Allocator::release`] before the error propagates.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;
#[cfg(feature = "alloc")]
use core::cell::Cell;

/// The reasons an [`Allocator`] refuses to provide memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AllocError {
    /// The requested capacity does not fit in `usize` bytes.
    CapacityOverflow,
    /// The underlying allocator has no memory left.
    OutOfMemory,
    /// The request would exceed the budget of a [`Limited`] allocator.
    LimitExceeded,
}

/// A source of owned buffers.
///
/// All methods work on [`Vec`]s so that the buffers remain ordinary owned
/// Rust values. Implementations may keep track of the bytes they handed out;
/// callers are expected to return buffers through [`Allocator::release`] on
/// failure paths so that the accounting stays exact.
pub trait Allocator {
    /// Create an empty buffer that can hold at least `capacity` elements.
    #[cfg(feature = "alloc")]
    fn allocate<T>(&self, capacity: usize) -> Result<Vec<T>, AllocError>;

    /// Make room for at least `additional` more elements in `buffer`.
    ///
    /// The growth policy belongs to the caller: implementations reserve what
    /// is asked for without amortizing.
    #[cfg(feature = "alloc")]
    fn grow<T>(&self, buffer: &mut Vec<T>, additional: usize) -> Result<(), AllocError>;

    /// Shrink the capacity of `buffer` to its length.
    #[cfg(feature = "alloc")]
    fn shrink<T>(&self, buffer: &mut Vec<T>);

    /// Take back a buffer. Its elements are dropped.
    #[cfg(feature = "alloc")]
    fn release<T>(&self, buffer: Vec<T>);
}

/// The global heap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Global;

/// An allocator that caps the number of live bytes handed out by another
/// allocator.
///
/// The budget covers the capacity of the buffers, not their length. Buffers
/// that leave the decoder as part of a successfully decoded value stay
/// counted until they are returned through [`Allocator::release`], which is
/// what [`crate::de::Deserialize::release`] does.
///
/// `Limited` uses interior mutability and must not be shared between threads.
#[cfg(feature = "alloc")]
#[derive(Debug)]
pub struct Limited<A: Allocator = Global> {
    inner: A,
    limit: usize,
    live: Cell<usize>,
    peak: Cell<usize>,
}

#[cfg(feature = "alloc")]
fn bytes_of<T>(capacity: usize) -> Result<usize, AllocError> {
    match core::mem::size_of::<T>().checked_mul(capacity) {
        Some(bytes) if bytes <= isize::MAX as usize => Ok(bytes),
        _ => Err(AllocError::CapacityOverflow),
    }
}

#[cfg(feature = "alloc")]
fn size_of_capacity<T>(buffer: &Vec<T>) -> usize {
    core::mem::size_of::<T>() * buffer.capacity()
}

//------------------------------------------------------------------------------
// Global
//------------------------------------------------------------------------------

impl Allocator for Global {
    #[cfg(feature = "alloc")]
    fn allocate<T>(&self, capacity: usize) -> Result<Vec<T>, AllocError> {
        bytes_of::<T>(capacity)?;
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(capacity).map_err(|_| AllocError::OutOfMemory)?;
        Ok(buffer)
    }

    #[cfg(feature = "alloc")]
    fn grow<T>(&self, buffer: &mut Vec<T>, additional: usize) -> Result<(), AllocError> {
        let required = buffer.len().checked_add(additional).ok_or(AllocError::CapacityOverflow)?;
        bytes_of::<T>(required)?;
        buffer.try_reserve_exact(additional).map_err(|_| AllocError::OutOfMemory)
    }

    #[cfg(feature = "alloc")]
    fn shrink<T>(&self, buffer: &mut Vec<T>) {
        buffer.shrink_to_fit();
    }

    #[cfg(feature = "alloc")]
    fn release<T>(&self, buffer: Vec<T>) {
        drop(buffer);
    }
}

//------------------------------------------------------------------------------
// Limited
//------------------------------------------------------------------------------

#[cfg(feature = "alloc")]
impl Limited<Global> {
    /// Create an allocator that hands out at most `limit` bytes from the
    /// global heap.
    pub fn new(limit: usize) -> Self {
        Self::with_allocator(Global, limit)
    }
}

#[cfg(feature = "alloc")]
impl<A: Allocator> Limited<A> {
    /// Create an allocator that hands out at most `limit` bytes from `inner`.
    pub fn with_allocator(inner: A, limit: usize) -> Self {
        Self { inner, limit, live: Cell::new(0), peak: Cell::new(0) }
    }

    /// The budget in bytes.
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// The bytes currently handed out and not yet released.
    pub fn live(&self) -> usize {
        self.live.get()
    }

    /// The highest value [`Self::live`] ever reached.
    pub fn peak(&self) -> usize {
        self.peak.get()
    }

    fn claim(&self, bytes: usize) -> Result<(), AllocError> {
        let live = self.live.get().checked_add(bytes).ok_or(AllocError::CapacityOverflow)?;
        if live > self.limit {
            log::debug!("allocation of {bytes} bytes refused, {} of {} bytes in use", self.live.get(), self.limit);
            return Err(AllocError::LimitExceeded);
        }
        self.live.set(live);
        self.peak.set(core::cmp::max(self.peak.get(), live));
        Ok(())
    }

    fn unclaim(&self, bytes: usize) {
        self.live.set(self.live.get().saturating_sub(bytes));
    }

    // The inner allocator may hand out more than was claimed.
    fn settle(&self, claimed: usize, actual: usize) {
        self.live.set(self.live.get().saturating_sub(claimed).saturating_add(actual));
        self.peak.set(core::cmp::max(self.peak.get(), self.live.get()));
    }
}

#[cfg(feature = "alloc")]
impl<A: Allocator> Allocator for Limited<A> {
    fn allocate<T>(&self, capacity: usize) -> Result<Vec<T>, AllocError> {
        let claimed = bytes_of::<T>(capacity)?;
        self.claim(claimed)?;
        match self.inner.allocate::<T>(capacity) {
            Ok(buffer) => {
                self.settle(claimed, size_of_capacity(&buffer));
                Ok(buffer)
            }
            Err(error) => {
                self.unclaim(claimed);
                Err(error)
            }
        }
    }

    fn grow<T>(&self, buffer: &mut Vec<T>, additional: usize) -> Result<(), AllocError> {
        let required = buffer.len().checked_add(additional).ok_or(AllocError::CapacityOverflow)?;
        if required <= buffer.capacity() {
            return Ok(());
        }
        let before = size_of_capacity(buffer);
        let claimed = bytes_of::<T>(required)? - before;
        self.claim(claimed)?;
        match self.inner.grow(buffer, additional) {
            Ok(()) => {
                self.settle(claimed, size_of_capacity(buffer) - before);
                Ok(())
            }
            Err(error) => {
                self.unclaim(claimed);
                Err(error)
            }
        }
    }

    fn shrink<T>(&self, buffer: &mut Vec<T>) {
        let before = size_of_capacity(buffer);
        self.inner.shrink(buffer);
        self.unclaim(before.saturating_sub(size_of_capacity(buffer)));
    }

    fn release<T>(&self, buffer: Vec<T>) {
        self.unclaim(size_of_capacity(&buffer));
        self.inner.release(buffer);
    }
}

impl<A: Allocator> Allocator for &A {
    #[cfg(feature = "alloc")]
    fn allocate<T>(&self, capacity: usize) -> Result<Vec<T>, AllocError> {
        (**self).allocate(capacity)
    }

    #[cfg(feature = "alloc")]
    fn grow<T>(&self, buffer: &mut Vec<T>, additional: usize) -> Result<(), AllocError> {
        (**self).grow(buffer, additional)
    }

    #[cfg(feature = "alloc")]
    fn shrink<T>(&self, buffer: &mut Vec<T>) {
        (**self).shrink(buffer)
    }

    #[cfg(feature = "alloc")]
    fn release<T>(&self, buffer: Vec<T>) {
        (**self).release(buffer)
    }
}

//------------------------------------------------------------------------------
// AllocError
//------------------------------------------------------------------------------

impl core::error::Error for AllocError {}

impl core::fmt::Display for AllocError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AllocError::CapacityOverflow => write!(f, "the requested capacity overflows the address space"),
            AllocError::OutOfMemory => write!(f, "the allocator is out of memory"),
            AllocError::LimitExceeded => write!(f, "the allocation exceeds the configured memory limit"),
        }
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use super::*;

    #[test]
    fn global_allocate() -> Result<(), AllocError> {
        let buffer = Global.allocate::<u32>(12)?;
        assert!(buffer.is_empty());
        assert!(buffer.capacity() >= 12);
        Ok(())
    }

    #[test]
    fn global_capacity_overflow() {
        assert_eq!(Global.allocate::<u64>(usize::MAX).map(|_| ()), Err(AllocError::CapacityOverflow));
    }

    #[test]
    fn limited_tracks_live_bytes() -> Result<(), AllocError> {
        let allocator = Limited::new(1024);
        let mut buffer = allocator.allocate::<u32>(4)?;
        assert_eq!(allocator.live(), 16);
        buffer.extend([1, 2, 3, 4]);
        allocator.grow(&mut buffer, 4)?;
        assert_eq!(allocator.live(), 32);
        buffer.push(5);
        allocator.shrink(&mut buffer);
        assert_eq!(allocator.live(), 20);
        allocator.release(buffer);
        assert_eq!(allocator.live(), 0);
        assert_eq!(allocator.peak(), 32);
        Ok(())
    }

    #[test]
    fn limited_refuses_over_budget() {
        let allocator = Limited::new(15);
        assert_eq!(allocator.allocate::<u32>(4).map(|_| ()), Err(AllocError::LimitExceeded));
        assert_eq!(allocator.live(), 0);
    }

    #[test]
    fn limited_refuses_growth_over_budget() -> Result<(), AllocError> {
        let allocator = Limited::new(16);
        let mut buffer = allocator.allocate::<u32>(2)?;
        buffer.extend([1, 2]);
        assert_eq!(allocator.grow(&mut buffer, 3), Err(AllocError::LimitExceeded));
        assert_eq!(allocator.live(), 8);
        allocator.grow(&mut buffer, 2)?;
        assert_eq!(allocator.live(), 16);
        Ok(())
    }

    #[test]
    fn limited_grow_within_capacity_is_free() -> Result<(), AllocError> {
        let allocator = Limited::new(64);
        let mut buffer = allocator.allocate::<u8>(8)?;
        allocator.grow(&mut buffer, 8)?;
        assert_eq!(allocator.live(), 8);
        Ok(())
    }

    #[test]
    fn limited_through_reference() -> Result<(), AllocError> {
        let allocator = Limited::new(64);
        let by_ref = &allocator;
        let buffer = by_ref.allocate::<u16>(3)?;
        assert_eq!(allocator.live(), 6);
        by_ref.release(buffer);
        assert_eq!(allocator.live(), 0);
        Ok(())
    }
}
