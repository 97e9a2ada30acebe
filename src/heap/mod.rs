//! Memory-manager boundary
//!
//! Workloads never allocate swept values directly: every request goes
//! through a [`MemoryManager`], so the same workload can be replayed
//! against different backing implementations.

mod budget;
mod recording;
mod system;

pub use budget::BudgetHeap;
pub use recording::{HeapOp, RecordingHeap};
pub use system::SystemHeap;

use std::any::Any;
use std::fmt;

use crate::shape::AllocRequest;
use crate::HarnessError;

/// Counters every backend maintains.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeapStats {
    /// Successful allocations
    pub allocations: u64,
    /// Sum of payload bytes over successful allocations
    pub bytes_requested: u64,
    /// Collection requests received
    pub collections: u64,
}

impl HeapStats {
    /// Account one successful allocation.
    pub fn record_allocation(&mut self, request: &AllocRequest) {
        self.allocations += 1;
        self.bytes_requested += request.size_bytes() as u64;
    }

    /// Account one collection request.
    pub fn record_collection(&mut self) {
        self.collections += 1;
    }
}

impl fmt::Display for HeapStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} allocations, {} bytes requested, {} collections",
            self.allocations, self.bytes_requested, self.collections
        )
    }
}

/// Allocator or collector under test.
///
/// `allocate` is synchronous; an `Err` is fatal to the run and is never
/// retried. `request_collection` is advisory and may be a no-op.
pub trait MemoryManager {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Allocate one value or array described by `request`.
    fn allocate(&mut self, request: AllocRequest) -> Result<Allocation, HarnessError>;

    /// Ask the backend to reclaim unreachable memory now.
    fn request_collection(&mut self);

    /// Counters accumulated so far.
    fn stats(&self) -> HeapStats;
}

impl<M: MemoryManager + ?Sized> MemoryManager for Box<M> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn allocate(&mut self, request: AllocRequest) -> Result<Allocation, HarnessError> {
        (**self).allocate(request)
    }

    fn request_collection(&mut self) {
        (**self).request_collection()
    }

    fn stats(&self) -> HeapStats {
        (**self).stats()
    }
}

/// Owned handle to an allocation. Dropping it releases the storage.
pub struct Allocation {
    request: AllocRequest,
    storage: Option<Box<dyn Any>>,
}

impl Allocation {
    /// Handle backed by real storage.
    pub fn backed(request: AllocRequest, storage: Box<dyn Any>) -> Self {
        Self {
            request,
            storage: Some(storage),
        }
    }

    /// Handle with no storage behind it (accounting-only backends).
    pub fn detached(request: AllocRequest) -> Self {
        Self {
            request,
            storage: None,
        }
    }

    /// The request this handle satisfies.
    pub fn request(&self) -> AllocRequest {
        self.request
    }

    /// Whether real storage backs the handle.
    pub fn is_backed(&self) -> bool {
        self.storage.is_some()
    }

    /// Borrow the storage as a concrete type.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.storage.as_ref().and_then(|s| s.downcast_ref::<T>())
    }

    /// Take ownership of the storage as a concrete type.
    ///
    /// `None` for detached handles or when the storage is not a `T`.
    pub fn into_boxed<T: 'static>(self) -> Option<Box<T>> {
        self.storage.and_then(|s| s.downcast::<T>().ok())
    }
}

impl fmt::Debug for Allocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Allocation")
            .field("request", &self.request)
            .field("backed", &self.is_backed())
            .finish()
    }
}
