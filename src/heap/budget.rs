//! Byte budget wrapper modelling a fixed-size collected heap

use tracing::debug;

use super::{Allocation, HeapStats, MemoryManager};
use crate::shape::AllocRequest;
use crate::HarnessError;

/// Wraps a backend with a live-byte budget.
///
/// Discarded handles are not credited back: like garbage in a traced heap,
/// their bytes stay charged until the next collection request, which
/// resets the live count. A request that would exceed the budget fails.
#[derive(Debug)]
pub struct BudgetHeap<M> {
    inner: M,
    budget: usize,
    live: usize,
    peak: usize,
}

impl<M: MemoryManager> BudgetHeap<M> {
    /// Limit `inner` to `budget` live bytes between collections.
    pub fn new(inner: M, budget: usize) -> Self {
        Self {
            inner,
            budget,
            live: 0,
            peak: 0,
        }
    }

    /// Bytes charged since the last collection.
    pub fn live_bytes(&self) -> usize {
        self.live
    }

    /// Highest live byte count observed.
    pub fn peak_bytes(&self) -> usize {
        self.peak
    }

    /// Unwrap the inner backend.
    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: MemoryManager> MemoryManager for BudgetHeap<M> {
    fn name(&self) -> &'static str {
        "budget"
    }

    fn allocate(&mut self, request: AllocRequest) -> Result<Allocation, HarnessError> {
        let bytes = request.size_bytes();
        let live = self.live.saturating_add(bytes);
        if live > self.budget {
            return Err(HarnessError::AllocationFailed { request, bytes });
        }
        let handle = self.inner.allocate(request)?;
        self.live = live;
        self.peak = self.peak.max(self.live);
        Ok(handle)
    }

    fn request_collection(&mut self) {
        debug!(reclaimed = self.live, "budget heap collection");
        self.live = 0;
        self.inner.request_collection();
    }

    fn stats(&self) -> HeapStats {
        self.inner.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::RecordingHeap;
    use crate::shape::{ArrayElement, ValueShape};

    #[test]
    fn test_exceeding_budget_fails() {
        let mut heap = BudgetHeap::new(RecordingHeap::new(), 40);
        let request = AllocRequest::Value(ValueShape::FourInts);
        heap.allocate(request).unwrap();
        heap.allocate(request).unwrap();
        let err = heap.allocate(request).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::AllocationFailed { bytes: 16, .. }
        ));
        assert_eq!(heap.live_bytes(), 32);
        assert_eq!(heap.stats().allocations, 2);
    }

    #[test]
    fn test_collection_resets_live_bytes() {
        let mut heap = BudgetHeap::new(RecordingHeap::new(), 64);
        let request = AllocRequest::Array {
            element: ArrayElement::Double,
            len: 8,
        };
        heap.allocate(request).unwrap();
        assert!(heap.allocate(request).is_err());
        heap.request_collection();
        assert_eq!(heap.live_bytes(), 0);
        heap.allocate(request).unwrap();
        assert_eq!(heap.peak_bytes(), 64);
        assert_eq!(heap.into_inner().stats().collections, 1);
    }
}
