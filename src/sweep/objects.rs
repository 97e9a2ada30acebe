//! Value sweep: one shape, many short-lived instances

use tracing::debug;

use super::{sweep, SweepConfig};
use crate::heap::MemoryManager;
use crate::runner::Benchmark;
use crate::shape::{AllocRequest, ValueShape};
use crate::HarnessError;

/// Allocates and discards `shape` across the sweep, then requests one
/// collection.
#[derive(Debug, Clone)]
pub struct AllocationSweep {
    name: String,
    shape: ValueShape,
    config: SweepConfig,
}

impl AllocationSweep {
    /// Sweep `shape` with the given geometry.
    pub fn new(shape: ValueShape, config: SweepConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        Ok(Self {
            name: format!("alloc_sweep/{}", shape.name()),
            shape,
            config,
        })
    }

    /// Shape being swept.
    pub fn shape(&self) -> ValueShape {
        self.shape
    }

    /// Sweep geometry.
    pub fn config(&self) -> &SweepConfig {
        &self.config
    }

    /// Allocations a full run performs.
    pub fn expected_allocations(&self) -> u64 {
        self.config.allocations_per_sweep()
    }

    /// Collection requests a full run issues.
    pub fn expected_collections(&self) -> u64 {
        1
    }
}

impl Benchmark for AllocationSweep {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> String {
        format!(
            "allocate {} short-lived `{}` values, then request one collection",
            self.expected_allocations(),
            self.shape
        )
    }

    fn run(&mut self, heap: &mut dyn MemoryManager) -> Result<(), HarnessError> {
        sweep(heap, AllocRequest::Value(self.shape), &self.config)?;
        debug!(shape = %self.shape, "value sweep complete");
        heap.request_collection();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::heap::RecordingHeap;

    #[test]
    fn test_small_sweep_counts() {
        let config = SweepConfig::new(2, 10, 3).unwrap();
        let mut bench = AllocationSweep::new(ValueShape::TwoInts, config).unwrap();
        let mut heap = RecordingHeap::new();
        bench.run(&mut heap).unwrap();

        // Batch sizes 2, 4, 8.
        assert_eq!(heap.stats().allocations, 3 * (2 + 4 + 8));
        assert_eq!(heap.stats().collections, 1);
        assert_eq!(bench.expected_allocations(), heap.stats().allocations);
    }

    #[test]
    fn test_name_includes_shape() {
        let bench = AllocationSweep::new(ValueShape::Derived, SweepConfig::default()).unwrap();
        assert_eq!(bench.name(), "alloc_sweep/derived");
    }
}
