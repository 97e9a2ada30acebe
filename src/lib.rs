//! # Allocation-pattern stress harness
//!
//! Drives a memory manager (allocator or collector under test) through a
//! fixed, deterministic sequence of workloads so that its throughput and
//! responsiveness can be compared across workload shapes.
//!
//! ## Workloads
//!
//! 1. **Value sweeps**: many short-lived values of one shape at doubling
//!    batch sizes, then one collection request
//! 2. **Array sweeps**: the same, per doubling array length, with a
//!    collection request after each length
//! 3. **Tree benchmark**: a large transient tree, then a long-lived tree and
//!    array retained for the run (GCBench)
//!
//! ## Usage Example
//!
//! ```no_run
//! use gcstress::{BenchmarkRegistry, BenchmarkRunner, HarnessConfig, SystemHeap};
//!
//! let registry = BenchmarkRegistry::standard(&HarnessConfig::default())?;
//! let mut runner = BenchmarkRunner::new(registry, SystemHeap::new());
//! runner.run_all()?;
//! # Ok::<(), gcstress::HarnessError>(())
//! ```

#![warn(missing_docs, missing_debug_implementations)]
#![allow(clippy::new_without_default)]

pub mod heap;   // Memory-manager boundary and backends
pub mod runner; // Registry and sequential runner
pub mod shape;  // Allocatable shapes
pub mod sweep;  // Short-lived allocation sweeps
pub mod tree;   // Binary-tree benchmark

// Re-exports for convenience
pub use heap::{Allocation, BudgetHeap, HeapStats, MemoryManager, RecordingHeap, SystemHeap};
pub use runner::{Benchmark, BenchmarkInfo, BenchmarkRegistry, BenchmarkRunner, RunRecord};
pub use shape::{AllocRequest, ArrayElement, ValueShape};
pub use sweep::{AllocationSweep, ArraySweep, ArraySweepConfig, SweepConfig};
pub use tree::{TreeBenchmark, TreeConfig, TreeNode};

use thiserror::Error;

/// Parameters for every engine in the standard registry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HarnessConfig {
    /// Value sweep geometry
    pub sweep: SweepConfig,
    /// Array sweep geometry
    pub arrays: ArraySweepConfig,
    /// Tree benchmark parameters
    pub tree: TreeConfig,
}

impl HarnessConfig {
    /// Set the value sweep geometry.
    pub fn with_sweep(mut self, sweep: SweepConfig) -> Self {
        self.sweep = sweep;
        self
    }

    /// Set the array sweep geometry.
    pub fn with_arrays(mut self, arrays: ArraySweepConfig) -> Self {
        self.arrays = arrays;
        self
    }

    /// Set the tree benchmark parameters.
    pub fn with_tree(mut self, tree: TreeConfig) -> Self {
        self.tree = tree;
        self
    }

    /// Enable the timed depth sweep of the tree benchmark.
    pub fn with_timed_depth_sweep(mut self, enabled: bool) -> Self {
        self.tree.timed_depth_sweep = enabled;
        self
    }

    /// Enable tree benchmark diagnostics.
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.tree.diagnostics = enabled;
        self
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), HarnessError> {
        self.sweep.validate()?;
        self.arrays.validate()?;
        self.tree.validate()
    }
}

/// Errors surfaced by the harness
#[derive(Error, Debug)]
pub enum HarnessError {
    /// The memory manager could not satisfy a request. Fatal, never retried.
    #[error("allocation of {request} ({bytes} bytes) failed")]
    AllocationFailed {
        /// Request that failed
        request: AllocRequest,
        /// Bytes requested
        bytes: usize,
    },

    /// Engine parameters are unusable
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// No registered benchmark has this name
    #[error("unknown benchmark: {0}")]
    UnknownBenchmark(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_reference_geometry() {
        let config = HarnessConfig::default();
        assert_eq!(config.sweep.init_size, 10_000);
        assert_eq!(config.sweep.max_size, 100_000);
        assert_eq!(config.sweep.objects_count, 16);
        assert_eq!(config.arrays.max_len, 128);
        assert_eq!(config.tree.stretch_depth, 18);
        assert!(!config.tree.timed_depth_sweep);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_toggles() {
        let config = HarnessConfig::default()
            .with_timed_depth_sweep(true)
            .with_diagnostics(true);
        assert!(config.tree.timed_depth_sweep);
        assert!(config.tree.diagnostics);
    }

    #[test]
    fn test_error_messages() {
        let err = HarnessError::AllocationFailed {
            request: AllocRequest::Array {
                element: ArrayElement::Long,
                len: 4,
            },
            bytes: 32,
        };
        assert_eq!(err.to_string(), "allocation of long[4] (32 bytes) failed");
    }
}
