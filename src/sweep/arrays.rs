//! Array sweep: short-lived arrays at doubling lengths

use tracing::debug;

use super::{sweep, ArraySweepConfig};
use crate::heap::MemoryManager;
use crate::runner::Benchmark;
use crate::shape::{AllocRequest, ArrayElement};
use crate::HarnessError;

/// For each length tier, runs a full sweep of default-initialised arrays
/// of that length and then requests a collection.
#[derive(Debug, Clone)]
pub struct ArraySweep {
    name: String,
    element: ArrayElement,
    config: ArraySweepConfig,
}

impl ArraySweep {
    /// Sweep arrays of `element` with the given geometry.
    pub fn new(element: ArrayElement, config: ArraySweepConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        Ok(Self {
            name: format!("array_sweep/{}", element.name()),
            element,
            config,
        })
    }

    /// Element kind being swept.
    pub fn element(&self) -> ArrayElement {
        self.element
    }

    /// Sweep geometry.
    pub fn config(&self) -> &ArraySweepConfig {
        &self.config
    }

    /// Allocations a full run performs.
    pub fn expected_allocations(&self) -> u64 {
        self.config.sweep.allocations_per_sweep() * self.config.tiers() as u64
    }

    /// Collection requests a full run issues, one per length tier.
    pub fn expected_collections(&self) -> u64 {
        self.config.tiers() as u64
    }
}

impl Benchmark for ArraySweep {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> String {
        format!(
            "allocate short-lived `{}` arrays of length 1..={}, collecting after each length",
            self.element, self.config.max_len
        )
    }

    fn run(&mut self, heap: &mut dyn MemoryManager) -> Result<(), HarnessError> {
        for len in self.config.array_lengths() {
            let request = AllocRequest::Array {
                element: self.element,
                len,
            };
            sweep(heap, request, &self.config.sweep)?;
            debug!(element = %self.element, len, "array tier complete");
            heap.request_collection();
        }
        Ok(())
    }
}
