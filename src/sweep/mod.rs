//! Short-lived allocation sweeps
//!
//! A sweep allocates `objects_count` values per step, for `size` steps,
//! doubling `size` from `init_size` until it reaches `max_size`. Every
//! handle is dropped as soon as it is returned.

mod arrays;
mod objects;

pub use arrays::ArraySweep;
pub use objects::AllocationSweep;

use std::hint::black_box;

use tracing::trace;

use crate::heap::MemoryManager;
use crate::shape::AllocRequest;
use crate::HarnessError;

/// Geometry of one size/step/object sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SweepConfig {
    /// First batch size
    pub init_size: usize,
    /// Batch sizes stop strictly below this bound
    pub max_size: usize,
    /// Allocations per step
    pub objects_count: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            init_size: 10_000,
            max_size: 100_000,
            objects_count: 16,
        }
    }
}

impl SweepConfig {
    /// Construct and validate.
    pub fn new(
        init_size: usize,
        max_size: usize,
        objects_count: usize,
    ) -> Result<Self, HarnessError> {
        let config = Self {
            init_size,
            max_size,
            objects_count,
        };
        config.validate()?;
        Ok(config)
    }

    /// Reject geometries that would loop forever or do nothing.
    pub fn validate(&self) -> Result<(), HarnessError> {
        if self.init_size == 0 {
            return Err(HarnessError::InvalidConfiguration(
                "sweep init_size must be > 0".to_string(),
            ));
        }
        if self.init_size >= self.max_size {
            return Err(HarnessError::InvalidConfiguration(format!(
                "sweep init_size {} must be < max_size {}",
                self.init_size, self.max_size
            )));
        }
        if self.objects_count == 0 {
            return Err(HarnessError::InvalidConfiguration(
                "sweep objects_count must be > 0".to_string(),
            ));
        }
        Ok(())
    }

    /// The doubling sequence of batch sizes: 10000, 20000, 40000, 80000 by default.
    pub fn batch_sizes(&self) -> impl Iterator<Item = usize> {
        let max = self.max_size;
        std::iter::successors(Some(self.init_size), |size| size.checked_mul(2))
            .take_while(move |&size| size < max)
    }

    /// Allocations one sweep performs.
    pub fn allocations_per_sweep(&self) -> u64 {
        let steps: u64 = self.batch_sizes().map(|size| size as u64).sum();
        steps * self.objects_count as u64
    }
}

/// Array sweep: a full [`SweepConfig`] sweep per array length tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ArraySweepConfig {
    /// Inner sweep geometry
    pub sweep: SweepConfig,
    /// Largest array length; lengths double from 1 up to and including it
    pub max_len: usize,
}

impl Default for ArraySweepConfig {
    fn default() -> Self {
        Self {
            sweep: SweepConfig::default(),
            max_len: 128,
        }
    }
}

impl ArraySweepConfig {
    /// Validate the inner sweep and the length bound.
    pub fn validate(&self) -> Result<(), HarnessError> {
        self.sweep.validate()?;
        if self.max_len == 0 {
            return Err(HarnessError::InvalidConfiguration(
                "array sweep max_len must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Array lengths swept: 1, 2, 4, ... up to `max_len`.
    pub fn array_lengths(&self) -> impl Iterator<Item = usize> {
        let max = self.max_len;
        std::iter::successors(Some(1usize), |len| len.checked_mul(2))
            .take_while(move |&len| len <= max)
    }

    /// Number of length tiers, and so of collection requests.
    pub fn tiers(&self) -> usize {
        self.array_lengths().count()
    }
}

/// Size/step/object loops for one request, without the collection request.
pub(crate) fn sweep(
    heap: &mut dyn MemoryManager,
    request: AllocRequest,
    config: &SweepConfig,
) -> Result<(), HarnessError> {
    for size in config.batch_sizes() {
        trace!(%request, size, "sweep batch");
        for _ in 0..size {
            for _ in 0..config.objects_count {
                drop(black_box(heap.allocate(request)?));
            }
        }
    }
    Ok(())
}
