use std::fmt;

use crate::heap::MemoryManager;
use crate::HarnessError;

/// A workload the runner can execute.
///
/// `run` takes no inputs beyond the memory manager and produces no result:
/// its only effects are allocation volume and collection requests. An
/// error is a fatal allocation failure and ends the whole run.
pub trait Benchmark: fmt::Debug {
    /// Unique name, e.g. `alloc_sweep/four_ints`.
    fn name(&self) -> &str;

    /// Human-readable description.
    fn description(&self) -> String;

    /// Run to completion.
    fn run(&mut self, heap: &mut dyn MemoryManager) -> Result<(), HarnessError>;
}

/// Metadata describing a registered benchmark.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkInfo {
    /// Position in run order
    pub index: usize,
    /// Benchmark name
    pub name: String,
    /// Benchmark description
    pub description: String,
}

impl fmt::Display for BenchmarkInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>3}  {:<34} {}", self.index, self.name, self.description)
    }
}
