//! Benchmark registry and sequential runner

mod api;
mod registry;

pub use api::{Benchmark, BenchmarkInfo};
pub use registry::BenchmarkRegistry;

use std::time::{Duration, Instant};

use tracing::{info, info_span};

use crate::heap::{HeapStats, MemoryManager};
use crate::HarnessError;

/// Wall time and heap counters for one completed benchmark.
#[derive(Debug, Clone)]
pub struct RunRecord {
    /// Benchmark name
    pub name: String,
    /// Wall time
    pub elapsed: Duration,
    /// Heap counters accumulated while it ran
    pub heap: HeapStats,
}

/// Runs every registered benchmark once, in order, on one memory manager.
///
/// No retries and no parallelism. The first error stops the run.
#[derive(Debug)]
pub struct BenchmarkRunner<M> {
    registry: BenchmarkRegistry,
    heap: M,
}

impl<M: MemoryManager> BenchmarkRunner<M> {
    /// Bind a registry to the backend it will run against.
    pub fn new(registry: BenchmarkRegistry, heap: M) -> Self {
        Self { registry, heap }
    }

    /// Registered benchmarks.
    pub fn registry(&self) -> &BenchmarkRegistry {
        &self.registry
    }

    /// The backend.
    pub fn heap(&self) -> &M {
        &self.heap
    }

    /// Execute the registry.
    pub fn run_all(&mut self) -> Result<Vec<RunRecord>, HarnessError> {
        let total = self.registry.len();
        info!(benchmarks = total, heap = self.heap.name(), "starting run");
        let mut records = Vec::with_capacity(total);

        for benchmark in self.registry.iter_mut() {
            let span = info_span!("benchmark", name = benchmark.name());
            let _enter = span.enter();

            let before = self.heap.stats();
            let start = Instant::now();
            benchmark.run(&mut self.heap)?;
            let elapsed = start.elapsed();
            let heap = delta(before, self.heap.stats());

            info!(
                elapsed_ms = elapsed.as_millis() as u64,
                allocations = heap.allocations,
                collections = heap.collections,
                "benchmark complete"
            );
            records.push(RunRecord {
                name: benchmark.name().to_string(),
                elapsed,
                heap,
            });
        }

        info!(stats = %self.heap.stats(), "run complete");
        Ok(records)
    }

    /// Release the registry (and anything it retains) and return the backend.
    pub fn into_heap(self) -> M {
        self.heap
    }
}

fn delta(before: HeapStats, after: HeapStats) -> HeapStats {
    HeapStats {
        allocations: after.allocations - before.allocations,
        bytes_requested: after.bytes_requested - before.bytes_requested,
        collections: after.collections - before.collections,
    }
}
