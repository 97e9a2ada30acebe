//! Stretch, retain, and (optionally) time tree construction

use std::hint::black_box;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::{heap_leaf, make_tree_with, num_iters, populate_with, tree_size, TreeNode};
use crate::heap::MemoryManager;
use crate::shape::{AllocRequest, ArrayElement};
use crate::runner::Benchmark;
use crate::HarnessError;

/// Index of the long-lived array inspected by the final sanity check.
pub const SANITY_INDEX: usize = 1000;

/// Tree benchmark parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeConfig {
    /// Depth of the transient stretch tree (about 16 MB at 18)
    pub stretch_depth: u32,
    /// Depth of the retained tree (about 4 MB at 16)
    pub long_lived_depth: u32,
    /// Length of the retained array of doubles (about 4 MB at 500000)
    pub array_size: usize,
    /// Smallest depth timed by the depth sweep
    pub min_depth: u32,
    /// Largest depth timed by the depth sweep
    pub max_depth: u32,
    /// Depth increment of the depth sweep
    pub depth_step: u32,
    /// Run the timed top-down vs bottom-up depth sweep
    pub timed_depth_sweep: bool,
    /// Request collections and log heap counters at phase boundaries
    pub diagnostics: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            stretch_depth: 18,
            long_lived_depth: 16,
            array_size: 500_000,
            min_depth: 4,
            max_depth: 16,
            depth_step: 2,
            timed_depth_sweep: false,
            diagnostics: false,
        }
    }
}

impl TreeConfig {
    /// Enable or disable the timed depth sweep.
    pub fn with_timed_depth_sweep(mut self, enabled: bool) -> Self {
        self.timed_depth_sweep = enabled;
        self
    }

    /// Enable or disable phase diagnostics.
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.diagnostics = enabled;
        self
    }

    /// Check depth bounds.
    pub fn validate(&self) -> Result<(), HarnessError> {
        let limit = usize::BITS - 2;
        for (what, depth) in [
            ("stretch_depth", self.stretch_depth),
            ("long_lived_depth", self.long_lived_depth),
            ("max_depth", self.max_depth),
        ] {
            if depth > limit {
                return Err(HarnessError::InvalidConfiguration(format!(
                    "{} {} exceeds {}",
                    what, depth, limit
                )));
            }
        }
        if self.depth_step == 0 {
            return Err(HarnessError::InvalidConfiguration(
                "depth_step must be > 0".to_string(),
            ));
        }
        if self.min_depth > self.max_depth {
            return Err(HarnessError::InvalidConfiguration(format!(
                "min_depth {} must be <= max_depth {}",
                self.min_depth, self.max_depth
            )));
        }
        Ok(())
    }

    /// Depths visited by the timed sweep: 4, 6, ..., 16 by default.
    pub fn timed_depths(&self) -> impl Iterator<Item = u32> {
        (self.min_depth..=self.max_depth).step_by(self.depth_step.max(1) as usize)
    }
}

/// Elapsed time for one depth of the timed sweep.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstructionTiming {
    /// Tree depth
    pub depth: u32,
    /// Trees built per strategy
    pub iterations: usize,
    /// Total time for `iterations` top-down builds
    pub top_down: Duration,
    /// Total time for `iterations` bottom-up builds
    pub bottom_up: Duration,
}

/// Outcome of the end-of-run check on the retained structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SanityCheck {
    /// Long-lived tree still present
    pub tree_present: bool,
    /// `array[SANITY_INDEX] == 1.0 / SANITY_INDEX`
    pub array_intact: bool,
}

impl SanityCheck {
    /// Inspect the retained set.
    pub fn inspect(retained: Option<&LongLived>) -> Self {
        match retained {
            None => Self {
                tree_present: false,
                array_intact: false,
            },
            Some(set) => Self {
                tree_present: true,
                array_intact: set.array.get(SANITY_INDEX).copied()
                    == Some(1.0 / SANITY_INDEX as f64),
            },
        }
    }

    /// Whether both conditions hold.
    pub fn passed(&self) -> bool {
        self.tree_present && self.array_intact
    }
}

/// Structures kept alive for the lifetime of the benchmark.
#[derive(Debug)]
pub struct LongLived {
    /// Top-down built tree of `long_lived_depth`
    pub tree: Box<TreeNode>,
    /// Array with `1.0 / k` at every `k` in `[1, len / 2)`
    pub array: Vec<f64>,
}

impl LongLived {
    /// Build the retained tree and array, charging both to `heap`.
    ///
    /// The array is one `double[array_size]` request; the tree is one
    /// [`AllocRequest::TreeNode`] request per node.
    pub fn build(
        heap: &mut dyn MemoryManager,
        tree_depth: u32,
        array_size: usize,
    ) -> Result<Self, HarnessError> {
        let mut tree = heap_leaf(heap)?;
        populate_with(tree_depth, &mut tree, &mut || heap_leaf(heap))?;

        let mut array = heap
            .allocate(AllocRequest::Array {
                element: ArrayElement::Double,
                len: array_size,
            })?
            .into_boxed::<Vec<f64>>()
            .map_or_else(|| vec![0.0; array_size], |array| *array);
        fill_reciprocals(&mut array);

        Ok(Self { tree, array })
    }
}

/// Write `1.0 / k` at every `k` in `[1, len / 2)`. Index 0 and the upper
/// half are left untouched.
pub(crate) fn fill_reciprocals(array: &mut [f64]) {
    let half = array.len() / 2;
    for (k, slot) in array.iter_mut().enumerate().take(half).skip(1) {
        *slot = 1.0 / k as f64;
    }
}

/// Summary of the last completed run.
#[derive(Debug, Clone)]
pub struct TreeReport {
    /// Depth sweep timings (empty when the sweep is disabled)
    pub timings: Vec<ConstructionTiming>,
    /// End-of-run check
    pub sanity: SanityCheck,
    /// Wall time of the whole run
    pub elapsed: Duration,
}

/// Stretch / long-lived / depth-sweep tree benchmark.
#[derive(Debug)]
pub struct TreeBenchmark {
    config: TreeConfig,
    retained: Option<LongLived>,
    last_report: Option<TreeReport>,
}

impl TreeBenchmark {
    /// Create with the given parameters.
    pub fn new(config: TreeConfig) -> Result<Self, HarnessError> {
        config.validate()?;
        Ok(Self {
            config,
            retained: None,
            last_report: None,
        })
    }

    /// Parameters.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Long-lived structures, present after a run.
    pub fn retained(&self) -> Option<&LongLived> {
        self.retained.as_ref()
    }

    /// Report of the last run.
    pub fn last_report(&self) -> Option<&TreeReport> {
        self.last_report.as_ref()
    }

    /// Build and discard `num_iters` trees of `depth` with each strategy.
    /// Every node is charged to `heap`.
    pub fn time_construction(
        &self,
        heap: &mut dyn MemoryManager,
        depth: u32,
    ) -> Result<ConstructionTiming, HarnessError> {
        let iterations = num_iters(self.config.stretch_depth, depth);
        debug!(iterations, depth, "creating trees");

        let start = Instant::now();
        for _ in 0..iterations {
            let mut temp = heap_leaf(heap)?;
            populate_with(depth, &mut temp, &mut || heap_leaf(heap))?;
            drop(black_box(temp));
        }
        let top_down = start.elapsed();
        debug!(depth, elapsed_ms = top_down.as_millis() as u64, "top down construction");

        let start = Instant::now();
        for _ in 0..iterations {
            drop(black_box(make_tree_with(depth, &mut || heap_leaf(heap))?));
        }
        let bottom_up = start.elapsed();
        debug!(depth, elapsed_ms = bottom_up.as_millis() as u64, "bottom up construction");

        Ok(ConstructionTiming {
            depth,
            iterations,
            top_down,
            bottom_up,
        })
    }

    fn diagnostics(&self, heap: &mut dyn MemoryManager, phase: &str) {
        if self.config.diagnostics {
            heap.request_collection();
            info!(phase, heap = heap.name(), stats = %heap.stats(), "heap diagnostics");
        }
    }
}

impl Benchmark for TreeBenchmark {
    fn name(&self) -> &str {
        "gc_bench"
    }

    fn description(&self) -> String {
        format!(
            "stretch with a depth-{} tree, retain a depth-{} tree and {} doubles{}",
            self.config.stretch_depth,
            self.config.long_lived_depth,
            self.config.array_size,
            if self.config.timed_depth_sweep {
                ", time construction by depth"
            } else {
                ""
            }
        )
    }

    fn run(&mut self, heap: &mut dyn MemoryManager) -> Result<(), HarnessError> {
        let config = self.config.clone();
        debug!(
            depth = config.stretch_depth,
            nodes = tree_size(config.stretch_depth),
            "stretching memory with a binary tree"
        );
        // Release the previous run's set before anything new is built.
        drop(self.retained.take());
        self.diagnostics(heap, "start");
        let start = Instant::now();

        let stretch = make_tree_with(config.stretch_depth, &mut || heap_leaf(heap))?;
        drop(black_box(stretch));

        debug!(
            depth = config.long_lived_depth,
            array_size = config.array_size,
            "creating long-lived binary tree and array"
        );
        self.retained = Some(LongLived::build(
            heap,
            config.long_lived_depth,
            config.array_size,
        )?);
        self.diagnostics(heap, "long-lived");

        let timings = if config.timed_depth_sweep {
            config
                .timed_depths()
                .map(|depth| self.time_construction(heap, depth))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            Vec::new()
        };
        for timing in &timings {
            info!(
                depth = timing.depth,
                iterations = timing.iterations,
                top_down_ms = timing.top_down.as_millis() as u64,
                bottom_up_ms = timing.bottom_up.as_millis() as u64,
                "construction timing"
            );
        }

        let sanity = SanityCheck::inspect(black_box(self.retained.as_ref()));
        if !sanity.passed() {
            if config.diagnostics {
                warn!(?sanity, "long-lived structures failed sanity check");
            } else {
                debug!(?sanity, "long-lived structures failed sanity check");
            }
        }

        let elapsed = start.elapsed();
        self.diagnostics(heap, "end");
        debug!(elapsed_ms = elapsed.as_millis() as u64, "tree benchmark completed");

        self.last_report = Some(TreeReport {
            timings,
            sanity,
            elapsed,
        });
        Ok(())
    }
}
