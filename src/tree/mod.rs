//! Binary-tree construction and retention benchmark
//!
//! Builds a large transient tree, then keeps a long-lived tree and a
//! long-lived array of doubles alive for the rest of the run, so collector
//! work is measured against a non-trivial retained set.

mod bench;
mod node;

pub use bench::{
    ConstructionTiming, LongLived, SanityCheck, TreeBenchmark, TreeConfig, TreeReport,
    SANITY_INDEX,
};
pub use node::{heap_leaf, make_tree, make_tree_with, populate, populate_with, TreeNode};

/// Nodes in a complete tree of the given depth: `2^(depth+1) - 1`.
///
/// Exact up to `depth == usize::BITS - 1`; saturates at `usize::MAX` above.
#[inline]
pub fn tree_size(depth: u32) -> usize {
    match 1usize.checked_shl(depth.saturating_add(1)) {
        Some(pow) => pow - 1,
        None => usize::MAX,
    }
}

/// Trees of `depth` to build so that each timed cycle allocates about twice
/// the nodes of the stretch tree (integer division).
#[inline]
pub fn num_iters(stretch_depth: u32, depth: u32) -> usize {
    tree_size(stretch_depth).saturating_mul(2) / tree_size(depth)
}
