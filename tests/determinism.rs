use std::collections::HashSet;

use gcstress::heap::MemoryManager;
use gcstress::{BenchmarkRegistry, BenchmarkRunner, HarnessConfig, RecordingHeap};

mod common;

fn fingerprint(config: &HarnessConfig) -> ([u8; 32], u64) {
    let registry = BenchmarkRegistry::standard(config).expect("registry builds");
    let mut runner = BenchmarkRunner::new(registry, RecordingHeap::new());
    runner.run_all().expect("recording heap never fails");
    let heap = runner.into_heap();
    (*heap.fingerprint().as_bytes(), heap.stats().allocations)
}

#[test]
fn full_registry_issues_identical_operations_each_run() {
    let config = common::small_config();
    let mut fingerprints = HashSet::new();
    let mut totals = HashSet::new();
    for _ in 0..3 {
        let (hash, allocations) = fingerprint(&config);
        fingerprints.insert(hash);
        totals.insert(allocations);
    }

    assert_eq!(fingerprints.len(), 1, "operation streams diverged across runs");
    assert_eq!(totals.len(), 1);
}

#[test]
fn different_geometry_changes_fingerprint() {
    let base = common::small_config();
    let mut wider = base.clone();
    wider.arrays.max_len = 64;

    assert_ne!(fingerprint(&base).0, fingerprint(&wider).0);
}

#[test]
fn tree_workload_is_part_of_fingerprint() {
    let base = common::small_config();
    let mut deeper = base.clone();
    deeper.tree.stretch_depth += 2;
    let mut longer = base.clone();
    longer.tree.array_size *= 2;

    let (base_hash, base_total) = fingerprint(&base);
    let (deeper_hash, deeper_total) = fingerprint(&deeper);
    assert_ne!(base_hash, deeper_hash);
    assert_eq!(
        deeper_total - base_total,
        (gcstress::tree::tree_size(12) - gcstress::tree::tree_size(10)) as u64
    );
    assert_ne!(base_hash, fingerprint(&longer).0);
}
