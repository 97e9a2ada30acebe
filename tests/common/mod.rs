#![allow(dead_code)]

use gcstress::{ArraySweepConfig, HarnessConfig, SweepConfig, TreeConfig};

/// Scaled-down configuration that keeps the reference shape of every
/// engine while finishing quickly in debug builds.
pub fn small_config() -> HarnessConfig {
    HarnessConfig::default()
        .with_sweep(SweepConfig::new(10, 100, 2).expect("valid sweep"))
        .with_arrays(ArraySweepConfig {
            sweep: SweepConfig::new(1, 8, 1).expect("valid sweep"),
            max_len: 128,
        })
        .with_tree(TreeConfig {
            stretch_depth: 10,
            long_lived_depth: 8,
            array_size: 4000,
            min_depth: 4,
            max_depth: 8,
            ..TreeConfig::default()
        })
}
