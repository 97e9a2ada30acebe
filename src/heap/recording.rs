//! Accounting-only backend that fingerprints the operation stream

use std::collections::HashMap;

use super::{Allocation, HeapStats, MemoryManager};
use crate::shape::AllocRequest;
use crate::HarnessError;

/// One operation issued across the memory-manager boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapOp {
    /// `allocate(request)`
    Allocate(AllocRequest),
    /// `request_collection()`
    Collect,
}

impl HeapOp {
    fn encode(&self) -> [u8; 11] {
        let mut out = [0u8; 11];
        match self {
            HeapOp::Allocate(request) => {
                out[0] = b'A';
                out[1..].copy_from_slice(&request.encode());
            }
            HeapOp::Collect => out[0] = b'C',
        }
        out
    }
}

/// Records what a workload asks for without allocating anything.
///
/// Consecutive identical operations are run-length folded before they
/// enter the blake3 hasher, so the fingerprint of a sweep is cheap to
/// compute while still covering every operation in order.
#[derive(Debug, Default)]
pub struct RecordingHeap {
    stats: HeapStats,
    per_request: HashMap<AllocRequest, u64>,
    hasher: blake3::Hasher,
    pending: Option<(HeapOp, u64)>,
}

impl RecordingHeap {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful allocations of exactly `request`.
    pub fn count(&self, request: &AllocRequest) -> u64 {
        self.per_request.get(request).copied().unwrap_or(0)
    }

    /// Number of distinct requests seen.
    pub fn distinct_requests(&self) -> usize {
        self.per_request.len()
    }

    /// Hash of the full operation sequence seen so far.
    pub fn fingerprint(&self) -> blake3::Hash {
        let mut hasher = self.hasher.clone();
        if let Some((op, count)) = self.pending {
            fold(&mut hasher, op, count);
        }
        hasher.finalize()
    }

    fn push(&mut self, op: HeapOp) {
        if let Some((last, count)) = &mut self.pending {
            if *last == op {
                *count += 1;
                return;
            }
        }
        if let Some((last, count)) = self.pending.take() {
            fold(&mut self.hasher, last, count);
        }
        self.pending = Some((op, 1));
    }
}

fn fold(hasher: &mut blake3::Hasher, op: HeapOp, count: u64) {
    hasher.update(&op.encode());
    hasher.update(&count.to_le_bytes());
}

impl MemoryManager for RecordingHeap {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn allocate(&mut self, request: AllocRequest) -> Result<Allocation, HarnessError> {
        self.push(HeapOp::Allocate(request));
        self.stats.record_allocation(&request);
        *self.per_request.entry(request).or_insert(0) += 1;
        Ok(Allocation::detached(request))
    }

    fn request_collection(&mut self) {
        self.push(HeapOp::Collect);
        self.stats.record_collection();
    }

    fn stats(&self) -> HeapStats {
        self.stats
    }
}
