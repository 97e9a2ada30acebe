//! Backend that materialises real values on the process heap

use std::any::Any;
use std::collections::TryReserveError;

use tracing::trace;

use super::{Allocation, HeapStats, MemoryManager};
use crate::shape::{
    AllocRequest, ArrayElement, Composite, Derived, Empty, EmptyWithSideEffect, FourFloats,
    FourInts, FourLongs, Inline, OneInt, TwoInts, ValueShape,
};
use crate::tree::TreeNode;
use crate::HarnessError;

/// Allocates through the global allocator.
///
/// Rust frees values when their handle drops, so a collection request has
/// nothing to reclaim and is only counted. Zero-sized shapes produce a
/// handle without touching the allocator.
#[derive(Debug, Default)]
pub struct SystemHeap {
    stats: HeapStats,
}

impl SystemHeap {
    /// Create a backend with zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryManager for SystemHeap {
    fn name(&self) -> &'static str {
        "system"
    }

    fn allocate(&mut self, request: AllocRequest) -> Result<Allocation, HarnessError> {
        let storage: Box<dyn Any> = match request {
            AllocRequest::Value(shape) => value(shape),
            AllocRequest::Array { element, len } => {
                array(element, len).map_err(|_| HarnessError::AllocationFailed {
                    request,
                    bytes: request.size_bytes(),
                })?
            }
            AllocRequest::TreeNode => Box::<TreeNode>::default(),
        };
        self.stats.record_allocation(&request);
        Ok(Allocation::backed(request, storage))
    }

    fn request_collection(&mut self) {
        trace!("collection requested on system heap (no-op)");
        self.stats.record_collection();
    }

    fn stats(&self) -> HeapStats {
        self.stats
    }
}

fn value(shape: ValueShape) -> Box<dyn Any> {
    match shape {
        ValueShape::Empty => Box::new(Empty),
        ValueShape::EmptyWithSideEffect => Box::new(EmptyWithSideEffect::new()),
        ValueShape::OneInt => Box::<OneInt>::default(),
        ValueShape::TwoInts => Box::<TwoInts>::default(),
        ValueShape::FourInts => Box::<FourInts>::default(),
        ValueShape::FourLongs => Box::<FourLongs>::default(),
        ValueShape::FourFloats => Box::<FourFloats>::default(),
        ValueShape::Composite => Box::<Composite>::default(),
        ValueShape::Inline => Box::<Inline>::default(),
        ValueShape::Derived => Box::<Derived>::default(),
    }
}

fn array(element: ArrayElement, len: usize) -> Result<Box<dyn Any>, TryReserveError> {
    let storage: Box<dyn Any> = match element {
        ArrayElement::Int => Box::new(zeroed::<i32>(len)?),
        ArrayElement::Long => Box::new(zeroed::<i64>(len)?),
        ArrayElement::Float => Box::new(zeroed::<f32>(len)?),
        ArrayElement::Double => Box::new(zeroed::<f64>(len)?),
        ArrayElement::Byte => Box::new(zeroed::<u8>(len)?),
        ArrayElement::Reference => Box::new(zeroed::<Option<Box<Empty>>>(len)?),
    };
    Ok(storage)
}

/// Vector of `len` default values, failing instead of aborting when the
/// allocator cannot satisfy the request.
fn zeroed<T: Default>(len: usize) -> Result<Vec<T>, TryReserveError> {
    let mut items = Vec::new();
    items.try_reserve_exact(len)?;
    items.resize_with(len, T::default);
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_is_backed_by_concrete_type() {
        let mut heap = SystemHeap::new();
        let handle = heap
            .allocate(AllocRequest::Value(ValueShape::FourLongs))
            .unwrap();
        assert_eq!(handle.downcast_ref::<FourLongs>(), Some(&FourLongs::default()));
        assert_eq!(heap.stats().allocations, 1);
        assert_eq!(heap.stats().bytes_requested, 32);
    }

    #[test]
    fn test_reference_array_defaults_to_none() {
        let mut heap = SystemHeap::new();
        let handle = heap
            .allocate(AllocRequest::Array {
                element: ArrayElement::Reference,
                len: 8,
            })
            .unwrap();
        let items = handle.downcast_ref::<Vec<Option<Box<Empty>>>>().unwrap();
        assert_eq!(items.len(), 8);
        assert!(items.iter().all(Option::is_none));
    }

    #[test]
    fn test_unsatisfiable_array_fails() {
        let mut heap = SystemHeap::new();
        let request = AllocRequest::Array {
            element: ArrayElement::Long,
            len: usize::MAX / 2,
        };
        let err = heap.allocate(request).unwrap_err();
        assert!(matches!(err, HarnessError::AllocationFailed { .. }));
        assert_eq!(heap.stats().allocations, 0);
    }

    #[test]
    fn test_tree_node_storage_can_be_taken() {
        let mut heap = SystemHeap::new();
        let handle = heap.allocate(AllocRequest::TreeNode).unwrap();
        let node = handle.into_boxed::<TreeNode>().expect("system heap backs nodes");
        assert!(node.is_leaf());
        assert_eq!(
            heap.stats().bytes_requested,
            AllocRequest::TreeNode.size_bytes() as u64
        );
    }

    #[test]
    fn test_collection_is_counted() {
        let mut heap = SystemHeap::new();
        heap.request_collection();
        heap.request_collection();
        assert_eq!(heap.stats().collections, 2);
    }
}
