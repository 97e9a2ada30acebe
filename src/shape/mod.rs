//! Catalog of allocatable shapes
//!
//! A closed set of value shapes and array element kinds, plus the
//! descriptor handed to a memory manager for each allocation.

mod values;

pub use values::{
    side_effect_count, Composite, Derived, Empty, EmptyWithSideEffect, FourFloats, FourInts,
    FourLongs, Inline, OneInt, TwoInts,
};

use std::alloc::Layout;
use std::fmt;

/// Shape of a single short-lived value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ValueShape {
    /// No fields
    Empty,
    /// No fields, constructor has an observable side effect
    EmptyWithSideEffect,
    /// One `i32`
    OneInt,
    /// Two `i32`
    TwoInts,
    /// Four `i32`
    FourInts,
    /// Four `i64`
    FourLongs,
    /// Four `f32`
    FourFloats,
    /// Mixed-width aggregate
    Composite,
    /// Nested values laid out in place
    Inline,
    /// `FourInts` plus extra fields
    Derived,
}

impl ValueShape {
    /// Every shape, in declaration order.
    pub const ALL: [ValueShape; 10] = [
        ValueShape::Empty,
        ValueShape::EmptyWithSideEffect,
        ValueShape::OneInt,
        ValueShape::TwoInts,
        ValueShape::FourInts,
        ValueShape::FourLongs,
        ValueShape::FourFloats,
        ValueShape::Composite,
        ValueShape::Inline,
        ValueShape::Derived,
    ];

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            ValueShape::Empty => "empty",
            ValueShape::EmptyWithSideEffect => "empty_with_side_effect",
            ValueShape::OneInt => "one_int",
            ValueShape::TwoInts => "two_ints",
            ValueShape::FourInts => "four_ints",
            ValueShape::FourLongs => "four_longs",
            ValueShape::FourFloats => "four_floats",
            ValueShape::Composite => "composite",
            ValueShape::Inline => "inline",
            ValueShape::Derived => "derived",
        }
    }

    /// Layout of the backing Rust type.
    pub fn layout(self) -> Layout {
        match self {
            ValueShape::Empty => Layout::new::<Empty>(),
            ValueShape::EmptyWithSideEffect => Layout::new::<EmptyWithSideEffect>(),
            ValueShape::OneInt => Layout::new::<OneInt>(),
            ValueShape::TwoInts => Layout::new::<TwoInts>(),
            ValueShape::FourInts => Layout::new::<FourInts>(),
            ValueShape::FourLongs => Layout::new::<FourLongs>(),
            ValueShape::FourFloats => Layout::new::<FourFloats>(),
            ValueShape::Composite => Layout::new::<Composite>(),
            ValueShape::Inline => Layout::new::<Inline>(),
            ValueShape::Derived => Layout::new::<Derived>(),
        }
    }
}

impl fmt::Display for ValueShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Element kind of a swept array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ArrayElement {
    /// `i32`
    Int,
    /// `i64`
    Long,
    /// `f32`
    Float,
    /// `f64`
    Double,
    /// `u8`
    Byte,
    /// Nullable reference, `Option<Box<Empty>>`
    Reference,
}

impl ArrayElement {
    /// Every element kind, in declaration order.
    pub const ALL: [ArrayElement; 6] = [
        ArrayElement::Int,
        ArrayElement::Long,
        ArrayElement::Float,
        ArrayElement::Double,
        ArrayElement::Byte,
        ArrayElement::Reference,
    ];

    /// Stable snake_case name.
    pub fn name(self) -> &'static str {
        match self {
            ArrayElement::Int => "int",
            ArrayElement::Long => "long",
            ArrayElement::Float => "float",
            ArrayElement::Double => "double",
            ArrayElement::Byte => "byte",
            ArrayElement::Reference => "reference",
        }
    }

    /// Layout of one element.
    pub fn element_layout(self) -> Layout {
        match self {
            ArrayElement::Int => Layout::new::<i32>(),
            ArrayElement::Long => Layout::new::<i64>(),
            ArrayElement::Float => Layout::new::<f32>(),
            ArrayElement::Double => Layout::new::<f64>(),
            ArrayElement::Byte => Layout::new::<u8>(),
            ArrayElement::Reference => Layout::new::<Option<Box<Empty>>>(),
        }
    }
}

impl fmt::Display for ArrayElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Descriptor of one allocation, as seen by a memory manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AllocRequest {
    /// A single value of the given shape
    Value(ValueShape),
    /// An array of `len` default-initialised elements
    Array {
        /// Element kind
        element: ArrayElement,
        /// Number of elements
        len: usize,
    },
    /// One node of the tree benchmark
    TreeNode,
}

impl AllocRequest {
    /// Payload size in bytes (saturating for absurd array lengths).
    pub fn size_bytes(&self) -> usize {
        match *self {
            AllocRequest::Value(shape) => shape.layout().size(),
            AllocRequest::Array { element, len } => {
                element.element_layout().size().saturating_mul(len)
            }
            AllocRequest::TreeNode => Layout::new::<crate::tree::TreeNode>().size(),
        }
    }

    /// Compact byte encoding used for fingerprinting.
    pub(crate) fn encode(&self) -> [u8; 10] {
        let mut out = [0u8; 10];
        match *self {
            AllocRequest::Value(shape) => {
                out[0] = 0;
                out[1] = shape as u8;
            }
            AllocRequest::Array { element, len } => {
                out[0] = 1;
                out[1] = element as u8;
                out[2..].copy_from_slice(&(len as u64).to_le_bytes());
            }
            AllocRequest::TreeNode => out[0] = 2,
        }
        out
    }
}

impl fmt::Display for AllocRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocRequest::Value(shape) => write!(f, "{}", shape),
            AllocRequest::Array { element, len } => write!(f, "{}[{}]", element, len),
            AllocRequest::TreeNode => f.write_str("tree_node"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_names_unique() {
        let mut names: Vec<_> = ValueShape::ALL.iter().map(|s| s.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), ValueShape::ALL.len());
    }

    #[test]
    fn test_field_widths() {
        assert_eq!(ValueShape::Empty.layout().size(), 0);
        assert_eq!(ValueShape::OneInt.layout().size(), 4);
        assert_eq!(ValueShape::TwoInts.layout().size(), 8);
        assert_eq!(ValueShape::FourInts.layout().size(), 16);
        assert_eq!(ValueShape::FourLongs.layout().size(), 32);
        assert_eq!(ValueShape::FourFloats.layout().size(), 16);
    }

    #[test]
    fn test_array_request_size() {
        let request = AllocRequest::Array {
            element: ArrayElement::Double,
            len: 128,
        };
        assert_eq!(request.size_bytes(), 1024);
        assert_eq!(request.to_string(), "double[128]");
    }

    #[test]
    fn test_encoding_distinguishes_requests() {
        let a = AllocRequest::Array {
            element: ArrayElement::Int,
            len: 2,
        };
        let b = AllocRequest::Array {
            element: ArrayElement::Int,
            len: 4,
        };
        assert_ne!(a.encode(), b.encode());
        assert_ne!(
            AllocRequest::Value(ValueShape::Empty).encode(),
            AllocRequest::Value(ValueShape::EmptyWithSideEffect).encode()
        );
        assert_ne!(
            AllocRequest::TreeNode.encode(),
            AllocRequest::Value(ValueShape::Empty).encode()
        );
    }

    #[test]
    fn test_tree_node_request_carries_node_weight() {
        // Two child links plus two i32 payload fields.
        let links = 2 * std::mem::size_of::<Option<Box<crate::tree::TreeNode>>>();
        assert_eq!(AllocRequest::TreeNode.size_bytes(), links + 8);
        assert_eq!(AllocRequest::TreeNode.to_string(), "tree_node");
    }
}
