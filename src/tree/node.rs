//! Binary tree node and the two construction strategies
//!
//! A tree of depth `d` has `2^(d+1) - 1` nodes whichever way it is built:
//! - [`populate`] grows an existing root top-down, mutating it in place
//! - [`make_tree`] builds children first and composes them bottom-up
//!
//! The `_with` variants take the node source as a closure so the benchmark
//! can charge every node to a [`MemoryManager`].

use std::convert::Infallible;

use crate::heap::MemoryManager;
use crate::shape::AllocRequest;
use crate::HarnessError;

/// Tree node: two owning child links and two payload fields.
///
/// `i` and `j` are never read; they give each node the intended field
/// weight.
#[derive(Debug, Default, PartialEq)]
pub struct TreeNode {
    /// Left subtree
    pub left: Option<Box<TreeNode>>,
    /// Right subtree
    pub right: Option<Box<TreeNode>>,
    /// Payload
    pub i: i32,
    /// Payload
    pub j: i32,
}

impl TreeNode {
    /// Leaf node.
    pub fn new() -> Self {
        Self::default()
    }

    /// Interior node owning both subtrees.
    pub fn with_children(left: Box<TreeNode>, right: Box<TreeNode>) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
            i: 0,
            j: 0,
        }
    }

    /// Check if leaf (no children)
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Nodes in this subtree, including `self`.
    pub fn node_count(&self) -> usize {
        1 + self.left.as_ref().map_or(0, |n| n.node_count())
            + self.right.as_ref().map_or(0, |n| n.node_count())
    }

    /// Edges on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        let left = self.left.as_ref().map_or(0, |n| n.height() + 1);
        let right = self.right.as_ref().map_or(0, |n| n.height() + 1);
        left.max(right)
    }

    /// Edges on the shortest root-to-leaf path.
    ///
    /// Equal to [`height`](Self::height) exactly when every leaf sits at the
    /// same depth.
    pub fn min_leaf_depth(&self) -> usize {
        match (&self.left, &self.right) {
            (None, None) => 0,
            (Some(l), None) => l.min_leaf_depth() + 1,
            (None, Some(r)) => r.min_leaf_depth() + 1,
            (Some(l), Some(r)) => l.min_leaf_depth().min(r.min_leaf_depth()) + 1,
        }
    }
}

/// Grow `node` top-down into a complete tree of the given depth.
///
/// Children are freshly allocated leaves attached before recursing, so the
/// older parent is written with pointers to younger objects.
pub fn populate(depth: u32, node: &mut TreeNode) {
    populate_with(depth, node, &mut fresh_leaf).unwrap_or_else(|never| match never {})
}

/// Build a complete tree of the given depth bottom-up.
pub fn make_tree(depth: u32) -> Box<TreeNode> {
    make_tree_with(depth, &mut fresh_leaf).unwrap_or_else(|never| match never {})
}

/// [`populate`] drawing every new node from `alloc`.
///
/// Stops at the first failed allocation; the partial tree stays attached.
pub fn populate_with<E, F>(depth: u32, node: &mut TreeNode, alloc: &mut F) -> Result<(), E>
where
    F: FnMut() -> Result<Box<TreeNode>, E>,
{
    if depth == 0 {
        return Ok(());
    }
    let depth = depth - 1;
    node.left = Some(alloc()?);
    node.right = Some(alloc()?);
    if let Some(left) = node.left.as_deref_mut() {
        populate_with(depth, left, alloc)?;
    }
    if let Some(right) = node.right.as_deref_mut() {
        populate_with(depth, right, alloc)?;
    }
    Ok(())
}

/// [`make_tree`] drawing every node from `alloc`.
///
/// Both subtrees are built before their parent is allocated.
pub fn make_tree_with<E, F>(depth: u32, alloc: &mut F) -> Result<Box<TreeNode>, E>
where
    F: FnMut() -> Result<Box<TreeNode>, E>,
{
    if depth == 0 {
        return alloc();
    }
    let left = make_tree_with(depth - 1, alloc)?;
    let right = make_tree_with(depth - 1, alloc)?;
    let mut node = alloc()?;
    node.left = Some(left);
    node.right = Some(right);
    Ok(node)
}

/// One leaf charged to `heap` as [`AllocRequest::TreeNode`].
///
/// Uses the backend's storage when it hands back a `TreeNode`, otherwise
/// a native box (accounting-only backends).
pub fn heap_leaf(heap: &mut dyn MemoryManager) -> Result<Box<TreeNode>, HarnessError> {
    let handle = heap.allocate(AllocRequest::TreeNode)?;
    Ok(handle.into_boxed::<TreeNode>().unwrap_or_default())
}

fn fresh_leaf() -> Result<Box<TreeNode>, Infallible> {
    Ok(Box::new(TreeNode::new()))
}
