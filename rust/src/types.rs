//! Core types and data structures for BPlusIndex.
//!
//! This module contains the fundamental data structures, type definitions,
//! and constants used throughout the B+ tree index implementation.

use crate::arena::Arena;

// ============================================================================
// CONSTANTS
// ============================================================================

/// Smallest minimum degree a tree can be built with.
pub const MIN_DEGREE: usize = 2;

/// Minimum degree used by `BPlusIndex::default()`.
pub const DEFAULT_DEGREE: usize = 8;

// ============================================================================
// TYPE DEFINITIONS
// ============================================================================

/// Node ID type for arena-based allocation
pub type NodeId = u32;

/// Terminates the leaf chain.
pub const NULL_NODE: NodeId = u32::MAX;

// ============================================================================
// CORE DATA STRUCTURES
// ============================================================================

/// In-memory B+ tree index over a single ordered key type.
///
/// Keys live in the leaves; branch nodes only hold separator copies used for
/// routing. Leaves are chained left to right, so ordered scans walk the chain
/// instead of re-descending the tree for every key.
///
/// The tree is parameterised by its minimum degree `t`: every node other than
/// the root holds between `t - 1` and `2t - 1` keys.
///
/// # Examples
///
/// ```
/// use bplus_index::BPlusIndex;
///
/// let mut index = BPlusIndex::new(2).unwrap();
/// for key in [10, 20, 5, 6, 12, 30, 7, 17] {
///     index.insert(key);
/// }
///
/// assert!(index.search(&12).is_some());
/// assert_eq!(index.range_query(&6, &17), vec![6, 7, 10, 12, 17]);
///
/// index.delete(&6);
/// assert_eq!(index.range_query(&6, &17), vec![7, 10, 12, 17]);
/// ```
///
/// # Performance Characteristics
///
/// - **Insertion**: O(t log n)
/// - **Lookup**: O(log n)
/// - **Deletion**: O(t log n)
/// - **Range queries**: O(log n + m) where m is the number of keys returned
#[derive(Debug, Clone)]
pub struct BPlusIndex<K> {
    /// Minimum degree `t`, fixed at construction.
    pub(crate) degree: usize,
    /// The root node of the tree.
    pub(crate) root: NodeRef,
    /// Number of keys currently stored.
    pub(crate) len: usize,
    /// Arena storage for leaf nodes.
    pub(crate) leaf_arena: Arena<LeafNode<K>>,
    /// Arena storage for branch nodes.
    pub(crate) branch_arena: Arena<BranchNode<K>>,
}

/// Leaf node holding the indexed keys.
#[derive(Debug, Clone)]
pub struct LeafNode<K> {
    /// Minimum degree of the owning tree.
    pub(crate) degree: usize,
    /// Sorted list of keys.
    pub(crate) keys: Vec<K>,
    /// Next leaf in ascending key order, or `NULL_NODE`.
    pub(crate) next: NodeId,
}

/// Internal (branch) node containing separator keys and child handles.
#[derive(Debug, Clone)]
pub struct BranchNode<K> {
    /// Minimum degree of the owning tree.
    pub(crate) degree: usize,
    /// Sorted list of separator keys.
    pub(crate) keys: Vec<K>,
    /// Child handles, always one more than `keys`.
    pub(crate) children: Vec<NodeRef>,
}

// ============================================================================
// HANDLES AND RESULT TYPES
// ============================================================================

/// Owning handle to a node in one of the two arenas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeRef {
    Leaf(NodeId),
    Branch(NodeId),
}

impl NodeRef {
    /// Return the raw node ID.
    pub fn id(&self) -> NodeId {
        match *self {
            NodeRef::Leaf(id) => id,
            NodeRef::Branch(id) => id,
        }
    }

    /// Returns true if this reference points to a leaf node.
    pub fn is_leaf(&self) -> bool {
        matches!(self, NodeRef::Leaf(_))
    }
}

/// Position of a key found by `BPlusIndex::search`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Leaf holding the key.
    pub leaf: NodeId,
    /// Offset of the key inside that leaf.
    pub offset: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_ref_accessors() {
        let leaf = NodeRef::Leaf(3);
        let branch = NodeRef::Branch(7);
        assert!(leaf.is_leaf());
        assert!(!branch.is_leaf());
        assert_eq!(leaf.id(), 3);
        assert_eq!(branch.id(), 7);
    }
}
