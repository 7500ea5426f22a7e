//! Construction and initialization logic for BPlusIndex and its nodes.
//!
//! Covers degree validation, arena setup and the `Default` implementations.

use tracing::debug;

use crate::arena::Arena;
use crate::error::InitResult;
use crate::types::{
    BPlusIndex, BranchNode, LeafNode, NodeRef, DEFAULT_DEGREE, NULL_NODE,
};

impl<K> BPlusIndex<K> {
    /// Create an empty index with minimum degree `degree`.
    ///
    /// Every non-root node will hold between `degree - 1` and `2 * degree - 1`
    /// keys.
    ///
    /// # Errors
    ///
    /// Returns `IndexError::InvalidDegree` if `degree < 2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::BPlusIndex;
    ///
    /// let index = BPlusIndex::<i32>::new(3).unwrap();
    /// assert!(index.is_empty());
    /// assert!(BPlusIndex::<i32>::new(1).is_err());
    /// ```
    pub fn new(degree: usize) -> InitResult<Self> {
        validation::validate_degree(degree)?;

        let mut leaf_arena = Arena::new();
        let root_id = leaf_arena.allocate(LeafNode::new(degree));
        debug!(degree, "created index");

        Ok(Self {
            degree,
            root: NodeRef::Leaf(root_id),
            len: 0,
            leaf_arena,
            branch_arena: Arena::new(),
        })
    }

    /// Create an index with `DEFAULT_DEGREE`.
    pub fn with_default_degree() -> InitResult<Self> {
        Self::new(DEFAULT_DEGREE)
    }

    /// The minimum degree this index was built with.
    pub fn degree(&self) -> usize {
        self.degree
    }
}

impl<K: Ord + Clone> BPlusIndex<K> {
    /// Build an index from an iterator of keys. Duplicates are dropped.
    ///
    /// ```
    /// use bplus_index::BPlusIndex;
    ///
    /// let index = BPlusIndex::from_keys(2, [3, 1, 2, 3]).unwrap();
    /// assert_eq!(index.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// ```
    pub fn from_keys<I>(degree: usize, keys: I) -> InitResult<Self>
    where
        I: IntoIterator<Item = K>,
    {
        let mut index = Self::new(degree)?;
        index.extend(keys);
        Ok(index)
    }
}

impl<K> LeafNode<K> {
    /// Creates an empty leaf for a tree of minimum degree `degree`.
    pub fn new(degree: usize) -> Self {
        Self {
            degree,
            keys: Vec::with_capacity(2 * degree - 1),
            next: NULL_NODE,
        }
    }
}

impl<K> BranchNode<K> {
    /// Creates an empty branch for a tree of minimum degree `degree`.
    pub fn new(degree: usize) -> Self {
        // Children may transiently reach 2t while a split is wired in.
        Self {
            degree,
            keys: Vec::with_capacity(2 * degree - 1),
            children: Vec::with_capacity(2 * degree),
        }
    }
}

// Default implementations
impl<K> Default for BPlusIndex<K> {
    /// Create an index with `DEFAULT_DEGREE`.
    fn default() -> Self {
        let mut leaf_arena = Arena::new();
        let root_id = leaf_arena.allocate(LeafNode::new(DEFAULT_DEGREE));
        Self {
            degree: DEFAULT_DEGREE,
            root: NodeRef::Leaf(root_id),
            len: 0,
            leaf_arena,
            branch_arena: Arena::new(),
        }
    }
}

impl<K> Default for LeafNode<K> {
    fn default() -> Self {
        Self {
            degree: DEFAULT_DEGREE,
            keys: Vec::new(),
            next: NULL_NODE,
        }
    }
}

impl<K> Default for BranchNode<K> {
    fn default() -> Self {
        Self {
            degree: DEFAULT_DEGREE,
            keys: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Validation utilities for construction
pub mod validation {
    use crate::error::{IndexError, IndexResult};
    use crate::types::MIN_DEGREE;

    /// Validate that `degree` can parameterise a B+ tree.
    pub fn validate_degree(degree: usize) -> IndexResult<()> {
        if degree < MIN_DEGREE {
            Err(IndexError::invalid_degree(degree, MIN_DEGREE))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IndexError;
    use crate::types::MIN_DEGREE;

    #[test]
    fn test_index_construction() {
        let index = BPlusIndex::<i32>::new(4).unwrap();
        assert_eq!(index.degree(), 4);
        assert!(index.root.is_leaf());
        assert_eq!(index.leaf_arena.allocated_count(), 1);
        assert_eq!(index.branch_arena.allocated_count(), 0);
    }

    #[test]
    fn test_index_invalid_degree() {
        assert_eq!(
            BPlusIndex::<i32>::new(1).unwrap_err(),
            IndexError::InvalidDegree { degree: 1, min: MIN_DEGREE }
        );
        assert!(BPlusIndex::<i32>::new(0).unwrap_err().is_configuration_error());
        assert!(BPlusIndex::<i32>::new(MIN_DEGREE).is_ok());
    }

    #[test]
    fn test_index_default() {
        let index = BPlusIndex::<i32>::default();
        assert_eq!(index.degree(), DEFAULT_DEGREE);
        assert_eq!(
            BPlusIndex::<i32>::with_default_degree().unwrap().degree(),
            DEFAULT_DEGREE
        );
    }

    #[test]
    fn test_leaf_construction() {
        let leaf = LeafNode::<i32>::new(3);
        assert_eq!(leaf.degree, 3);
        assert!(leaf.keys.is_empty());
        assert_eq!(leaf.next, NULL_NODE);
    }

    #[test]
    fn test_branch_construction() {
        let branch = BranchNode::<i32>::new(3);
        assert_eq!(branch.degree, 3);
        assert!(branch.keys.is_empty());
        assert!(branch.children.is_empty());
    }

    #[test]
    fn test_from_keys_drops_duplicates() {
        let index = BPlusIndex::from_keys(2, vec![5, 1, 5, 3, 1]).unwrap();
        assert_eq!(index.len(), 3);
        assert!(index.check_invariants().is_ok());
    }

    #[test]
    fn test_validation() {
        assert!(validation::validate_degree(2).is_ok());
        assert!(validation::validate_degree(16).is_ok());
        assert!(validation::validate_degree(1).is_err());
    }
}
