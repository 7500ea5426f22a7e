//! GET operations for BPlusIndex.
//!
//! Point lookups plus the arena accessors the other modules build on.

use crate::error::{IndexError, IndexResult};
use crate::types::{BPlusIndex, BranchNode, LeafNode, Location, NodeId, NodeRef};

impl<K: Ord + Clone> BPlusIndex<K> {
    // ============================================================================
    // PUBLIC GET OPERATIONS
    // ============================================================================

    /// Locate `key`, returning the leaf holding it and its offset there.
    ///
    /// Descends from the root choosing, at each branch, the first child whose
    /// separator is greater than `key`, then scans the leaf. No side effects.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::BPlusIndex;
    ///
    /// let mut index = BPlusIndex::new(2).unwrap();
    /// index.insert(42);
    /// let location = index.search(&42).unwrap();
    /// assert_eq!(index.key_at(location), Some(&42));
    /// assert!(index.search(&7).is_none());
    /// ```
    pub fn search(&self, key: &K) -> Option<Location> {
        let leaf_id = self.find_leaf(key);
        self.leaf_arena[leaf_id]
            .keys
            .binary_search(key)
            .ok()
            .map(|offset| Location {
                leaf: leaf_id,
                offset,
            })
    }

    /// Like `search`, but reports a miss as `IndexError::KeyNotFound`.
    pub fn try_search(&self, key: &K) -> IndexResult<Location> {
        self.search(key).ok_or(IndexError::KeyNotFound)
    }

    /// Check if key exists in the index.
    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// Resolve a `Location` returned by `search`.
    ///
    /// Locations are only meaningful until the next insert or delete.
    pub fn key_at(&self, location: Location) -> Option<&K> {
        self.get_leaf(location.leaf)?.keys.get(location.offset)
    }

    // ============================================================================
    // ARENA ACCESS
    // ============================================================================

    /// Get a reference to a leaf node in the arena.
    pub fn get_leaf(&self, id: NodeId) -> Option<&LeafNode<K>> {
        self.leaf_arena.get(id)
    }

    /// Get a reference to a branch node in the arena.
    pub fn get_branch(&self, id: NodeId) -> Option<&BranchNode<K>> {
        self.branch_arena.get(id)
    }

    /// Get the next pointer of a leaf node in the arena.
    pub fn get_leaf_next(&self, id: NodeId) -> Option<NodeId> {
        self.get_leaf(id).and_then(LeafNode::next_leaf)
    }

    // ============================================================================
    // NODE HELPERS
    // ============================================================================

    /// Key count of the node behind `node`.
    pub(crate) fn node_len(&self, node: NodeRef) -> usize {
        match node {
            NodeRef::Leaf(id) => self.leaf_arena[id].len(),
            NodeRef::Branch(id) => self.branch_arena[id].len(),
        }
    }

    /// Largest key count a node may hold.
    pub(crate) fn max_keys(&self) -> usize {
        2 * self.degree - 1
    }

    /// Descend from the root to the leaf whose key range covers `key`.
    pub(crate) fn find_leaf(&self, key: &K) -> NodeId {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id) => return id,
                NodeRef::Branch(id) => {
                    let branch = &self.branch_arena[id];
                    current = branch.children[branch.find_child_index(key)];
                }
            }
        }
    }

    /// Smallest key stored under `node`.
    pub(crate) fn min_key_under(&self, node: NodeRef) -> Option<&K> {
        let mut current = node;
        loop {
            match current {
                NodeRef::Leaf(id) => return self.leaf_arena[id].keys.first(),
                NodeRef::Branch(id) => current = *self.branch_arena[id].children.first()?,
            }
        }
    }

    /// Largest key stored under `node`.
    pub(crate) fn max_key_under(&self, node: NodeRef) -> Option<&K> {
        let mut current = node;
        loop {
            match current {
                NodeRef::Leaf(id) => return self.leaf_arena[id].keys.last(),
                NodeRef::Branch(id) => current = *self.branch_arena[id].children.last()?,
            }
        }
    }
}
