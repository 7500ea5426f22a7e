//! INSERT operations for BPlusIndex.
//!
//! Insertion splits preemptively on the way down: any full child is split
//! before the descent enters it, so a parent always has room for the promoted
//! separator. The root is the only node that can grow the tree upwards.

use tracing::{debug, trace, warn};

use crate::error::{IndexError, ModifyResult};
use crate::types::{BPlusIndex, BranchNode, LeafNode, NodeId, NodeRef};

impl<K: Ord + Clone> BPlusIndex<K> {
    /// Insert a key.
    ///
    /// Returns `true` if the key was added and `false` if it was already
    /// present. Duplicates leave the tree untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::BPlusIndex;
    ///
    /// let mut index = BPlusIndex::new(2).unwrap();
    /// assert!(index.insert(1));
    /// assert!(!index.insert(1));
    /// assert_eq!(index.len(), 1);
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        if self.contains(&key) {
            trace!("duplicate key rejected");
            return false;
        }

        if self.node_len(self.root) == self.max_keys() {
            self.grow_root();
        }

        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id) => {
                    let inserted = self.leaf_arena[id].insert(key);
                    if inserted {
                        self.len += 1;
                    }
                    return inserted;
                }
                NodeRef::Branch(id) => {
                    let mut child_index = self.branch_arena[id].find_child_index(&key);
                    let child = self.branch_arena[id].children[child_index];
                    if self.node_len(child) == self.max_keys() {
                        self.split_child(id, child_index);
                        if key >= self.branch_arena[id].keys[child_index] {
                            child_index += 1;
                        }
                    }
                    current = self.branch_arena[id].children[child_index];
                }
            }
        }
    }

    /// Insert a key and verify every structural invariant afterwards.
    ///
    /// Reports `DuplicateKey` if the key is already present and
    /// `InvariantViolation` if the tree is inconsistent after the insert.
    pub fn try_insert(&mut self, key: K) -> ModifyResult<()> {
        if !self.insert(key) {
            return Err(IndexError::DuplicateKey);
        }
        self.check_invariants().map_err(|e| {
            warn!(error = %e, "invariant check failed after insert");
            e
        })
    }

    // ============================================================================
    // HELPERS FOR INSERT OPERATIONS
    // ============================================================================

    /// Put a fresh branch above a full root and split the old root under it.
    fn grow_root(&mut self) {
        let mut new_root = BranchNode::new(self.degree);
        new_root.children.push(self.root);
        let root_id = self.allocate_branch(new_root);
        self.root = NodeRef::Branch(root_id);
        self.split_child(root_id, 0);
        debug!(height = self.height(), "index grew by one level");
    }

    /// Split the full child at `child_index` of branch `parent_id`.
    ///
    /// The new right sibling lands at `child_index + 1` with its separator at
    /// `keys[child_index]`. Leaf splits also splice the sibling into the chain.
    pub(crate) fn split_child(&mut self, parent_id: NodeId, child_index: usize) {
        let child = self.branch_arena[parent_id].children[child_index];
        let (separator, new_child) = match child {
            NodeRef::Leaf(id) => {
                let (separator, right) = self.leaf_arena[id].split();
                let right_id = self.allocate_leaf(right);
                self.leaf_arena[id].next = right_id;
                trace!(leaf = id, new_leaf = right_id, "split leaf");
                (separator, NodeRef::Leaf(right_id))
            }
            NodeRef::Branch(id) => {
                let (separator, right) = self.branch_arena[id].split();
                let right_id = self.allocate_branch(right);
                trace!(branch = id, new_branch = right_id, "split branch");
                (separator, NodeRef::Branch(right_id))
            }
        };
        self.branch_arena[parent_id].insert_split(child_index, separator, new_child);
    }

    /// Allocate a new leaf node in the arena and return its ID.
    pub(crate) fn allocate_leaf(&mut self, leaf: LeafNode<K>) -> NodeId {
        self.leaf_arena.allocate(leaf)
    }

    /// Allocate a new branch node in the arena and return its ID.
    pub(crate) fn allocate_branch(&mut self, branch: BranchNode<K>) -> NodeId {
        self.branch_arena.allocate(branch)
    }
}

impl<K: Ord + Clone> Extend<K> for BPlusIndex<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}
