//! Node implementations for BPlusIndex.
//!
//! This module contains the node-local halves of the tree algorithms:
//! splitting, borrowing, accepting and merging. Wiring the results back into
//! parents and the leaf chain is done by the tree-level operations.

use crate::types::{BranchNode, LeafNode, NodeId, NodeRef, NULL_NODE};

// ============================================================================
// LEAF NODE IMPLEMENTATION
// ============================================================================

impl<K: Ord + Clone> LeafNode<K> {
    /// Returns the number of keys in this leaf.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this leaf holds no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Get a reference to the keys in this leaf node.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Next leaf in the chain, if any.
    pub fn next_leaf(&self) -> Option<NodeId> {
        (self.next != NULL_NODE).then_some(self.next)
    }

    /// Insert `key` in sorted position. Returns false if it was already present.
    pub fn insert(&mut self, key: K) -> bool {
        match self.keys.binary_search(&key) {
            Ok(_) => false,
            Err(index) => {
                self.keys.insert(index, key);
                true
            }
        }
    }

    /// Remove `key`. Returns false if it was absent.
    pub fn remove(&mut self, key: &K) -> bool {
        match self.keys.binary_search(key) {
            Ok(index) => {
                self.keys.remove(index);
                true
            }
            Err(_) => false,
        }
    }

    /// Split a full leaf, returning the promoted separator and the new right leaf.
    ///
    /// The left keeps `t - 1` keys and the right takes the remaining `t`. The
    /// separator is a copy of the right leaf's first key. The right leaf inherits
    /// this leaf's `next`; the caller links this leaf to the right leaf once it
    /// has an id.
    pub fn split(&mut self) -> (K, LeafNode<K>) {
        let right_keys = self.keys.split_off(self.degree - 1);
        let separator = right_keys[0].clone();

        let new_right = LeafNode {
            degree: self.degree,
            keys: right_keys,
            next: self.next,
        };
        self.next = NULL_NODE;

        (separator, new_right)
    }

    // ============================================================================
    // STATUS CHECKS
    // ============================================================================

    /// Returns true if this leaf holds `2t - 1` keys.
    pub fn is_full(&self) -> bool {
        self.keys.len() >= self.max_keys()
    }

    /// Returns true if this leaf is at the `t - 1` floor.
    pub fn is_minimal(&self) -> bool {
        self.keys.len() <= self.min_keys()
    }

    /// Returns true if this leaf has fewer than `t - 1` keys.
    pub fn is_underfull(&self) -> bool {
        self.keys.len() < self.min_keys()
    }

    /// Returns true if this leaf can donate a key to a sibling.
    pub fn can_donate(&self) -> bool {
        self.keys.len() > self.min_keys()
    }

    pub fn min_keys(&self) -> usize {
        self.degree - 1
    }

    pub fn max_keys(&self) -> usize {
        2 * self.degree - 1
    }

    // ============================================================================
    // BORROWING AND MERGING HELPERS
    // ============================================================================

    /// Borrow the last key from this leaf (used when this is the left sibling)
    pub fn borrow_last(&mut self) -> Option<K> {
        if !self.can_donate() {
            return None;
        }
        self.keys.pop()
    }

    /// Borrow the first key from this leaf (used when this is the right sibling)
    pub fn borrow_first(&mut self) -> Option<K> {
        if !self.can_donate() {
            return None;
        }
        Some(self.keys.remove(0))
    }

    /// Accept a borrowed key at the beginning (from left sibling)
    pub fn accept_from_left(&mut self, key: K) {
        self.keys.insert(0, key);
    }

    /// Accept a borrowed key at the end (from right sibling)
    pub fn accept_from_right(&mut self, key: K) {
        self.keys.push(key);
    }

    /// Merge all content from the right sibling into this leaf and take over
    /// its place in the chain.
    pub fn merge_from(&mut self, other: &mut LeafNode<K>) {
        self.keys.append(&mut other.keys);
        self.next = other.next;
        other.next = NULL_NODE;
    }
}

// ============================================================================
// BRANCH NODE IMPLEMENTATION
// ============================================================================

impl<K: Ord + Clone> BranchNode<K> {
    /// Returns the number of separator keys in this branch node.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this branch has no separators (a collapsing root).
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Get a reference to the separator keys.
    pub fn keys(&self) -> &[K] {
        &self.keys
    }

    /// Get a reference to the child handles.
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// Find the index of the child that should contain the given key.
    ///
    /// This is the smallest `i` with `key < keys[i]`, or the last child.
    pub fn find_child_index(&self, key: &K) -> usize {
        match self.keys.binary_search(key) {
            Ok(index) => index + 1, // Equal to a separator: it lives on the right
            Err(index) => index,
        }
    }

    /// Wire a split child's separator and right sibling in after `child_index`.
    pub fn insert_split(&mut self, child_index: usize, separator: K, new_child: NodeRef) {
        self.keys.insert(child_index, separator);
        self.children.insert(child_index + 1, new_child);
    }

    /// Split a full branch, returning the promoted key and the new right branch.
    ///
    /// Keys `0..t-1` and children `0..t` stay here, key `t-1` is promoted and
    /// the rest moves to the right branch.
    pub fn split(&mut self) -> (K, BranchNode<K>) {
        let mut right_keys = self.keys.split_off(self.degree - 1);
        let promoted_key = right_keys.remove(0);
        let right_children = self.children.split_off(self.degree);

        let new_right = BranchNode {
            degree: self.degree,
            keys: right_keys,
            children: right_children,
        };

        (promoted_key, new_right)
    }

    /// Remove the separator at `index` and the child to its right.
    pub fn remove_separator(&mut self, index: usize) -> (K, NodeRef) {
        let separator = self.keys.remove(index);
        let child = self.children.remove(index + 1);
        (separator, child)
    }

    // ============================================================================
    // STATUS CHECKS
    // ============================================================================

    /// Returns true if this branch holds `2t - 1` separators.
    pub fn is_full(&self) -> bool {
        self.keys.len() >= self.max_keys()
    }

    /// Returns true if this branch is at the `t - 1` floor.
    pub fn is_minimal(&self) -> bool {
        self.keys.len() <= self.min_keys()
    }

    /// Returns true if this branch is below minimum occupancy.
    pub fn is_underfull(&self) -> bool {
        self.keys.len() < self.min_keys()
    }

    /// Returns true if this branch can donate a key to a sibling.
    pub fn can_donate(&self) -> bool {
        self.keys.len() > self.min_keys()
    }

    pub fn min_keys(&self) -> usize {
        self.degree - 1
    }

    pub fn max_keys(&self) -> usize {
        2 * self.degree - 1
    }

    // ============================================================================
    // BORROWING AND MERGING HELPERS
    // ============================================================================

    /// Borrow the last key and child from this branch (used when this is the left sibling)
    pub fn borrow_last(&mut self) -> Option<(K, NodeRef)> {
        if !self.can_donate() {
            return None;
        }
        let key = self.keys.pop()?;
        let child = self.children.pop()?;
        Some((key, child))
    }

    /// Borrow the first key and child from this branch (used when this is the right sibling)
    pub fn borrow_first(&mut self) -> Option<(K, NodeRef)> {
        if !self.can_donate() {
            return None;
        }
        let key = self.keys.remove(0);
        let child = self.children.remove(0);
        Some((key, child))
    }

    /// Accept a borrowed child at the beginning (from left sibling).
    /// The parent separator becomes the first key; the sibling's key is
    /// returned as the new parent separator.
    pub fn accept_from_left(&mut self, separator: K, moved_key: K, moved_child: NodeRef) -> K {
        self.keys.insert(0, separator);
        self.children.insert(0, moved_child);
        moved_key
    }

    /// Accept a borrowed child at the end (from right sibling).
    /// The parent separator becomes the last key; the sibling's key is
    /// returned as the new parent separator.
    pub fn accept_from_right(&mut self, separator: K, moved_key: K, moved_child: NodeRef) -> K {
        self.keys.push(separator);
        self.children.push(moved_child);
        moved_key
    }

    /// Merge all content from another branch into this one, with separator from parent
    pub fn merge_from(&mut self, separator: K, other: &mut BranchNode<K>) {
        self.keys.push(separator);
        self.keys.append(&mut other.keys);
        self.children.append(&mut other.children);
    }
}
