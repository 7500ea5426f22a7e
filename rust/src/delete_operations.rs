//! DELETE operations for BPlusIndex.
//!
//! Deletion is top-down: before the descent enters a child that sits at the
//! `t - 1` floor, the child is topped up by borrowing from a sibling or merged
//! with one. The leaf reached at the bottom can therefore always give up a key.
//! The root is the only node allowed to shrink the tree.

use tracing::{debug, trace, warn};

use crate::error::{IndexError, ModifyResult};
use crate::types::{BPlusIndex, NodeId, NodeRef};

impl<K: Ord + Clone> BPlusIndex<K> {
    /// Delete a key.
    ///
    /// Returns `true` if the key was removed and `false` if it was absent.
    /// Deleting an absent key leaves the tree untouched.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::BPlusIndex;
    ///
    /// let mut index = BPlusIndex::from_keys(2, 1..=10).unwrap();
    /// assert!(index.delete(&4));
    /// assert!(!index.delete(&4));
    /// assert!(!index.contains(&4));
    /// assert_eq!(index.len(), 9);
    /// ```
    pub fn delete(&mut self, key: &K) -> bool {
        if !self.contains(key) {
            return false;
        }

        self.delete_recursive(self.root, key);
        self.len -= 1;
        self.collapse_root_if_needed();
        true
    }

    /// Delete a key and verify every structural invariant afterwards.
    ///
    /// Reports `KeyNotFound` for an absent key and `InvariantViolation` if the
    /// tree is inconsistent after the delete.
    pub fn try_delete(&mut self, key: &K) -> ModifyResult<()> {
        if !self.delete(key) {
            return Err(IndexError::KeyNotFound);
        }
        self.check_invariants().map_err(|e| {
            warn!(error = %e, "invariant check failed after delete");
            e
        })
    }

    // ============================================================================
    // HELPERS FOR DELETE OPERATIONS
    // ============================================================================

    /// Remove `key` from the subtree under `node`.
    ///
    /// `node` is either the root or holds at least `t` keys.
    fn delete_recursive(&mut self, node: NodeRef, key: &K) {
        let parent_id = match node {
            NodeRef::Leaf(id) => {
                self.leaf_arena[id].remove(key);
                return;
            }
            NodeRef::Branch(id) => id,
        };

        let child_index = self.branch_arena[parent_id].find_child_index(key);
        if child_index > 0 && self.branch_arena[parent_id].keys[child_index - 1] == *key {
            self.delete_at_separator(parent_id, child_index - 1, key);
        } else {
            let child_index = self.prepare_child_for_removal(parent_id, child_index);
            let child = self.branch_arena[parent_id].children[child_index];
            self.delete_recursive(child, key);
        }
    }

    /// `key` equals `keys[separator_index]` of `parent_id`, so it is the
    /// smallest key of the child right of that separator.
    fn delete_at_separator(&mut self, parent_id: NodeId, separator_index: usize, key: &K) {
        let left = self.branch_arena[parent_id].children[separator_index];
        let right = self.branch_arena[parent_id].children[separator_index + 1];

        if self.node_len(right) >= self.degree {
            // Successor: the right side can afford the loss; its new minimum
            // becomes the separator.
            self.delete_recursive(right, key);
            if let Some(successor) = self.min_key_under(right).cloned() {
                self.branch_arena[parent_id].keys[separator_index] = successor;
            }
        } else if self.node_len(left) >= self.degree {
            // Predecessor: rotate the left side's largest entry across.
            self.borrow_from_prev(parent_id, separator_index + 1);
            let right = self.branch_arena[parent_id].children[separator_index + 1];
            self.delete_recursive(right, key);
        } else {
            self.merge_children(parent_id, separator_index);
            let merged = self.branch_arena[parent_id].children[separator_index];
            self.delete_recursive(merged, key);
        }
    }

    /// Make sure the child at `child_index` holds at least `t` keys before the
    /// descent enters it. Returns the index the descent should continue at,
    /// which moves left by one when the child is merged into its left sibling.
    fn prepare_child_for_removal(&mut self, parent_id: NodeId, child_index: usize) -> usize {
        let (child, key_count) = {
            let parent = &self.branch_arena[parent_id];
            (parent.children[child_index], parent.keys.len())
        };
        if self.node_len(child) >= self.degree {
            return child_index;
        }

        let has_left = child_index > 0;
        let has_right = child_index < key_count;

        if has_left && self.can_donate(parent_id, child_index - 1) {
            self.borrow_from_prev(parent_id, child_index);
            child_index
        } else if has_right && self.can_donate(parent_id, child_index + 1) {
            self.borrow_from_next(parent_id, child_index);
            child_index
        } else if has_right {
            self.merge_children(parent_id, child_index);
            child_index
        } else {
            self.merge_children(parent_id, child_index - 1);
            child_index - 1
        }
    }

    fn can_donate(&self, parent_id: NodeId, child_index: usize) -> bool {
        let sibling = self.branch_arena[parent_id].children[child_index];
        self.node_len(sibling) >= self.degree
    }

    // ============================================================================
    // REBALANCING
    // ============================================================================

    /// Rotate the last entry of the left sibling through the parent separator
    /// into the front of the child at `child_index`.
    pub(crate) fn borrow_from_prev(&mut self, parent_id: NodeId, child_index: usize) {
        let (sibling, child) = {
            let parent = &self.branch_arena[parent_id];
            (parent.children[child_index - 1], parent.children[child_index])
        };

        match (sibling, child) {
            (NodeRef::Leaf(sibling_id), NodeRef::Leaf(child_id)) => {
                let Some(moved) = self.leaf_arena[sibling_id].borrow_last() else {
                    return;
                };
                self.leaf_arena[child_id].accept_from_left(moved.clone());
                self.branch_arena[parent_id].keys[child_index - 1] = moved;
            }
            (NodeRef::Branch(sibling_id), NodeRef::Branch(child_id)) => {
                let Some((moved_key, moved_child)) = self.branch_arena[sibling_id].borrow_last()
                else {
                    return;
                };
                let separator = self.branch_arena[parent_id].keys[child_index - 1].clone();
                let new_separator =
                    self.branch_arena[child_id].accept_from_left(separator, moved_key, moved_child);
                self.branch_arena[parent_id].keys[child_index - 1] = new_separator;
            }
            _ => unreachable!("siblings must sit at the same depth"),
        }
        trace!(parent = parent_id, child_index, "borrowed from left sibling");
    }

    /// Rotate the first entry of the right sibling through the parent separator
    /// onto the end of the child at `child_index`.
    pub(crate) fn borrow_from_next(&mut self, parent_id: NodeId, child_index: usize) {
        let (child, sibling) = {
            let parent = &self.branch_arena[parent_id];
            (parent.children[child_index], parent.children[child_index + 1])
        };

        match (child, sibling) {
            (NodeRef::Leaf(child_id), NodeRef::Leaf(sibling_id)) => {
                let Some(moved) = self.leaf_arena[sibling_id].borrow_first() else {
                    return;
                };
                self.leaf_arena[child_id].accept_from_right(moved);
                // The sibling kept at least t - 1 >= 1 keys.
                let new_separator = self.leaf_arena[sibling_id].keys[0].clone();
                self.branch_arena[parent_id].keys[child_index] = new_separator;
            }
            (NodeRef::Branch(child_id), NodeRef::Branch(sibling_id)) => {
                let Some((moved_key, moved_child)) = self.branch_arena[sibling_id].borrow_first()
                else {
                    return;
                };
                let separator = self.branch_arena[parent_id].keys[child_index].clone();
                let new_separator =
                    self.branch_arena[child_id].accept_from_right(separator, moved_key, moved_child);
                self.branch_arena[parent_id].keys[child_index] = new_separator;
            }
            _ => unreachable!("siblings must sit at the same depth"),
        }
        trace!(parent = parent_id, child_index, "borrowed from right sibling");
    }

    /// Merge the child at `left_index + 1` into the child at `left_index`,
    /// consuming the separator between them. The right node is released.
    pub(crate) fn merge_children(&mut self, parent_id: NodeId, left_index: usize) {
        let left = self.branch_arena[parent_id].children[left_index];
        let (separator, right) = self.branch_arena[parent_id].remove_separator(left_index);

        match (left, right) {
            (NodeRef::Leaf(left_id), NodeRef::Leaf(right_id)) => {
                // Leaf separators are copies; the keys already live in the leaves.
                if let Some(mut right_leaf) = self.leaf_arena.deallocate(right_id) {
                    self.leaf_arena[left_id].merge_from(&mut right_leaf);
                }
            }
            (NodeRef::Branch(left_id), NodeRef::Branch(right_id)) => {
                if let Some(mut right_branch) = self.branch_arena.deallocate(right_id) {
                    self.branch_arena[left_id].merge_from(separator, &mut right_branch);
                }
            }
            _ => unreachable!("siblings must sit at the same depth"),
        }
        trace!(parent = parent_id, left_index, "merged siblings");
    }

    /// Replace a separator-less branch root by its only child.
    fn collapse_root_if_needed(&mut self) {
        while let NodeRef::Branch(root_id) = self.root {
            if !self.branch_arena[root_id].is_empty() {
                break;
            }
            let only_child = self.branch_arena[root_id].children[0];
            self.branch_arena.deallocate(root_id);
            self.root = only_child;
            debug!(height = self.height(), "index shrank by one level");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index_with(degree: usize, keys: impl IntoIterator<Item = i32>) -> BPlusIndex<i32> {
        BPlusIndex::from_keys(degree, keys).unwrap()
    }

    fn keys_of(index: &BPlusIndex<i32>) -> Vec<i32> {
        index.iter().copied().collect()
    }

    #[test]
    fn test_delete_from_root_leaf() {
        let mut index = index_with(2, [1, 2, 3]);
        assert!(index.delete(&2));
        assert_eq!(keys_of(&index), vec![1, 3]);
        assert!(index.delete(&1));
        assert!(index.delete(&3));
        assert!(index.is_empty());
        assert!(index.root.is_leaf());
        assert!(index.check_invariants().is_ok());
    }

    #[test]
    fn test_delete_absent_key_is_noop() {
        let mut index = index_with(2, 1..=20);
        let before = index.levels();
        assert!(!index.delete(&100));
        assert_eq!(index.levels(), before);
        assert_eq!(index.try_delete(&100), Err(IndexError::KeyNotFound));
    }

    #[test]
    fn test_delete_separator_key() {
        // [2] over [1] [2 3 4]: 2 is both a separator and a leaf key.
        let mut index = index_with(2, [1, 2, 3, 4]);
        assert_eq!(index.levels()[0], vec![vec![2]]);
        assert!(index.delete(&2));
        assert_eq!(keys_of(&index), vec![1, 3, 4]);
        assert_eq!(index.levels()[0], vec![vec![3]]);
        assert!(index.check_invariants().is_ok());
    }

    #[test]
    fn test_delete_separator_borrows_predecessor() {
        let mut index = index_with(2, [1, 4, 5, 2, 3]);
        assert_eq!(index.levels(), vec![vec![vec![4]], vec![vec![1, 2, 3], vec![4, 5]]]);

        assert!(index.delete(&5));
        assert_eq!(index.levels(), vec![vec![vec![4]], vec![vec![1, 2, 3], vec![4]]]);

        // 4 is the separator and its leaf is minimal, so the left leaf donates 3.
        assert!(index.delete(&4));
        assert_eq!(index.levels(), vec![vec![vec![3]], vec![vec![1, 2], vec![3]]]);
        assert!(index.check_invariants().is_ok());
    }

    #[test]
    fn test_delete_merges_and_collapses_root() {
        let mut index = index_with(2, 1..=4);
        assert_eq!(index.height(), 2);
        for key in [4, 3, 2] {
            assert!(index.delete(&key));
            assert!(index.check_invariants().is_ok());
        }
        assert_eq!(index.height(), 1);
        assert_eq!(keys_of(&index), vec![1]);
        assert_eq!(index.count_nodes_in_tree(), (1, 0));
        assert_eq!(index.leaf_arena_stats().allocated_count, 1);
        assert_eq!(index.branch_arena_stats().allocated_count, 0);
    }

    #[test]
    fn test_delete_every_key_in_every_order_shape() {
        for degree in 2..=4 {
            let keys: Vec<i32> = (0..120).collect();

            let mut ascending = index_with(degree, keys.clone());
            for key in &keys {
                assert!(ascending.delete(key));
                assert!(ascending.check_invariants().is_ok(), "t={} asc key {}", degree, key);
            }
            assert!(ascending.is_empty());

            let mut descending = index_with(degree, keys.clone());
            for key in keys.iter().rev() {
                assert!(descending.delete(key));
                assert!(descending.check_invariants().is_ok(), "t={} desc key {}", degree, key);
            }
            assert!(descending.is_empty());

            let mut middle_out = index_with(degree, keys.clone());
            let mut order: Vec<i32> = keys.clone();
            order.sort_by_key(|k| (k - 60).abs());
            for key in &order {
                assert!(middle_out.delete(key));
                assert!(middle_out.check_invariants().is_ok(), "t={} mid key {}", degree, key);
            }
            assert!(middle_out.is_empty());
            assert_eq!(middle_out.height(), 1);
        }
    }

    #[test]
    fn test_delete_then_reinsert() {
        let mut index = index_with(3, 0..50);
        for key in (0..50).step_by(3) {
            assert!(index.delete(&key));
        }
        for key in (0..50).step_by(3) {
            assert!(!index.contains(&key));
            assert!(index.insert(key));
        }
        assert_eq!(keys_of(&index), (0..50).collect::<Vec<_>>());
        assert!(index.check_invariants().is_ok());
    }
}
