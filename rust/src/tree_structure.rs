//! Tree structure management operations for BPlusIndex.
//!
//! Size queries, clearing, node counting and arena statistics.

use tracing::debug;

use crate::arena::ArenaStats;
use crate::types::{BPlusIndex, LeafNode, NodeId, NodeRef};

impl<K: Ord + Clone> BPlusIndex<K> {
    /// Returns the number of keys in the index.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the index holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns true if the root is a leaf node.
    pub fn is_leaf_root(&self) -> bool {
        self.root.is_leaf()
    }

    /// Number of levels, counting the leaf level. A lone root leaf has height 1.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut current = self.root;
        while let NodeRef::Branch(id) = current {
            current = self.branch_arena[id].children[0];
            height += 1;
        }
        height
    }

    /// Returns the number of leaf nodes in the index.
    pub fn leaf_count(&self) -> usize {
        self.count_nodes_in_tree().0
    }

    /// Count the leaf and branch nodes reachable from the root.
    pub fn count_nodes_in_tree(&self) -> (usize, usize) {
        self.count_nodes_recursive(self.root)
    }

    fn count_nodes_recursive(&self, node: NodeRef) -> (usize, usize) {
        match node {
            NodeRef::Leaf(_) => (1, 0),
            NodeRef::Branch(id) => self.branch_arena[id]
                .children
                .iter()
                .map(|child| self.count_nodes_recursive(*child))
                .fold((0, 1), |(leaves, branches), (l, b)| (leaves + l, branches + b)),
        }
    }

    /// Remove every key, leaving a single empty root leaf.
    pub fn clear(&mut self) {
        self.leaf_arena.clear();
        self.branch_arena.clear();

        let root_id = self.leaf_arena.allocate(LeafNode::new(self.degree));
        self.root = NodeRef::Leaf(root_id);
        self.len = 0;
        debug!("index cleared");
    }

    // ============================================================================
    // TREE NAVIGATION HELPERS
    // ============================================================================

    /// Get the ID of the first (leftmost) leaf, where the chain starts.
    pub fn get_first_leaf_id(&self) -> NodeId {
        let mut current = self.root;
        loop {
            match current {
                NodeRef::Leaf(id) => return id,
                NodeRef::Branch(id) => current = self.branch_arena[id].children[0],
            }
        }
    }

    // ============================================================================
    // ARENA STATISTICS
    // ============================================================================

    /// Get statistics for the leaf node arena.
    pub fn leaf_arena_stats(&self) -> ArenaStats {
        self.leaf_arena.stats()
    }

    /// Get statistics for the branch node arena.
    pub fn branch_arena_stats(&self) -> ArenaStats {
        self.branch_arena.stats()
    }
}
