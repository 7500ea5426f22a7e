//! Validation and debugging utilities for BPlusIndex.
//!
//! The invariant checker walks the whole tree and the whole leaf chain, so it
//! is meant for tests and debugging rather than hot paths.

use std::collections::VecDeque;
use std::fmt;

use crate::error::{IndexError, IndexResult};
use crate::types::{BPlusIndex, BranchNode, LeafNode, NodeId, NodeRef};

/// Facts gathered while walking the tree top-down.
struct TreeWalk {
    leaf_depth: Option<usize>,
    leaf_ids: Vec<NodeId>,
    key_count: usize,
    branch_count: usize,
}

// ============================================================================
// VALIDATION METHODS
// ============================================================================

impl<K: Ord + Clone> BPlusIndex<K> {
    /// Verify every structural invariant of the tree.
    ///
    /// Checks node occupancy, child counts, key ordering and separator bounds,
    /// uniform leaf depth, the leaf chain (order, completeness, sortedness),
    /// the key counter, and that the arenas hold exactly the reachable nodes.
    pub fn check_invariants(&self) -> IndexResult<()> {
        let mut walk = TreeWalk {
            leaf_depth: None,
            leaf_ids: Vec::new(),
            key_count: 0,
            branch_count: 0,
        };
        self.check_node(self.root, None, None, true, 1, &mut walk)?;

        if walk.key_count != self.len {
            return Err(IndexError::invariant_violation(
                "Key count",
                &format!("{} keys in leaves, len() reports {}", walk.key_count, self.len),
            ));
        }

        self.check_leaf_chain(&walk.leaf_ids)?;
        self.check_arena_tree_consistency(walk.leaf_ids.len(), walk.branch_count)
    }

    /// Alias for `check_invariants`.
    pub fn validate(&self) -> IndexResult<()> {
        self.check_invariants()
    }

    fn check_node(
        &self,
        node: NodeRef,
        lower: Option<&K>,
        upper: Option<&K>,
        is_root: bool,
        depth: usize,
        walk: &mut TreeWalk,
    ) -> IndexResult<()> {
        let keys = match node {
            NodeRef::Leaf(id) => self.live_leaf(id)?.keys(),
            NodeRef::Branch(id) => self.live_branch(id)?.keys(),
        };
        let context = format!("{:?}", node);

        if keys.len() > self.max_keys() {
            return Err(IndexError::invariant_violation(
                &context,
                &format!("{} keys exceeds maximum {}", keys.len(), self.max_keys()),
            ));
        }
        if !is_root && keys.len() < self.degree - 1 {
            return Err(IndexError::invariant_violation(
                &context,
                &format!("{} keys below minimum {}", keys.len(), self.degree - 1),
            ));
        }
        if keys.windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(IndexError::invariant_violation(&context, "keys not strictly increasing"));
        }
        if let (Some(lower), Some(first)) = (lower, keys.first()) {
            if first < lower {
                return Err(IndexError::invariant_violation(&context, "key below separator bound"));
            }
        }
        if let (Some(upper), Some(last)) = (upper, keys.last()) {
            if last >= upper {
                return Err(IndexError::invariant_violation(
                    &context,
                    "key at or above separator bound",
                ));
            }
        }

        match node {
            NodeRef::Leaf(id) => {
                match walk.leaf_depth {
                    None => walk.leaf_depth = Some(depth),
                    Some(expected) if expected != depth => {
                        return Err(IndexError::invariant_violation(
                            &context,
                            &format!("leaf at depth {}, expected {}", depth, expected),
                        ));
                    }
                    Some(_) => {}
                }
                walk.leaf_ids.push(id);
                walk.key_count += keys.len();
                Ok(())
            }
            NodeRef::Branch(id) => {
                let branch = self.live_branch(id)?;
                walk.branch_count += 1;

                if branch.children.len() != keys.len() + 1 {
                    return Err(IndexError::invariant_violation(
                        &context,
                        &format!("{} keys but {} children", keys.len(), branch.children.len()),
                    ));
                }
                if keys.is_empty() {
                    return Err(IndexError::invariant_violation(
                        &context,
                        "branch without separators",
                    ));
                }

                for (i, child) in branch.children.iter().enumerate() {
                    let child_lower = if i == 0 { lower } else { Some(&keys[i - 1]) };
                    let child_upper = if i == keys.len() { upper } else { Some(&keys[i]) };
                    self.check_node(*child, child_lower, child_upper, false, depth + 1, walk)?;
                }
                Ok(())
            }
        }
    }

    /// The chain must visit exactly the tree's leaves, left to right, with
    /// keys strictly increasing across leaf boundaries.
    fn check_leaf_chain(&self, tree_leaf_ids: &[NodeId]) -> IndexResult<()> {
        let mut chain_ids = Vec::with_capacity(tree_leaf_ids.len());
        let mut current = Some(self.get_first_leaf_id());
        let mut previous_key: Option<&K> = None;

        while let Some(id) = current {
            if chain_ids.len() > tree_leaf_ids.len() {
                return Err(IndexError::invariant_violation(
                    "Leaf chain",
                    &format!("longer than the {} leaves in the tree", tree_leaf_ids.len()),
                ));
            }
            let leaf = self.live_leaf(id)?;
            for key in leaf.keys() {
                if previous_key.is_some_and(|previous| previous >= key) {
                    return Err(IndexError::invariant_violation(
                        "Leaf chain",
                        &format!("keys out of order at leaf {}", id),
                    ));
                }
                previous_key = Some(key);
            }
            chain_ids.push(id);
            current = leaf.next_leaf();
        }

        if chain_ids != tree_leaf_ids {
            return Err(IndexError::invariant_violation(
                "Leaf chain",
                &format!("tree has {:?}, chain has {:?}", tree_leaf_ids, chain_ids),
            ));
        }
        Ok(())
    }

    /// Check that arena allocation matches tree structure
    fn check_arena_tree_consistency(
        &self,
        leaf_count: usize,
        branch_count: usize,
    ) -> IndexResult<()> {
        let leaves_allocated = self.leaf_arena.allocated_count();
        if leaf_count != leaves_allocated {
            return Err(IndexError::invariant_violation(
                "Leaf arena",
                &format!("{} in tree vs {} in arena", leaf_count, leaves_allocated),
            ));
        }
        let branches_allocated = self.branch_arena.allocated_count();
        if branch_count != branches_allocated {
            return Err(IndexError::invariant_violation(
                "Branch arena",
                &format!("{} in tree vs {} in arena", branch_count, branches_allocated),
            ));
        }
        Ok(())
    }

    fn live_leaf(&self, id: NodeId) -> IndexResult<&LeafNode<K>> {
        self.get_leaf(id).ok_or_else(|| {
            IndexError::invariant_violation("Leaf arena", &format!("dangling leaf id {}", id))
        })
    }

    fn live_branch(&self, id: NodeId) -> IndexResult<&BranchNode<K>> {
        self.get_branch(id).ok_or_else(|| {
            IndexError::invariant_violation("Branch arena", &format!("dangling branch id {}", id))
        })
    }

    // ============================================================================
    // DEBUGGING AND TESTING UTILITIES
    // ============================================================================

    /// Level-by-level dump of node keys, root level first.
    ///
    /// Each level lists its nodes left to right; each node is its key list.
    pub fn levels(&self) -> Vec<Vec<Vec<K>>> {
        let mut levels: Vec<Vec<Vec<K>>> = Vec::new();
        let mut queue = VecDeque::from([(self.root, 0usize)]);

        while let Some((node, depth)) = queue.pop_front() {
            if levels.len() == depth {
                levels.push(Vec::new());
            }
            match node {
                NodeRef::Leaf(id) => levels[depth].push(self.leaf_arena[id].keys.clone()),
                NodeRef::Branch(id) => {
                    let branch = &self.branch_arena[id];
                    levels[depth].push(branch.keys.clone());
                    queue.extend(branch.children.iter().map(|child| (*child, depth + 1)));
                }
            }
        }
        levels
    }

    /// Returns the sizes of all leaf nodes in chain order (for testing/debugging).
    pub fn leaf_sizes(&self) -> Vec<usize> {
        let mut sizes = Vec::new();
        let mut current = Some(self.get_first_leaf_id());
        while let Some(leaf) = current.and_then(|id| self.get_leaf(id)) {
            sizes.push(leaf.len());
            current = leaf.next_leaf();
        }
        sizes
    }
}

/// Renders the level-by-level dump, one `Level n:` line per level.
impl<K: Ord + Clone + fmt::Debug> fmt::Display for BPlusIndex<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (depth, level) in self.levels().iter().enumerate() {
            write!(f, "Level {}:", depth)?;
            for node in level {
                write!(f, " {:?}", node)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
