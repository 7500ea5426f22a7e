//! In-memory B+ tree index with linked leaves.
//!
//! `BPlusIndex` keeps a set of ordered keys in a tree of minimum degree `t`.
//! Keys live in the leaves, branch nodes hold separator copies for routing,
//! and the leaves form a left-to-right chain so ordered range scans touch the
//! branch levels only once.
//!
//! Nodes are stored in two arenas (leaves and branches) and addressed by
//! `NodeId`. A parent owns its children through `NodeRef` handles; the leaf
//! chain is a plain id link that split and merge keep in step with the tree.
//!
//! The index is single-threaded: mutation takes `&mut self`, so a range scan
//! can never observe a concurrent split or merge.
//!
//! ```
//! use bplus_index::BPlusIndex;
//!
//! let mut index = BPlusIndex::new(2).unwrap();
//! for key in [10, 20, 5, 6, 12, 30, 7, 17] {
//!     index.insert(key);
//! }
//! assert_eq!(index.range_query(&6, &17), vec![6, 7, 10, 12, 17]);
//! println!("{}", index);
//! ```

mod arena;
mod construction;
mod delete_operations;
mod error;
mod get_operations;
mod insert_operations;
mod iteration;
mod node;
mod range_queries;
mod tree_structure;
mod types;
mod validation;

pub use arena::ArenaStats;
pub use construction::validation::validate_degree;
pub use error::{IndexError, IndexResult, InitResult, ModifyResult};
pub use iteration::{Iter, RangeIter};
pub use types::{
    BPlusIndex, BranchNode, LeafNode, Location, NodeId, NodeRef, DEFAULT_DEGREE, MIN_DEGREE,
    NULL_NODE,
};
