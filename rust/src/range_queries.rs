//! Range query operations for BPlusIndex.
//!
//! A range scan descends once to the leaf covering the start bound and then
//! follows the leaf chain, which holds every key in ascending order.

use std::ops::{Bound, RangeBounds};

use crate::iteration::RangeIter;
use crate::types::{BPlusIndex, LeafNode};

impl<K: Ord + Clone> BPlusIndex<K> {
    /// Collect the keys in `[low, high]` in ascending order.
    ///
    /// Returns an empty vector when `low > high` or nothing falls in range.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::BPlusIndex;
    ///
    /// let index = BPlusIndex::from_keys(2, [10, 20, 5, 6, 12, 30, 7, 17]).unwrap();
    /// assert_eq!(index.range_query(&6, &17), vec![6, 7, 10, 12, 17]);
    /// assert_eq!(index.range_query(&12, &12), vec![12]);
    /// assert!(index.range_query(&17, &6).is_empty());
    /// ```
    pub fn range_query(&self, low: &K, high: &K) -> Vec<K> {
        if low > high {
            return Vec::new();
        }
        self.range(low..=high).cloned().collect()
    }

    /// Returns a lazy iterator over the keys inside `range`.
    ///
    /// Accepts any of Rust's range forms, including unbounded ends.
    ///
    /// # Examples
    ///
    /// ```
    /// use bplus_index::BPlusIndex;
    ///
    /// let index = BPlusIndex::from_keys(3, 0..10).unwrap();
    ///
    /// let half_open: Vec<_> = index.range(3..7).copied().collect();
    /// assert_eq!(half_open, vec![3, 4, 5, 6]);
    ///
    /// let tail: Vec<_> = index.range(7..).copied().collect();
    /// assert_eq!(tail, vec![7, 8, 9]);
    ///
    /// let head: Vec<_> = index.range(..=2).copied().collect();
    /// assert_eq!(head, vec![0, 1, 2]);
    /// ```
    pub fn range<R>(&self, range: R) -> RangeIter<'_, K>
    where
        R: RangeBounds<K>,
    {
        let start = self.find_range_start(range.start_bound());
        RangeIter::new(self, start, range.end_bound().cloned())
    }

    /// Returns the smallest key in the index.
    pub fn first(&self) -> Option<&K> {
        self.min_key_under(self.root)
    }

    /// Returns the largest key in the index.
    pub fn last(&self) -> Option<&K> {
        self.max_key_under(self.root)
    }

    // ============================================================================
    // RANGE QUERY HELPERS
    // ============================================================================

    /// Find the leaf and offset of the first key satisfying the start bound.
    ///
    /// The offset may equal the leaf's length; the iterator then moves on to
    /// the next leaf in the chain.
    fn find_range_start(&self, start: Bound<&K>) -> Option<(&LeafNode<K>, usize)> {
        let (leaf_id, position) = match start {
            Bound::Included(key) => {
                let leaf_id = self.find_leaf(key);
                (leaf_id, self.leaf_arena[leaf_id].keys.partition_point(|k| k < key))
            }
            Bound::Excluded(key) => {
                let leaf_id = self.find_leaf(key);
                (leaf_id, self.leaf_arena[leaf_id].keys.partition_point(|k| k <= key))
            }
            Bound::Unbounded => (self.get_first_leaf_id(), 0),
        };
        self.get_leaf(leaf_id).map(|leaf| (leaf, position))
    }
}
