//! Iterator implementations for BPlusIndex.
//!
//! Both iterators walk the leaf chain: they descend the tree once to find
//! their starting leaf and then follow `next` links, never re-entering the
//! branch levels.

use std::iter::FusedIterator;
use std::ops::Bound;

use crate::types::{BPlusIndex, LeafNode};

// ============================================================================
// ITERATOR STRUCTS
// ============================================================================

/// Iterator over every key in ascending order.
pub struct Iter<'a, K> {
    index: &'a BPlusIndex<K>,
    current_leaf: Option<&'a LeafNode<K>>,
    position: usize,
    remaining: usize,
}

/// Lazy forward scan over the keys inside a range.
///
/// Stops at the first key beyond the end bound or at the end of the chain.
pub struct RangeIter<'a, K> {
    index: &'a BPlusIndex<K>,
    current_leaf: Option<&'a LeafNode<K>>,
    position: usize,
    end: Bound<K>,
    finished: bool,
}

// ============================================================================
// INDEX ITERATOR METHODS
// ============================================================================

impl<K: Ord + Clone> BPlusIndex<K> {
    /// Returns an iterator over all keys in sorted order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            index: self,
            current_leaf: self.get_leaf(self.get_first_leaf_id()),
            position: 0,
            remaining: self.len,
        }
    }
}

impl<'a, K: Ord + Clone> IntoIterator for &'a BPlusIndex<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// ============================================================================
// ITER IMPLEMENTATION
// ============================================================================

impl<'a, K: Ord + Clone> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let leaf = self.current_leaf?;
            if let Some(key) = leaf.keys.get(self.position) {
                self.position += 1;
                self.remaining = self.remaining.saturating_sub(1);
                return Some(key);
            }
            let index = self.index;
            self.current_leaf = leaf.next_leaf().and_then(|id| index.get_leaf(id));
            self.position = 0;
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K: Ord + Clone> ExactSizeIterator for Iter<'_, K> {}

impl<K: Ord + Clone> FusedIterator for Iter<'_, K> {}

// ============================================================================
// RANGE ITERATOR IMPLEMENTATION
// ============================================================================

impl<'a, K: Ord + Clone> RangeIter<'a, K> {
    pub(crate) fn new(
        index: &'a BPlusIndex<K>,
        start: Option<(&'a LeafNode<K>, usize)>,
        end: Bound<K>,
    ) -> Self {
        let (current_leaf, position) = match start {
            Some((leaf, position)) => (Some(leaf), position),
            None => (None, 0),
        };
        Self {
            index,
            current_leaf,
            position,
            end,
            finished: false,
        }
    }

    fn is_past_end(&self, key: &K) -> bool {
        match &self.end {
            Bound::Included(end) => key > end,
            Bound::Excluded(end) => key >= end,
            Bound::Unbounded => false,
        }
    }
}

impl<'a, K: Ord + Clone> Iterator for RangeIter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        loop {
            let Some(leaf) = self.current_leaf else {
                self.finished = true;
                return None;
            };
            if let Some(key) = leaf.keys.get(self.position) {
                if self.is_past_end(key) {
                    self.finished = true;
                    return None;
                }
                self.position += 1;
                return Some(key);
            }
            let index = self.index;
            self.current_leaf = leaf.next_leaf().and_then(|id| index.get_leaf(id));
            self.position = 0;
        }
    }
}

impl<K: Ord + Clone> FusedIterator for RangeIter<'_, K> {}
