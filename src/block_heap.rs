//! The block priority structure `D`.
//!
//! Ordered multiset of `(key, vertex)` pairs supporting insert-with-decrease,
//! `pull` of a bounded block of smallest-key elements, and batched
//! prepending of small-key pairs. Backed by a binary heap plus a side map
//! from vertex to its current best key: a lazy-deletion shape where stale
//! heap entries are left in place and skipped over (rather than removed
//! eagerly) whenever they surface at the top.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use num_traits::Float;

use crate::error::{BmsspError, Result};
use crate::ordered_float::OrderedFloat;

/// The block priority structure `D`.
///
/// Every `BMSSP` recursion frame owns exactly one `D`, scoped to that
/// frame's lifetime.
pub struct BlockD<T> {
    heap: BinaryHeap<Reverse<(OrderedFloat<T>, usize)>>,
    /// Current best (smallest) key recorded for each live vertex.
    best: HashMap<usize, T>,
    m: usize,
    b_upper: T,
    block_size: usize,
}

impl<T: Float> BlockD<T> {
    /// Create a new, empty `D`.
    ///
    /// `m` is a capacity hint (not a hard cap) derived from the recursion
    /// level; it only affects the default `block_size` when `block_size`
    /// is `None`. `b_upper` is retained for interface completeness but is
    /// never read by any operation here.
    pub fn new(m: usize, b_upper: T, block_size: Option<usize>) -> Self {
        let m = m.max(1);
        let block_size = block_size.filter(|&b| b > 0).unwrap_or_else(|| (m / 8).max(1));
        Self {
            heap: BinaryHeap::new(),
            best: HashMap::new(),
            m,
            b_upper,
            block_size,
        }
    }

    pub fn m(&self) -> usize {
        self.m
    }

    pub fn b_upper(&self) -> T {
        self.b_upper
    }

    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Record `key` for `v` if `D` has no live entry for `v`, or its
    /// current best strictly exceeds `key`. The superseded entry (if any)
    /// is left in the heap as a tombstone, discarded lazily on the next
    /// cleanup.
    pub fn insert(&mut self, v: usize, key: T) {
        let is_improvement = match self.best.get(&v) {
            Some(&current) => key < current,
            None => true,
        };
        if is_improvement {
            self.best.insert(v, key);
            self.heap.push(Reverse((OrderedFloat(key), v)));
        }
    }

    /// Insert every `(vertex, key)` pair, preserving `insert`'s semantics:
    /// no vertex is ever later served with a larger stale key.
    pub fn batch_prepend(&mut self, pairs: impl IntoIterator<Item = (usize, T)>) {
        for (v, key) in pairs {
            self.insert(v, key);
        }
    }

    /// Discard tombstones sitting at the top of the heap.
    fn cleanup(&mut self) {
        while let Some(&Reverse((OrderedFloat(key), v))) = self.heap.peek() {
            match self.best.get(&v) {
                Some(&current) if current == key => break,
                _ => {
                    self.heap.pop();
                }
            }
        }
    }

    /// True iff no live entry remains.
    pub fn is_empty(&mut self) -> bool {
        self.cleanup();
        self.heap.is_empty()
    }

    /// Pull a block of up to `block_size` distinct vertices with the
    /// smallest live keys.
    ///
    /// Returns `(b_i, s_i)` where `b_i` is the smallest live key *before*
    /// the pull and `s_i` holds up to `block_size` vertices (fewer if `D`
    /// drains first); none of the returned vertices remain live afterward.
    ///
    /// # Errors
    ///
    /// Returns [`BmsspError::EmptyPull`] if `D` holds no live entries.
    /// Callers treat this as a clean "no more work" signal, never a hard
    /// failure.
    pub fn pull(&mut self) -> Result<(T, Vec<usize>)> {
        self.cleanup();
        let b_i = match self.heap.peek() {
            Some(&Reverse((OrderedFloat(key), _))) => key,
            None => return Err(BmsspError::EmptyPull),
        };

        let mut s_i = Vec::with_capacity(self.block_size);
        while s_i.len() < self.block_size {
            let Some(Reverse((OrderedFloat(key), v))) = self.heap.pop() else {
                break;
            };
            if self.best.get(&v) == Some(&key) {
                s_i.push(v);
                self.best.remove(&v);
            }
        }

        Ok((b_i, s_i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_pull_smallest_first() {
        let mut d = BlockD::new(8, f32::INFINITY, Some(2));
        d.insert(0, 5.0);
        d.insert(1, 1.0);
        d.insert(2, 3.0);

        let (b_i, s_i) = d.pull().unwrap();
        assert_eq!(b_i, 1.0);
        assert_eq!(s_i, vec![1, 2]);
    }

    #[test]
    fn test_decrease_key_wins_lazy_tombstone() {
        // insert(v, k1) then insert(v, k2) with k2 < k1, only k2 is
        // ever served.
        let mut d = BlockD::new(8, f32::INFINITY, Some(10));
        d.insert(0, 10.0);
        d.insert(0, 2.0);

        let (b_i, s_i) = d.pull().unwrap();
        assert_eq!(b_i, 2.0);
        assert_eq!(s_i, vec![0]);
    }

    #[test]
    fn test_insert_with_larger_key_is_ignored() {
        let mut d = BlockD::new(8, f32::INFINITY, Some(10));
        d.insert(0, 2.0);
        d.insert(0, 10.0); // larger: must not overwrite the live best

        let (b_i, _) = d.pull().unwrap();
        assert_eq!(b_i, 2.0);
    }

    #[test]
    fn test_pull_respects_block_size() {
        // pull returns at most block_size of the smallest live keys.
        let mut d = BlockD::new(8, f32::INFINITY, Some(2));
        for v in 0..5 {
            d.insert(v, v as f32);
        }
        let (_, s_i) = d.pull().unwrap();
        assert_eq!(s_i.len(), 2);
        assert_eq!(s_i, vec![0, 1]);

        let (_, s_i2) = d.pull().unwrap();
        assert_eq!(s_i2, vec![2, 3]);
    }

    #[test]
    fn test_pull_returns_fewer_than_block_size_when_draining() {
        let mut d = BlockD::new(8, f32::INFINITY, Some(10));
        d.insert(0, 1.0);
        d.insert(1, 2.0);

        let (_, s_i) = d.pull().unwrap();
        assert_eq!(s_i.len(), 2);
        assert!(d.is_empty());
    }

    #[test]
    fn test_empty_true_iff_no_live_entries() {
        let mut d: BlockD<f32> = BlockD::new(8, f32::INFINITY, Some(4));
        assert!(d.is_empty());

        d.insert(0, 1.0);
        assert!(!d.is_empty());

        let _ = d.pull().unwrap();
        assert!(d.is_empty());
    }

    #[test]
    fn test_pull_from_empty_errors() {
        let mut d: BlockD<f32> = BlockD::new(8, f32::INFINITY, Some(4));
        assert!(matches!(d.pull(), Err(BmsspError::EmptyPull)));
    }

    #[test]
    fn test_batch_prepend_matches_repeated_insert() {
        let mut d = BlockD::new(8, f32::INFINITY, Some(10));
        d.batch_prepend(vec![(0, 3.0), (1, 1.0), (2, 2.0)]);

        let (b_i, s_i) = d.pull().unwrap();
        assert_eq!(b_i, 1.0);
        assert_eq!(s_i, vec![1, 2, 0]);
    }

    #[test]
    fn test_batch_prepend_preserves_best_key() {
        let mut d = BlockD::new(8, f32::INFINITY, Some(10));
        d.insert(0, 1.0);
        // A later, larger batch-prepended key for the same vertex must not
        // be served.
        d.batch_prepend(vec![(0, 5.0)]);

        let (b_i, _) = d.pull().unwrap();
        assert_eq!(b_i, 1.0);
    }

    #[test]
    fn test_default_block_size_from_m() {
        let d: BlockD<f32> = BlockD::new(64, f32::INFINITY, None);
        assert_eq!(d.block_size(), 8); // max(1, 64/8)
    }

    #[test]
    fn test_default_block_size_minimum_one() {
        let d: BlockD<f32> = BlockD::new(1, f32::INFINITY, None);
        assert_eq!(d.block_size(), 1);
    }

    #[test]
    fn test_non_positive_block_size_falls_back_to_default() {
        let d: BlockD<f32> = BlockD::new(16, f32::INFINITY, Some(0));
        assert_eq!(d.block_size(), 2);
    }
}
