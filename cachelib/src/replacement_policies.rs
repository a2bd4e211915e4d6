use crate::cache::CacheSet;
use crate::random::EvictRandom;
use crate::recency::Way;

/// Where a newly installed block lands in its set
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InsertionPoint {
    /// The most recently used position
    Front,
    /// The least recently used position, first in line for eviction
    Back,
}

/// A generic trait for implementing replacement policies. Can be used to parameterise a Cache.
///
/// Sets are kept in recency (or insertion) order by the cache, policies decide how that order
/// reacts to hits, where new blocks go, and which block leaves a full set
pub trait ReplacementPolicy {
    /// Updates the set when a block is hit, or refreshed by a write back
    ///
    /// Not applicable for some policies, a default which does nothing is provided
    ///
    /// # Arguments
    ///
    /// * `set`: The set holding the block
    /// * `way`: The block which was hit
    ///
    /// returns: ()
    fn update_on_hit(&mut self, _set: &mut CacheSet, _way: Way) {}

    /// The position a newly installed block takes
    fn insertion_point(&self) -> InsertionPoint;

    /// Chooses the block to evict from a full set, it is only called when no block is invalid
    ///
    /// Defaults to the last position, the least recently used or oldest block
    ///
    /// # Arguments
    ///
    /// * `set`: The full set
    /// * `rng`: The simulator's generator, for policies which need one
    ///
    /// returns: Way
    fn select_victim(&mut self, set: &CacheSet, _rng: &mut EvictRandom) -> Way {
        set.back()
    }
}

/// MRU insertion with LRU eviction, which is plain LRU. Used for L1 and the MIP L2 policy
#[derive(Debug, Default)]
pub struct MruInsertion;

impl ReplacementPolicy for MruInsertion {
    fn update_on_hit(&mut self, set: &mut CacheSet, way: Way) {
        set.move_to_front(way);
    }

    fn insertion_point(&self) -> InsertionPoint {
        InsertionPoint::Front
    }
}

/// LRU insertion with LRU eviction
///
/// New blocks start at the LRU position and have to be hit once to be promoted, which protects
/// the rest of the set from streaming accesses
#[derive(Debug, Default)]
pub struct LruInsertion;

impl ReplacementPolicy for LruInsertion {
    fn update_on_hit(&mut self, set: &mut CacheSet, way: Way) {
        set.move_to_front(way);
    }

    fn insertion_point(&self) -> InsertionPoint {
        InsertionPoint::Back
    }
}

/// First in first out. The set is kept in insertion order, hits never reorder it
#[derive(Debug, Default)]
pub struct FirstInFirstOut;

impl ReplacementPolicy for FirstInFirstOut {
    fn insertion_point(&self) -> InsertionPoint {
        InsertionPoint::Front
    }
}

/// Evicts a pseudo-random position and inserts at the back
///
/// The draw is taken modulo `ways - 1`, so the last position is never chosen. Direct mapped sets
/// evict their only block without drawing
#[derive(Debug, Default)]
pub struct RandomEviction;

impl ReplacementPolicy for RandomEviction {
    fn insertion_point(&self) -> InsertionPoint {
        InsertionPoint::Back
    }

    fn select_victim(&mut self, set: &CacheSet, rng: &mut EvictRandom) -> Way {
        let ways = set.len();
        let position = if ways > 1 {
            rng.next() as usize % (ways - 1)
        } else {
            0
        };
        set.at(position).unwrap_or_else(|| set.back())
    }
}
