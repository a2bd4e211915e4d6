use crate::config::ReplacementPolicyConfig;
use crate::geometry::Geometry;
use crate::random::EvictRandom;
use crate::recency::{RecencyList, Way};
use crate::replacement_policies::{FirstInFirstOut, InsertionPoint, LruInsertion, MruInsertion, RandomEviction, ReplacementPolicy};

/// A block of a set associative cache. Invalid blocks hold `{tag: 0, dirty: false}`
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct CacheBlock {
    pub tag: u64,
    pub valid: bool,
    pub dirty: bool,
}

impl CacheBlock {
    /// A valid block
    pub fn new(tag: u64, dirty: bool) -> Self {
        Self {
            tag,
            valid: true,
            dirty,
        }
    }
}

/// The ways of one set, front to back in the order maintained by the replacement policy
pub type CacheSet = RecencyList<CacheBlock>;

/// A generic trait for the set associative levels of the hierarchy
///
/// Sets are addressed by the index produced by the level's own [`Geometry`], blocks within a set
/// by their stable [`Way`]. The trait assumes callers decompose addresses themselves, as write
/// backs arrive with a tag and index computed from another level
pub trait CacheTrait {
    /// The geometry used to size and address this cache
    fn geometry(&self) -> &Geometry;

    /// Finds the valid block with a given tag in a set
    ///
    /// # Arguments
    ///
    /// * `tag`: The tag of the block
    /// * `index`: The set index
    ///
    /// returns: Option<Way>
    fn lookup(&self, tag: u64, index: u64) -> Option<Way>;

    /// Reads a set, front to back
    fn set(&self, index: u64) -> &CacheSet;

    /// Marks a block as modified
    fn mark_dirty(&mut self, index: u64, way: Way);

    /// Lets the replacement policy react to a hit (or a write back refresh) on a block
    fn update_on_hit(&mut self, index: u64, way: Way);

    /// Installs a block in a set, returning the valid block it displaced, if any
    ///
    /// The first invalid way is used if there is one, otherwise the replacement policy picks the
    /// victim. The new block is then placed where the policy inserts
    ///
    /// # Arguments
    ///
    /// * `index`: The set index
    /// * `block`: The block to install, ownership moves into the set
    /// * `rng`: The generator consulted by the RANDOM policy
    ///
    /// returns: Option<CacheBlock>
    fn install(&mut self, index: u64, block: CacheBlock, rng: &mut EvictRandom) -> Option<CacheBlock>;

    /// Gets the number of invalid blocks. Useful for analysing cache performance or debugging
    fn get_invalid_block_count(&self) -> usize;
}

/// A set associative cache, parameterised by a replacement policy
///
/// The provided policies are unit structs, so monomorphisation lets the compiler inline the
/// policy decisions into the lookup and install paths
pub struct Cache<R: ReplacementPolicy> {
    geometry: Geometry,
    sets: Vec<CacheSet>,
    replacement_policy: R,
}

impl<R: ReplacementPolicy> Cache<R> {
    pub fn new(geometry: Geometry, policy: R) -> Self {
        Self {
            sets: (0..geometry.sets()).map(|_| CacheSet::new(geometry.ways())).collect(),
            geometry,
            replacement_policy: policy,
        }
    }
}

impl<R: ReplacementPolicy> CacheTrait for Cache<R> {
    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    fn lookup(&self, tag: u64, index: u64) -> Option<Way> {
        self.sets[index as usize].find(|block| block.valid && block.tag == tag)
    }

    fn set(&self, index: u64) -> &CacheSet {
        &self.sets[index as usize]
    }

    fn mark_dirty(&mut self, index: u64, way: Way) {
        self.sets[index as usize].get_mut(way).dirty = true;
    }

    fn update_on_hit(&mut self, index: u64, way: Way) {
        self.replacement_policy.update_on_hit(&mut self.sets[index as usize], way);
    }

    fn install(&mut self, index: u64, block: CacheBlock, rng: &mut EvictRandom) -> Option<CacheBlock> {
        let set = &mut self.sets[index as usize];
        let way = match set.find(|block| !block.valid) {
            Some(way) => way,
            None => self.replacement_policy.select_victim(set, rng),
        };
        let displaced = set.replace(way, block);
        match self.replacement_policy.insertion_point() {
            InsertionPoint::Front => set.move_to_front(way),
            InsertionPoint::Back => set.move_to_back(way),
        }
        Some(displaced).filter(|block| block.valid)
    }

    fn get_invalid_block_count(&self) -> usize {
        self.sets
            .iter()
            .map(|set| set.iter().filter(|(_, block)| !block.valid).count())
            .sum()
    }
}

/// L1 always inserts at MRU and evicts the LRU block
pub type L1Cache = Cache<MruInsertion>;

/// Enum for the 4 L2 replacement policies
///
/// Trait objects would hide the concrete policy from the compiler on every access, explicitly
/// branching on all implementations lets it inline the policy into each variant
pub enum GenericCache {
    Mip(Cache<MruInsertion>),
    Lip(Cache<LruInsertion>),
    Fifo(Cache<FirstInFirstOut>),
    Random(Cache<RandomEviction>),
}

impl GenericCache {
    /// Creates a cache with the configured replacement policy
    pub fn new(geometry: Geometry, policy: ReplacementPolicyConfig) -> Self {
        match policy {
            ReplacementPolicyConfig::Mip => Cache::new(geometry, MruInsertion).into(),
            ReplacementPolicyConfig::Lip => Cache::new(geometry, LruInsertion).into(),
            ReplacementPolicyConfig::Fifo => Cache::new(geometry, FirstInFirstOut).into(),
            ReplacementPolicyConfig::Random => Cache::new(geometry, RandomEviction).into(),
        }
    }
}

impl From<Cache<MruInsertion>> for GenericCache {
    fn from(value: Cache<MruInsertion>) -> Self {
        Self::Mip(value)
    }
}

impl From<Cache<LruInsertion>> for GenericCache {
    fn from(value: Cache<LruInsertion>) -> Self {
        Self::Lip(value)
    }
}

impl From<Cache<FirstInFirstOut>> for GenericCache {
    fn from(value: Cache<FirstInFirstOut>) -> Self {
        Self::Fifo(value)
    }
}

impl From<Cache<RandomEviction>> for GenericCache {
    fn from(value: Cache<RandomEviction>) -> Self {
        Self::Random(value)
    }
}

impl CacheTrait for GenericCache {
    fn geometry(&self) -> &Geometry {
        match self {
            GenericCache::Mip(c) => c.geometry(),
            GenericCache::Lip(c) => c.geometry(),
            GenericCache::Fifo(c) => c.geometry(),
            GenericCache::Random(c) => c.geometry(),
        }
    }

    fn lookup(&self, tag: u64, index: u64) -> Option<Way> {
        match self {
            GenericCache::Mip(c) => c.lookup(tag, index),
            GenericCache::Lip(c) => c.lookup(tag, index),
            GenericCache::Fifo(c) => c.lookup(tag, index),
            GenericCache::Random(c) => c.lookup(tag, index),
        }
    }

    fn set(&self, index: u64) -> &CacheSet {
        match self {
            GenericCache::Mip(c) => c.set(index),
            GenericCache::Lip(c) => c.set(index),
            GenericCache::Fifo(c) => c.set(index),
            GenericCache::Random(c) => c.set(index),
        }
    }

    fn mark_dirty(&mut self, index: u64, way: Way) {
        match self {
            GenericCache::Mip(c) => c.mark_dirty(index, way),
            GenericCache::Lip(c) => c.mark_dirty(index, way),
            GenericCache::Fifo(c) => c.mark_dirty(index, way),
            GenericCache::Random(c) => c.mark_dirty(index, way),
        }
    }

    fn update_on_hit(&mut self, index: u64, way: Way) {
        match self {
            GenericCache::Mip(c) => c.update_on_hit(index, way),
            GenericCache::Lip(c) => c.update_on_hit(index, way),
            GenericCache::Fifo(c) => c.update_on_hit(index, way),
            GenericCache::Random(c) => c.update_on_hit(index, way),
        }
    }

    fn install(&mut self, index: u64, block: CacheBlock, rng: &mut EvictRandom) -> Option<CacheBlock> {
        match self {
            GenericCache::Mip(c) => c.install(index, block, rng),
            GenericCache::Lip(c) => c.install(index, block, rng),
            GenericCache::Fifo(c) => c.install(index, block, rng),
            GenericCache::Random(c) => c.install(index, block, rng),
        }
    }

    fn get_invalid_block_count(&self) -> usize {
        match self {
            GenericCache::Mip(c) => c.get_invalid_block_count(),
            GenericCache::Lip(c) => c.get_invalid_block_count(),
            GenericCache::Fifo(c) => c.get_invalid_block_count(),
            GenericCache::Random(c) => c.get_invalid_block_count(),
        }
    }
}
