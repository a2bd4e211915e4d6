use crate::cache::CacheBlock;
use crate::recency::{RecencyList, Way};

/// A block held by the victim buffer, remembering the L1 set it was evicted from
///
/// The buffer is shared by every L1 set, the index is what routes a promoted block back to the
/// right one
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct VictimEntry {
    pub tag: u64,
    pub index: u64,
    pub valid: bool,
    pub dirty: bool,
}

impl VictimEntry {
    /// Wraps a block evicted from L1 set `index`
    pub fn new(block: CacheBlock, index: u64) -> Self {
        Self {
            tag: block.tag,
            index,
            valid: block.valid,
            dirty: block.dirty,
        }
    }
}

/// A small fully associative buffer catching L1 evictions, kept in MRU to LRU order
pub struct VictimBuffer {
    entries: RecencyList<VictimEntry>,
}

impl VictimBuffer {
    /// Creates an empty buffer. `capacity` must be at least 1
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: RecencyList::new(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Finds the valid entry evicted from L1 set `index` with the given tag
    pub fn probe(&self, tag: u64, index: u64) -> Option<Way> {
        self.entries
            .find(|entry| entry.valid && entry.tag == tag && entry.index == index)
    }

    pub fn entry(&self, way: Way) -> &VictimEntry {
        self.entries.get(way)
    }

    /// Swaps a promoted entry for the L1 block it displaced, which becomes the MRU entry
    ///
    /// returns: the promoted entry
    pub fn swap(&mut self, way: Way, displaced: VictimEntry) -> VictimEntry {
        let promoted = self.entries.replace(way, displaced);
        self.entries.move_to_front(way);
        promoted
    }

    /// Takes a promoted entry out without a replacement, the freed slot becomes the LRU entry
    ///
    /// returns: the promoted entry
    pub fn release(&mut self, way: Way) -> VictimEntry {
        let promoted = self.entries.replace(way, VictimEntry::default());
        self.entries.move_to_back(way);
        promoted
    }

    /// Inserts an entry evicted from L1 at the MRU position
    ///
    /// The first invalid slot is used if there is one, otherwise the LRU entry leaves the buffer
    /// and is returned so the caller can write it back
    pub fn absorb(&mut self, entry: VictimEntry) -> Option<VictimEntry> {
        let way = self
            .entries
            .find(|entry| !entry.valid)
            .unwrap_or_else(|| self.entries.back());
        let evicted = self.entries.replace(way, entry);
        self.entries.move_to_front(way);
        Some(evicted).filter(|entry| entry.valid)
    }

    /// Iterates over the entries from MRU to LRU
    pub fn iter(&self) -> impl Iterator<Item = &VictimEntry> {
        self.entries.iter().map(|(_, entry)| entry)
    }

    pub fn get_invalid_entry_count(&self) -> usize {
        self.iter().filter(|entry| !entry.valid).count()
    }
}
