use crate::config::CacheLevelConfig;
use crate::error::ConfigError;

/// Size of a word in bytes, used for the early restart critical word offset and DRAM transfers
pub const WORD_SIZE: u64 = 8;

/// Splits addresses into tag, set index, and block offset for one cache level
///
/// Every level decomposes the same address independently, so L1 and L2 each hold their own
/// geometry
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Geometry {
    block_offset_bits: u64,
    index_bits: u64,
    associativity_bits: u64,
}

impl Geometry {
    /// Builds the geometry for a level, rejecting capacities smaller than one full set
    ///
    /// # Examples
    ///
    /// ```
    /// use cachelib::geometry::Geometry;
    /// let l1 = Geometry::new("L1", 10, 6, 1).unwrap();
    /// assert_eq!(l1.sets(), 8);
    /// assert_eq!(l1.ways(), 2);
    /// assert!(Geometry::new("L1", 6, 6, 1).is_err());
    /// ```
    pub fn new(level: &'static str, c: u64, b: u64, s: u64) -> Result<Self, ConfigError> {
        if c >= u64::BITS as u64 {
            return Err(ConfigError::CapacityTooLarge { level, c });
        }
        let index_bits = c
            .checked_sub(b)
            .and_then(|rest| rest.checked_sub(s))
            .ok_or(ConfigError::InvalidGeometry { level, c, b, s })?;
        Ok(Self {
            block_offset_bits: b,
            index_bits,
            associativity_bits: s,
        })
    }

    pub fn from_config(level: &'static str, config: &CacheLevelConfig) -> Result<Self, ConfigError> {
        Self::new(level, config.c, config.b, config.s)
    }

    pub fn block_offset_bits(&self) -> u64 {
        self.block_offset_bits
    }

    pub fn index_bits(&self) -> u64 {
        self.index_bits
    }

    pub fn associativity_bits(&self) -> u64 {
        self.associativity_bits
    }

    pub fn sets(&self) -> usize {
        1 << self.index_bits
    }

    pub fn ways(&self) -> usize {
        1 << self.associativity_bits
    }

    pub fn block_size(&self) -> u64 {
        1 << self.block_offset_bits
    }

    pub fn capacity(&self) -> u64 {
        1 << (self.block_offset_bits + self.index_bits + self.associativity_bits)
    }

    fn index_mask(&self) -> u64 {
        (1 << self.index_bits) - 1
    }

    pub fn tag(&self, address: u64) -> u64 {
        // Shifting by 64 would overflow, the tag of a capacity-wide cache is empty
        address
            .checked_shr((self.block_offset_bits + self.index_bits) as u32)
            .unwrap_or(0)
    }

    /// The set index, 0 when the level is fully associative
    pub fn index(&self, address: u64) -> u64 {
        (address >> self.block_offset_bits) & self.index_mask()
    }

    /// Converts an address into a tag and a set index
    ///
    /// # Examples
    ///
    /// ```
    /// use cachelib::geometry::Geometry;
    /// let l1 = Geometry::new("L1", 10, 6, 1).unwrap();
    /// assert_eq!(l1.decompose(0x1c0), (0, 7));
    /// assert_eq!(l1.decompose(0x240), (1, 1));
    /// ```
    pub fn decompose(&self, address: u64) -> (u64, u64) {
        (self.tag(address), self.index(address))
    }

    /// Rebuilds the block address (the address without its offset bits) from a tag and index
    pub fn block_address(&self, tag: u64, index: u64) -> u64 {
        tag.checked_shl(self.index_bits as u32).unwrap_or(0) | index
    }

    /// Splits a block address produced by another level into this level's tag and index
    pub fn split_block_address(&self, block_address: u64) -> (u64, u64) {
        (
            block_address.checked_shr(self.index_bits as u32).unwrap_or(0),
            block_address & self.index_mask(),
        )
    }

    /// The offset in words of the addressed byte within its block
    pub fn word_offset(&self, address: u64) -> u64 {
        (address & (self.block_size() - 1)) / WORD_SIZE
    }
}
