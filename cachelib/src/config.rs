use std::fmt::{Display, Formatter};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A configuration for the whole hierarchy: an L1, an optional victim buffer, and an optional L2
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    pub l1: CacheLevelConfig,
    /// Number of entries in the fully associative victim buffer, 0 disables it
    #[serde(default)]
    pub victim_capacity: u64,
    pub l2: CacheLevelConfig,
}

/// A configuration for a single cache level, in (C, B, S) form
///
/// The level holds 2^C bytes in blocks of 2^B bytes, grouped into sets of 2^S ways
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheLevelConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub c: u64,
    pub b: u64,
    pub s: u64,
    #[serde(default = "ReplacementPolicyConfig::default")]
    pub replacement_policy: ReplacementPolicyConfig,
    #[serde(default = "WriteStrategyConfig::default")]
    pub write_strategy: WriteStrategyConfig,
    #[serde(default)]
    pub early_restart: bool,
}

fn default_enabled() -> bool {
    true
}

/// The replacement policy - mip, lip, fifo, or random. Defaults to mip.
///
/// Only consulted for L2, L1 always inserts at MRU and evicts the LRU block
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ReplacementPolicyConfig {
    /// MRU insertion, LRU eviction
    #[serde(alias = "mip")]
    Mip,
    /// LRU insertion, LRU eviction
    #[serde(alias = "lip")]
    Lip,
    /// Insertion order eviction, hits never reorder
    #[serde(alias = "fifo")]
    Fifo,
    /// Pseudo-random eviction driven by the simulator's generator
    #[serde(alias = "random")]
    Random,
}

impl Default for ReplacementPolicyConfig {
    fn default() -> Self {
        ReplacementPolicyConfig::Mip
    }
}

impl Display for ReplacementPolicyConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ReplacementPolicyConfig::Mip => "MIP",
            ReplacementPolicyConfig::Lip => "LIP",
            ReplacementPolicyConfig::Fifo => "FIFO",
            ReplacementPolicyConfig::Random => "RANDOM",
        };
        f.write_str(name)
    }
}

/// The write strategy - write back with write allocate, or write through with no write allocate
///
/// The engine models L1 as write back/write allocate and never allocates L2 on write backs,
/// whichever value is configured
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WriteStrategyConfig {
    #[serde(alias = "wbwa")]
    WriteBackWriteAllocate,
    #[serde(alias = "wtwna")]
    WriteThroughWriteNoAllocate,
}

impl Default for WriteStrategyConfig {
    fn default() -> Self {
        WriteStrategyConfig::WriteBackWriteAllocate
    }
}

impl Display for WriteStrategyConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            WriteStrategyConfig::WriteBackWriteAllocate => f.write_str("WBWA"),
            WriteStrategyConfig::WriteThroughWriteNoAllocate => f.write_str("WTWNA"),
        }
    }
}

impl Default for SimConfig {
    /// 1KB 2-way L1 with 64 byte blocks, a 2 entry victim buffer, and a 32KB 8-way LIP L2
    fn default() -> Self {
        Self {
            l1: CacheLevelConfig {
                enabled: true,
                c: 10,
                b: 6,
                s: 1,
                replacement_policy: ReplacementPolicyConfig::Mip,
                write_strategy: WriteStrategyConfig::WriteBackWriteAllocate,
                early_restart: false,
            },
            victim_capacity: 2,
            l2: CacheLevelConfig {
                enabled: true,
                c: 15,
                b: 6,
                s: 3,
                replacement_policy: ReplacementPolicyConfig::Lip,
                write_strategy: WriteStrategyConfig::WriteThroughWriteNoAllocate,
                early_restart: false,
            },
        }
    }
}

impl Display for CacheLevelConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if !self.enabled {
            return f.write_str("disabled");
        }
        write!(
            f,
            "(C,B,S): ({},{},{}). Replace policy: {}. Write strategy: {}. Early restart: {}",
            self.c,
            self.b,
            self.s,
            self.replacement_policy,
            self.write_strategy,
            if self.early_restart { "enabled" } else { "disabled" }
        )
    }
}

impl Display for SimConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "L1 {}", self.l1)?;
        if self.victim_capacity > 0 {
            writeln!(f, "Victim cache: {} entries", self.victim_capacity)?;
        } else {
            writeln!(f, "Victim cache: disabled")?;
        }
        write!(f, "L2 {}", self.l2)
    }
}
