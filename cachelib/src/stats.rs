use std::fmt::{Display, Formatter};
use serde::{Deserialize, Serialize};
use crate::config::SimConfig;
use crate::geometry::WORD_SIZE;

// Timing model constants, in cycles
pub const DRAM_ACCESS_TIME: f64 = 64.0;
pub const DRAM_ACCESS_TIME_PER_WORD: f64 = 2.0;
pub const L1_HIT_TIME_CONST: f64 = 2.0;
pub const L1_HIT_TIME_PER_S: f64 = 0.2;
pub const L2_HIT_TIME_CONST: f64 = 8.0;
pub const L2_HIT_TIME_PER_S: f64 = 0.8;

/// Counters accumulated by [`crate::simulator::Simulator::access`], and the ratios and timings
/// derived from them by [`crate::simulator::Simulator::finish`]
///
/// Derived values are NaN when their denominator is zero, callers are expected to check
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimStats {
    pub reads: u64,
    pub writes: u64,
    pub accesses_l1: u64,
    pub reads_l2: u64,
    pub writes_l2: u64,
    pub write_backs_l1_or_victim_cache: u64,
    pub hits_l1: u64,
    pub hits_victim_cache: u64,
    pub read_hits_l2: u64,
    pub misses_l1: u64,
    pub misses_victim_cache: u64,
    pub read_misses_l2: u64,

    pub hit_ratio_l1: f64,
    pub hit_ratio_victim_cache: f64,
    pub read_hit_ratio_l2: f64,
    pub miss_ratio_l1: f64,
    pub miss_ratio_victim_cache: f64,
    pub read_miss_ratio_l2: f64,
    pub avg_access_time_l1: f64,
    pub avg_access_time_l2: f64,
    /// The DRAM time used for the L2 miss penalty, shortened by early restart when enabled
    pub averaged_miss_penalty_l2: f64,
}

/// Running sum of the critical word offsets of L2 misses, for early restart
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct EarlyRestartAccumulator {
    pub sum: u64,
    pub count: u64,
}

impl EarlyRestartAccumulator {
    pub fn record(&mut self, word_offset: u64) {
        self.sum += word_offset;
        self.count += 1;
    }

    /// The mean critical word offset, if a miss was ever recorded
    pub fn average(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum as f64 / self.count as f64)
    }
}

impl SimStats {
    /// Fills in the ratios and average access times from the counters
    ///
    /// The L1 access time multiplies the L1 and victim miss ratios. The victim ratios are over
    /// victim lookups, which are the L1 misses
    pub fn compute_derived(&mut self, config: &SimConfig, early_restart: &EarlyRestartAccumulator) {
        self.hit_ratio_l1 = self.hits_l1 as f64 / self.accesses_l1 as f64;
        self.miss_ratio_l1 = 1.0 - self.hit_ratio_l1;
        let victim_attempts = (self.hits_victim_cache + self.misses_victim_cache) as f64;
        self.hit_ratio_victim_cache = self.hits_victim_cache as f64 / victim_attempts;
        self.miss_ratio_victim_cache = self.misses_victim_cache as f64 / victim_attempts;
        self.read_hit_ratio_l2 = self.read_hits_l2 as f64 / self.reads_l2 as f64;
        self.read_miss_ratio_l2 = 1.0 - self.read_hit_ratio_l2;

        let hit_time_l1 = L1_HIT_TIME_CONST + config.l1.s as f64 * L1_HIT_TIME_PER_S;
        let hit_time_l2 = L2_HIT_TIME_CONST + config.l2.s as f64 * L2_HIT_TIME_PER_S;
        let words_per_block = (1u64 << config.l2.b) as f64 / WORD_SIZE as f64;
        let full_block_dram_time = DRAM_ACCESS_TIME + DRAM_ACCESS_TIME_PER_WORD * words_per_block;

        if config.l2.enabled {
            let dram_time = match early_restart.average() {
                Some(offset) if config.l2.early_restart => {
                    DRAM_ACCESS_TIME + DRAM_ACCESS_TIME_PER_WORD * offset
                }
                _ => full_block_dram_time,
            };
            self.averaged_miss_penalty_l2 = dram_time;
            self.avg_access_time_l2 = hit_time_l2 + self.read_miss_ratio_l2 * dram_time;
        } else {
            self.averaged_miss_penalty_l2 = full_block_dram_time;
            self.avg_access_time_l2 = full_block_dram_time;
        }
        self.avg_access_time_l1 = hit_time_l1
            + self.miss_ratio_l1 * self.miss_ratio_victim_cache * self.avg_access_time_l2;
    }
}

impl Display for SimStats {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Simulation statistics")?;
        writeln!(f, "Reads: {}", self.reads)?;
        writeln!(f, "Writes: {}", self.writes)?;
        writeln!(f, "L1 accesses: {}", self.accesses_l1)?;
        writeln!(f, "L1 hits: {}", self.hits_l1)?;
        writeln!(f, "L1 misses: {}", self.misses_l1)?;
        writeln!(f, "L1 hit ratio: {:.6}", self.hit_ratio_l1)?;
        writeln!(f, "L1 miss ratio: {:.6}", self.miss_ratio_l1)?;
        writeln!(f, "L1 average access time (AAT): {:.6}", self.avg_access_time_l1)?;
        writeln!(f, "Victim cache hits: {}", self.hits_victim_cache)?;
        writeln!(f, "Victim cache misses: {}", self.misses_victim_cache)?;
        writeln!(f, "Victim cache hit ratio: {:.6}", self.hit_ratio_victim_cache)?;
        writeln!(f, "Victim cache miss ratio: {:.6}", self.miss_ratio_victim_cache)?;
        writeln!(f, "L1/victim cache write backs: {}", self.write_backs_l1_or_victim_cache)?;
        writeln!(f, "L2 reads: {}", self.reads_l2)?;
        writeln!(f, "L2 writes: {}", self.writes_l2)?;
        writeln!(f, "L2 read hits: {}", self.read_hits_l2)?;
        writeln!(f, "L2 read misses: {}", self.read_misses_l2)?;
        writeln!(f, "L2 read hit ratio: {:.6}", self.read_hit_ratio_l2)?;
        writeln!(f, "L2 read miss ratio: {:.6}", self.read_miss_ratio_l2)?;
        writeln!(f, "L2 averaged miss penalty: {:.6}", self.averaged_miss_penalty_l2)?;
        write!(f, "L2 average access time (AAT): {:.6}", self.avg_access_time_l2)
    }
}
