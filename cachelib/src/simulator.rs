use std::io::BufRead;
use std::time::{Duration, Instant};
use tracing::{info, trace, warn};
use crate::cache::{CacheBlock, CacheTrait, GenericCache, L1Cache};
use crate::config::{ReplacementPolicyConfig, SimConfig, WriteStrategyConfig};
use crate::error::{ConfigError, TraceError};
use crate::geometry::Geometry;
use crate::random::EvictRandom;
use crate::replacement_policies::MruInsertion;
use crate::stats::{EarlyRestartAccumulator, SimStats};
use crate::trace::{Operation, TraceReader};
use crate::victim::{VictimBuffer, VictimEntry};

/// The simulation context: every set, the victim buffer, the eviction generator, and the early
/// restart accumulator of one hierarchy
///
/// Each trace event is handed to [`Simulator::access`], which runs it through L1, the victim
/// buffer, and L2 to completion before returning. Counters are kept in a caller owned
/// [`SimStats`], so one simulator can be reused across several counter sets
pub struct Simulator {
    config: SimConfig,
    l1: L1Cache,
    victim: Option<VictimBuffer>,
    l2: Option<GenericCache>,
    rng: EvictRandom,
    early_restart: EarlyRestartAccumulator,
    simulation_time: Duration,
}

impl Simulator {
    /// Creates a simulator with every block invalid
    ///
    /// # Arguments
    ///
    /// * `config`: A hierarchy configuration, usually resulting from parsing JSON
    ///
    /// returns: Result<Simulator, ConfigError>, an error if any enabled level has C < B + S. A
    /// disabled L2 still sets the DRAM transfer size, so its block size must fit an address
    pub fn new(config: &SimConfig) -> Result<Self, ConfigError> {
        if !config.l1.enabled {
            return Err(ConfigError::L1Disabled);
        }
        let l1_geometry = Geometry::from_config("L1", &config.l1)?;
        let l2_geometry = if config.l2.enabled {
            Some(Geometry::from_config("L2", &config.l2)?)
        } else if config.l2.b >= u64::BITS as u64 {
            return Err(ConfigError::BlockTooLarge { level: "L2", b: config.l2.b });
        } else {
            None
        };
        Self::warn_about_unmodelled_settings(config);

        info!(
            sets = l1_geometry.sets(),
            ways = l1_geometry.ways(),
            block_size = l1_geometry.block_size(),
            "L1 configured"
        );
        if config.victim_capacity > 0 {
            info!(entries = config.victim_capacity, "Victim cache configured");
        }
        if let Some(geometry) = &l2_geometry {
            info!(
                sets = geometry.sets(),
                ways = geometry.ways(),
                block_size = geometry.block_size(),
                policy = %config.l2.replacement_policy,
                "L2 configured"
            );
        }

        Ok(Self {
            config: *config,
            l1: L1Cache::new(l1_geometry, MruInsertion),
            victim: (config.victim_capacity > 0).then(|| VictimBuffer::new(config.victim_capacity as usize)),
            l2: l2_geometry.map(|geometry| GenericCache::new(geometry, config.l2.replacement_policy)),
            rng: EvictRandom::default(),
            early_restart: EarlyRestartAccumulator::default(),
            simulation_time: Duration::new(0, 0),
        })
    }

    fn warn_about_unmodelled_settings(config: &SimConfig) {
        if config.l1.replacement_policy != ReplacementPolicyConfig::Mip {
            warn!(policy = %config.l1.replacement_policy, "L1 always uses MIP, the configured policy is ignored");
        }
        if config.l1.write_strategy != WriteStrategyConfig::WriteBackWriteAllocate {
            warn!("L1 is simulated as write back, write allocate");
        }
        if config.l1.early_restart {
            warn!("Early restart is only modelled for L2 misses");
        }
        if config.l2.enabled && config.l1.b != config.l2.b {
            warn!(l1 = config.l1.b, l2 = config.l2.b, "Write backs assume L1 and L2 share a block size");
        }
    }

    /// Simulates one access, updating the counters in `stats`
    ///
    /// Every access looks up L1. Misses then probe the victim buffer, and victim misses read L2
    /// before the block is installed in L1. Blocks evicted from L1 go to the victim buffer if
    /// there is one, dirty blocks leaving the hierarchy are written back
    ///
    /// # Arguments
    ///
    /// * `operation`: Read or write
    /// * `address`: The byte address, bits above the L1 tag are ignored
    /// * `stats`: The counters to update
    pub fn access(&mut self, operation: Operation, address: u64, stats: &mut SimStats) {
        let is_write = operation == Operation::Write;
        match operation {
            Operation::Read => stats.reads += 1,
            Operation::Write => stats.writes += 1,
        }
        stats.accesses_l1 += 1;

        let (tag, index) = self.l1.geometry().decompose(address);
        if let Some(way) = self.l1.lookup(tag, index) {
            trace!(address, tag, index, "L1 hit");
            stats.hits_l1 += 1;
            if is_write {
                self.l1.mark_dirty(index, way);
            }
            self.l1.update_on_hit(index, way);
            return;
        }
        trace!(address, tag, index, "L1 miss");
        stats.misses_l1 += 1;

        if self.promote_from_victim(tag, index, is_write) {
            stats.hits_victim_cache += 1;
            return;
        }
        // Without a victim buffer every L1 miss still counts as a victim miss
        stats.misses_victim_cache += 1;

        self.read_l2(address, stats);

        if let Some(evicted) = self.l1.install(index, CacheBlock::new(tag, is_write), &mut self.rng) {
            self.evict_from_l1(evicted, index, stats);
        }
    }

    /// Moves a block from the victim buffer back into L1, returns false on a victim miss
    fn promote_from_victim(&mut self, tag: u64, index: u64, is_write: bool) -> bool {
        let Some(victim) = self.victim.as_mut() else {
            return false;
        };
        let Some(way) = victim.probe(tag, index) else {
            return false;
        };
        let block = CacheBlock::new(tag, is_write || victim.entry(way).dirty);
        let promoted = match self.l1.install(index, block, &mut self.rng) {
            Some(displaced) => victim.swap(way, VictimEntry::new(displaced, index)),
            None => victim.release(way),
        };
        trace!(tag = promoted.tag, index = promoted.index, "Victim cache hit");
        true
    }

    fn read_l2(&mut self, address: u64, stats: &mut SimStats) {
        stats.reads_l2 += 1;
        let Some(l2) = self.l2.as_mut() else {
            stats.read_misses_l2 += 1;
            return;
        };
        let (tag, index) = l2.geometry().decompose(address);
        match l2.lookup(tag, index) {
            Some(way) => {
                trace!(tag, index, "L2 read hit");
                stats.read_hits_l2 += 1;
                l2.update_on_hit(index, way);
            }
            None => {
                trace!(tag, index, "L2 read miss");
                stats.read_misses_l2 += 1;
                if self.config.l2.early_restart {
                    self.early_restart.record(l2.geometry().word_offset(address));
                }
                // L2 blocks are never dirty, an evicted block needs no write back
                if let Some(evicted) = l2.install(index, CacheBlock::new(tag, false), &mut self.rng) {
                    trace!(tag = evicted.tag, index, "L2 eviction");
                }
            }
        }
    }

    fn evict_from_l1(&mut self, evicted: CacheBlock, index: u64, stats: &mut SimStats) {
        trace!(tag = evicted.tag, index, dirty = evicted.dirty, "L1 eviction");
        let entry = VictimEntry::new(evicted, index);
        let leaving = match self.victim.as_mut() {
            Some(victim) => victim.absorb(entry),
            None => Some(entry),
        };
        if let Some(leaving) = leaving.filter(|entry| entry.dirty) {
            self.write_back(leaving.tag, leaving.index, stats);
        }
    }

    /// Writes a dirty block leaving L1 or the victim buffer back to L2
    ///
    /// L2 never allocates on a write back. A block still held by L2 is refreshed as if hit,
    /// otherwise the write goes to memory
    fn write_back(&mut self, tag: u64, l1_index: u64, stats: &mut SimStats) {
        stats.write_backs_l1_or_victim_cache += 1;
        stats.writes_l2 += 1;
        let Some(l2) = self.l2.as_mut() else {
            return;
        };
        let block_address = self.l1.geometry().block_address(tag, l1_index);
        let (l2_tag, l2_index) = l2.geometry().split_block_address(block_address);
        match l2.lookup(l2_tag, l2_index) {
            Some(way) => {
                trace!(tag = l2_tag, index = l2_index, "Write back refreshed L2");
                l2.update_on_hit(l2_index, way);
            }
            None => trace!(tag = l2_tag, index = l2_index, "Write back to memory"),
        }
    }

    /// Computes the ratios and average access times in `stats` from its counters
    pub fn finish(&self, stats: &mut SimStats) {
        stats.compute_derived(&self.config, &self.early_restart);
    }

    /// Reseeds the RANDOM policy's generator, leaving the cache contents untouched
    pub fn seed_random(&mut self, seed: u32) {
        self.rng.seed(seed);
    }

    /// Draws from the RANDOM policy's generator, advancing it
    pub fn next_random(&mut self) -> u16 {
        self.rng.next()
    }

    /// Simulates every event of a trace, see [`TraceReader`] for the format
    ///
    /// Supports being called multiple times, the counters and execution time accumulate
    pub fn simulate<R: BufRead>(&mut self, reader: R, stats: &mut SimStats) -> Result<(), TraceError> {
        let start = Instant::now();
        for event in TraceReader::new(reader) {
            let event = event?;
            self.access(event.operation, event.address, stats);
        }
        self.simulation_time += start.elapsed();
        Ok(())
    }

    /// Gets the wall-clock execution time for processing traces
    pub fn get_execution_time(&self) -> &Duration {
        &self.simulation_time
    }

    /// Gets the number of invalid blocks of each enabled level
    pub fn get_invalid_block_counts(&self) -> Vec<(&'static str, usize)> {
        let mut counts = vec![("L1", self.l1.get_invalid_block_count())];
        if let Some(victim) = &self.victim {
            counts.push(("Victim", victim.get_invalid_entry_count()));
        }
        if let Some(l2) = &self.l2 {
            counts.push(("L2", l2.get_invalid_block_count()));
        }
        counts
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn l1(&self) -> &L1Cache {
        &self.l1
    }

    pub fn victim(&self) -> Option<&VictimBuffer> {
        self.victim.as_ref()
    }

    pub fn l2(&self) -> Option<&GenericCache> {
        self.l2.as_ref()
    }
}
