mod geometry;
mod policies;

use crate::config::SimConfig;
use crate::simulator::Simulator;
use crate::stats::SimStats;
use crate::trace::Operation;

pub fn init() {
    tracing_subscriber::fmt::SubscriberBuilder::default()
        .with_max_level(tracing::Level::INFO)
        .with_test_writer()
        .try_init()
        .unwrap_or_default();
}

/// A simulator with fresh counters
pub fn setup(config: &SimConfig) -> (Simulator, SimStats) {
    init();
    (Simulator::new(config).unwrap(), SimStats::default())
}

pub fn read(simulator: &mut Simulator, stats: &mut SimStats, address: u64) {
    simulator.access(Operation::Read, address, stats);
}

pub fn write(simulator: &mut Simulator, stats: &mut SimStats, address: u64) {
    simulator.access(Operation::Write, address, stats);
}

/// Address of a block in set `index` of the default L1 (8 sets of 64 byte blocks)
pub fn l1_address(tag: u64, index: u64) -> u64 {
    (tag << 9) | (index << 6)
}
