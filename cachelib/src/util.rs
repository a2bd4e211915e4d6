use std::error::Error;
use crate::config::SimConfig;
use crate::random::EvictRandom;
use crate::simulator::Simulator;
use crate::stats::SimStats;

/// Shape of a generated trace
#[derive(Debug, Copy, Clone)]
pub struct SyntheticTrace {
    pub events: usize,
    /// Addresses are kept below 2^address_bits
    pub address_bits: u32,
    /// Every nth event is a write, 0 for a read only trace
    pub write_every: usize,
    pub seed: u32,
}

/// Generates a deterministic trace in the text format read by [`crate::trace::TraceReader`]
///
/// Addresses mostly advance in short strides, with occasional jumps anywhere in the address
/// range. This gives a mix of hits, capacity misses, and conflict misses for every level
pub fn synthetic_trace(shape: &SyntheticTrace) -> String {
    let mut rng = EvictRandom::new(shape.seed);
    let mask = if shape.address_bits >= u64::BITS {
        u64::MAX
    } else {
        (1u64 << shape.address_bits) - 1
    };
    let mut address = 0u64;
    let mut out = String::with_capacity(shape.events * 16);
    for i in 0..shape.events {
        if rng.next() % 8 == 0 {
            address = (((rng.next() as u64) << 15) | rng.next() as u64) & mask;
        } else {
            address = address.wrapping_add(8 * (rng.next() as u64 % 16)) & mask;
        }
        let op = if shape.write_every > 0 && i % shape.write_every == 0 { 'W' } else { 'R' };
        out.push_str(&format!("{op} {address:x}\n"));
    }
    out
}

/// Runs a whole trace through a fresh simulator and returns the finished statistics
pub fn run_trace(config: &SimConfig, trace: &str) -> Result<SimStats, Box<dyn Error>> {
    let mut simulator = Simulator::new(config)?;
    let mut stats = SimStats::default();
    simulator.simulate(trace.as_bytes(), &mut stats)?;
    simulator.finish(&mut stats);
    Ok(stats)
}
