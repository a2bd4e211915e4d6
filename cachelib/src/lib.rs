//! # CacheLib
//!
//! Cachelib simulates a two level cache hierarchy: an L1, an optional fully associative victim
//! buffer, and an optional L2, backed by main memory
//!
//! A [`simulator::Simulator`] is built from a [`config::SimConfig`] and fed one read or write at a
//! time. It counts hits, misses and write backs for every level, and derives hit ratios and
//! average access times from them once the trace is done
//!
//! L2 can be parameterised by the MIP, LIP, FIFO, or RANDOM replacement policies, which makes the
//! library useful for comparing them on recorded traces

/// Contains the set associative cache, parameterised by a replacement policy, and a utility enum
/// for the L2 policies
pub mod cache;

/// Contains definitions for the JSON configuration format
pub mod config;

/// Contains the configuration and trace errors
pub mod error;

/// Contains the address decomposition shared by every level
pub mod geometry;

/// Contains the trace file reader
pub mod io;

/// Contains the generator used by the RANDOM replacement policy
pub mod random;

/// Contains the recency ordered list backing every set and the victim buffer
pub mod recency;

/// Contains the provided replacement policies, with a trait for implementing custom replacement
/// policies
pub mod replacement_policies;

/// Contains the simulator used to run a trace through a hierarchy
pub mod simulator;

/// Contains the counters and the timing model
pub mod stats;

/// Contains the trace format
pub mod trace;

/// Contains the victim buffer
pub mod victim;

#[cfg(test)]
mod test;

/// Contains utilities for running tests and benchmarks.
pub mod util;
