use std::fs::File;
use std::io::BufReader;
use std::time::Instant;
use clap::Parser;
use tracing_subscriber::EnvFilter;
use cachelib::config::{ReplacementPolicyConfig, SimConfig};
use cachelib::io::get_reader;
use cachelib::simulator::Simulator;
use cachelib::stats::SimStats;

#[cfg(debug_assertions)]
const DEBUG_DEFAULT: bool = true;

#[cfg(not(debug_assertions))]
const DEBUG_DEFAULT: bool = false;

#[derive(Parser, Debug)]
#[command(about = String::from("Two level cache hierarchy simulator with a victim cache"))]
struct Args {
    /// Trace file, one `<R|W> <hex address>` per line
    trace: String,

    /// JSON hierarchy configuration, the built in default is used if absent
    #[arg(long)]
    config: Option<String>,

    /// L1 size, 2^C bytes
    #[arg(short = 'c')]
    l1_c: Option<u64>,

    /// L1 block size, 2^B bytes
    #[arg(short = 'b')]
    l1_b: Option<u64>,

    /// L1 associativity, 2^S ways
    #[arg(short = 's')]
    l1_s: Option<u64>,

    /// L2 size, 2^C bytes
    #[arg(short = 'C')]
    l2_c: Option<u64>,

    /// L2 block size, 2^B bytes
    #[arg(short = 'B')]
    l2_b: Option<u64>,

    /// L2 associativity, 2^S ways
    #[arg(short = 'S')]
    l2_s: Option<u64>,

    /// Victim cache entries, 0 disables it
    #[arg(short = 'v')]
    victim: Option<u64>,

    /// L2 replacement policy
    #[arg(short = 'P', value_enum)]
    policy: Option<ReplacementPolicyConfig>,

    /// Disable L2, every L2 read goes to memory
    #[arg(short = 'D')]
    disable_l2: bool,

    /// Enable early restart for L2 misses
    #[arg(short = 'E')]
    early_restart: bool,

    /// Seed for the RANDOM replacement policy
    #[arg(long)]
    seed: Option<u32>,

    /// Print the statistics as JSON instead of the report
    #[arg(long)]
    json: bool,

    #[arg(short, long)]
    performance: bool,

    #[arg(short, long, default_value_t = DEBUG_DEFAULT)]
    debug: bool,
}

impl Args {
    /// Applies the command line overrides on top of a configuration
    fn apply(&self, config: &mut SimConfig) {
        if let Some(c) = self.l1_c {
            config.l1.c = c;
        }
        if let Some(b) = self.l1_b {
            config.l1.b = b;
        }
        if let Some(s) = self.l1_s {
            config.l1.s = s;
        }
        if let Some(c) = self.l2_c {
            config.l2.c = c;
        }
        if let Some(b) = self.l2_b {
            config.l2.b = b;
        }
        if let Some(s) = self.l2_s {
            config.l2.s = s;
        }
        if let Some(victim) = self.victim {
            config.victim_capacity = victim;
        }
        if let Some(policy) = self.policy {
            config.l2.replacement_policy = policy;
        }
        if self.disable_l2 {
            config.l2.enabled = false;
        }
        if self.early_restart {
            config.l2.early_restart = true;
        }
    }
}

fn main() -> Result<(), String> {
    let start = Instant::now();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            let config_file = File::open(path).map_err(|e| format!("Couldn't open the config file at path {path}: {e}"))?;
            serde_json::from_reader(BufReader::new(config_file)).map_err(|e| format!("Couldn't parse the config file: {e}"))?
        }
        None => SimConfig::default(),
    };
    args.apply(&mut config);

    let mut simulator = Simulator::new(&config).map_err(|e| format!("Invalid configuration: {e}"))?;
    if let Some(seed) = args.seed {
        simulator.seed_random(seed);
    }
    let trace_file = File::open(&args.trace).map_err(|e| format!("Couldn't open the trace file at path {}: {e}", args.trace))?;
    let trace_reader = get_reader(trace_file)?;
    let mut stats = SimStats::default();
    simulator
        .simulate(trace_reader, &mut stats)
        .map_err(|e| format!("Couldn't read the trace file: {e}"))?;
    simulator.finish(&mut stats);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&stats).map_err(|e| format!("Couldn't serialise the output {e}"))?);
    } else {
        println!("Cache settings");
        println!("{config}");
        println!();
        println!("{stats}");
    }
    if args.performance {
        let end = Instant::now();
        let simulation_time = simulator.get_execution_time();
        let total_time = end - start;
        println!("Simulation time: {}s", simulation_time.as_nanos() as f64 / 1e9);
        println!("Total execution time (includes initial parsing, configuration, and output): {}s", total_time.as_nanos() as f64 / 1e9)
    }
    if args.debug {
        #[cfg(debug_assertions)]
        println!("Running the debug binary, debug mode is enabled by default. If benchmarking, do not use this binary, re-compile with the --release argument when using cargo run");
        println!("Parsed input configuration: {config:?}");
        let invalid_blocks = simulator.get_invalid_block_counts();
        let formatted = invalid_blocks
            .iter()
            .map(|(name, count)| format!("{name}: {count}"))
            .collect::<Vec<_>>()
            .join(", ");
        println!("Invalid blocks by level: ({formatted})");
        println!("Total invalid blocks: {}", invalid_blocks.iter().map(|(_, count)| count).sum::<usize>())
    }
    Ok(())
}
