use thiserror::Error;

/// Rejected hierarchy configurations. Raised by [`crate::simulator::Simulator::new`] before any
/// state is allocated
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{level}: capacity bits C={c} must be at least B+S={b}+{s}")]
    InvalidGeometry { level: &'static str, c: u64, b: u64, s: u64 },

    #[error("{level}: capacity bits C={c} do not fit a 64-bit address")]
    CapacityTooLarge { level: &'static str, c: u64 },

    #[error("{level}: block size bits B={b} do not fit a 64-bit address")]
    BlockTooLarge { level: &'static str, b: u64 },

    #[error("L1 cannot be disabled, every access starts there")]
    L1Disabled,
}

/// Errors raised while reading a trace
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("couldn't read the trace: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: expected `<R|W> <hex address>`, found {content:?}")]
    Malformed { line: usize, content: String },
}
