//! Default tunables for the selection engine.
//!
//! These are the values used when the caller does not supply its own.

/// Default number of probe attempts per candidate
pub const DEFAULT_PROBE_ATTEMPTS: u32 = 5;

/// Default per-attempt probe timeout in milliseconds
pub const DEFAULT_PROBE_TIMEOUT_MS: u64 = 2000;

/// Default TCP port probed when measuring connect latency
pub const DEFAULT_PROBE_PORT: u16 = 443;

/// Packet-loss percentage at or above which a candidate scores 0
pub const LOSS_CUTOFF_PCT: f64 = 5.0;

/// Fractional digits kept when rounding a score
pub const SCORE_PRECISION: i32 = 4;

/// File descriptors reserved per concurrent worker (probe socket + bookkeeping)
pub const FDS_PER_WORKER: usize = 2;

/// Worker ceiling used on platforms without descriptor accounting
pub const FALLBACK_MAX_WORKERS: usize = 32;
