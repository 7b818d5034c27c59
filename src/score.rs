//! Scoring of probed candidates.
//!
//! Converts a (load, rtt, loss) triple into a single comparable number.
//! Lower load and latency give a higher score; unreliable or saturated
//! servers score 0 and are effectively excluded.

use crate::config::defaults::{LOSS_CUTOFF_PCT, SCORE_PRECISION};
use crate::types::ProbeResult;

/// Score a candidate from its utilization and probe measurements.
///
/// Returns 0 for fully loaded servers, for loss at or above the cutoff,
/// and for the degenerate `load + rtt <= 1` region where the logarithm
/// is unusable. Otherwise `1 / ln(load + rtt)`, rounded to a fixed
/// precision so equal inputs always compare equal downstream.
pub fn score(load: u8, rtt_ms: f64, loss_pct: f64) -> f64 {
    if load >= 100 {
        return 0.0;
    }
    if loss_pct >= LOSS_CUTOFF_PCT {
        return 0.0;
    }
    let base = f64::from(load) + rtt_ms;
    if base <= 1.0 {
        return 0.0;
    }
    round_score(1.0 / base.ln())
}

/// Score from a raw probe result; a host that never answered scores 0.
pub fn score_probe(load: u8, probe: &ProbeResult) -> f64 {
    match probe.rtt_ms {
        Some(rtt_ms) => score(load, rtt_ms, probe.loss_pct),
        None => 0.0,
    }
}

fn round_score(raw: f64) -> f64 {
    let factor = 10f64.powi(SCORE_PRECISION);
    (raw * factor).round() / factor
}
