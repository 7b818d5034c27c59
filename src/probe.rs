//! Network-quality probing.
//!
//! One probe is a fixed number of round trips against a candidate host;
//! the result folds unanswered attempts into a loss percentage and
//! averages the answered ones into a mean rtt. Unreachability is a
//! normal outcome, never an error.

use futures::future::BoxFuture;
use futures::FutureExt;
use std::time::{Duration, Instant};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

use crate::config::defaults::{DEFAULT_PROBE_PORT, DEFAULT_PROBE_TIMEOUT_MS};
use crate::types::ProbeResult;

/// Issues network-quality measurements for candidate hosts.
pub trait Prober: Send + Sync {
    /// Send `attempts` probes to `host` and fold the replies into a
    /// [`ProbeResult`]. Each attempt is bounded by a per-attempt
    /// timeout; this call never fails, a host that answers nothing
    /// comes back as 100% loss with no rtt.
    fn probe<'a>(&'a self, host: &'a str, attempts: u32) -> BoxFuture<'a, ProbeResult>;
}

/// Prober that measures TCP connect time.
///
/// ICMP echo needs raw-socket privileges, so latency is taken as the
/// time to complete a TCP handshake against a port the candidate is
/// expected to serve (443 by default). A refused or timed-out connect
/// counts as a lost attempt.
#[derive(Debug, Clone)]
pub struct TcpProber {
    port: u16,
    attempt_timeout: Duration,
}

impl TcpProber {
    pub fn new(port: u16, attempt_timeout: Duration) -> Self {
        Self {
            port,
            attempt_timeout,
        }
    }
}

impl Default for TcpProber {
    fn default() -> Self {
        Self::new(
            DEFAULT_PROBE_PORT,
            Duration::from_millis(DEFAULT_PROBE_TIMEOUT_MS),
        )
    }
}

impl Prober for TcpProber {
    fn probe<'a>(&'a self, host: &'a str, attempts: u32) -> BoxFuture<'a, ProbeResult> {
        async move {
            if attempts == 0 {
                return ProbeResult::unreachable();
            }

            let addr = format!("{}:{}", host, self.port);
            let mut rtt_samples = Vec::with_capacity(attempts as usize);

            for attempt in 0..attempts {
                let started = Instant::now();
                match timeout(self.attempt_timeout, TcpStream::connect(&addr)).await {
                    Ok(Ok(_stream)) => {
                        let rtt_ms = started.elapsed().as_secs_f64() * 1000.0;
                        debug!(host, attempt, rtt_ms, "probe reply");
                        rtt_samples.push(rtt_ms);
                    }
                    Ok(Err(e)) => {
                        debug!(host, attempt, error = %e, "probe failed");
                    }
                    Err(_) => {
                        debug!(host, attempt, "probe timed out");
                    }
                }
            }

            let lost = attempts as usize - rtt_samples.len();
            let loss_pct = lost as f64 * 100.0 / f64::from(attempts);
            let rtt_ms = if rtt_samples.is_empty() {
                None
            } else {
                Some(rtt_samples.iter().sum::<f64>() / rtt_samples.len() as f64)
            };

            ProbeResult { rtt_ms, loss_pct }
        }
        .boxed()
    }
}
