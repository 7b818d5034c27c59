//! Descriptor-budget concurrency controller.
//!
//! Every worker holds a probe socket plus bookkeeping descriptors while
//! it runs, so the degree of parallelism is derived from the process's
//! remaining file-descriptor headroom rather than a fixed constant.

use tracing::debug;

use crate::config::defaults::FDS_PER_WORKER;
use crate::types::Result;

#[cfg(not(target_os = "linux"))]
use crate::config::defaults::FALLBACK_MAX_WORKERS;

/// How many candidate evaluations may run simultaneously.
///
/// Capped at `candidate_count` and at the descriptor-derived ceiling,
/// floored at 1. Fails if the descriptor budget cannot be established
/// (proceeding blind could exhaust the process mid-run).
pub fn degree_of_parallelism(candidate_count: usize) -> Result<usize> {
    let ceiling = descriptor_ceiling()?;
    let parallelism = candidate_count.clamp(1, ceiling);
    debug!(candidate_count, ceiling, parallelism, "sized worker pool");
    Ok(parallelism)
}

/// Worker ceiling from the soft `RLIMIT_NOFILE` limit minus descriptors
/// already open, reserving `FDS_PER_WORKER` per worker.
#[cfg(target_os = "linux")]
fn descriptor_ceiling() -> Result<usize> {
    use crate::types::SelectError;
    use nix::sys::resource::{getrlimit, Resource};

    let (soft, _hard) = getrlimit(Resource::RLIMIT_NOFILE).map_err(|e| {
        SelectError::ResourceBudget(format!("getrlimit(RLIMIT_NOFILE) failed: {}", e))
    })?;
    let soft = if soft == nix::libc::RLIM_INFINITY {
        usize::MAX
    } else {
        soft as usize
    };

    let in_use = std::fs::read_dir("/proc/self/fd")
        .map_err(|e| {
            SelectError::ResourceBudget(format!("cannot count open descriptors: {}", e))
        })?
        .count();

    if soft <= in_use {
        return Err(SelectError::ResourceBudget(format!(
            "descriptor budget exhausted: {} of {} already in use",
            in_use, soft
        )));
    }

    let ceiling = (soft - in_use) / FDS_PER_WORKER;
    debug!(soft_limit = soft, in_use, ceiling, "descriptor headroom");
    Ok(ceiling.max(1))
}

/// No portable descriptor accounting off Linux; stay conservative.
#[cfg(not(target_os = "linux"))]
fn descriptor_ceiling() -> Result<usize> {
    tracing::warn!(
        ceiling = FALLBACK_MAX_WORKERS,
        "descriptor accounting unavailable, using fixed worker ceiling"
    );
    Ok(FALLBACK_MAX_WORKERS)
}
