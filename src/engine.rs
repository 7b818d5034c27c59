//! Evaluation run orchestration.
//!
//! Fans candidate evaluations out across a bounded worker pool. Each
//! worker owns one candidate end to end (probe → score → name → offer);
//! the only shared state is the best-servers table.

use std::sync::Arc;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::config::defaults::DEFAULT_PROBE_ATTEMPTS;
use crate::limits;
use crate::name::ConnectionNamer;
use crate::probe::{Prober, TcpProber};
use crate::provider::CategoryCatalog;
use crate::reducer::{BestServerMap, BestServers};
use crate::score;
use crate::types::{BestKey, CandidateServer, Protocol, Result, ScoredCandidate};

/// Server-selection engine.
///
/// Holds the prober and category catalog for the lifetime of the
/// evaluator; each [`evaluate`](Evaluator::evaluate) call is an
/// independent run with a fresh best-servers table.
pub struct Evaluator {
    prober: Arc<dyn Prober>,
    catalog: Arc<CategoryCatalog>,
    probe_attempts: u32,
}

impl Evaluator {
    pub fn new(
        prober: Arc<dyn Prober>,
        catalog: Arc<CategoryCatalog>,
        probe_attempts: u32,
    ) -> Self {
        Self {
            prober,
            catalog,
            probe_attempts,
        }
    }

    /// Reduce `candidates` to the best-scoring server per
    /// (country, category, protocol) key.
    ///
    /// Malformed candidates are skipped with a warning; a failure to
    /// establish the process's descriptor budget aborts the whole run.
    /// Blocks until every worker has finished.
    pub async fn evaluate(
        &self,
        candidates: Vec<CandidateServer>,
        allowed_protocols: &[Protocol],
    ) -> Result<BestServerMap> {
        let candidates: Vec<CandidateServer> = candidates
            .into_iter()
            .filter(|server| match server.validate() {
                Ok(()) => true,
                Err(e) => {
                    warn!(error = %e, "skipping malformed candidate");
                    false
                }
            })
            .collect();

        let parallelism = limits::degree_of_parallelism(candidates.len())?;
        info!(
            candidates = candidates.len(),
            parallelism, "starting evaluation run"
        );

        let semaphore = Arc::new(Semaphore::new(parallelism));
        let reducer = Arc::new(BestServers::new());
        let namer = ConnectionNamer::new(self.catalog.clone());

        let mut handles = Vec::with_capacity(candidates.len());
        for server in candidates {
            let semaphore = semaphore.clone();
            let reducer = reducer.clone();
            let prober = self.prober.clone();
            let namer = namer.clone();
            let attempts = self.probe_attempts;
            let allowed = allowed_protocols.to_vec();

            handles.push(tokio::spawn(async move {
                let _permit = match semaphore.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return, // semaphore closed, run is tearing down
                };
                evaluate_candidate(&*prober, &namer, &reducer, &server, attempts, &allowed)
                    .await;
            }));
        }

        for handle in handles {
            handle.await?;
        }

        let best = reducer.snapshot();
        info!(entries = best.len(), "evaluation run complete");
        Ok(best)
    }
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new(
            Arc::new(TcpProber::default()),
            Arc::new(CategoryCatalog::default()),
            DEFAULT_PROBE_ATTEMPTS,
        )
    }
}

/// One worker's whole job: measure, score, and offer a single candidate
/// into every (country, category, protocol) key it belongs to.
async fn evaluate_candidate(
    prober: &dyn Prober,
    namer: &ConnectionNamer,
    reducer: &BestServers,
    server: &CandidateServer,
    probe_attempts: u32,
    allowed_protocols: &[Protocol],
) {
    let protocols = server.supported_protocols(allowed_protocols);
    if protocols.is_empty() {
        debug!(domain = %server.domain, "no allowed protocol supported, skipping");
        return;
    }

    let score = if server.load >= 100 {
        // Fully loaded servers keep the floor score, no probe spent.
        debug!(domain = %server.domain, load = server.load, "fully loaded, skipping probe");
        0.0
    } else {
        let probe = prober.probe(&server.domain, probe_attempts).await;
        score::score_probe(server.load, &probe)
    };

    for protocol in protocols {
        let connection_name = namer.name(server, protocol);
        for tag in &server.categories {
            let key = BestKey {
                country_code: server.country_code.clone(),
                category: namer.category_label(tag).to_string(),
                protocol,
            };
            reducer.offer(
                key,
                ScoredCandidate {
                    connection_name: connection_name.clone(),
                    domain: server.domain.clone(),
                    score,
                },
            );
        }
    }
}
