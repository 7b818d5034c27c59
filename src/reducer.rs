//! Shared best-servers table.
//!
//! Workers race to publish their scored candidates here; for each
//! (country, category, protocol) key only the highest-scoring candidate
//! survives. The compare-and-replace is a single critical section per
//! offer, so the final table is identical regardless of completion
//! order.

use parking_lot::Mutex;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use tracing::debug;

use crate::types::{BestKey, ScoredCandidate};

/// Final output mapping of an evaluation run
pub type BestServerMap = HashMap<BestKey, ScoredCandidate>;

/// Concurrent keep-max accumulator keyed by (country, category, protocol)
#[derive(Debug, Default)]
pub struct BestServers {
    table: Mutex<BestServerMap>,
}

impl BestServers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer a candidate for a key. A vacant key accepts any candidate;
    /// an occupied key is replaced only by a strictly higher score, so
    /// ties keep the incumbent (first seen wins). Returns whether the
    /// table changed.
    pub fn offer(&self, key: BestKey, candidate: ScoredCandidate) -> bool {
        let mut table = self.table.lock();
        match table.entry(key) {
            Entry::Vacant(slot) => {
                debug!(
                    domain = %candidate.domain,
                    score = candidate.score,
                    "new best-server entry"
                );
                slot.insert(candidate);
                true
            }
            Entry::Occupied(mut slot) => {
                if candidate.score > slot.get().score {
                    debug!(
                        domain = %candidate.domain,
                        score = candidate.score,
                        displaced = %slot.get().domain,
                        "replaced best-server entry"
                    );
                    slot.insert(candidate);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Current holder for a key, if any.
    pub fn get(&self, key: &BestKey) -> Option<ScoredCandidate> {
        self.table.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.table.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.lock().is_empty()
    }

    /// Snapshot of the table. Taken once after all workers have joined.
    pub fn snapshot(&self) -> BestServerMap {
        self.table.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Protocol;
    use quickcheck::quickcheck;

    fn key() -> BestKey {
        BestKey {
            country_code: "US".into(),
            category: "Standard VPN servers".into(),
            protocol: Protocol::Udp,
        }
    }

    fn candidate(domain: &str, score: f64) -> ScoredCandidate {
        ScoredCandidate {
            connection_name: format!("{}.udp[Standard VPN servers]", domain),
            domain: domain.into(),
            score,
        }
    }

    #[test]
    fn test_vacant_key_accepts_any_score() {
        let reducer = BestServers::new();
        assert!(reducer.offer(key(), candidate("a", 0.0)));
        assert_eq!(reducer.get(&key()).unwrap().domain, "a");
        assert_eq!(reducer.len(), 1);
    }

    #[test]
    fn test_strictly_higher_score_replaces() {
        let reducer = BestServers::new();
        reducer.offer(key(), candidate("a", 0.1));
        assert!(reducer.offer(key(), candidate("b", 0.2)));
        assert_eq!(reducer.get(&key()).unwrap().domain, "b");
    }

    #[test]
    fn test_lower_or_equal_score_keeps_incumbent() {
        let reducer = BestServers::new();
        reducer.offer(key(), candidate("a", 0.2));
        assert!(!reducer.offer(key(), candidate("b", 0.2)));
        assert!(!reducer.offer(key(), candidate("c", 0.1)));
        assert_eq!(reducer.get(&key()).unwrap().domain, "a");
        assert_eq!(reducer.len(), 1);
    }

    #[test]
    fn test_keys_are_independent() {
        let reducer = BestServers::new();
        let tcp_key = BestKey {
            protocol: Protocol::Tcp,
            ..key()
        };
        reducer.offer(key(), candidate("a", 0.3));
        reducer.offer(tcp_key.clone(), candidate("b", 0.1));
        assert_eq!(reducer.get(&key()).unwrap().domain, "a");
        assert_eq!(reducer.get(&tcp_key).unwrap().domain, "b");
        assert_eq!(reducer.len(), 2);
    }

    quickcheck! {
        // With distinct scores the winner is order-independent.
        fn prop_offer_order_is_irrelevant(scores: Vec<u16>) -> bool {
            let mut scores = scores;
            scores.sort_unstable();
            scores.dedup();

            let candidates: Vec<ScoredCandidate> = scores
                .iter()
                .enumerate()
                .map(|(i, s)| candidate(&format!("s{}", i), f64::from(*s)))
                .collect();

            let forward = BestServers::new();
            for c in &candidates {
                forward.offer(key(), c.clone());
            }
            let reverse = BestServers::new();
            for c in candidates.iter().rev() {
                reverse.offer(key(), c.clone());
            }

            forward.snapshot() == reverse.snapshot()
        }
    }

    #[tokio::test]
    async fn test_concurrent_offers_lose_no_updates() {
        use std::sync::Arc;

        let reducer = Arc::new(BestServers::new());
        let mut handles = Vec::new();
        for i in 0..64u32 {
            let reducer = reducer.clone();
            handles.push(tokio::spawn(async move {
                reducer.offer(key(), candidate(&format!("s{}", i), f64::from(i)));
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Highest score always wins, no matter the interleaving.
        assert_eq!(reducer.get(&key()).unwrap().domain, "s63");
        assert_eq!(reducer.len(), 1);
    }
}
