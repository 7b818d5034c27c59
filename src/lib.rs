//! VPN server-selection engine.
//!
//! Given a materialized list of candidate VPN endpoints, the engine
//! concurrently measures network quality for each one, converts the
//! measurements into a comparable score, and keeps only the best
//! endpoint per (country, category, protocol) combination. Fetching the
//! candidate list, generating tunnel configuration, and everything else
//! around the selection itself belongs to external collaborators.

pub mod config;
pub mod engine;
pub mod limits;
pub mod name;
pub mod probe;
pub mod provider;
pub mod reducer;
pub mod score;
pub mod types;

// Re-export the most commonly used items for convenience
pub use crate::engine::Evaluator;
pub use crate::name::ConnectionNamer;
pub use crate::probe::{Prober, TcpProber};
pub use crate::provider::CategoryCatalog;
pub use crate::reducer::{BestServerMap, BestServers};
pub use crate::score::score;
pub use crate::types::{
    BestKey, CandidateServer, FeatureFlags, ProbeResult, Protocol, Result, ScoredCandidate,
    SelectError,
};
