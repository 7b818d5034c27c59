//! Core data model for the selection engine.
//!
//! Candidate servers arrive from a provider collaborator as a
//! materialized list; everything in here is either that input model,
//! the ephemeral per-evaluation values, or the crate error type.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Transport protocols a candidate may tunnel over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Udp,
    Tcp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Protocol::Udp => write!(f, "udp"),
            Protocol::Tcp => write!(f, "tcp"),
        }
    }
}

/// Transport support flags reported by the provider for one server
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// Server accepts UDP tunnels
    #[serde(default, alias = "openvpn_udp")]
    pub udp: bool,
    /// Server accepts TCP tunnels
    #[serde(default, alias = "openvpn_tcp")]
    pub tcp: bool,
}

impl FeatureFlags {
    pub fn supports(&self, protocol: Protocol) -> bool {
        match protocol {
            Protocol::Udp => self.udp,
            Protocol::Tcp => self.tcp,
        }
    }
}

/// One VPN server under evaluation for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateServer {
    /// Network-addressable host name, e.g. `us1234.nordvpn.com`
    pub domain: String,
    /// Short location code, e.g. `US`
    #[serde(alias = "flag")]
    pub country_code: String,
    /// Server utilization percentage, 0-100
    pub load: u8,
    /// Internal category tags, in provider order
    #[serde(default)]
    pub categories: Vec<String>,
    /// Supported transport protocols
    #[serde(default)]
    pub features: FeatureFlags,
}

impl CandidateServer {
    /// Reject records the provider handed over with required fields missing.
    pub fn validate(&self) -> Result<()> {
        if self.domain.trim().is_empty() {
            return Err(SelectError::InvalidCandidate("missing domain".into()));
        }
        if self.country_code.trim().is_empty() {
            return Err(SelectError::InvalidCandidate(format!(
                "{}: missing country code",
                self.domain
            )));
        }
        Ok(())
    }

    /// Protocols this server supports, restricted to the caller's allow-list.
    pub fn supported_protocols(&self, allowed: &[Protocol]) -> Vec<Protocol> {
        [Protocol::Udp, Protocol::Tcp]
            .into_iter()
            .filter(|p| allowed.contains(p) && self.features.supports(*p))
            .collect()
    }
}

/// Result of probing one host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeResult {
    /// Mean latency of answered attempts in milliseconds; `None` when
    /// every attempt went unanswered
    pub rtt_ms: Option<f64>,
    /// Percentage of attempts that received no reply, 0-100
    pub loss_pct: f64,
}

impl ProbeResult {
    /// Result for a host that answered nothing.
    pub fn unreachable() -> Self {
        Self {
            rtt_ms: None,
            loss_pct: 100.0,
        }
    }
}

/// A candidate annotated with its computed score and display name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredCandidate {
    /// Derived display identifier, e.g. `us1234.udp[P2P]`
    pub connection_name: String,
    /// Host name carried through for downstream consumption
    pub domain: String,
    /// Non-negative desirability score; 0 means excluded/unusable
    pub score: f64,
}

/// Key of the best-servers table
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BestKey {
    pub country_code: String,
    /// Canonical category display label
    pub category: String,
    pub protocol: Protocol,
}

/// Error type for selection-engine operations
#[derive(Debug, thiserror::Error)]
pub enum SelectError {
    #[error("resource budget error: {0}")]
    ResourceBudget(String),

    #[error("invalid candidate: {0}")]
    InvalidCandidate(String),

    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Result type for selection-engine operations
pub type Result<T> = std::result::Result<T, SelectError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_candidate_decodes_provider_payload() {
        let json = r#"{
            "domain": "us1234.nordvpn.com",
            "flag": "US",
            "load": 23,
            "categories": ["normal", "p2p"],
            "features": {"openvpn_udp": true, "openvpn_tcp": false}
        }"#;
        let server: CandidateServer = serde_json::from_str(json).unwrap();
        assert_eq!(server.domain, "us1234.nordvpn.com");
        assert_eq!(server.country_code, "US");
        assert_eq!(server.load, 23);
        assert_eq!(server.categories, vec!["normal", "p2p"]);
        assert!(server.features.udp);
        assert!(!server.features.tcp);
    }

    #[test]
    fn test_validate_rejects_missing_fields() {
        let mut server = CandidateServer {
            domain: "us1234.nordvpn.com".into(),
            country_code: "US".into(),
            load: 10,
            categories: vec!["normal".into()],
            features: FeatureFlags { udp: true, tcp: true },
        };
        assert!(server.validate().is_ok());

        server.domain = "  ".into();
        assert!(server.validate().is_err());

        server.domain = "us1234.nordvpn.com".into();
        server.country_code = String::new();
        assert!(server.validate().is_err());
    }

    #[test]
    fn test_supported_protocols_intersects_allow_list() {
        let server = CandidateServer {
            domain: "a".into(),
            country_code: "US".into(),
            load: 0,
            categories: vec![],
            features: FeatureFlags { udp: true, tcp: true },
        };
        assert_eq!(
            server.supported_protocols(&[Protocol::Udp, Protocol::Tcp]),
            vec![Protocol::Udp, Protocol::Tcp]
        );
        assert_eq!(
            server.supported_protocols(&[Protocol::Tcp]),
            vec![Protocol::Tcp]
        );
        assert!(server.supported_protocols(&[]).is_empty());
    }

    #[test]
    fn test_protocol_display() {
        assert_eq!(Protocol::Udp.to_string(), "udp");
        assert_eq!(Protocol::Tcp.to_string(), "tcp");
    }
}
