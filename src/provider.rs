//! Category label catalog supplied by the provider collaborator.
//!
//! The provider hands the engine a mapping from its internal category
//! tags to the canonical display labels used in connection names and
//! table keys. The catalog is immutable for the duration of a run.

use std::collections::HashMap;

/// Mapping from internal category tags to display labels
#[derive(Debug, Clone)]
pub struct CategoryCatalog {
    labels: HashMap<String, String>,
}

impl CategoryCatalog {
    /// Create a catalog from a caller-supplied tag → label mapping.
    pub fn new(labels: HashMap<String, String>) -> Self {
        Self { labels }
    }

    /// The NordVPN category table.
    pub fn nordvpn() -> Self {
        let labels = [
            ("normal", "Standard VPN servers"),
            ("p2p", "P2P"),
            ("double", "Double VPN"),
            ("dedicated", "Dedicated IP servers"),
            ("onion", "Onion Over VPN"),
            ("ddos", "Anti DDoS"),
        ]
        .into_iter()
        .map(|(tag, label)| (tag.to_string(), label.to_string()))
        .collect();
        Self { labels }
    }

    /// Display label for an internal tag. Tags the catalog does not know
    /// map to themselves, so a stale provider table cannot kill a run.
    pub fn label<'a>(&'a self, tag: &'a str) -> &'a str {
        self.labels.get(tag).map(String::as_str).unwrap_or(tag)
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::nordvpn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nordvpn_labels() {
        let catalog = CategoryCatalog::nordvpn();
        assert_eq!(catalog.label("normal"), "Standard VPN servers");
        assert_eq!(catalog.label("p2p"), "P2P");
        assert_eq!(catalog.label("double"), "Double VPN");
        assert_eq!(catalog.label("dedicated"), "Dedicated IP servers");
        assert_eq!(catalog.label("onion"), "Onion Over VPN");
        assert_eq!(catalog.label("ddos"), "Anti DDoS");
    }

    #[test]
    fn test_unknown_tag_maps_to_itself() {
        let catalog = CategoryCatalog::nordvpn();
        assert_eq!(catalog.label("obfuscated"), "obfuscated");
    }

    #[test]
    fn test_custom_catalog() {
        let mut labels = HashMap::new();
        labels.insert("fast".to_string(), "Fast servers".to_string());
        let catalog = CategoryCatalog::new(labels);
        assert_eq!(catalog.label("fast"), "Fast servers");
    }
}
