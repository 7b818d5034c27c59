//! Connection name derivation.

use std::sync::Arc;

use crate::provider::CategoryCatalog;
use crate::types::{CandidateServer, Protocol};

/// Derives display identifiers for (server, protocol) pairs.
///
/// Pure: identical input always yields the identical name.
#[derive(Debug, Clone)]
pub struct ConnectionNamer {
    catalog: Arc<CategoryCatalog>,
}

impl ConnectionNamer {
    pub fn new(catalog: Arc<CategoryCatalog>) -> Self {
        Self { catalog }
    }

    /// Display label for a category tag, via the injected catalog.
    pub fn category_label<'a>(&'a self, tag: &'a str) -> &'a str {
        self.catalog.label(tag)
    }

    /// Format: `<shortDomainLabel>.<protocol>[<cat1>|<cat2>|...]`, with
    /// categories in the server's original order.
    pub fn name(&self, server: &CandidateServer, protocol: Protocol) -> String {
        let short_label = server.domain.split('.').next().unwrap_or(&server.domain);
        let mut name = format!("{}.{}[", short_label, protocol);
        for (i, tag) in server.categories.iter().enumerate() {
            if i > 0 {
                name.push('|');
            }
            name.push_str(self.catalog.label(tag));
        }
        name.push(']');
        name
    }
}
