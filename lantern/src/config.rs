use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Tunables of the permission resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Upper bound in milliseconds for an offline permission lookup.
    ///
    /// An elapsed timeout resolves the query as undefined rather than
    /// failing it.
    pub offline_timeout_ms: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            offline_timeout_ms: 10_000,
        }
    }
}

impl ResolverConfig {
    pub(crate) fn offline_timeout(&self) -> Duration {
        Duration::from_millis(self.offline_timeout_ms)
    }
}
