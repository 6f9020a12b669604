//! Service configuration.

use starledger_ownership::OwnershipConfig;

/// Configuration for the [`ChainService`](crate::ChainService).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Challenge format and freshness.
    pub ownership: OwnershipConfig,
}

impl ServiceConfig {
    /// Override the freshness window.
    pub fn with_freshness_window(mut self, secs: i64) -> Self {
        self.ownership.freshness_window_secs = secs;
        self
    }

    /// Override the challenge tag.
    pub fn with_challenge_tag(mut self, tag: impl Into<String>) -> Self {
        self.ownership.challenge_tag = tag.into();
        self
    }
}
