//! Execution settings.

use std::time::Duration;

/// How a cycle talks to its collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionSettings {
    /// Instruments processed concurrently within a phase
    pub max_concurrency: usize,
    /// Upper bound on any single external call
    pub request_timeout: Option<Duration>,
    /// Build and log orders without sending them
    pub dry_run: bool,
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            max_concurrency: 4,
            request_timeout: None,
            dry_run: false,
        }
    }
}

impl ExecutionSettings {
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
