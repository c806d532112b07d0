//! Configuration for batch runs.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Database credentials supplied by the caller.
///
/// Threaded explicitly through every call; the core never stores or
/// serializes them. The password is elided from debug output.
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub database: String,
}

impl Credentials {
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            database: database.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("database", &self.database)
            .finish()
    }
}

/// Configuration for the batch orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Timeout for each candidate connection attempt in milliseconds.
    ///
    /// Bounds how long one unresponsive candidate can stall the resolve step.
    pub connect_timeout_ms: u64,

    /// Whether to run the fail-fast connectivity check against the first
    /// site before processing the batch. A pre-flight failure aborts the
    /// whole run with a single connectivity error, attempting no site.
    pub preflight_check: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 5_000,
            preflight_check: true,
        }
    }
}

impl BatchConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}
