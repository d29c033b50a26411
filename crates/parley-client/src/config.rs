//! Client configuration.

use std::time::Duration;

/// Connection tuning knobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Give up on connecting after this long.
    pub connect_timeout: Duration,
    /// Disable Nagle's algorithm so each line goes out immediately.
    pub nodelay: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { connect_timeout: Duration::from_secs(10), nodelay: true }
    }
}
