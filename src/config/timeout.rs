//! Timeout configuration types.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Timeout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// HTTP request timeout in seconds.
    pub http_seconds: u64,

    /// Delay before a demo-mode operation resolves, in milliseconds.
    pub demo_delay_ms: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            http_seconds: 30,
            demo_delay_ms: 1000,
        }
    }
}

impl TimeoutConfig {
    /// Returns the HTTP request timeout.
    pub fn http(&self) -> Duration {
        Duration::from_secs(self.http_seconds)
    }

    /// Returns the demo-mode delay.
    pub fn demo_delay(&self) -> Duration {
        Duration::from_millis(self.demo_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_config_default() {
        let config = TimeoutConfig::default();
        assert_eq!(config.http_seconds, 30);
        assert_eq!(config.demo_delay_ms, 1000);
        assert_eq!(config.http(), Duration::from_secs(30));
        assert_eq!(config.demo_delay(), Duration::from_millis(1000));
    }
}
