//! Mock backend server configuration.

use serde::{Deserialize, Serialize};

/// Mock backend listen configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    /// Listen address.
    pub bind: String,

    /// Listen port.
    pub port: u16,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 5000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_config_default() {
        let config = MockConfig::default();
        assert_eq!(config.bind, "127.0.0.1");
        assert_eq!(config.port, 5000);
    }
}
