//! Configuration Module
//!
//! Handles loading session-layer configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::socket::SocketConfig;

/// Session-layer configuration.
///
/// All values can be configured via environment variables with sensible
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Realtime endpoint URL
    pub socket_url: String,
    /// Failed connection attempts tolerated before giving up
    pub max_reconnect_attempts: u32,
    /// Base reconnect delay in milliseconds (linear backoff multiplies it)
    pub reconnect_delay_ms: u64,
    /// Cache sweep interval in seconds
    pub sweep_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SOCKET_URL` - Realtime endpoint (default: `ws://127.0.0.1:5001/ws`)
    /// - `MAX_RECONNECT_ATTEMPTS` - Retry budget (default: 5)
    /// - `RECONNECT_DELAY_MS` - Base retry delay (default: 1000)
    /// - `SWEEP_INTERVAL` - Cache sweep frequency in seconds (default: 30)
    pub fn from_env() -> Self {
        Self {
            socket_url: env::var("SOCKET_URL")
                .unwrap_or_else(|_| "ws://127.0.0.1:5001/ws".to_string()),
            max_reconnect_attempts: env::var("MAX_RECONNECT_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            reconnect_delay_ms: env::var("RECONNECT_DELAY_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1000),
            sweep_interval: env::var("SWEEP_INTERVAL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
        }
    }

    /// The reconnect policy slice of the config, for the socket client.
    pub fn socket_config(&self) -> SocketConfig {
        SocketConfig {
            url: self.socket_url.clone(),
            max_reconnect_attempts: self.max_reconnect_attempts,
            reconnect_delay: Duration::from_millis(self.reconnect_delay_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_url: "ws://127.0.0.1:5001/ws".to_string(),
            max_reconnect_attempts: 5,
            reconnect_delay_ms: 1000,
            sweep_interval: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.socket_url, "ws://127.0.0.1:5001/ws");
        assert_eq!(config.max_reconnect_attempts, 5);
        assert_eq!(config.reconnect_delay_ms, 1000);
        assert_eq!(config.sweep_interval, 30);
    }

    #[test]
    fn test_socket_config_conversion() {
        let config = Config {
            socket_url: "ws://example.test/ws".to_string(),
            max_reconnect_attempts: 3,
            reconnect_delay_ms: 250,
            sweep_interval: 30,
        };

        let socket = config.socket_config();
        assert_eq!(socket.url, "ws://example.test/ws");
        assert_eq!(socket.max_reconnect_attempts, 3);
        assert_eq!(socket.reconnect_delay, Duration::from_millis(250));
    }
}
