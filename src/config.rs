//! Configuration for the SAM bridge connection.
//!
//! This module provides configuration options for connecting to and
//! exchanging messages with a SAM bridge.

use std::time::Duration;

/// Default SAM bridge host.
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Default SAM bridge control port.
pub const DEFAULT_PORT: u16 = 7656;

/// Configuration for connecting to a SAM bridge.
#[derive(Debug, Clone)]
pub struct SamConfig {
    /// Hostname or IP where the SAM bridge listens.
    pub host: String,
    /// Port number of the SAM bridge control channel.
    pub port: u16,
    /// Timeout for establishing the TCP connection.
    pub connect_timeout: Duration,
    /// Timeout for the handshake reply.
    pub handshake_timeout: Duration,
    /// Timeout for a request/response exchange.
    pub exchange_timeout: Duration,
}

impl Default for SamConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            connect_timeout: Duration::from_secs(10),
            handshake_timeout: Duration::from_millis(250),
            exchange_timeout: Duration::from_millis(250),
        }
    }
}

impl SamConfig {
    /// Create a new configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the bridge host.
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// Set the bridge control port.
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the connection timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the handshake reply timeout.
    pub fn handshake_timeout(mut self, timeout: Duration) -> Self {
        self.handshake_timeout = timeout;
        self
    }

    /// Set the per-exchange reply timeout.
    pub fn exchange_timeout(mut self, timeout: Duration) -> Self {
        self.exchange_timeout = timeout;
        self
    }

    /// The `host:port` endpoint string of the control channel.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
