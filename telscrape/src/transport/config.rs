//! Telnet connection configuration.

use std::time::Duration;

/// Telnet connection configuration.
#[derive(Debug, Clone)]
pub struct TelnetConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// Telnet port (default: 23).
    pub port: u16,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Quiet gap that ends a chunk once data has started arriving.
    ///
    /// A read never outlives its caller-supplied timeout, so this only
    /// shortens reads, it never extends them.
    pub settle: Duration,
}

impl TelnetConfig {
    /// Create a configuration for the given host with default settings.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 23,
            connect_timeout: Duration::from_secs(10),
            settle: Duration::from_millis(100),
        }
    }

    /// Set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Set the quiet gap used to end a chunk.
    pub fn with_settle(mut self, settle: Duration) -> Self {
        self.settle = settle;
        self
    }

    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
