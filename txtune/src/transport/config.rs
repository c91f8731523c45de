//! Telnet connection configuration.

use std::time::Duration;

/// Default telnet port.
pub const DEFAULT_PORT: u16 = 23;

/// Telnet connection configuration.
#[derive(Debug, Clone)]
pub struct TelnetConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// Telnet port (default: 23).
    pub port: u16,

    /// Bound on the TCP connect and on every marker wait.
    ///
    /// `None` (the default) waits forever: a router that never prints the
    /// expected prompt and never closes the connection hangs the session.
    pub timeout: Option<Duration>,
}

impl TelnetConfig {
    /// Create a configuration for `host` on the default port with no timeout.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: DEFAULT_PORT,
            timeout: None,
        }
    }

    /// Set the port.
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
