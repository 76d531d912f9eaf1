//! Configuration for LinkTCP
//!
//! Two layers:
//! - [`EngineConfig`]: tuning knobs fixed for the lifetime of an engine
//! - [`ConnectionConfig`]: what to connect to, supplied once per attempt

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{LinkError, Result};

/// Default TCP port offered to users
pub const DEFAULT_PORT: u16 = 8080;

/// Engine-wide configuration
#[derive(Debug, Clone)]
pub struct EngineConfig {
    // -------------------------------------------------------------------------
    // Server Role
    // -------------------------------------------------------------------------
    /// Interface the listening socket binds to
    pub bind_host: String,

    /// How often a pending accept re-checks for cancellation
    pub accept_poll_interval: Duration,

    // -------------------------------------------------------------------------
    // Stream Configuration
    // -------------------------------------------------------------------------
    /// Disable Nagle's algorithm on connected sockets
    pub nodelay: bool,

    /// Capacity of the buffered line reader (bytes)
    pub read_buffer_size: usize,

    /// Longest inbound line accepted before the link is dropped (bytes)
    pub max_line_length: usize,

    /// Prefix for background thread names
    pub thread_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            bind_host: "0.0.0.0".to_string(),
            accept_poll_interval: Duration::from_millis(25),
            nodelay: true,
            read_buffer_size: 8 * 1024, // 8 KB
            max_line_length: 1024 * 1024, // 1 MB
            thread_name: "linktcp".to_string(),
        }
    }
}

impl EngineConfig {
    /// Create a new config builder
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::default()
    }
}

/// Builder for EngineConfig
#[derive(Default)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl EngineConfigBuilder {
    /// Set the interface the server role binds to
    pub fn bind_host(mut self, host: impl Into<String>) -> Self {
        self.config.bind_host = host.into();
        self
    }

    /// Set the accept cancellation poll interval (in milliseconds)
    pub fn accept_poll_interval_ms(mut self, ms: u64) -> Self {
        self.config.accept_poll_interval = Duration::from_millis(ms.max(1));
        self
    }

    /// Enable or disable TCP_NODELAY
    pub fn nodelay(mut self, enabled: bool) -> Self {
        self.config.nodelay = enabled;
        self
    }

    /// Set the line reader buffer size (in bytes)
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.read_buffer_size = size.max(64);
        self
    }

    /// Set the inbound line length limit (in bytes)
    pub fn max_line_length(mut self, len: usize) -> Self {
        self.config.max_line_length = len.max(1);
        self
    }

    /// Set the background thread name prefix
    pub fn thread_name(mut self, name: impl Into<String>) -> Self {
        self.config.thread_name = name.into();
        self
    }

    pub fn build(self) -> EngineConfig {
        self.config
    }
}

/// Which side of the link this process plays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Role {
    /// Dial a known host:port
    #[default]
    Client,

    /// Listen and accept one inbound connection
    Server,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Client => write!(f, "client"),
            Role::Server => write!(f, "server"),
        }
    }
}

/// Target of a single connection attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Remote host (client role only)
    pub host: String,

    /// Remote port (client) or local port (server)
    pub port: u16,

    pub role: Role,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            port: DEFAULT_PORT,
            role: Role::Client,
        }
    }
}

impl ConnectionConfig {
    /// Config for dialing `host:port`
    pub fn client(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            role: Role::Client,
        }
    }

    /// Config for listening on `port`
    pub fn server(port: u16) -> Self {
        Self {
            host: String::new(),
            port,
            role: Role::Server,
        }
    }

    /// Check the config is usable for its role
    ///
    /// Port 0 is only meaningful for the server role (ephemeral bind).
    pub fn validate(&self) -> Result<()> {
        match self.role {
            Role::Client => {
                if self.host.trim().is_empty() {
                    return Err(LinkError::Config("host must not be empty".to_string()));
                }
                if self.port == 0 {
                    return Err(LinkError::Config(
                        "port must be in range 1-65535".to_string(),
                    ));
                }
            }
            Role::Server => {}
        }
        Ok(())
    }
}

/// Parse a user-entered port, accepting only 1-65535
pub fn parse_port(input: &str) -> Result<u16> {
    match input.trim().parse::<u32>() {
        Ok(port @ 1..=65535) => Ok(port as u16),
        _ => Err(LinkError::Config(format!(
            "invalid port '{}': expected 1-65535",
            input.trim()
        ))),
    }
}
