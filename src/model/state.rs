//! Connection state
//!
//! The closed set of lifecycle positions of the engine.

use std::fmt;

/// Lifecycle position of the engine's single logical connection
///
/// ```text
/// Idle ──connect──▶ Connecting ──ok──▶ Connected ──EOF──▶ Idle
///   │                    └──fail──▶ Error
///   └──listen──▶ Listening ──accept──▶ Connected ──read error──▶ Error
///                    └──disconnect──▶ Idle
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConnectionState {
    /// No socket resources held
    #[default]
    Idle,

    /// Client dial in flight
    Connecting,

    /// Server socket bound, waiting for a peer
    Listening,

    /// Usable stream to the given peer
    Connected(String),

    /// Most recent attempt failed
    Error(String),
}

impl ConnectionState {
    /// Whether a new attempt may start from this state
    pub fn can_start(&self) -> bool {
        matches!(self, ConnectionState::Idle | ConnectionState::Error(_))
    }

    /// Whether the state holds (or is acquiring) transport resources
    pub fn is_active(&self) -> bool {
        !self.can_start()
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }

    /// Peer address when connected
    pub fn remote_address(&self) -> Option<&str> {
        match self {
            ConnectionState::Connected(addr) => Some(addr),
            _ => None,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Idle => write!(f, "Idle"),
            ConnectionState::Connecting => write!(f, "Connecting"),
            ConnectionState::Listening => write!(f, "Listening"),
            ConnectionState::Connected(addr) => write!(f, "Connected to {}", addr),
            ConnectionState::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}
