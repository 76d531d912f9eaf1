//! Error types for LinkTCP
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using LinkError
pub type Result<T> = std::result::Result<T, LinkError>;

/// Unified error type for LinkTCP operations
#[derive(Debug, Error)]
pub enum LinkError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Lifecycle Errors
    // -------------------------------------------------------------------------
    /// An attempt or connection is already active
    #[error("Engine busy: {0}")]
    Busy(String),

    /// No connected writer exists
    #[error("Not connected")]
    NotConnected,

    /// The attempt was cancelled by a local disconnect
    #[error("Cancelled by disconnect")]
    Cancelled,

    /// Dial, bind or accept failed
    #[error("Connection failed: {0}")]
    Connect(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    // -------------------------------------------------------------------------
    // Settings Store Errors
    // -------------------------------------------------------------------------
    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LinkError {
    /// True for outcomes caused by our own `disconnect`
    pub fn is_cancelled(&self) -> bool {
        matches!(self, LinkError::Cancelled)
    }
}
