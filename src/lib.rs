//! # LinkTCP
//!
//! A point-to-point TCP link engine with:
//! - Client role: dial a known `host:port`
//! - Server role: listen and accept exactly one peer
//! - Newline-delimited UTF-8 text messages
//! - Observable state, inbound-message and log streams
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │              Caller (CLI, UI, tests)                         │
//! │   connect / listen / send / disconnect    subscribe_*        │
//! └─────────────────────┬───────────────────────────▲───────────┘
//!                       │                           │
//! ┌─────────────────────▼───────────────────────────┴───────────┐
//! │                       Engine                                 │
//! │     state lock: ConnectionState + Link + generation          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Acceptor   │          │ Connection  │
//!   │ (listener)  │          │ (writer)    │
//!   └─────────────┘          └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │  Read loop  │
//!                           │  (thread)   │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod model;
pub mod observer;
pub mod protocol;
pub mod network;
pub mod engine;
pub mod settings;
pub mod transcript;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{LinkError, Result};
pub use config::{ConnectionConfig, EngineConfig, Role};
pub use model::{ConnectionState, Direction, Message};
pub use engine::Engine;
pub use network::{local_ipv4, LocalAddress};
pub use settings::SettingsStore;
pub use transcript::Transcript;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of LinkTCP
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
