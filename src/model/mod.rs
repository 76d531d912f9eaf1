//! Model Module
//!
//! Values observers receive from the engine.
//!
//! ## Contents
//! - [`ConnectionState`]: lifecycle position of the single link
//! - [`Message`]: one line of text, sent or received

mod state;
mod message;

pub use state::ConnectionState;
pub use message::Message;

/// Which way a message travelled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Written by this side
    Sent,

    /// Read from the peer
    Received,
}
