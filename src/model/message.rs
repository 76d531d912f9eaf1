//! Message definitions
//!
//! One application-level line of text.

use std::time::{SystemTime, UNIX_EPOCH};

use super::Direction;

/// A single line exchanged over the link
///
/// Immutable once constructed. `size_bytes` is the UTF-8 length of
/// `content`, excluding the line terminator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    content: String,

    /// Capture time (unix millis)
    timestamp: u64,

    direction: Direction,

    size_bytes: usize,
}

impl Message {
    /// Create a message stamped with the current time
    pub fn new(content: impl Into<String>, direction: Direction) -> Self {
        Self::with_timestamp(content, direction, now_millis())
    }

    /// Create a message with an explicit timestamp
    pub fn with_timestamp(content: impl Into<String>, direction: Direction, timestamp: u64) -> Self {
        let content = content.into();
        let size_bytes = content.len();
        Self {
            content,
            timestamp,
            direction,
            size_bytes,
        }
    }

    pub fn sent(content: impl Into<String>) -> Self {
        Self::new(content, Direction::Sent)
    }

    pub fn received(content: impl Into<String>) -> Self {
        Self::new(content, Direction::Received)
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }
}

/// Current wall-clock time in unix millis
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
