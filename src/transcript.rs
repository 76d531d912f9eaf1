//! Transcript
//!
//! Caller-side bookkeeping the engine deliberately leaves out: message
//! history, traffic totals, and a bounded buffer of recent log lines.

use std::collections::VecDeque;

use crate::model::{Direction, Message};

/// Number of log lines kept by default
pub const DEFAULT_LOG_CAPACITY: usize = 50;

/// Message history and traffic counters for one session
#[derive(Debug, Clone)]
pub struct Transcript {
    messages: Vec<Message>,
    logs: VecDeque<String>,
    log_capacity: usize,
    bytes_sent: u64,
    bytes_received: u64,
}

impl Transcript {
    pub fn new() -> Self {
        Self::with_log_capacity(DEFAULT_LOG_CAPACITY)
    }

    /// Keep at most `capacity` log lines (oldest dropped first)
    pub fn with_log_capacity(capacity: usize) -> Self {
        Self {
            messages: Vec::new(),
            logs: VecDeque::with_capacity(capacity),
            log_capacity: capacity,
            bytes_sent: 0,
            bytes_received: 0,
        }
    }

    /// Record a line the caller sent successfully
    pub fn record_sent(&mut self, content: impl Into<String>) -> &Message {
        self.push(Message::sent(content))
    }

    /// Record a message delivered by the engine
    pub fn record_received(&mut self, message: Message) -> &Message {
        self.push(message)
    }

    pub fn record_log(&mut self, line: impl Into<String>) {
        if self.log_capacity == 0 {
            return;
        }
        while self.logs.len() >= self.log_capacity {
            self.logs.pop_front();
        }
        self.logs.push_back(line.into());
    }

    fn push(&mut self, message: Message) -> &Message {
        let size = message.size_bytes() as u64;
        match message.direction() {
            Direction::Sent => self.bytes_sent += size,
            Direction::Received => self.bytes_received += size,
        }
        self.messages.push(message);
        // Just pushed, so the vec is non-empty
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Recent log lines, oldest first
    pub fn logs(&self) -> impl Iterator<Item = &str> {
        self.logs.iter().map(String::as_str)
    }

    pub fn total_bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    pub fn total_bytes_received(&self) -> u64 {
        self.bytes_received
    }

    /// Drop the history and reset both traffic counters
    pub fn clear_messages(&mut self) {
        self.messages.clear();
        self.bytes_sent = 0;
        self.bytes_received = 0;
    }

    pub fn clear_logs(&mut self) {
        self.logs.clear();
    }
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

/// Human-readable byte count ("512 B", "1.5 KB", "2.0 MB")
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes < KB {
        format!("{} B", bytes)
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
