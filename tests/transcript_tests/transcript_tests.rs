//! Tests for Transcript
//!
//! History, traffic counters and the bounded log buffer.

use linktcp::model::{Direction, Message};
use linktcp::transcript::{format_bytes, Transcript, DEFAULT_LOG_CAPACITY};

#[test]
fn test_counts_bytes_per_direction() {
    let mut transcript = Transcript::new();

    transcript.record_sent("hello");
    transcript.record_received(Message::received("ñ"));
    transcript.record_sent("");

    assert_eq!(transcript.total_bytes_sent(), 5);
    assert_eq!(transcript.total_bytes_received(), 2);
    assert_eq!(transcript.messages().len(), 3);
}

#[test]
fn test_history_keeps_order_and_direction() {
    let mut transcript = Transcript::new();

    transcript.record_sent("ping");
    transcript.record_received(Message::received("pong"));

    let directions: Vec<Direction> = transcript.messages().iter().map(|m| m.direction()).collect();
    assert_eq!(directions, vec![Direction::Sent, Direction::Received]);
    assert_eq!(transcript.messages()[1].content(), "pong");
}

#[test]
fn test_clear_messages_resets_counters() {
    let mut transcript = Transcript::new();
    transcript.record_sent("abc");
    transcript.record_received(Message::received("de"));
    transcript.record_log("kept");

    transcript.clear_messages();

    assert!(transcript.messages().is_empty());
    assert_eq!(transcript.total_bytes_sent(), 0);
    assert_eq!(transcript.total_bytes_received(), 0);
    assert_eq!(transcript.logs().count(), 1);
}

#[test]
fn test_log_buffer_keeps_most_recent() {
    let mut transcript = Transcript::new();

    for i in 0..(DEFAULT_LOG_CAPACITY + 10) {
        transcript.record_log(format!("line {}", i));
    }

    let logs: Vec<&str> = transcript.logs().collect();
    assert_eq!(logs.len(), DEFAULT_LOG_CAPACITY);
    assert_eq!(logs[0], "line 10");
    assert_eq!(logs[DEFAULT_LOG_CAPACITY - 1], format!("line {}", DEFAULT_LOG_CAPACITY + 9));
}

#[test]
fn test_zero_capacity_drops_logs() {
    let mut transcript = Transcript::with_log_capacity(0);
    transcript.record_log("ignored");
    assert_eq!(transcript.logs().count(), 0);
}

#[test]
fn test_clear_logs() {
    let mut transcript = Transcript::new();
    transcript.record_log("a");
    transcript.clear_logs();
    assert_eq!(transcript.logs().count(), 0);
}

#[test]
fn test_format_bytes() {
    assert_eq!(format_bytes(0), "0 B");
    assert_eq!(format_bytes(1023), "1023 B");
    assert_eq!(format_bytes(1536), "1.5 KB");
    assert_eq!(format_bytes(2 * 1024 * 1024), "2.0 MB");
}
