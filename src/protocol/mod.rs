//! Protocol Module
//!
//! Defines the wire protocol spoken over the link.
//!
//! ## Protocol Format (Line-Oriented Text)
//!
//! ```text
//! ┌─────────────────────────────────────┬──────┐
//! │       UTF-8 text (no '\n')          │ '\n' │
//! └─────────────────────────────────────┴──────┘
//! ```
//!
//! - No length prefix, no handshake, no header
//! - Outbound lines end with a single `\n`
//! - Inbound `\r\n` is accepted; the `\r` is stripped
//! - A trailing fragment without terminator at end of stream is discarded
//! - Invalid UTF-8 is replaced with U+FFFD rather than failing the read
//! - Inbound lines over the engine's `max_line_length` fail the read

mod codec;

pub use codec::{
    decode_line, encode_line, read_bounded_line, read_line, write_line, LINE_TERMINATOR,
};
