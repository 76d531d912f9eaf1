//! Protocol codec
//!
//! Encoding and decoding functions for newline-delimited text.

use std::io::{BufRead, Read, Write};

use crate::error::{LinkError, Result};

/// Byte that ends every line on the wire
pub const LINE_TERMINATOR: u8 = b'\n';

// =============================================================================
// Line Encoding/Decoding
// =============================================================================

/// Encode a line of text to bytes
///
/// Format: text + '\n'. Text containing a terminator is rejected, since
/// the peer would see it as two messages.
pub fn encode_line(text: &str) -> Result<Vec<u8>> {
    if text.as_bytes().contains(&LINE_TERMINATOR) {
        return Err(LinkError::Protocol(
            "message contains an embedded newline".to_string(),
        ));
    }

    let mut line = Vec::with_capacity(text.len() + 1);
    line.extend_from_slice(text.as_bytes());
    line.push(LINE_TERMINATOR);
    Ok(line)
}

/// Decode one terminated line (terminator included) into text
///
/// Strips `\n` and a preceding `\r`, then decodes lossily.
pub fn decode_line(bytes: &[u8]) -> String {
    let mut end = bytes.len();
    if end > 0 && bytes[end - 1] == LINE_TERMINATOR {
        end -= 1;
        if end > 0 && bytes[end - 1] == b'\r' {
            end -= 1;
        }
    }
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

// =============================================================================
// Stream-based I/O helpers
// =============================================================================

/// Read the next complete line from a stream
///
/// Blocks until a terminator arrives. Returns `Ok(None)` at end of stream,
/// including when the stream ends mid-line (the fragment is dropped).
/// `buf` is scratch space reused across calls. Line length is unbounded;
/// use [`read_bounded_line`] on untrusted streams.
pub fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> Result<Option<String>> {
    read_bounded_line(reader, buf, usize::MAX)
}

/// Read the next complete line, refusing lines longer than `max_len`
///
/// `max_len` counts bytes before the `\n` (a trailing `\r` included). A
/// longer line fails with `LinkError::Protocol` before more than
/// `max_len + 1` bytes are buffered.
pub fn read_bounded_line<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
    max_len: usize,
) -> Result<Option<String>> {
    buf.clear();
    let limit = (max_len as u64).saturating_add(1);

    // read_until retries Interrupted internally
    if reader.by_ref().take(limit).read_until(LINE_TERMINATOR, buf)? == 0 {
        return Ok(None);
    }

    if buf.last() != Some(&LINE_TERMINATOR) {
        if buf.len() as u64 >= limit {
            return Err(LinkError::Protocol(format!(
                "line exceeds {} bytes",
                max_len
            )));
        }
        tracing::trace!("Discarding {} byte unterminated fragment", buf.len());
        return Ok(None);
    }

    Ok(Some(decode_line(buf)))
}

/// Write a line to a stream and flush it
pub fn write_line<W: Write>(writer: &mut W, text: &str) -> Result<()> {
    let bytes = encode_line(text)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}
