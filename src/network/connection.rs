//! Connection Handle
//!
//! Owns one established TCP stream.

use std::io::{BufReader, BufWriter};
use std::net::{Shutdown, TcpStream};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::EngineConfig;
use crate::error::Result;

/// Line writer shared between `send` callers
pub(crate) type SharedWriter = Arc<Mutex<BufWriter<TcpStream>>>;

/// An established stream to the peer
///
/// Dropping the handle shuts the socket down in both directions, which
/// also wakes a read loop blocked on the cloned read half.
pub struct Connection {
    /// Original stream, kept for shutdown
    stream: TcpStream,

    /// Buffered write half
    writer: SharedWriter,

    /// Peer address as reported to observers
    peer_addr: String,
}

impl Connection {
    /// Wrap a connected stream
    ///
    /// Returns the handle plus the buffered read half for the read loop.
    pub fn open(
        stream: TcpStream,
        peer_addr: String,
        config: &EngineConfig,
    ) -> Result<(Self, BufReader<TcpStream>)> {
        if config.nodelay {
            stream.set_nodelay(true)?;
        }

        // Clone stream for separate read/write handles
        let read_stream = stream.try_clone()?;
        let write_stream = stream.try_clone()?;

        let connection = Self {
            stream,
            writer: Arc::new(Mutex::new(BufWriter::new(write_stream))),
            peer_addr,
        };
        let reader = BufReader::with_capacity(config.read_buffer_size, read_stream);

        tracing::debug!("Stream set up for {}", connection.peer_addr);
        Ok((connection, reader))
    }

    /// Handle to the shared line writer
    pub(crate) fn writer(&self) -> SharedWriter {
        Arc::clone(&self.writer)
    }

    /// Shut the socket down (best-effort, idempotent)
    pub fn close(&self) {
        if let Err(e) = self.stream.shutdown(Shutdown::Both) {
            // Already closed by the peer or by a previous call
            tracing::trace!("Shutdown of {} ignored: {}", self.peer_addr, e);
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        self.close();
    }
}
