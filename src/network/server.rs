//! TCP Acceptor
//!
//! Binds a listening socket and waits for exactly one peer.

use std::io::ErrorKind;
use std::net::{SocketAddr, TcpListener, TcpStream};
use std::thread;
use std::time::Duration;

use crate::error::Result;

/// Listening socket for the server role
///
/// The listener runs in non-blocking mode so a pending accept can observe
/// cancellation; dropping the acceptor closes the socket.
pub struct Acceptor {
    listener: TcpListener,
    local_addr: SocketAddr,
}

impl Acceptor {
    /// Bind and listen on `host:port` (port 0 picks an ephemeral port)
    pub fn bind(host: &str, port: u16) -> Result<Self> {
        let listener = TcpListener::bind((host, port))?;
        listener.set_nonblocking(true)?;
        let local_addr = listener.local_addr()?;

        tracing::debug!("Listening socket bound on {}", local_addr);
        Ok(Self {
            listener,
            local_addr,
        })
    }

    /// Address the socket is bound to
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Wait for one inbound connection
    ///
    /// Polls every `poll_interval` and gives up as soon as `keep_waiting`
    /// returns false, yielding `Ok(None)`. The accepted stream is switched
    /// back to blocking mode.
    pub fn accept_until<F>(
        &self,
        poll_interval: Duration,
        mut keep_waiting: F,
    ) -> Result<Option<(TcpStream, SocketAddr)>>
    where
        F: FnMut() -> bool,
    {
        loop {
            if !keep_waiting() {
                return Ok(None);
            }

            match self.listener.accept() {
                Ok((stream, peer)) => {
                    stream.set_nonblocking(false)?;
                    tracing::debug!("Accepted connection from {}", peer);
                    return Ok(Some((stream, peer)));
                }
                Err(ref e) if e.kind() == ErrorKind::WouldBlock => {
                    thread::sleep(poll_interval);
                }
                Err(ref e)
                    if matches!(
                        e.kind(),
                        ErrorKind::Interrupted | ErrorKind::ConnectionAborted
                    ) =>
                {
                    // Peer gave up before we picked it up; keep listening
                    tracing::debug!("Transient accept error: {}", e);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
