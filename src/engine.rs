//! Engine Module
//!
//! The connection engine that owns the single logical TCP link.
//!
//! ## Responsibilities
//! - Dial a peer (client role) or accept one peer (server role)
//! - Run one read loop thread per established connection
//! - Write outbound lines
//! - Tear everything down on disconnect, failure or remote close
//! - Publish state transitions, inbound messages and log lines

use std::io::BufReader;
use std::mem;
use std::net::{SocketAddr, TcpStream};
use std::sync::Arc;
use std::thread;

use crossbeam::channel::Receiver;
use parking_lot::Mutex;

use crate::config::{ConnectionConfig, EngineConfig, Role};
use crate::error::{LinkError, Result};
use crate::model::{ConnectionState, Message};
use crate::network::{local_ipv4, Acceptor, Connection, LocalAddress};
use crate::observer::{Broadcast, Latest};
use crate::protocol;

/// State reported after a non-EOF read failure
pub const CONNECTION_LOST: &str = "Connection lost";

/// Transport resources, present only while the state implies them
enum Link {
    /// Nothing held
    Idle,

    /// Attempt started, socket not yet available (dial or bind in flight)
    Pending,

    /// Listening socket bound; the acceptor itself lives on the accepting thread
    Listening { local_addr: SocketAddr },

    /// Established stream
    Connected(Connection),
}

/// Everything the state lock protects
///
/// ## Concurrency:
/// - `generation` is bumped by every new attempt and by `disconnect`.
///   Background work captures the value it started with and drops its
///   outcome once the value has moved on.
/// - State changes and their broadcast happen under the same lock, so
///   every observer sees one total order.
struct Core {
    state: Latest<ConnectionState>,
    link: Link,
    generation: u64,
}

struct Shared {
    config: EngineConfig,
    core: Mutex<Core>,
    messages: Broadcast<Message>,
    logs: Broadcast<String>,
}

/// Point-to-point connection engine
///
/// Cheap to clone; all clones drive the same link. Dial and accept block
/// the calling thread until the attempt resolves, so callers that need to
/// stay responsive run them on a thread of their own. Call
/// [`disconnect`](Engine::disconnect) to release the link; the read loop
/// thread keeps the engine alive until then.
#[derive(Clone)]
pub struct Engine {
    shared: Arc<Shared>,
}

impl Engine {
    /// Create an idle engine
    pub fn new(config: EngineConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                config,
                core: Mutex::new(Core {
                    state: Latest::new(ConnectionState::Idle),
                    link: Link::Idle,
                    generation: 0,
                }),
                messages: Broadcast::new(),
                logs: Broadcast::new(),
            }),
        }
    }

    // =========================================================================
    // Observation
    // =========================================================================

    /// Current connection state
    pub fn state(&self) -> ConnectionState {
        self.shared.core.lock().state.get().clone()
    }

    /// Subscribe to state transitions; the current state arrives first
    pub fn subscribe_state(&self) -> Receiver<ConnectionState> {
        self.shared.core.lock().state.subscribe()
    }

    /// Subscribe to inbound messages (no replay)
    pub fn subscribe_messages(&self) -> Receiver<Message> {
        self.shared.messages.subscribe()
    }

    /// Subscribe to diagnostic log lines (no replay)
    pub fn subscribe_logs(&self) -> Receiver<String> {
        self.shared.logs.subscribe()
    }

    /// Bound address while listening
    pub fn listening_addr(&self) -> Option<SocketAddr> {
        match self.shared.core.lock().link {
            Link::Listening { local_addr } => Some(local_addr),
            _ => None,
        }
    }

    /// This host's non-loopback IPv4 address, for display
    pub fn local_address(&self) -> LocalAddress {
        local_ipv4()
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Start an attempt for the role named in `config`
    pub fn start(&self, config: &ConnectionConfig) -> Result<()> {
        config.validate()?;
        match config.role {
            Role::Client => self.connect_as_client(&config.host, config.port),
            Role::Server => self.start_as_server(config.port),
        }
    }

    /// Dial `host:port` and, on success, start the read loop
    ///
    /// Blocks until the dial resolves. Transport failures move the engine
    /// to `Error` and are also returned. Returns `LinkError::Busy` without
    /// touching state if a link is already active, and
    /// `LinkError::Cancelled` if `disconnect` ran while dialing.
    pub fn connect_as_client(&self, host: &str, port: u16) -> Result<()> {
        let target = format!("{}:{}", host, port);
        let generation = self.begin_attempt(ConnectionState::Connecting)?;
        self.log(format!("Connecting to {}...", target));

        // No timeout: a hung dial lasts until the OS gives up or we disconnect
        let stream = match TcpStream::connect((host, port)) {
            Ok(stream) => stream,
            Err(e) => return Err(self.fail_attempt(generation, e.to_string())),
        };

        let connected_line = format!("Connected to {}", target);
        self.establish(generation, stream, target, connected_line)
    }

    /// Listen on `port` and accept exactly one peer
    ///
    /// Blocks until a peer connects, the attempt fails, or `disconnect`
    /// cancels it. Cancellation is a normal stop: the state is `Idle`, a
    /// "Server stopped" line is logged and `LinkError::Cancelled` returned.
    pub fn start_as_server(&self, port: u16) -> Result<()> {
        let generation = self.begin_attempt(ConnectionState::Listening)?;
        let local_ip = local_ipv4();
        self.log(format!("Starting server on {}:{}...", local_ip, port));

        let acceptor = match Acceptor::bind(&self.shared.config.bind_host, port) {
            Ok(acceptor) => acceptor,
            Err(e) => return Err(self.fail_listen(generation, e.to_string())),
        };
        let local_addr = acceptor.local_addr();

        {
            let mut core = self.shared.core.lock();
            if core.generation != generation {
                drop(core);
                return Err(self.server_stopped());
            }
            core.link = Link::Listening { local_addr };
        }
        self.log(format!(
            "Listening on {}:{} - Waiting for connection...",
            local_ip,
            local_addr.port()
        ));

        let accepted = acceptor.accept_until(self.shared.config.accept_poll_interval, || {
            self.is_current(generation)
        });
        // Single-peer server: stop listening whatever the outcome
        drop(acceptor);

        match accepted {
            Ok(Some((stream, peer))) => {
                let remote = peer.to_string();
                let connected_line = format!("Client connected from {}", remote);
                self.establish(generation, stream, remote, connected_line)
            }
            Ok(None) => Err(self.server_stopped()),
            Err(e) => Err(self.fail_listen(generation, e.to_string())),
        }
    }

    /// Write `text` as one line and flush it
    ///
    /// Failures are returned and logged but never change the state; the
    /// read loop is the authority on connection loss.
    pub fn send(&self, text: &str) -> Result<()> {
        let writer = match &self.shared.core.lock().link {
            Link::Connected(connection) => Some(connection.writer()),
            _ => None,
        };

        let Some(writer) = writer else {
            self.log("Send failed: not connected".to_string());
            return Err(LinkError::NotConnected);
        };

        // Written outside the state lock so a stalled peer cannot block disconnect
        let result = protocol::write_line(&mut *writer.lock(), text);
        match &result {
            Ok(()) => {
                tracing::trace!("Sent {} bytes", text.len());
                self.log(format!("Sent: {}", text));
            }
            Err(e) => {
                tracing::warn!("Send failed: {}", e);
                self.log(format!("Send failed: {}", e));
            }
        }
        result
    }

    /// Release every resource and return to `Idle`
    ///
    /// Safe from any state and safe to repeat. Also cancels an in-flight
    /// dial, accept or read loop; they notice the bumped generation and
    /// exit without reporting an error.
    pub fn disconnect(&self) {
        self.log("Disconnecting...".to_string());

        let link = {
            let mut core = self.shared.core.lock();
            core.generation += 1;
            core.state.set(ConnectionState::Idle);
            mem::replace(&mut core.link, Link::Idle)
        };

        // Shuts the socket down, unblocking the read loop
        drop(link);
    }

    // =========================================================================
    // Internal Helpers
    // =========================================================================

    /// Claim the engine for a new attempt
    fn begin_attempt(&self, state: ConnectionState) -> Result<u64> {
        let mut core = self.shared.core.lock();
        if core.state.get().is_active() {
            tracing::debug!("Rejecting new attempt while {}", core.state.get());
            return Err(LinkError::Busy(core.state.get().to_string()));
        }

        core.generation += 1;
        core.link = Link::Pending;
        core.state.set(state);
        Ok(core.generation)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.shared.core.lock().generation == generation
    }

    /// Record a failed attempt unless it was cancelled meanwhile
    fn fail_attempt(&self, generation: u64, reason: String) -> LinkError {
        let released = {
            let mut core = self.shared.core.lock();
            if core.generation != generation {
                return LinkError::Cancelled;
            }
            core.state.set(ConnectionState::Error(reason.clone()));
            mem::replace(&mut core.link, Link::Idle)
        };
        drop(released);

        tracing::warn!("Attempt failed: {}", reason);
        self.log(format!("Error: {}", reason));
        LinkError::Connect(reason)
    }

    /// Server-role failure: a cancelled attempt still reports the stop
    fn fail_listen(&self, generation: u64, reason: String) -> LinkError {
        match self.fail_attempt(generation, reason) {
            LinkError::Cancelled => self.server_stopped(),
            err => err,
        }
    }

    fn server_stopped(&self) -> LinkError {
        self.log("Server stopped".to_string());
        LinkError::Cancelled
    }

    /// Install an established stream and launch its read loop
    fn establish(
        &self,
        generation: u64,
        stream: TcpStream,
        remote: String,
        connected_line: String,
    ) -> Result<()> {
        let (connection, reader) =
            match Connection::open(stream, remote.clone(), &self.shared.config) {
                Ok(parts) => parts,
                Err(e) => return Err(self.fail_attempt(generation, e.to_string())),
            };

        {
            let mut core = self.shared.core.lock();
            if core.generation != generation {
                // Disconnected while dialing or accepting
                return Err(LinkError::Cancelled);
            }
            core.link = Link::Connected(connection);
            core.state.set(ConnectionState::Connected(remote));
        }
        self.log(connected_line);

        let engine = self.clone();
        let spawned = thread::Builder::new()
            .name(format!("{}-reader", self.shared.config.thread_name))
            .spawn(move || engine.read_loop(generation, reader));

        if let Err(e) = spawned {
            return Err(self.fail_attempt(generation, e.to_string()));
        }
        Ok(())
    }

    /// Deliver inbound lines until EOF, error or local disconnect
    fn read_loop(&self, generation: u64, mut reader: BufReader<TcpStream>) {
        tracing::debug!("Read loop started (generation {})", generation);
        let mut buf = Vec::with_capacity(self.shared.config.read_buffer_size);
        let max_line_length = self.shared.config.max_line_length;

        loop {
            match protocol::read_bounded_line(&mut reader, &mut buf, max_line_length) {
                Ok(Some(line)) => {
                    // Held across publish so nothing is delivered once disconnect returns
                    let core = self.shared.core.lock();
                    if core.generation != generation {
                        break;
                    }
                    tracing::trace!("Received {} bytes", line.len());
                    self.shared.messages.publish(&Message::received(line));
                }
                Ok(None) => {
                    if self.is_current(generation) {
                        self.log("Remote disconnected".to_string());
                    }
                    break;
                }
                Err(e) => {
                    let lost = {
                        let mut core = self.shared.core.lock();
                        let lost = core.generation == generation && core.state.get().is_connected();
                        if lost {
                            core.state
                                .set(ConnectionState::Error(CONNECTION_LOST.to_string()));
                        }
                        lost
                    };
                    if lost {
                        tracing::warn!("Read failed: {}", e);
                        self.log(format!("Error: {}", e));
                    }
                    break;
                }
            }
        }

        self.finish_connection(generation);
        tracing::debug!("Read loop exited (generation {})", generation);
    }

    /// Release the link after the read loop ends, unless disconnect already did
    fn finish_connection(&self, generation: u64) {
        let released = {
            let mut core = self.shared.core.lock();
            if core.generation != generation {
                return;
            }
            if core.state.get().is_connected() {
                core.state.set(ConnectionState::Idle);
            }
            mem::replace(&mut core.link, Link::Idle)
        };
        drop(released);
    }

    /// Publish a diagnostic line and mirror it to tracing
    fn log(&self, line: String) {
        tracing::info!(target: "linktcp::engine", "{}", line);
        self.shared.logs.publish(&line);
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine").field("state", &self.state()).finish()
    }
}
