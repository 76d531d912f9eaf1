//! Network Module
//!
//! Transport resources owned by the engine.
//!
//! ## Architecture
//! - [`Acceptor`]: non-blocking listener polled until a peer arrives or the
//!   attempt is cancelled
//! - [`Connection`]: an established stream split into a shared line writer
//!   and a buffered reader handed to the read loop thread
//! - [`local_ipv4`]: best-effort local address for operator display

mod server;
mod connection;
mod local_addr;

pub use server::Acceptor;
pub use connection::Connection;
pub use local_addr::{local_ipv4, LocalAddress};
