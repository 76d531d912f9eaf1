//! Local address query
//!
//! Finds the non-loopback IPv4 address other devices would use to reach
//! this host, for display when starting a server.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Off-host address used only to pick an outbound route; nothing is sent
const ROUTE_PROBE: (Ipv4Addr, u16) = (Ipv4Addr::new(192, 0, 2, 1), 9);

/// Result of a local address lookup
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocalAddress {
    Ipv4(Ipv4Addr),

    /// No usable non-loopback interface
    NoNetwork,

    /// Lookup failed
    Error(String),
}

impl fmt::Display for LocalAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LocalAddress::Ipv4(addr) => write!(f, "{}", addr),
            LocalAddress::NoNetwork => write!(f, "No network"),
            LocalAddress::Error(msg) => write!(f, "Error: {}", msg),
        }
    }
}

/// Look up this host's primary non-loopback IPv4 address
///
/// Connecting a UDP socket only asks the kernel for a route, so this is
/// synchronous and never touches the wire.
pub fn local_ipv4() -> LocalAddress {
    let socket = match UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)) {
        Ok(s) => s,
        Err(e) => return LocalAddress::Error(e.to_string()),
    };

    // Fails only when the kernel has no route out
    if let Err(e) = socket.connect(ROUTE_PROBE) {
        tracing::debug!("No outbound route: {}", e);
        return LocalAddress::NoNetwork;
    }

    match socket.local_addr() {
        Ok(addr) => match addr.ip() {
            IpAddr::V4(ip) if !ip.is_loopback() && !ip.is_unspecified() => LocalAddress::Ipv4(ip),
            _ => LocalAddress::NoNetwork,
        },
        Err(e) => LocalAddress::Error(e.to_string()),
    }
}
