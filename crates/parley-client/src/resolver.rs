//! Server address resolution.
//!
//! Turns the `<SERVER_IP> <PORT>` arguments into a socket address. Only
//! dotted-quad IPv4 literals are accepted; host names are not looked up.

use std::{
    fmt,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
};

use crate::ResolveError;

/// Lowest port the client will connect to.
pub const MIN_PORT: u16 = 1024;

/// Validated server endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerAddress {
    ip: Ipv4Addr,
    port: u16,
}

impl ServerAddress {
    /// Validate the IP and port arguments.
    pub fn new(ip: &str, port: &str) -> Result<Self, ResolveError> {
        Ok(Self { ip: Self::parse_ip(ip)?, port: Self::parse_port(port)? })
    }

    /// Parse an IPv4 address literal.
    pub fn parse_ip(ip: &str) -> Result<Ipv4Addr, ResolveError> {
        ip.parse().map_err(|_| ResolveError::InvalidAddress(ip.to_string()))
    }

    /// Parse a decimal port in `[MIN_PORT, 65535]`.
    pub fn parse_port(port: &str) -> Result<u16, ResolveError> {
        let value: i64 = port.trim().parse().map_err(|_| ResolveError::InvalidPort(port.to_string()))?;
        u16::try_from(value)
            .ok()
            .filter(|p| *p >= MIN_PORT)
            .ok_or(ResolveError::PortOutOfRange(value))
    }

    /// The IPv4 address.
    pub fn ip(&self) -> Ipv4Addr {
        self.ip
    }

    /// The port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Socket address to connect to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::V4(SocketAddrV4::new(self.ip, self.port))
    }
}

impl fmt::Display for ServerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.ip, self.port)
    }
}
