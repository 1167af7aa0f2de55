use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, SocketAddrV4, SocketAddrV6},
    str::FromStr,
};

use thiserror::Error;

/// Address family of an [`Address`]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum AddressType {
    None,
    Ipv4,
    Ipv6,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressParseError {
    /// Text is neither an IP address nor an IP address with a port
    #[error("'{input}' is not a valid address, expected a.b.c.d[:port], an IPv6 address, or [ipv6]:port")]
    Invalid { input: String },
}

/// A network endpoint as seen at the transport boundary: an IPv4 or IPv6
/// address plus port, or nothing at all.
///
/// The default value is the invalid address, which displays as `NONE`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Address {
    ip: Option<IpAddr>,
    port: u16,
}

impl Address {
    pub fn from_ipv4(a: u8, b: u8, c: u8, d: u8, port: u16) -> Self {
        Self {
            ip: Some(IpAddr::V4(Ipv4Addr::new(a, b, c, d))),
            port,
        }
    }

    /// `address` in host order, so `0x7f000001` is 127.0.0.1
    pub fn from_u32(address: u32, port: u16) -> Self {
        Self {
            ip: Some(IpAddr::V4(Ipv4Addr::from(address))),
            port,
        }
    }

    pub fn from_ipv6_groups(groups: [u16; 8], port: u16) -> Self {
        let [a, b, c, d, e, f, g, h] = groups;
        Self {
            ip: Some(IpAddr::V6(Ipv6Addr::new(a, b, c, d, e, f, g, h))),
            port,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.ip.is_some()
    }

    pub fn address_type(&self) -> AddressType {
        match self.ip {
            None => AddressType::None,
            Some(IpAddr::V4(_)) => AddressType::Ipv4,
            Some(IpAddr::V6(_)) => AddressType::Ipv6,
        }
    }

    /// The IPv4 address in host order
    pub fn address4(&self) -> Option<u32> {
        match self.ip {
            Some(IpAddr::V4(ip)) => Some(u32::from(ip)),
            _ => None,
        }
    }

    pub fn address6(&self) -> Option<[u16; 8]> {
        match self.ip {
            Some(IpAddr::V6(ip)) => Some(ip.segments()),
            _ => None,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    /// Back to the invalid address
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn to_socket_addr(&self) -> Option<SocketAddr> {
        self.ip.map(|ip| SocketAddr::new(ip, self.port))
    }

    /// Formats into `buffer`, cutting the text short if it doesn't fit, and
    /// returns the part that was written
    pub fn write_to<'b>(&self, buffer: &'b mut [u8]) -> &'b str {
        let text = self.to_string();
        let len = text.len().min(buffer.len());
        buffer[..len].copy_from_slice(&text.as_bytes()[..len]);
        // address text is ASCII, any cut is a char boundary
        std::str::from_utf8(&buffer[..len]).unwrap_or_default()
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_socket_addr() {
            Some(socket_addr) => write!(f, "{}", socket_addr),
            None => f.write_str("NONE"),
        }
    }
}

impl From<SocketAddr> for Address {
    fn from(socket_addr: SocketAddr) -> Self {
        Self {
            ip: Some(socket_addr.ip()),
            port: socket_addr.port(),
        }
    }
}

impl From<SocketAddrV4> for Address {
    fn from(socket_addr: SocketAddrV4) -> Self {
        SocketAddr::V4(socket_addr).into()
    }
}

impl From<SocketAddrV6> for Address {
    fn from(socket_addr: SocketAddrV6) -> Self {
        SocketAddr::V6(socket_addr).into()
    }
}

impl FromStr for Address {
    type Err = AddressParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let input = input.trim();
        if let Ok(socket_addr) = input.parse::<SocketAddr>() {
            return Ok(socket_addr.into());
        }
        if let Ok(ip) = input.parse::<IpAddr>() {
            return Ok(Self { ip: Some(ip), port: 0 });
        }
        Err(AddressParseError::Invalid {
            input: input.to_string(),
        })
    }
}
