//! Packet wire format parsing and building.
//!
//! The following packet are supported:
//! - `IPv4`
//! - `ICMPv4` echo request and echo reply
//! - `ICMPv4` error messages which quote the offending datagram
//!
//! # Endianness
//!
//! The internal representation is held in network byte order (big-endian) and
//! all accessor methods take and return data in host byte order, converting as
//! necessary for the given architecture.
//!
//! # Example
//!
//! The following example parses an `IPv4` packet carrying an `ICMPv4` echo
//! reply and asserts its fields:
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! use pinger_packet::icmpv4::echo::EchoPacket;
//! use pinger_packet::icmpv4::IcmpType;
//! use pinger_packet::ipv4::Ipv4Packet;
//! use std::net::Ipv4Addr;
//!
//! let buf = hex_literal::hex!(
//!     "
//!     45 00 00 1c 00 00 00 00 40 01 7c df 7f 00 00 01
//!     7f 00 00 01 00 00 fb 23 04 d2 00 0a
//!     "
//! );
//! let ipv4 = Ipv4Packet::new_view(&buf)?;
//! assert_eq!(Ipv4Addr::LOCALHOST, ipv4.get_source());
//! assert_eq!(64, ipv4.get_ttl());
//! let echo = EchoPacket::new_view(ipv4.payload())?;
//! assert_eq!(IcmpType::EchoReply, echo.get_icmp_type());
//! assert_eq!(1234, echo.get_identifier());
//! assert_eq!(10, echo.get_sequence());
//! # Ok(())
//! # }
//! ```
//!
//! The following example builds an `ICMPv4` echo request packet:
//!
//! ```rust
//! # fn main() -> anyhow::Result<()> {
//! use pinger_packet::checksum::icmp_ipv4_checksum;
//! use pinger_packet::icmpv4::echo::EchoPacket;
//! use pinger_packet::icmpv4::{IcmpCode, IcmpType};
//!
//! let mut buf = [0; EchoPacket::minimum_packet_size()];
//! let mut icmp = EchoPacket::new(&mut buf)?;
//! icmp.set_icmp_type(IcmpType::EchoRequest);
//! icmp.set_icmp_code(IcmpCode(0));
//! icmp.set_identifier(1234);
//! icmp.set_sequence(10);
//! icmp.set_checksum(icmp_ipv4_checksum(icmp.packet()));
//! assert_eq!(icmp.packet(), &hex_literal::hex!("08 00 f3 23 04 d2 00 0a"));
//! # Ok(())
//! # }
//! ```
#![forbid(unsafe_code)]

mod buffer;

/// Packet errors.
pub mod error;

/// The Internet checksum.
pub mod checksum;

/// `ICMPv4` packets.
pub mod icmpv4;

/// `IPv4` packets.
pub mod ipv4;

/// The IP packet next layer protocol.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum IpProtocol {
    Icmp,
    Other(u8),
}

impl From<u8> for IpProtocol {
    fn from(id: u8) -> Self {
        match id {
            1 => Self::Icmp,
            p => Self::Other(p),
        }
    }
}

/// Format a payload as a hexadecimal string.
#[must_use]
pub fn fmt_payload(bytes: &[u8]) -> String {
    use itertools::Itertools as _;
    format!("{:02x}", bytes.iter().format(" "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_protocol() {
        assert_eq!(IpProtocol::Icmp, IpProtocol::from(1));
        assert_eq!(IpProtocol::Other(17), IpProtocol::from(17));
    }

    #[test]
    fn test_fmt_payload() {
        assert_eq!("", fmt_payload(&[]));
        assert_eq!("08 00 ff", fmt_payload(&[0x08, 0x00, 0xff]));
    }
}
