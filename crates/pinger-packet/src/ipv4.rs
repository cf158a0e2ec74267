use crate::buffer::Buffer;
use crate::error::{Error, Result};
use crate::{fmt_payload, IpProtocol};
use std::fmt::{Debug, Formatter};
use std::net::Ipv4Addr;

const VERSION_OFFSET: usize = 0;
const IHL_OFFSET: usize = 0;
const TOTAL_LENGTH_OFFSET: usize = 2;
const TIME_TO_LIVE_OFFSET: usize = 8;
const PROTOCOL_OFFSET: usize = 9;
const CHECKSUM_OFFSET: usize = 10;
const SOURCE_OFFSET: usize = 12;
const DESTINATION_OFFSET: usize = 16;

/// The minimum value of the header length field, in 32-bit words.
const MIN_HEADER_LENGTH: u8 = 5;

/// Represents an IPv4 Packet.
///
/// Only the fields needed to locate and attribute an `ICMP` message are
/// exposed; options are skipped using the header length.
///
/// The internal representation is held in network byte order (big-endian) and all accessor methods
/// take and return data in host byte order, converting as necessary for the given architecture.
pub struct Ipv4Packet<'a> {
    buf: Buffer<'a>,
}

impl<'a> Ipv4Packet<'a> {
    pub fn new_view(packet: &'a [u8]) -> Result<Self> {
        Self::check_size(packet.len())?;
        Ok(Self {
            buf: Buffer::Immutable(packet),
        })
    }

    fn check_size(len: usize) -> Result<()> {
        if len >= Self::minimum_packet_size() {
            Ok(())
        } else {
            Err(Error::InsufficientPacketBuffer(
                String::from("Ipv4Packet"),
                Self::minimum_packet_size(),
                len,
            ))
        }
    }

    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        20
    }

    #[must_use]
    pub fn get_version(&self) -> u8 {
        (self.buf.read(VERSION_OFFSET) & 0xf0) >> 4
    }

    /// The header length in 32-bit words.
    #[must_use]
    pub fn get_header_length(&self) -> u8 {
        self.buf.read(IHL_OFFSET) & 0xf
    }

    /// The header length in bytes.
    #[must_use]
    pub fn header_size(&self) -> usize {
        usize::from(self.get_header_length()) * 4
    }

    /// Check the header length field describes a header which fits in this packet.
    pub fn check_header_length(&self) -> Result<()> {
        let len = self.buf.as_slice().len();
        if self.get_header_length() < MIN_HEADER_LENGTH || self.header_size() > len {
            Err(Error::InvalidHeaderLength(self.get_header_length(), len))
        } else {
            Ok(())
        }
    }

    #[must_use]
    pub fn get_total_length(&self) -> u16 {
        self.buf.read_u16(TOTAL_LENGTH_OFFSET)
    }

    #[must_use]
    pub fn get_ttl(&self) -> u8 {
        self.buf.read(TIME_TO_LIVE_OFFSET)
    }

    #[must_use]
    pub fn get_protocol(&self) -> IpProtocol {
        IpProtocol::from(self.buf.read(PROTOCOL_OFFSET))
    }

    #[must_use]
    pub fn get_checksum(&self) -> u16 {
        self.buf.read_u16(CHECKSUM_OFFSET)
    }

    #[must_use]
    pub fn get_source(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.buf.get_bytes::<4>(SOURCE_OFFSET))
    }

    #[must_use]
    pub fn get_destination(&self) -> Ipv4Addr {
        Ipv4Addr::from(self.buf.get_bytes::<4>(DESTINATION_OFFSET))
    }

    #[must_use]
    pub fn packet(&self) -> &[u8] {
        self.buf.as_slice()
    }

    /// The bytes after the header, empty if the header length is out of range.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        let bytes = self.buf.as_slice();
        let start = self
            .header_size()
            .clamp(Self::minimum_packet_size(), bytes.len());
        &bytes[start..]
    }
}

impl Debug for Ipv4Packet<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ipv4Packet")
            .field("version", &self.get_version())
            .field("header_length", &self.get_header_length())
            .field("total_length", &self.get_total_length())
            .field("ttl", &self.get_ttl())
            .field("protocol", &self.get_protocol())
            .field("checksum", &self.get_checksum())
            .field("source", &self.get_source())
            .field("destination", &self.get_destination())
            .field("payload", &fmt_payload(self.payload()))
            .finish()
    }
}
