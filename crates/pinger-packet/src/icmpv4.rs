use crate::buffer::Buffer;
use crate::error::{Error, Result};
use std::fmt::{Debug, Formatter};

/// The type of `ICMPv4` packet.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub enum IcmpType {
    EchoReply,
    DestinationUnreachable,
    SourceQuench,
    Redirect,
    EchoRequest,
    TimeExceeded,
    ParameterProblem,
    Other(u8),
}

impl IcmpType {
    #[must_use]
    pub const fn id(&self) -> u8 {
        match self {
            Self::EchoReply => 0,
            Self::DestinationUnreachable => 3,
            Self::SourceQuench => 4,
            Self::Redirect => 5,
            Self::EchoRequest => 8,
            Self::TimeExceeded => 11,
            Self::ParameterProblem => 12,
            Self::Other(id) => *id,
        }
    }

    /// Is this an error message which quotes the datagram that caused it?
    #[must_use]
    pub const fn is_datagram_error(&self) -> bool {
        matches!(
            self,
            Self::DestinationUnreachable
                | Self::SourceQuench
                | Self::Redirect
                | Self::TimeExceeded
                | Self::ParameterProblem
        )
    }
}

impl From<u8> for IcmpType {
    fn from(val: u8) -> Self {
        match val {
            0 => Self::EchoReply,
            3 => Self::DestinationUnreachable,
            4 => Self::SourceQuench,
            5 => Self::Redirect,
            8 => Self::EchoRequest,
            11 => Self::TimeExceeded,
            12 => Self::ParameterProblem,
            id => Self::Other(id),
        }
    }
}

/// The `ICMPv4` code.
#[derive(Debug, Copy, Clone, Ord, PartialOrd, Eq, PartialEq)]
pub struct IcmpCode(pub u8);

impl From<u8> for IcmpCode {
    fn from(val: u8) -> Self {
        Self(val)
    }
}

const TYPE_OFFSET: usize = 0;
const CODE_OFFSET: usize = 1;
const CHECKSUM_OFFSET: usize = 2;

/// The size of the fixed `ICMPv4` header shared by all message types.
const HEADER_SIZE: usize = 8;

fn check_size(name: &str, len: usize) -> Result<()> {
    if len >= HEADER_SIZE {
        Ok(())
    } else {
        Err(Error::InsufficientPacketBuffer(
            String::from(name),
            HEADER_SIZE,
            len,
        ))
    }
}

/// Represents a generic `ICMPv4` packet.
///
/// Used to inspect the type and code of a received message before choosing
/// a more specific view.
///
/// The internal representation is held in network byte order (big-endian) and all accessor methods
/// take and return data in host byte order, converting as necessary for the given architecture.
pub struct IcmpPacket<'a> {
    buf: Buffer<'a>,
}

impl<'a> IcmpPacket<'a> {
    pub fn new_view(packet: &'a [u8]) -> Result<Self> {
        check_size("IcmpPacket", packet.len())?;
        Ok(Self {
            buf: Buffer::Immutable(packet),
        })
    }

    #[must_use]
    pub const fn minimum_packet_size() -> usize {
        HEADER_SIZE
    }

    #[must_use]
    pub fn get_icmp_type(&self) -> IcmpType {
        IcmpType::from(self.buf.read(TYPE_OFFSET))
    }

    #[must_use]
    pub fn get_icmp_code(&self) -> IcmpCode {
        IcmpCode::from(self.buf.read(CODE_OFFSET))
    }

    #[must_use]
    pub fn get_checksum(&self) -> u16 {
        self.buf.read_u16(CHECKSUM_OFFSET)
    }

    #[must_use]
    pub fn packet(&self) -> &[u8] {
        self.buf.as_slice()
    }
}

impl Debug for IcmpPacket<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IcmpPacket")
            .field("icmp_type", &self.get_icmp_type())
            .field("icmp_code", &self.get_icmp_code())
            .field("checksum", &self.get_checksum())
            .finish()
    }
}


pub mod echo {
    use super::{check_size, IcmpCode, IcmpType, CHECKSUM_OFFSET, CODE_OFFSET, TYPE_OFFSET};
    use crate::buffer::Buffer;
    use crate::error::Result;
    use crate::fmt_payload;
    use std::fmt::{Debug, Formatter};

    const IDENTIFIER_OFFSET: usize = 4;
    const SEQUENCE_OFFSET: usize = 6;

    /// Represents an `ICMPv4` echo request or echo reply packet.
    ///
    /// Both messages share a layout and differ only by type.
    ///
    /// The internal representation is held in network byte order (big-endian) and all accessor methods
    /// take and return data in host byte order, converting as necessary for the given architecture.
    pub struct EchoPacket<'a> {
        buf: Buffer<'a>,
    }

    impl<'a> EchoPacket<'a> {
        pub fn new(packet: &'a mut [u8]) -> Result<Self> {
            check_size("EchoPacket", packet.len())?;
            Ok(Self {
                buf: Buffer::Mutable(packet),
            })
        }

        pub fn new_view(packet: &'a [u8]) -> Result<Self> {
            check_size("EchoPacket", packet.len())?;
            Ok(Self {
                buf: Buffer::Immutable(packet),
            })
        }

        #[must_use]
        pub const fn minimum_packet_size() -> usize {
            super::HEADER_SIZE
        }

        #[must_use]
        pub fn get_icmp_type(&self) -> IcmpType {
            IcmpType::from(self.buf.read(TYPE_OFFSET))
        }

        #[must_use]
        pub fn get_icmp_code(&self) -> IcmpCode {
            IcmpCode::from(self.buf.read(CODE_OFFSET))
        }

        #[must_use]
        pub fn get_checksum(&self) -> u16 {
            self.buf.read_u16(CHECKSUM_OFFSET)
        }

        #[must_use]
        pub fn get_identifier(&self) -> u16 {
            self.buf.read_u16(IDENTIFIER_OFFSET)
        }

        #[must_use]
        pub fn get_sequence(&self) -> u16 {
            self.buf.read_u16(SEQUENCE_OFFSET)
        }

        pub fn set_icmp_type(&mut self, val: IcmpType) {
            self.buf.write(TYPE_OFFSET, val.id());
        }

        pub fn set_icmp_code(&mut self, val: IcmpCode) {
            self.buf.write(CODE_OFFSET, val.0);
        }

        pub fn set_checksum(&mut self, val: u16) {
            self.buf.write_u16(CHECKSUM_OFFSET, val);
        }

        pub fn set_identifier(&mut self, val: u16) {
            self.buf.write_u16(IDENTIFIER_OFFSET, val);
        }

        pub fn set_sequence(&mut self, val: u16) {
            self.buf.write_u16(SEQUENCE_OFFSET, val);
        }

        pub fn set_payload(&mut self, vals: &[u8]) {
            self.buf.set_tail(Self::minimum_packet_size(), vals);
        }

        #[must_use]
        pub fn packet(&self) -> &[u8] {
            self.buf.as_slice()
        }

        #[must_use]
        pub fn payload(&self) -> &[u8] {
            &self.buf.as_slice()[Self::minimum_packet_size()..]
        }
    }

    impl Debug for EchoPacket<'_> {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("EchoPacket")
                .field("icmp_type", &self.get_icmp_type())
                .field("icmp_code", &self.get_icmp_code())
                .field("checksum", &self.get_checksum())
                .field("identifier", &self.get_identifier())
                .field("sequence", &self.get_sequence())
                .field("payload", &fmt_payload(self.payload()))
                .finish()
        }
    }

}

pub mod datagram_error {
    use super::{check_size, IcmpCode, IcmpType, CHECKSUM_OFFSET, CODE_OFFSET, TYPE_OFFSET};
    use crate::buffer::Buffer;
    use crate::error::Result;
    use crate::fmt_payload;
    use std::fmt::{Debug, Formatter};

    /// Represents an `ICMPv4` error message which quotes the offending datagram.
    ///
    /// This covers `DestinationUnreachable`, `SourceQuench`, `Redirect`,
    /// `TimeExceeded` and `ParameterProblem`.  In each case the payload holds
    /// the original `IPv4` header followed by at least the first 8 bytes of
    /// the original datagram.
    ///
    /// The internal representation is held in network byte order (big-endian) and all accessor methods
    /// take and return data in host byte order, converting as necessary for the given architecture.
    pub struct DatagramErrorPacket<'a> {
        buf: Buffer<'a>,
    }

    impl<'a> DatagramErrorPacket<'a> {
        pub fn new_view(packet: &'a [u8]) -> Result<Self> {
            check_size("DatagramErrorPacket", packet.len())?;
            Ok(Self {
                buf: Buffer::Immutable(packet),
            })
        }

        #[must_use]
        pub const fn minimum_packet_size() -> usize {
            super::HEADER_SIZE
        }

        #[must_use]
        pub fn get_icmp_type(&self) -> IcmpType {
            IcmpType::from(self.buf.read(TYPE_OFFSET))
        }

        #[must_use]
        pub fn get_icmp_code(&self) -> IcmpCode {
            IcmpCode::from(self.buf.read(CODE_OFFSET))
        }

        #[must_use]
        pub fn get_checksum(&self) -> u16 {
            self.buf.read_u16(CHECKSUM_OFFSET)
        }

        #[must_use]
        pub fn packet(&self) -> &[u8] {
            self.buf.as_slice()
        }

        /// The quoted datagram.
        #[must_use]
        pub fn payload(&self) -> &[u8] {
            &self.buf.as_slice()[Self::minimum_packet_size()..]
        }
    }

    impl Debug for DatagramErrorPacket<'_> {
        fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("DatagramErrorPacket")
                .field("icmp_type", &self.get_icmp_type())
                .field("icmp_code", &self.get_icmp_code())
                .field("checksum", &self.get_checksum())
                .field("payload", &fmt_payload(self.payload()))
                .finish()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::icmpv4::echo::EchoPacket;
        use crate::ipv4::Ipv4Packet;
        use hex_literal::hex;

        #[test]
        fn test_time_exceeded_view() {
            let buf = hex!(
                "
                0b 00 f4 ff 00 00 00 00 45 60 00 54 65 b0 40 00
                01 01 e4 11 c0 a8 01 15 8e fb de ce 08 00 01 11
                75 d7 81 17
                "
            );
            let packet = DatagramErrorPacket::new_view(&buf).unwrap();
            assert_eq!(IcmpType::TimeExceeded, packet.get_icmp_type());
            assert_eq!(IcmpCode(0), packet.get_icmp_code());
            assert_eq!(0xf4ff, packet.get_checksum());
            let nested_ipv4 = Ipv4Packet::new_view(packet.payload()).unwrap();
            let nested_echo = EchoPacket::new_view(nested_ipv4.payload()).unwrap();
            assert_eq!(IcmpType::EchoRequest, nested_echo.get_icmp_type());
            assert_eq!(30167, nested_echo.get_identifier());
            assert_eq!(33047, nested_echo.get_sequence());
        }

        #[test]
        fn test_destination_unreachable_view() {
            let buf = hex!("03 01 fc fe 00 00 00 00 45 00");
            let packet = DatagramErrorPacket::new_view(&buf).unwrap();
            assert_eq!(IcmpType::DestinationUnreachable, packet.get_icmp_type());
            assert_eq!(IcmpCode(1), packet.get_icmp_code());
            assert_eq!(0xfcfe, packet.get_checksum());
            assert_eq!(&buf, packet.packet());
            assert_eq!(&[0x45, 0x00], packet.payload());
        }

        #[test]
        fn test_new_view_insufficient_buffer() {
            let buf = [0_u8; 4];
            assert!(DatagramErrorPacket::new_view(&buf).is_err());
        }
    }
}
