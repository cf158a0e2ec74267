use crate::constants::{MAX_PACKET_SIZE, MAX_PAYLOAD_SIZE, TIMESTAMP_SIZE};
use crate::error::{Error, ErrorKind, Result};
use crate::net::common::ErrorMapper;
use crate::net::socket::Socket;
use crate::probe::{IcmpCode, IcmpError, Probe, Response, ResponseData};
use crate::types::{PayloadPattern, PayloadSize};
use pinger_packet::checksum::{icmp_ipv4_checksum, verify_icmp_ipv4_checksum};
use pinger_packet::icmpv4::datagram_error::DatagramErrorPacket;
use pinger_packet::icmpv4::echo::EchoPacket;
use pinger_packet::icmpv4::{IcmpPacket, IcmpType};
use pinger_packet::ipv4::Ipv4Packet;
use pinger_packet::IpProtocol;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};
use tracing::instrument;

/// Builds echo requests for, and decodes responses from, a single `IPv4` target.
#[derive(Debug, Clone, Copy)]
pub struct Ipv4 {
    pub dest_addr: Ipv4Addr,
    pub payload_size: PayloadSize,
    pub payload_pattern: PayloadPattern,
}

impl Ipv4 {
    #[instrument(skip(self, socket), level = "trace")]
    pub fn dispatch_echo_request<S: Socket>(&self, socket: &mut S, probe: Probe) -> Result<()> {
        let mut icmp_buf = [0_u8; MAX_PACKET_SIZE];
        let payload_size = usize::from(self.payload_size.0);
        if payload_size > usize::from(MAX_PAYLOAD_SIZE) {
            return Err(Error::InvalidPacketSize(payload_size));
        }
        let packet_size = EchoPacket::minimum_packet_size() + payload_size;
        let payload = self.make_payload(payload_size, probe.offset);
        let mut echo_request = EchoPacket::new(&mut icmp_buf[..packet_size])?;
        echo_request.set_icmp_type(IcmpType::EchoRequest);
        echo_request.set_identifier(probe.identifier.0);
        echo_request.set_sequence(probe.sequence.0);
        echo_request.set_payload(&payload);
        echo_request.set_checksum(icmp_ipv4_checksum(echo_request.packet()));
        let remote_addr = SocketAddr::new(IpAddr::V4(self.dest_addr), 0);
        socket
            .send_to(echo_request.packet(), remote_addr)
            .map_err(Error::IoError)
            .map_err(|err| ErrorMapper::probe_failed(err, ErrorKind::HostUnreachable))
            .map_err(|err| ErrorMapper::probe_failed(err, ErrorKind::NetUnreachable))?;
        Ok(())
    }

    /// Read a single packet from the socket and decode it.
    ///
    /// Packets which cannot be decoded, or which do not relate to an echo request, yield `None`.
    #[instrument(skip(self, socket), level = "trace")]
    pub fn recv_icmp_probe<S: Socket>(&self, socket: &mut S) -> Result<Option<Response>> {
        let mut buf = [0_u8; MAX_PACKET_SIZE];
        match socket.read(&mut buf) {
            Ok(bytes_read) => {
                let recv = Instant::now();
                match extract_response(&buf[..bytes_read], recv) {
                    Ok(resp) => Ok(resp),
                    Err(err) => {
                        tracing::debug!(%err, bytes_read, "discarding malformed packet");
                        Ok(None)
                    }
                }
            }
            Err(err) => match err.kind() {
                ErrorKind::Std(io::ErrorKind::WouldBlock) => Ok(None),
                _ => Err(Error::IoError(err)),
            },
        }
    }

    /// The first `TIMESTAMP_SIZE` bytes carry the send offset if there is room for it, the rest
    /// is filled with the pattern byte.
    fn make_payload(&self, payload_size: usize, offset: Duration) -> Vec<u8> {
        let mut payload = vec![self.payload_pattern.0; payload_size];
        if payload_size >= TIMESTAMP_SIZE {
            let nanos = u64::try_from(offset.as_nanos()).unwrap_or(u64::MAX);
            payload[..TIMESTAMP_SIZE].copy_from_slice(&nanos.to_be_bytes());
        }
        payload
    }
}

fn extract_response(buf: &[u8], recv: Instant) -> Result<Option<Response>> {
    let ipv4 = Ipv4Packet::new_view(buf)?;
    ipv4.check_header_length()?;
    if ipv4.get_version() != 4 || ipv4.get_protocol() != IpProtocol::Icmp {
        return Ok(None);
    }
    let icmp_bytes = ipv4.payload();
    let icmp = IcmpPacket::new_view(icmp_bytes)?;
    let icmp_type = icmp.get_icmp_type();
    let code = IcmpCode(icmp.get_icmp_code().0);
    let data = |identifier, sequence, timestamp| ResponseData {
        recv,
        addr: ipv4.get_source(),
        identifier,
        sequence,
        ttl: ipv4.get_ttl(),
        bytes: icmp_bytes.len(),
        timestamp,
        checksum_valid: verify_icmp_ipv4_checksum(icmp_bytes),
    };
    Ok(match icmp_type {
        IcmpType::EchoReply => {
            let packet = EchoPacket::new_view(icmp_bytes)?;
            let timestamp = extract_timestamp(packet.payload());
            Some(Response::EchoReply(data(
                packet.get_identifier(),
                packet.get_sequence(),
                timestamp,
            )))
        }
        icmp_type if icmp_type.is_datagram_error() => {
            let packet = DatagramErrorPacket::new_view(icmp_bytes)?;
            let nested_ipv4 = Ipv4Packet::new_view(packet.payload())?;
            nested_ipv4.check_header_length()?;
            if nested_ipv4.get_protocol() != IpProtocol::Icmp {
                return Ok(None);
            }
            let nested_echo = EchoPacket::new_view(nested_ipv4.payload())?;
            if nested_echo.get_icmp_type() != IcmpType::EchoRequest {
                return Ok(None);
            }
            let error = match icmp_type {
                IcmpType::DestinationUnreachable => IcmpError::DestinationUnreachable(code),
                IcmpType::SourceQuench => IcmpError::SourceQuench(code),
                IcmpType::Redirect => IcmpError::Redirect(code),
                IcmpType::TimeExceeded => IcmpError::TimeExceeded(code),
                _ => IcmpError::ParameterProblem(code),
            };
            Some(Response::Error(
                data(
                    nested_echo.get_identifier(),
                    nested_echo.get_sequence(),
                    None,
                ),
                error,
            ))
        }
        _ => None,
    })
}

fn extract_timestamp(payload: &[u8]) -> Option<Duration> {
    payload
        .get(..TIMESTAMP_SIZE)
        .and_then(|bytes| <[u8; TIMESTAMP_SIZE]>::try_from(bytes).ok())
        .map(|bytes| Duration::from_nanos(u64::from_be_bytes(bytes)))
}
