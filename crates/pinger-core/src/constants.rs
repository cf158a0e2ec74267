/// The size of the buffer used to receive packets.
///
/// Large enough for an `IPv4` header with options followed by the largest
/// echo reply we allow ourselves to request.
pub const MAX_PACKET_SIZE: usize = 1024;

/// The size of the fixed `ICMPv4` echo header.
pub const ICMP_HEADER_SIZE: usize = 8;

/// The size of an `IPv4` header carrying the maximum 40 bytes of options.
pub const MAX_IPV4_HEADER_SIZE: usize = 60;

/// The maximum number of payload bytes allowed in an echo request.
#[allow(clippy::cast_possible_truncation)]
pub const MAX_PAYLOAD_SIZE: u16 =
    (MAX_PACKET_SIZE - MAX_IPV4_HEADER_SIZE - ICMP_HEADER_SIZE) as u16;

/// The number of leading payload bytes which hold the send timestamp.
pub const TIMESTAMP_SIZE: usize = 8;

/// The smallest interval allowed between probes.
pub const MIN_INTERVAL: std::time::Duration = std::time::Duration::from_millis(10);
