use crate::types::{Identifier, Sequence};
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};

/// An `ICMP` echo request sent to the target.
///
/// # Examples
///
/// ```
/// use pinger_core::{Identifier, Probe, Sequence};
/// use std::time::{Duration, Instant};
///
/// let probe = Probe::new(Sequence(1), Identifier(1234), Instant::now(), Duration::ZERO);
/// assert_eq!(Sequence(1), probe.sequence);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Probe {
    /// The sequence of the probe.
    pub sequence: Sequence,
    /// The echo identifier of the session.
    pub identifier: Identifier,
    /// Timestamp when the probe was sent.
    pub sent: Instant,
    /// The time between the start of the session and `sent`, carried in the payload.
    pub offset: Duration,
}

impl Probe {
    #[must_use]
    pub const fn new(
        sequence: Sequence,
        identifier: Identifier,
        sent: Instant,
        offset: Duration,
    ) -> Self {
        Self {
            sequence,
            identifier,
            sent,
            offset,
        }
    }
}

/// A decoded `ICMP` message which refers to one of our probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// The target answered an echo request.
    EchoReply(ResponseData),
    /// A host on the path reported an error for an echo request.
    Error(ResponseData, IcmpError),
}

impl Response {
    #[must_use]
    pub const fn data(&self) -> &ResponseData {
        match self {
            Self::EchoReply(data) | Self::Error(data, _) => data,
        }
    }
}

/// The data common to all responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseData {
    /// The time the packet was read from the socket.
    pub recv: Instant,
    /// The source address of the response.
    pub addr: Ipv4Addr,
    /// The echo identifier, taken from the quoted request for errors.
    pub identifier: u16,
    /// The echo sequence, taken from the quoted request for errors.
    pub sequence: u16,
    /// The `ttl` of the `IPv4` packet carrying the response.
    pub ttl: u8,
    /// The size of the `ICMP` message in bytes.
    pub bytes: usize,
    /// The send offset embedded in an echo reply payload, if any.
    pub timestamp: Option<Duration>,
    /// Did the `ICMP` checksum verify?
    pub checksum_valid: bool,
}

/// The code of a received `ICMP` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IcmpCode(pub u8);

/// An `ICMP` error message received in response to one of our probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IcmpError {
    DestinationUnreachable(IcmpCode),
    SourceQuench(IcmpCode),
    Redirect(IcmpCode),
    TimeExceeded(IcmpCode),
    ParameterProblem(IcmpCode),
}

impl IcmpError {
    /// The `ICMP` type number of this error.
    #[must_use]
    pub const fn icmp_type(&self) -> u8 {
        match self {
            Self::DestinationUnreachable(_) => 3,
            Self::SourceQuench(_) => 4,
            Self::Redirect(_) => 5,
            Self::TimeExceeded(_) => 11,
            Self::ParameterProblem(_) => 12,
        }
    }

    /// The `ICMP` code of this error.
    #[must_use]
    pub const fn code(&self) -> IcmpCode {
        match self {
            Self::DestinationUnreachable(code)
            | Self::SourceQuench(code)
            | Self::Redirect(code)
            | Self::TimeExceeded(code)
            | Self::ParameterProblem(code) => *code,
        }
    }
}
