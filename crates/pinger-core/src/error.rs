use std::fmt::{Display, Formatter};
use std::io;
use std::net::SocketAddr;
use thiserror::Error;

/// A pinger error result.
pub type Result<T> = std::result::Result<T, Error>;

/// A pinger error.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid packet size: {0}")]
    InvalidPacketSize(usize),
    #[error("invalid packet: {0}")]
    PacketError(#[from] pinger_packet::error::Error),
    #[error("invalid config: {0}")]
    BadConfig(String),
    #[error("IO error: {0}")]
    IoError(#[from] IoError),
    #[error("Probe failed to send: {0}")]
    ProbeFailed(IoError),
    #[error("Lacking privileges to open a raw ICMP socket: {0}")]
    InsufficientPrivileges(IoError),
    #[error("privilege error: {0}")]
    PrivilegeError(#[from] pinger_privilege::Error),
}

/// Custom IO error result.
pub type IoResult<T> = std::result::Result<T, IoError>;

/// Custom IO error.
#[derive(Error, Debug)]
pub enum IoError {
    #[error("Sendto error for {1}: {0}")]
    SendTo(io::Error, SocketAddr),
    #[error("Failed to {1}: {0}")]
    Other(io::Error, IoOperation),
}

impl IoError {
    /// Get the custom error kind.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::SendTo(e, _) | Self::Other(e, _) => ErrorKind::from(e),
        }
    }
}

/// Custom error kind.
///
/// This includes additional error kinds that are not part of the standard [`io::ErrorKind`].
#[derive(Debug, Eq, PartialEq)]
pub enum ErrorKind {
    HostUnreachable,
    NetUnreachable,
    Std(io::ErrorKind),
}

/// Io operation.
#[derive(Debug)]
pub enum IoOperation {
    NewSocket,
    NewSelfPipe,
    SetNonBlocking,
    SetTtl,
    Select,
    Read,
    Wake,
}

impl Display for IoOperation {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NewSocket => write!(f, "create new socket"),
            Self::NewSelfPipe => write!(f, "create interrupt pipe"),
            Self::SetNonBlocking => write!(f, "set non-blocking"),
            Self::SetTtl => write!(f, "set TTL"),
            Self::Select => write!(f, "select"),
            Self::Read => write!(f, "read"),
            Self::Wake => write!(f, "wake"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let err = IoError::Other(
            io::Error::from(io::ErrorKind::PermissionDenied),
            IoOperation::NewSocket,
        );
        assert_eq!("Failed to create new socket: permission denied", err.to_string());
        let err = Error::InsufficientPrivileges(err);
        assert!(err.to_string().starts_with("Lacking privileges"));
    }

    #[test]
    fn test_io_error_kind() {
        let addr = SocketAddr::from(([127, 0, 0, 1], 0));
        let err = IoError::SendTo(io::Error::from(io::ErrorKind::WouldBlock), addr);
        assert_eq!(ErrorKind::Std(io::ErrorKind::WouldBlock), err.kind());
    }
}
