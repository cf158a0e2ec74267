use crate::error::{Error, ErrorKind, Result};

/// Utility methods to map errors.
pub struct ErrorMapper;

impl ErrorMapper {
    /// Convert a given [`ErrorKind`] to [`Error::ProbeFailed`].
    #[allow(clippy::needless_pass_by_value)]
    pub fn probe_failed(err: Error, kind: ErrorKind) -> Error {
        match err {
            Error::IoError(io_err) if io_err.kind() == kind => Error::ProbeFailed(io_err),
            _ => err,
        }
    }

    /// Convert [`std::io::ErrorKind::PermissionDenied`] to [`Error::InsufficientPrivileges`].
    pub fn insufficient_privileges<T>(result: Result<T>) -> Result<T> {
        result.map_err(|err| match err {
            Error::IoError(io_err)
                if io_err.kind() == ErrorKind::Std(std::io::ErrorKind::PermissionDenied) =>
            {
                Error::InsufficientPrivileges(io_err)
            }
            err => err,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IoError, IoOperation};
    use std::io;
    use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};

    const ADDR: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0));

    #[test]
    fn test_probe_failed() {
        let io_err = io::Error::from(ErrorKind::HostUnreachable);
        let err = Error::IoError(IoError::SendTo(io_err, ADDR));
        let probe_err = ErrorMapper::probe_failed(err, ErrorKind::HostUnreachable);
        assert!(matches!(probe_err, Error::ProbeFailed(_)));
    }

    #[test]
    fn test_not_probe_failed() {
        let io_err = io::Error::from(ErrorKind::Std(io::ErrorKind::Other));
        let err = Error::IoError(IoError::SendTo(io_err, ADDR));
        let probe_err = ErrorMapper::probe_failed(err, ErrorKind::NetUnreachable);
        assert!(matches!(probe_err, Error::IoError(_)));
    }

    #[test]
    fn test_insufficient_privileges() {
        let io_err = io::Error::from(io::ErrorKind::PermissionDenied);
        let err = Error::IoError(IoError::Other(io_err, IoOperation::NewSocket));
        let mapped = ErrorMapper::insufficient_privileges::<()>(Err(err));
        assert!(matches!(mapped, Err(Error::InsufficientPrivileges(_))));
    }

    #[test]
    fn test_not_insufficient_privileges() {
        let io_err = io::Error::from(io::ErrorKind::Other);
        let err = Error::IoError(IoError::Other(io_err, IoOperation::NewSocket));
        let mapped = ErrorMapper::insufficient_privileges::<()>(Err(err));
        assert!(matches!(mapped, Err(Error::IoError(_))));
        assert!(ErrorMapper::insufficient_privileges(Ok(1)).is_ok());
    }
}
