use crate::error::{ErrorKind, IoError, IoOperation, IoResult};
use crate::interrupt::Interrupt;
use crate::net::socket::{Readiness, Socket};
use itertools::Itertools;
use nix::errno::Errno;
use nix::sys::select::FdSet;
use nix::sys::time::{TimeVal, TimeValLike};
use socket2::{Domain, Protocol, SockAddr, Type};
use std::io::{self, Read};
use std::net::SocketAddr;
use std::os::fd::AsFd;
use std::time::Duration;
use tracing::instrument;

/// A network socket.
#[derive(Debug)]
pub struct SocketImpl {
    inner: socket2::Socket,
}

impl SocketImpl {
    fn new_raw_ipv4(protocol: Protocol) -> IoResult<Self> {
        Ok(Self {
            inner: socket2::Socket::new(Domain::IPV4, Type::RAW, Some(protocol))
                .map_err(|err| IoError::Other(err, IoOperation::NewSocket))?,
        })
    }

    fn set_nonblocking(&self, nonblocking: bool) -> IoResult<()> {
        self.inner
            .set_nonblocking(nonblocking)
            .map_err(|err| IoError::Other(err, IoOperation::SetNonBlocking))
    }
}

impl Socket for SocketImpl {
    #[instrument(level = "trace")]
    fn new_icmp_socket_ipv4() -> IoResult<Self> {
        let socket = Self::new_raw_ipv4(Protocol::ICMPV4)?;
        socket.set_nonblocking(true)?;
        Ok(socket)
    }
    #[instrument(skip(self), level = "trace")]
    fn set_ttl(&mut self, ttl: u32) -> IoResult<()> {
        self.inner
            .set_ttl(ttl)
            .map_err(|err| IoError::Other(err, IoOperation::SetTtl))
    }
    #[instrument(skip(self, buf), level = "trace")]
    fn send_to(&mut self, buf: &[u8], addr: SocketAddr) -> IoResult<()> {
        tracing::trace!(buf = format!("{:02x}", buf.iter().format(" ")), ?addr);
        self.inner
            .send_to(buf, &SockAddr::from(addr))
            .map_err(|err| IoError::SendTo(err, addr))?;
        Ok(())
    }
    #[instrument(skip(self, interrupt), level = "trace")]
    fn wait_readable(&mut self, timeout: Duration, interrupt: &Interrupt) -> IoResult<Readiness> {
        let mut read = FdSet::new();
        read.insert(self.inner.as_fd());
        read.insert(interrupt.as_fd());
        let micros = i64::try_from(timeout.as_micros()).unwrap_or(i64::MAX);
        let ready = nix::sys::select::select(
            None,
            Some(&mut read),
            None,
            None,
            Some(&mut TimeVal::microseconds(micros)),
        );
        match ready {
            Ok(0) => Ok(Readiness::TimedOut),
            Ok(_) if read.contains(interrupt.as_fd()) => Ok(Readiness::Interrupted),
            Ok(_) => Ok(Readiness::Readable),
            Err(Errno::EINTR) => Ok(Readiness::Interrupted),
            Err(err) => Err(IoError::Other(io::Error::from(err), IoOperation::Select)),
        }
    }
    #[instrument(skip(self, buf), level = "trace")]
    fn read(&mut self, buf: &mut [u8]) -> IoResult<usize> {
        let bytes_read = self
            .inner
            .read(buf)
            .map_err(|err| IoError::Other(err, IoOperation::Read))?;
        tracing::trace!(
            buf = format!("{:02x}", buf[..bytes_read].iter().format(" ")),
            bytes_read
        );
        Ok(bytes_read)
    }
}

impl From<&io::Error> for ErrorKind {
    fn from(value: &io::Error) -> Self {
        if value.raw_os_error() == Some(Errno::EHOSTUNREACH as i32) {
            Self::HostUnreachable
        } else if value.raw_os_error() == Some(Errno::ENETUNREACH as i32) {
            Self::NetUnreachable
        } else {
            Self::Std(value.kind())
        }
    }
}

// only used for unit tests
impl From<ErrorKind> for io::Error {
    fn from(value: ErrorKind) -> Self {
        match value {
            ErrorKind::HostUnreachable => Self::from(Errno::EHOSTUNREACH),
            ErrorKind::NetUnreachable => Self::from(Errno::ENETUNREACH),
            ErrorKind::Std(kind) => Self::from(kind),
        }
    }
}
