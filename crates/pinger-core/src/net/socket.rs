use crate::error::IoResult as Result;
use crate::interrupt::Interrupt;
use std::net::SocketAddr;
use std::time::Duration;

#[cfg_attr(test, mockall::automock)]
pub trait Socket
where
    Self: Sized,
{
    /// Create a raw IPv4 socket for sending and receiving `ICMP` packets.
    fn new_icmp_socket_ipv4() -> Result<Self>;
    fn set_ttl(&mut self, ttl: u32) -> Result<()>;
    fn send_to(&mut self, buf: &[u8], addr: SocketAddr) -> Result<()>;
    /// Wait until the socket is readable, the timeout elapses or the interrupt is triggered.
    fn wait_readable(&mut self, timeout: Duration, interrupt: &Interrupt) -> Result<Readiness>;
    fn read(&mut self, buf: &mut [u8]) -> Result<usize>;
}

/// The outcome of waiting for a socket to become readable.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Readiness {
    /// Data can be read from the socket.
    Readable,
    /// The timeout elapsed first.
    TimedOut,
    /// The wait was cut short by a signal or by the interrupt.
    Interrupted,
}

#[cfg(test)]
pub mod tests {
    #[macro_export]
    macro_rules! mocket_read {
        ($packet: expr) => {
            move |buf: &mut [u8]| -> IoResult<usize> {
                buf[..$packet.len()].copy_from_slice(&$packet);
                Ok($packet.len())
            }
        };
    }
}
