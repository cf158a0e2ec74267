use crate::error::Result;
use crate::probe::{Probe, Response};
use std::time::Duration;

/// Common types and helper functions.
mod common;

/// IPv4 implementation.
mod ipv4;

/// Platform specific network code.
mod platform;

/// A network socket.
mod socket;

/// A channel for sending and receiving probes.
pub mod channel;

/// The platform specific socket type.
pub use platform::SocketImpl;

/// An abstraction over a network interface for sending echo requests.
#[cfg_attr(test, mockall::automock)]
pub trait Network {
    /// Send a `Probe`.
    fn send_probe(&mut self, probe: Probe) -> Result<()>;

    /// Wait up to `timeout` for the next `ICMP` packet and return a `Response`.
    ///
    /// Returns `None` if the wait times out, is interrupted or the packet read is not one of the
    /// types expected.
    fn recv_probe(&mut self, timeout: Duration) -> Result<Option<Response>>;
}
