use crate::config::ChannelConfig;
use crate::constants::MAX_PAYLOAD_SIZE;
use crate::error::{Error, Result};
use crate::interrupt::Interrupt;
use crate::net::common::ErrorMapper;
use crate::net::ipv4::Ipv4;
use crate::net::socket::{Readiness, Socket};
use crate::net::Network;
use crate::probe::{Probe, Response};
use std::time::Duration;
use tracing::instrument;

/// A channel for sending and receiving `ICMP` echo packets over a raw socket.
pub struct Channel<S: Socket> {
    socket: S,
    ipv4: Ipv4,
    interrupt: Interrupt,
}

impl<S: Socket> Channel<S> {
    /// Create a `Channel`.
    ///
    /// This operation requires the `CAP_NET_RAW` capability on Linux, or root elsewhere.
    #[instrument(skip_all, level = "trace")]
    pub fn connect(config: &ChannelConfig, interrupt: Interrupt) -> Result<Self> {
        tracing::debug!(?config);
        if config.payload_size.0 > MAX_PAYLOAD_SIZE {
            return Err(Error::InvalidPacketSize(usize::from(config.payload_size.0)));
        }
        let mut socket =
            ErrorMapper::insufficient_privileges(S::new_icmp_socket_ipv4().map_err(Error::from))?;
        socket.set_ttl(u32::from(config.ttl.0))?;
        Ok(Self {
            socket,
            ipv4: Ipv4 {
                dest_addr: config.target_addr,
                payload_size: config.payload_size,
                payload_pattern: config.payload_pattern,
            },
            interrupt,
        })
    }
}

impl<S: Socket> Network for Channel<S> {
    #[instrument(skip(self), level = "trace")]
    fn send_probe(&mut self, probe: Probe) -> Result<()> {
        tracing::debug!(?probe);
        self.ipv4.dispatch_echo_request(&mut self.socket, probe)
    }

    #[instrument(skip(self), level = "trace")]
    fn recv_probe(&mut self, timeout: Duration) -> Result<Option<Response>> {
        match self.socket.wait_readable(timeout, &self.interrupt)? {
            Readiness::Readable => {
                let resp = self.ipv4.recv_icmp_probe(&mut self.socket)?;
                if let Some(resp) = &resp {
                    tracing::debug!(?resp);
                }
                Ok(resp)
            }
            Readiness::TimedOut | Readiness::Interrupted => Ok(None),
        }
    }
}
