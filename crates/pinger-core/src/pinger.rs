use crate::config::{ChannelConfig, SchedulerConfig};
use crate::error::Result;
use crate::interrupt::Interrupt;
use crate::net::channel::Channel;
use crate::net::SocketImpl;
use crate::scheduler::{Outcome, PingEvent, Scheduler};
use crate::types::{Identifier, MaxCount, PayloadPattern, PayloadSize, TimeToLive};
use pinger_privilege::Privilege;
use std::net::Ipv4Addr;
use std::time::Duration;
use tracing::instrument;

/// An `ICMP` echo session against a single `IPv4` target.
///
/// Use [`crate::Builder`] to create a `Pinger`.
#[derive(Debug, Clone)]
pub struct Pinger {
    target_addr: Ipv4Addr,
    identifier: Identifier,
    ttl: TimeToLive,
    payload_size: PayloadSize,
    payload_pattern: PayloadPattern,
    interval: Duration,
    timeout: Duration,
    deadline: Option<Duration>,
    max_count: Option<MaxCount>,
    interrupt: Interrupt,
    drop_privileges: bool,
}

impl Pinger {
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub(crate) const fn new(
        target_addr: Ipv4Addr,
        identifier: Identifier,
        ttl: TimeToLive,
        payload_size: PayloadSize,
        payload_pattern: PayloadPattern,
        interval: Duration,
        timeout: Duration,
        deadline: Option<Duration>,
        max_count: Option<MaxCount>,
        interrupt: Interrupt,
        drop_privileges: bool,
    ) -> Self {
        Self {
            target_addr,
            identifier,
            ttl,
            payload_size,
            payload_pattern,
            interval,
            timeout,
            deadline,
            max_count,
            interrupt,
            drop_privileges,
        }
    }

    /// Run the session on the current thread.
    pub fn run(&self) -> Result<Outcome> {
        self.run_with(|_| ())
    }

    /// Run the session on the current thread, passing every [`PingEvent`] to `func`.
    ///
    /// This blocks until the session completes.  Trigger the [`Interrupt`] from another thread,
    /// typically a signal handler, to end it early.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # fn main() -> anyhow::Result<()> {
    /// use pinger_core::{Builder, PingEvent};
    ///
    /// let addr = std::net::Ipv4Addr::LOCALHOST;
    /// let outcome = Builder::new(addr)
    ///     .count(Some(3))
    ///     .build()?
    ///     .run_with(|event| {
    ///         if let PingEvent::Reply(reply) = event {
    ///             println!("{:?}", reply.rtt);
    ///         }
    ///     })?;
    /// println!("{} received", outcome.statistics.received());
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip_all, level = "trace")]
    pub fn run_with<F: FnMut(&PingEvent)>(&self, func: F) -> Result<Outcome> {
        let channel =
            Channel::<SocketImpl>::connect(&self.make_channel_config(), self.interrupt.clone())?;
        if self.drop_privileges {
            Privilege::drop_privileges()?;
        }
        Scheduler::new(&self.make_scheduler_config(), self.interrupt.clone(), func).run(channel)
    }

    #[must_use]
    pub const fn target_addr(&self) -> Ipv4Addr {
        self.target_addr
    }

    #[must_use]
    pub const fn identifier(&self) -> Identifier {
        self.identifier
    }

    #[must_use]
    pub const fn ttl(&self) -> TimeToLive {
        self.ttl
    }

    #[must_use]
    pub const fn payload_size(&self) -> PayloadSize {
        self.payload_size
    }

    #[must_use]
    pub const fn payload_pattern(&self) -> PayloadPattern {
        self.payload_pattern
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    #[must_use]
    pub const fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    #[must_use]
    pub const fn max_count(&self) -> Option<MaxCount> {
        self.max_count
    }

    #[must_use]
    pub const fn drop_privileges(&self) -> bool {
        self.drop_privileges
    }

    /// The interrupt which ends this session.
    #[must_use]
    pub const fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }

    const fn make_channel_config(&self) -> ChannelConfig {
        ChannelConfig::new(
            self.target_addr,
            self.ttl,
            self.payload_size,
            self.payload_pattern,
        )
    }

    const fn make_scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            target_addr: self.target_addr,
            identifier: self.identifier,
            payload_size: self.payload_size,
            interval: self.interval,
            timeout: self.timeout,
            deadline: self.deadline,
            max_count: self.max_count,
        }
    }
}
