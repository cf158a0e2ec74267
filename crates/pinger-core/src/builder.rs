use crate::config::defaults;
use crate::constants::{MAX_PAYLOAD_SIZE, MIN_INTERVAL};
use crate::error::{Error, Result};
use crate::interrupt::Interrupt;
use crate::pinger::Pinger;
use crate::types::{Identifier, MaxCount, PayloadPattern, PayloadSize, TimeToLive};
use std::net::Ipv4Addr;
use std::num::NonZeroUsize;
use std::time::Duration;

/// Build a pinger.
///
/// This is a convenience builder to simplify the creation and execution of a
/// ping session.
///
/// # Examples
///
/// ```no_run
/// # fn main() -> anyhow::Result<()> {
/// use pinger_core::Builder;
/// use std::time::Duration;
///
/// let addr = std::net::Ipv4Addr::from([1, 2, 3, 4]);
/// let pinger = Builder::new(addr)
///     .ttl(32)
///     .interval(Duration::from_millis(500))
///     .count(Some(5))
///     .build()?;
/// # Ok(())
/// # }
/// ```
///
/// # See Also
///
/// - [`Pinger`] - An `ICMP` echo implementation.
#[derive(Debug)]
pub struct Builder {
    target_addr: Ipv4Addr,
    identifier: Identifier,
    ttl: TimeToLive,
    payload_size: PayloadSize,
    payload_pattern: PayloadPattern,
    interval: Duration,
    timeout: Duration,
    deadline: Option<Duration>,
    count: Option<usize>,
    interrupt: Option<Interrupt>,
    drop_privileges: bool,
}

impl Builder {
    /// Build a pinger builder for a given target.
    #[must_use]
    pub const fn new(target_addr: Ipv4Addr) -> Self {
        Self {
            target_addr,
            identifier: Identifier(defaults::DEFAULT_IDENTIFIER),
            ttl: TimeToLive(defaults::DEFAULT_TTL),
            payload_size: PayloadSize(defaults::DEFAULT_PAYLOAD_SIZE),
            payload_pattern: PayloadPattern(defaults::DEFAULT_PAYLOAD_PATTERN),
            interval: defaults::DEFAULT_INTERVAL,
            timeout: defaults::DEFAULT_TIMEOUT,
            deadline: None,
            count: None,
            interrupt: None,
            drop_privileges: defaults::DEFAULT_DROP_PRIVILEGES,
        }
    }

    /// Set the `ICMP` echo identifier.
    ///
    /// Replies carrying any other identifier are ignored.
    #[must_use]
    pub fn identifier(self, identifier: u16) -> Self {
        Self {
            identifier: Identifier(identifier),
            ..self
        }
    }

    /// Set the time-to-live of outgoing packets.
    #[must_use]
    pub fn ttl(self, ttl: u8) -> Self {
        Self {
            ttl: TimeToLive(ttl),
            ..self
        }
    }

    /// Set the number of data bytes sent after the `ICMP` header.
    #[must_use]
    pub fn payload_size(self, payload_size: u16) -> Self {
        Self {
            payload_size: PayloadSize(payload_size),
            ..self
        }
    }

    /// Set the byte used to fill the payload.
    #[must_use]
    pub fn payload_pattern(self, payload_pattern: u8) -> Self {
        Self {
            payload_pattern: PayloadPattern(payload_pattern),
            ..self
        }
    }

    /// Set the time between probes.
    #[must_use]
    pub fn interval(self, interval: Duration) -> Self {
        Self { interval, ..self }
    }

    /// Set how long to wait for a reply to each probe.
    #[must_use]
    pub fn timeout(self, timeout: Duration) -> Self {
        Self { timeout, ..self }
    }

    /// Set the overall duration of the session, measured from its start.
    #[must_use]
    pub fn deadline(self, deadline: Option<Duration>) -> Self {
        Self { deadline, ..self }
    }

    /// Set the number of probes to send.
    #[must_use]
    pub fn count(self, count: Option<usize>) -> Self {
        Self { count, ..self }
    }

    /// Use the given interrupt to end the session.
    ///
    /// If not set a new interrupt is created, see [`Pinger::interrupt`].
    #[must_use]
    pub fn interrupt(self, interrupt: Interrupt) -> Self {
        Self {
            interrupt: Some(interrupt),
            ..self
        }
    }

    /// Drop privileges once the socket has been opened.
    #[must_use]
    pub fn drop_privileges(self, drop_privileges: bool) -> Self {
        Self {
            drop_privileges,
            ..self
        }
    }

    /// Build the `Pinger`.
    ///
    /// # Errors
    ///
    /// This function will return `Error::BadConfig` if the configuration is invalid.
    pub fn build(self) -> Result<Pinger> {
        if self.ttl.0 == 0 {
            return Err(Error::BadConfig(String::from("ttl must be at least 1")));
        }
        if self.payload_size.0 > MAX_PAYLOAD_SIZE {
            return Err(Error::BadConfig(format!(
                "payload_size {} > {MAX_PAYLOAD_SIZE}",
                self.payload_size.0
            )));
        }
        if self.interval < MIN_INTERVAL {
            return Err(Error::BadConfig(format!(
                "interval {:?} < {MIN_INTERVAL:?}",
                self.interval
            )));
        }
        if self.timeout.is_zero() {
            return Err(Error::BadConfig(String::from("timeout must be positive")));
        }
        let max_count = match self.count {
            None => None,
            Some(count) => Some(MaxCount(NonZeroUsize::new(count).ok_or_else(|| {
                Error::BadConfig(String::from("count must be at least 1"))
            })?)),
        };
        let interrupt = match self.interrupt {
            Some(interrupt) => interrupt,
            None => Interrupt::new()?,
        };
        Ok(Pinger::new(
            self.target_addr,
            self.identifier,
            self.ttl,
            self.payload_size,
            self.payload_pattern,
            self.interval,
            self.timeout,
            self.deadline,
            max_count,
            interrupt,
            self.drop_privileges,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const TARGET_ADDR: Ipv4Addr = Ipv4Addr::new(2, 2, 2, 2);

    #[test]
    fn test_builder_minimal() {
        let pinger = Builder::new(TARGET_ADDR).build().unwrap();
        assert_eq!(TARGET_ADDR, pinger.target_addr());
        assert_eq!(Identifier(defaults::DEFAULT_IDENTIFIER), pinger.identifier());
        assert_eq!(defaults::DEFAULT_TTL, pinger.ttl().0);
        assert_eq!(defaults::DEFAULT_PAYLOAD_SIZE, pinger.payload_size().0);
        assert_eq!(defaults::DEFAULT_PAYLOAD_PATTERN, pinger.payload_pattern().0);
        assert_eq!(defaults::DEFAULT_INTERVAL, pinger.interval());
        assert_eq!(defaults::DEFAULT_TIMEOUT, pinger.timeout());
        assert_eq!(None, pinger.deadline());
        assert_eq!(None, pinger.max_count());
        assert_eq!(defaults::DEFAULT_DROP_PRIVILEGES, pinger.drop_privileges());
        assert!(!pinger.interrupt().is_requested());
    }

    #[test]
    fn test_builder_full() -> anyhow::Result<()> {
        let interrupt = Interrupt::new()?;
        let pinger = Builder::new(TARGET_ADDR)
            .identifier(4321)
            .ttl(3)
            .payload_size(8)
            .payload_pattern(0xaa)
            .interval(Duration::from_millis(200))
            .timeout(Duration::from_millis(300))
            .deadline(Some(Duration::from_secs(5)))
            .count(Some(4))
            .interrupt(interrupt.clone())
            .drop_privileges(false)
            .build()?;
        assert_eq!(Identifier(4321), pinger.identifier());
        assert_eq!(TimeToLive(3), pinger.ttl());
        assert_eq!(PayloadSize(8), pinger.payload_size());
        assert_eq!(PayloadPattern(0xaa), pinger.payload_pattern());
        assert_eq!(Duration::from_millis(200), pinger.interval());
        assert_eq!(Duration::from_millis(300), pinger.timeout());
        assert_eq!(Some(Duration::from_secs(5)), pinger.deadline());
        assert_eq!(NonZeroUsize::new(4).map(MaxCount), pinger.max_count());
        assert!(!pinger.drop_privileges());
        interrupt.trigger();
        assert!(pinger.interrupt().is_requested());
        Ok(())
    }

    #[test_case(Builder::new(TARGET_ADDR).ttl(0); "zero ttl")]
    #[test_case(Builder::new(TARGET_ADDR).payload_size(MAX_PAYLOAD_SIZE + 1); "payload too large")]
    #[test_case(Builder::new(TARGET_ADDR).interval(Duration::from_millis(9)); "interval too short")]
    #[test_case(Builder::new(TARGET_ADDR).timeout(Duration::ZERO); "zero timeout")]
    #[test_case(Builder::new(TARGET_ADDR).count(Some(0)); "zero count")]
    fn test_bad_config(builder: Builder) {
        let err = builder.build().unwrap_err();
        assert!(matches!(err, Error::BadConfig(_)));
    }

    #[test]
    fn test_limits_accepted() {
        let pinger = Builder::new(TARGET_ADDR)
            .payload_size(MAX_PAYLOAD_SIZE)
            .interval(MIN_INTERVAL)
            .build();
        assert!(pinger.is_ok());
    }
}
