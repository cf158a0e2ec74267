use crate::types::{Identifier, MaxCount, PayloadPattern, PayloadSize, TimeToLive};
use std::net::Ipv4Addr;
use std::time::Duration;

/// Default values for configuration.
pub mod defaults {
    use std::time::Duration;

    /// The default value for `ttl`.
    pub const DEFAULT_TTL: u8 = 64;

    /// The default value for `payload-size`.
    pub const DEFAULT_PAYLOAD_SIZE: u16 = 56;

    /// The default value for `payload-pattern`.
    pub const DEFAULT_PAYLOAD_PATTERN: u8 = 0;

    /// The default value for `interval`.
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

    /// The default value for `timeout`.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

    /// The default value for `identifier`.
    pub const DEFAULT_IDENTIFIER: u16 = 0;

    /// The default value for `drop-privileges`.
    pub const DEFAULT_DROP_PRIVILEGES: bool = true;
}

/// Socket level configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ChannelConfig {
    pub target_addr: Ipv4Addr,
    pub ttl: TimeToLive,
    pub payload_size: PayloadSize,
    pub payload_pattern: PayloadPattern,
}

impl ChannelConfig {
    #[must_use]
    pub const fn new(
        target_addr: Ipv4Addr,
        ttl: TimeToLive,
        payload_size: PayloadSize,
        payload_pattern: PayloadPattern,
    ) -> Self {
        Self {
            target_addr,
            ttl,
            payload_size,
            payload_pattern,
        }
    }
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            target_addr: Ipv4Addr::UNSPECIFIED,
            ttl: TimeToLive(defaults::DEFAULT_TTL),
            payload_size: PayloadSize(defaults::DEFAULT_PAYLOAD_SIZE),
            payload_pattern: PayloadPattern(defaults::DEFAULT_PAYLOAD_PATTERN),
        }
    }
}

/// Scheduler level configuration.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct SchedulerConfig {
    pub target_addr: Ipv4Addr,
    pub identifier: Identifier,
    pub payload_size: PayloadSize,
    pub interval: Duration,
    pub timeout: Duration,
    pub deadline: Option<Duration>,
    pub max_count: Option<MaxCount>,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            target_addr: Ipv4Addr::UNSPECIFIED,
            identifier: Identifier(defaults::DEFAULT_IDENTIFIER),
            payload_size: PayloadSize(defaults::DEFAULT_PAYLOAD_SIZE),
            interval: defaults::DEFAULT_INTERVAL,
            timeout: defaults::DEFAULT_TIMEOUT,
            deadline: None,
            max_count: None,
        }
    }
}
