use anyhow::anyhow;
use clap::ValueEnum;
use file::{ConfigFile, ConfigPing, ConfigPinger};
use pinger_core::{defaults, MAX_PAYLOAD_SIZE, MIN_INTERVAL};
use serde::Deserialize;
use std::time::Duration;

mod cmd;
mod constants;
mod file;

pub use cmd::Args;

/// An error in the way the tool was invoked.
///
/// Usage errors are reported with a distinct exit status.
#[derive(thiserror::Error, Debug, Eq, PartialEq)]
#[error("usage error: {0}")]
pub struct UsageError(pub String);

impl UsageError {
    fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// How to format log data.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    /// Display log data in a compact format.
    Compact,
    /// Display log data in a pretty format.
    Pretty,
    /// Display log data in a json format.
    Json,
}

/// How to log event spans.
#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LogSpanEvents {
    /// Do not display event spans.
    Off,
    /// Display enter and exit event spans.
    Active,
    /// Display all event spans.
    Full,
}

/// Fully parsed and validated configuration.
#[derive(Debug, Eq, PartialEq)]
pub struct PingerConfig {
    pub host: String,
    pub ttl: u8,
    pub interval: Duration,
    pub timeout: Duration,
    pub deadline: Option<Duration>,
    pub count: Option<usize>,
    pub packet_size: u16,
    pub payload_pattern: u8,
    pub verbose: bool,
    pub flood: bool,
    pub debug: bool,
    pub log_format: LogFormat,
    pub log_filter: String,
    pub log_span_events: LogSpanEvents,
}

impl PingerConfig {
    pub fn from(args: Args) -> anyhow::Result<Self> {
        let cfg_file = if let Some(cfg) = &args.config_file {
            file::read_config_file(cfg)?
        } else {
            file::read_default_config_file()?.unwrap_or_else(ConfigFile::empty)
        };
        Self::build_config(args, cfg_file)
    }

    fn build_config(args: Args, cfg_file: ConfigFile) -> anyhow::Result<Self> {
        let Some(host) = args.host else {
            return Err(anyhow!(UsageError::new("Destination address required")));
        };
        let cfg_file_pinger = cfg_file.pinger.unwrap_or_else(ConfigPinger::empty);
        let cfg_file_ping = cfg_file.ping.unwrap_or_else(ConfigPing::empty);
        let ttl = cfg_layer(args.ttl, cfg_file_ping.ttl, defaults::DEFAULT_TTL);
        let flood = cfg_layer_bool_flag(args.flood, cfg_file_ping.flood, constants::DEFAULT_FLOOD);
        let default_interval = if flood {
            MIN_INTERVAL
        } else {
            defaults::DEFAULT_INTERVAL
        };
        let interval = cfg_layer(args.interval, cfg_file_ping.interval, default_interval);
        let timeout = cfg_layer(
            args.timeout,
            cfg_file_ping.timeout,
            defaults::DEFAULT_TIMEOUT,
        );
        let deadline = cfg_layer_opt(args.deadline, cfg_file_ping.deadline);
        let count = cfg_layer_opt(args.count, cfg_file_ping.count);
        let packet_size = cfg_layer(
            args.packet_size,
            cfg_file_ping.packet_size,
            defaults::DEFAULT_PAYLOAD_SIZE,
        );
        let payload_pattern = cfg_layer(
            args.payload_pattern,
            cfg_file_ping.payload_pattern,
            defaults::DEFAULT_PAYLOAD_PATTERN,
        );
        let verbose = cfg_layer_bool_flag(
            args.verbose,
            cfg_file_ping.verbose,
            constants::DEFAULT_VERBOSE,
        );
        let log_format = cfg_layer(
            args.log_format,
            cfg_file_pinger.log_format,
            constants::DEFAULT_LOG_FORMAT,
        );
        let log_filter = cfg_layer(
            args.log_filter,
            cfg_file_pinger.log_filter,
            String::from(constants::DEFAULT_LOG_FILTER),
        );
        let log_span_events = cfg_layer(
            args.log_span_events,
            cfg_file_pinger.log_span_events,
            constants::DEFAULT_LOG_SPAN_EVENTS,
        );
        validate_ttl(ttl)?;
        validate_interval(interval)?;
        validate_timeout(timeout)?;
        validate_count(count)?;
        validate_packet_size(packet_size)?;
        Ok(Self {
            host,
            ttl,
            interval,
            timeout,
            deadline,
            count,
            packet_size,
            payload_pattern,
            verbose,
            flood,
            debug: args.debug,
            log_format,
            log_filter,
            log_span_events,
        })
    }
}

impl Default for PingerConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            ttl: defaults::DEFAULT_TTL,
            interval: defaults::DEFAULT_INTERVAL,
            timeout: defaults::DEFAULT_TIMEOUT,
            deadline: None,
            count: None,
            packet_size: defaults::DEFAULT_PAYLOAD_SIZE,
            payload_pattern: defaults::DEFAULT_PAYLOAD_PATTERN,
            verbose: constants::DEFAULT_VERBOSE,
            flood: constants::DEFAULT_FLOOD,
            debug: constants::DEFAULT_DEBUG,
            log_format: constants::DEFAULT_LOG_FORMAT,
            log_filter: String::from(constants::DEFAULT_LOG_FILTER),
            log_span_events: constants::DEFAULT_LOG_SPAN_EVENTS,
        }
    }
}

fn cfg_layer<T>(fst: Option<T>, snd: Option<T>, def: T) -> T {
    match (fst, snd) {
        (Some(val), _) | (None, Some(val)) => val,
        (None, None) => def,
    }
}

fn cfg_layer_opt<T>(fst: Option<T>, snd: Option<T>) -> Option<T> {
    match (fst, snd) {
        (Some(val), _) | (None, Some(val)) => Some(val),
        (None, None) => None,
    }
}

const fn cfg_layer_bool_flag(fst: bool, snd: Option<bool>, default: bool) -> bool {
    match (fst, snd) {
        (true, _) => true,
        (false, Some(val)) => val,
        (false, None) => default,
    }
}

fn validate_ttl(ttl: u8) -> anyhow::Result<()> {
    if ttl == 0 {
        Err(anyhow!(UsageError::new("ttl 0 out of range (1..=255)")))
    } else {
        Ok(())
    }
}

fn validate_interval(interval: Duration) -> anyhow::Result<()> {
    if interval < MIN_INTERVAL {
        Err(anyhow!(UsageError::new(format!(
            "interval {} is too short, the minimum is {}",
            humantime::format_duration(interval),
            humantime::format_duration(MIN_INTERVAL),
        ))))
    } else {
        Ok(())
    }
}

fn validate_timeout(timeout: Duration) -> anyhow::Result<()> {
    if timeout.is_zero() {
        Err(anyhow!(UsageError::new("timeout must be positive")))
    } else {
        Ok(())
    }
}

fn validate_count(count: Option<usize>) -> anyhow::Result<()> {
    if count == Some(0) {
        Err(anyhow!(UsageError::new("count must be at least 1")))
    } else {
        Ok(())
    }
}

fn validate_packet_size(packet_size: u16) -> anyhow::Result<()> {
    if packet_size > MAX_PAYLOAD_SIZE {
        Err(anyhow!(UsageError::new(format!(
            "packet size {packet_size} is too large, the maximum is {MAX_PAYLOAD_SIZE}"
        ))))
    } else {
        Ok(())
    }
}
