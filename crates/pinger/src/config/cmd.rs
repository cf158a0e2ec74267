use crate::config::{LogFormat, LogSpanEvents};
use clap::{ArgAction, Parser};
use std::time::Duration;

/// Send ICMP echo requests to a host and report the replies
#[derive(Parser, Debug)]
#[command(
    name = "pinger",
    author,
    version,
    about,
    long_about = None,
    disable_help_flag = true
)]
pub struct Args {
    /// The hostname or IPv4 address to ping
    pub host: Option<String>,

    /// Print help
    #[arg(short = '?', long, short_alias = 'h', action = ArgAction::Help)]
    pub help: Option<bool>,

    /// Config file
    #[arg(long, value_hint = clap::ValueHint::FilePath)]
    pub config_file: Option<String>,

    /// The time-to-live of outgoing packets [default: 64]
    #[arg(short = 't', long)]
    pub ttl: Option<u8>,

    /// Print the ICMP type and code of error messages
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Stop after this long, in seconds or with a unit such as `500ms`
    #[arg(short = 'w', long, value_parser = parse_duration)]
    pub deadline: Option<Duration>,

    /// Stop after sending this many echo requests
    #[arg(short = 'c', long)]
    pub count: Option<usize>,

    /// The time between echo requests [default: 1s]
    #[arg(short = 'i', long, value_parser = parse_duration)]
    pub interval: Option<Duration>,

    /// How long to wait for each reply [default: 1s]
    #[arg(short = 'W', long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,

    /// The number of data bytes to send [default: 56]
    #[arg(short = 's', long)]
    pub packet_size: Option<u16>,

    /// The byte used to fill the data [default: 0]
    #[arg(short = 'p', long)]
    pub payload_pattern: Option<u8>,

    /// Print a dot for every request and erase one for every reply
    #[arg(short = 'f', long)]
    pub flood: bool,

    /// Enable diagnostic logging to stderr
    #[arg(short = 'D', long)]
    pub debug: bool,

    /// The diagnostic log format [default: compact]
    #[arg(value_enum, long)]
    pub log_format: Option<LogFormat>,

    /// The diagnostic log filter [default: pinger=debug]
    #[arg(long)]
    pub log_filter: Option<String>,

    /// The diagnostic log span events [default: off]
    #[arg(value_enum, long)]
    pub log_span_events: Option<LogSpanEvents>,
}

/// Parse a duration given as plain seconds, such as `0.5`, or with a unit, such as `500ms`.
fn parse_duration(value: &str) -> anyhow::Result<Duration> {
    match value.parse::<f64>() {
        Ok(secs) => Ok(Duration::try_from_secs_f64(secs)?),
        Err(_) => Ok(humantime::parse_duration(value)?),
    }
}
