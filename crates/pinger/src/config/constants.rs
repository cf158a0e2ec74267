use crate::config::{LogFormat, LogSpanEvents};

/// The default value for `log-format`.
pub const DEFAULT_LOG_FORMAT: LogFormat = LogFormat::Compact;

/// The default value for `log-span-events`.
pub const DEFAULT_LOG_SPAN_EVENTS: LogSpanEvents = LogSpanEvents::Off;

/// The default value for `log-filter`.
pub const DEFAULT_LOG_FILTER: &str = "pinger=debug";

/// The default value for `verbose`.
pub const DEFAULT_VERBOSE: bool = false;

/// The default value for `flood`.
pub const DEFAULT_FLOOD: bool = false;

/// The default value for `debug`.
pub const DEFAULT_DEBUG: bool = false;
