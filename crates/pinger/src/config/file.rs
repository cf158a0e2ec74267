use crate::config::{LogFormat, LogSpanEvents};
use anyhow::Context;
use etcetera::BaseStrategy;
use pinger_core::defaults;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "pinger.toml";
const DEFAULT_HIDDEN_CONFIG_FILE: &str = ".pinger.toml";

/// Read the config from the default location of user config for the platform.
///
/// Returns the parsed `Some(ConfigFile)` if the config file exists, `None` otherwise.
///
/// pinger will attempt to locate a `pinger.toml` or `.pinger.toml`
/// config file in one of the following locations:
///     - the current directory
///     - the user home directory
///     - the XDG config directory: `$XDG_CONFIG_HOME` or `~/.config`
///     - the XDG app config directory: `$XDG_CONFIG_HOME/pinger` or `~/.config/pinger`
///
/// Only the first config file found is used.
pub fn read_default_config_file() -> anyhow::Result<Option<ConfigFile>> {
    use etcetera::base_strategy as base;
    if let Some(file) = read_files("")? {
        Ok(Some(file))
    } else {
        let basedirs = base::choose_base_strategy()?;
        if let Some(file) = read_files(basedirs.home_dir())? {
            Ok(Some(file))
        } else if let Some(file) = read_files(basedirs.config_dir())? {
            Ok(Some(file))
        } else if let Some(file) = read_files(basedirs.config_dir().join("pinger"))? {
            Ok(Some(file))
        } else {
            Ok(None)
        }
    }
}

/// Read the config from the given path.
pub fn read_config_file<P: AsRef<Path>>(path: P) -> anyhow::Result<ConfigFile> {
    let contents = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("config file not found: {}", path.as_ref().display()))?;
    toml::from_str(&contents)
        .with_context(|| format!("invalid config file: {}", path.as_ref().display()))
}

fn read_files<P: AsRef<Path>>(dir: P) -> anyhow::Result<Option<ConfigFile>> {
    if let Some(file) = read_file(dir.as_ref(), DEFAULT_CONFIG_FILE)? {
        Ok(Some(file))
    } else if let Some(file) = read_file(dir.as_ref(), DEFAULT_HIDDEN_CONFIG_FILE)? {
        Ok(Some(file))
    } else {
        Ok(None)
    }
}

fn read_file<P: AsRef<Path>>(dir: P, file: &str) -> anyhow::Result<Option<ConfigFile>> {
    let path = dir.as_ref().join(file);
    if path.exists() {
        Ok(Some(read_config_file(path)?))
    } else {
        Ok(None)
    }
}

#[derive(Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    pub pinger: Option<ConfigPinger>,
    pub ping: Option<ConfigPing>,
}

impl ConfigFile {
    /// A config file with no tables, used when no file is found.
    ///
    /// Unlike the default, every value falls through to the built-in defaults.
    pub const fn empty() -> Self {
        Self {
            pinger: None,
            ping: None,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            pinger: Some(ConfigPinger::default()),
            ping: Some(ConfigPing::default()),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigPinger {
    pub log_format: Option<LogFormat>,
    pub log_filter: Option<String>,
    pub log_span_events: Option<LogSpanEvents>,
}

impl ConfigPinger {
    /// A table with nothing set, used when the file omits `[pinger]`.
    pub const fn empty() -> Self {
        Self {
            log_format: None,
            log_filter: None,
            log_span_events: None,
        }
    }
}

impl Default for ConfigPinger {
    fn default() -> Self {
        Self {
            log_format: Some(super::constants::DEFAULT_LOG_FORMAT),
            log_filter: Some(String::from(super::constants::DEFAULT_LOG_FILTER)),
            log_span_events: Some(super::constants::DEFAULT_LOG_SPAN_EVENTS),
        }
    }
}

#[derive(Debug, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigPing {
    pub ttl: Option<u8>,
    #[serde(default)]
    #[serde(deserialize_with = "humantime_deser")]
    pub interval: Option<Duration>,
    #[serde(default)]
    #[serde(deserialize_with = "humantime_deser")]
    pub timeout: Option<Duration>,
    #[serde(default)]
    #[serde(deserialize_with = "humantime_deser")]
    pub deadline: Option<Duration>,
    pub count: Option<usize>,
    pub packet_size: Option<u16>,
    pub payload_pattern: Option<u8>,
    pub verbose: Option<bool>,
    pub flood: Option<bool>,
}

impl ConfigPing {
    /// A table with nothing set, used when the file omits `[ping]`.
    pub const fn empty() -> Self {
        Self {
            ttl: None,
            interval: None,
            timeout: None,
            deadline: None,
            count: None,
            packet_size: None,
            payload_pattern: None,
            verbose: None,
            flood: None,
        }
    }
}

impl Default for ConfigPing {
    fn default() -> Self {
        Self {
            ttl: Some(defaults::DEFAULT_TTL),
            interval: Some(defaults::DEFAULT_INTERVAL),
            timeout: Some(defaults::DEFAULT_TIMEOUT),
            deadline: None,
            count: None,
            packet_size: Some(defaults::DEFAULT_PAYLOAD_SIZE),
            payload_pattern: Some(defaults::DEFAULT_PAYLOAD_PATTERN),
            verbose: Some(super::constants::DEFAULT_VERBOSE),
            flood: Some(super::constants::DEFAULT_FLOOD),
        }
    }
}

fn humantime_deser<'de, D>(deserializer: D) -> Result<Option<Duration>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    humantime::parse_duration(&String::deserialize(deserializer)?)
        .map_err(serde::de::Error::custom)
        .map(Some)
}
