use crate::config::{LogFormat, LogSpanEvents, PingerConfig};
use crate::report::Reporter;
use anyhow::anyhow;
use pinger_core::{Builder, Interrupt, Pinger};
use pinger_dns::{Resolver, SystemResolver};
use pinger_privilege::Privilege;
use std::net::Ipv4Addr;
use std::process;
use tracing_subscriber::fmt::format::FmtSpan;

/// The exit status used when a second interrupt arrives while terminating.
const FORCED_EXIT_STATUS: i32 = 130;

/// Run the pinger application.
pub fn run_pinger(cfg: &PingerConfig, pid: u16) -> anyhow::Result<()> {
    configure_logging(cfg);
    let privilege = Privilege::acquire_privileges()?;
    tracing::debug!(has_privileges = privilege.has_privileges(), pid);
    let addr = resolve_target(&cfg.host)?;
    let interrupt = Interrupt::new()?;
    install_interrupt_handler(interrupt.clone())?;
    let pinger = make_pinger(cfg, addr, pid, interrupt)?;
    let mut reporter = Reporter::new(std::io::stdout().lock(), &cfg.host, cfg.verbose, cfg.flood);
    let outcome = pinger
        .run_with(|event| reporter.event(event))
        .map_err(|err| match err {
            pinger_core::Error::InsufficientPrivileges(_) => {
                anyhow!("{err} ({})", Privilege::remedy())
            }
            err => anyhow!(err),
        })?;
    tracing::debug!(reason = ?outcome.reason, "session complete");
    reporter.finish(&outcome)?;
    Ok(())
}

/// Resolve the target host to a single `IPv4` address.
fn resolve_target(host: &str) -> anyhow::Result<Ipv4Addr> {
    SystemResolver::new()
        .lookup(host)?
        .first()
        .ok_or_else(|| anyhow!("{host}: unknown host (no IPv4 address)"))
}

/// The first interrupt asks the session to stop, a second forces an immediate exit.
fn install_interrupt_handler(interrupt: Interrupt) -> anyhow::Result<()> {
    ctrlc::set_handler(move || {
        if interrupt.trigger() {
            process::exit(FORCED_EXIT_STATUS);
        }
    })?;
    Ok(())
}

fn make_pinger(
    cfg: &PingerConfig,
    addr: Ipv4Addr,
    pid: u16,
    interrupt: Interrupt,
) -> anyhow::Result<Pinger> {
    Ok(Builder::new(addr)
        .identifier(pid)
        .ttl(cfg.ttl)
        .payload_size(cfg.packet_size)
        .payload_pattern(cfg.payload_pattern)
        .interval(cfg.interval)
        .timeout(cfg.timeout)
        .deadline(cfg.deadline)
        .count(cfg.count)
        .interrupt(interrupt)
        .drop_privileges(true)
        .build()?)
}

fn configure_logging(cfg: &PingerConfig) {
    if cfg.debug {
        let fmt_span = match cfg.log_span_events {
            LogSpanEvents::Off => FmtSpan::NONE,
            LogSpanEvents::Active => FmtSpan::ACTIVE,
            LogSpanEvents::Full => FmtSpan::FULL,
        };
        match cfg.log_format {
            LogFormat::Compact => {
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_span_events(fmt_span)
                    .with_env_filter(&cfg.log_filter)
                    .compact()
                    .init();
            }
            LogFormat::Pretty => {
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_span_events(fmt_span)
                    .with_env_filter(&cfg.log_filter)
                    .pretty()
                    .init();
            }
            LogFormat::Json => {
                tracing_subscriber::fmt()
                    .with_writer(std::io::stderr)
                    .with_span_events(fmt_span)
                    .with_env_filter(&cfg.log_filter)
                    .json()
                    .init();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_make_pinger() -> anyhow::Result<()> {
        let cfg = PingerConfig {
            host: String::from("localhost"),
            ttl: 12,
            interval: Duration::from_millis(200),
            deadline: Some(Duration::from_secs(3)),
            count: Some(4),
            packet_size: 100,
            payload_pattern: 0xff,
            ..PingerConfig::default()
        };
        let pinger = make_pinger(&cfg, Ipv4Addr::LOCALHOST, 4321, Interrupt::new()?)?;
        assert_eq!(Ipv4Addr::LOCALHOST, pinger.target_addr());
        assert_eq!(4321, pinger.identifier().0);
        assert_eq!(12, pinger.ttl().0);
        assert_eq!(100, pinger.payload_size().0);
        assert_eq!(0xff, pinger.payload_pattern().0);
        assert_eq!(Duration::from_millis(200), pinger.interval());
        assert_eq!(Some(Duration::from_secs(3)), pinger.deadline());
        assert_eq!(Some(4), pinger.max_count().map(|count| count.0.get()));
        assert!(pinger.drop_privileges());
        Ok(())
    }

    #[test]
    fn test_resolve_literal() -> anyhow::Result<()> {
        assert_eq!(Ipv4Addr::new(127, 0, 0, 1), resolve_target("127.0.0.1")?);
        Ok(())
    }
}
