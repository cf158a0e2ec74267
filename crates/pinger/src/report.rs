use pinger_core::{
    CompletionReason, IcmpError, Outcome, PingEvent, Reply, RoundTrip, Statistics,
};
use std::fmt::{Display, Formatter};
use std::io::{self, Write};
use tracing::instrument;

/// Render session events as lines of text.
///
/// Write errors are remembered rather than propagated from [`Reporter::event`], which runs
/// inside the session loop; the first one is returned by [`Reporter::finish`].
#[derive(Debug)]
pub struct Reporter<W> {
    writer: W,
    host: String,
    verbose: bool,
    flood: bool,
    error: Option<io::Error>,
}

impl<W: Write> Reporter<W> {
    pub fn new(writer: W, host: &str, verbose: bool, flood: bool) -> Self {
        Self {
            writer,
            host: host.to_string(),
            verbose,
            flood,
            error: None,
        }
    }

    /// Report a single session event.
    pub fn event(&mut self, event: &PingEvent) {
        if self.error.is_none() {
            if let Err(err) = self.write_event(event) {
                self.error = Some(err);
            }
        }
    }

    /// Report the summary of a completed session.
    #[instrument(skip_all, level = "trace")]
    pub fn finish(mut self, outcome: &Outcome) -> io::Result<()> {
        if let Some(err) = self.error.take() {
            return Err(err);
        }
        if self.flood || outcome.reason == CompletionReason::Interrupted {
            writeln!(self.writer)?;
        }
        write!(
            self.writer,
            "{}",
            Summary::new(&self.host, &outcome.statistics)
        )?;
        self.writer.flush()
    }

    fn write_event(&mut self, event: &PingEvent) -> io::Result<()> {
        match event {
            PingEvent::Started {
                target,
                payload_size,
            } => writeln!(
                self.writer,
                "PING {} ({target}): {payload_size} data bytes",
                self.host
            ),
            PingEvent::Sent(_) if self.flood => self.write_flood(b"."),
            PingEvent::Reply(_) if self.flood => self.write_flood(b"\x08 \x08"),
            PingEvent::Reply(reply) => writeln!(self.writer, "{}", ReplyLine(reply)),
            PingEvent::IcmpError { .. } if self.flood => Ok(()),
            PingEvent::IcmpError {
                sequence,
                addr,
                error,
            } => {
                write!(
                    self.writer,
                    "From {addr} icmp_seq={sequence} {}",
                    describe(*error)
                )?;
                if self.verbose {
                    write!(
                        self.writer,
                        " type={} code={}",
                        error.icmp_type(),
                        error.code().0
                    )?;
                }
                writeln!(self.writer)
            }
            PingEvent::SendFailed { .. } if self.flood => self.write_flood(b"E"),
            PingEvent::SendFailed { error, .. } => {
                writeln!(self.writer, "pinger: sendto: {error}")
            }
            PingEvent::Sent(_) | PingEvent::Timeout(_) => Ok(()),
        }
    }

    fn write_flood(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.writer.write_all(bytes)?;
        self.writer.flush()
    }
}

struct ReplyLine<'a>(&'a Reply);

impl Display for ReplyLine<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let reply = self.0;
        write!(
            f,
            "{} bytes from {}: icmp_seq={} ttl={}",
            reply.bytes, reply.addr, reply.sequence, reply.ttl
        )?;
        if let Some(rtt) = reply.rtt {
            write!(f, " time={:.3} ms", rtt.as_secs_f64() * 1000.0)?;
        }
        if reply.duplicate {
            write!(f, " (DUP!)")?;
        }
        if !reply.checksum_valid {
            write!(f, " (BAD CHECKSUM!)")?;
        }
        Ok(())
    }
}

/// The closing statistics block.
#[derive(Debug)]
struct Summary<'a> {
    host: &'a str,
    transmitted: usize,
    received: usize,
    duplicates: usize,
    errors: usize,
    loss_percent: usize,
    round_trip: Option<RoundTrip>,
}

impl<'a> Summary<'a> {
    fn new(host: &'a str, statistics: &Statistics) -> Self {
        Self {
            host,
            transmitted: statistics.transmitted(),
            received: statistics.received(),
            duplicates: statistics.duplicates(),
            errors: statistics.errors(),
            loss_percent: statistics.loss_percent(),
            round_trip: statistics.round_trip(),
        }
    }
}

impl Display for Summary<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "--- {} ping statistics ---", self.host)?;
        write!(
            f,
            "{} packets transmitted, {} packets received",
            self.transmitted, self.received
        )?;
        if self.duplicates > 0 {
            write!(f, ", +{} duplicates", self.duplicates)?;
        }
        if self.errors > 0 {
            write!(f, ", +{} errors", self.errors)?;
        }
        writeln!(f, ", {}% packet loss", self.loss_percent)?;
        if let Some(rtt) = self.round_trip {
            writeln!(
                f,
                "round-trip min/avg/max/mdev = {:.3}/{:.3}/{:.3}/{:.3} ms",
                rtt.min, rtt.avg, rtt.max, rtt.mdev
            )?;
        }
        Ok(())
    }
}

/// A human readable description of an `ICMP` error.
fn describe(error: IcmpError) -> String {
    match error {
        IcmpError::TimeExceeded(code) => match code.0 {
            0 => String::from("Time to live exceeded"),
            1 => String::from("Frag reassembly time exceeded"),
            n => format!("Time exceeded, Bad Code: {n}"),
        },
        IcmpError::DestinationUnreachable(code) => match code.0 {
            0 => String::from("Destination Net Unreachable"),
            1 => String::from("Destination Host Unreachable"),
            2 => String::from("Destination Protocol Unreachable"),
            3 => String::from("Destination Port Unreachable"),
            4 => String::from("Frag needed and DF set"),
            5 => String::from("Source Route Failed"),
            6 => String::from("Destination Net Unknown"),
            7 => String::from("Destination Host Unknown"),
            9 => String::from("Destination Net Prohibited"),
            10 => String::from("Destination Host Prohibited"),
            13 => String::from("Communication prohibited by filter"),
            n => format!("Dest Unreachable, Bad Code: {n}"),
        },
        IcmpError::SourceQuench(_) => String::from("Source Quench"),
        IcmpError::Redirect(_) => String::from("Redirect"),
        IcmpError::ParameterProblem(_) => String::from("Parameter problem"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pinger_core::{IcmpCode, PayloadSize, Sequence, TimeToLive};
    use std::net::Ipv4Addr;
    use std::time::Duration;
    use test_case::test_case;

    const ADDR: Ipv4Addr = Ipv4Addr::new(127, 0, 0, 1);

    fn reply(sequence: u16) -> Reply {
        Reply {
            sequence: Sequence(sequence),
            addr: ADDR,
            ttl: TimeToLive(64),
            bytes: 64,
            rtt: Some(Duration::from_micros(1234)),
            duplicate: false,
            checksum_valid: true,
        }
    }

    fn render(verbose: bool, flood: bool, events: &[PingEvent]) -> String {
        let mut buf = Vec::new();
        let mut reporter = Reporter::new(&mut buf, "localhost", verbose, flood);
        for event in events {
            reporter.event(event);
        }
        reporter
            .finish(&Outcome {
                statistics: Statistics::default(),
                reason: CompletionReason::CountReached,
            })
            .unwrap();
        String::from_utf8(buf).unwrap()
    }

    const EMPTY_SUMMARY: &str = "--- localhost ping statistics ---\n\
        0 packets transmitted, 0 packets received, 0% packet loss\n";

    #[test]
    fn test_session() {
        let events = [
            PingEvent::Started {
                target: ADDR,
                payload_size: PayloadSize(56),
            },
            PingEvent::Sent(Sequence(1)),
            PingEvent::Reply(reply(1)),
            PingEvent::Sent(Sequence(2)),
            PingEvent::Timeout(Sequence(2)),
        ];
        let expected = format!(
            "PING localhost (127.0.0.1): 56 data bytes\n\
             64 bytes from 127.0.0.1: icmp_seq=1 ttl=64 time=1.234 ms\n\
             {EMPTY_SUMMARY}"
        );
        pretty_assertions::assert_eq!(expected, render(false, false, &events));
    }

    #[test]
    fn test_reply_markers() {
        let duplicate = Reply {
            duplicate: true,
            rtt: None,
            ..reply(3)
        };
        let corrupt = Reply {
            checksum_valid: false,
            ..reply(4)
        };
        let events = [PingEvent::Reply(duplicate), PingEvent::Reply(corrupt)];
        let expected = format!(
            "64 bytes from 127.0.0.1: icmp_seq=3 ttl=64 (DUP!)\n\
             64 bytes from 127.0.0.1: icmp_seq=4 ttl=64 time=1.234 ms (BAD CHECKSUM!)\n\
             {EMPTY_SUMMARY}"
        );
        pretty_assertions::assert_eq!(expected, render(false, false, &events));
    }

    #[test_case(false, "From 10.0.0.1 icmp_seq=7 Time to live exceeded\n"; "brief")]
    #[test_case(true, "From 10.0.0.1 icmp_seq=7 Time to live exceeded type=11 code=0\n"; "verbose")]
    fn test_icmp_error(verbose: bool, expected: &str) {
        let events = [PingEvent::IcmpError {
            sequence: Sequence(7),
            addr: Ipv4Addr::new(10, 0, 0, 1),
            error: IcmpError::TimeExceeded(IcmpCode(0)),
        }];
        let expected = format!("{expected}{EMPTY_SUMMARY}");
        pretty_assertions::assert_eq!(expected, render(verbose, false, &events));
    }

    #[test]
    fn test_send_failed() {
        let events = [PingEvent::SendFailed {
            sequence: Sequence(1),
            error: String::from("No route to host"),
        }];
        let expected = format!("pinger: sendto: No route to host\n{EMPTY_SUMMARY}");
        pretty_assertions::assert_eq!(expected, render(false, false, &events));
    }

    #[test]
    fn test_flood() {
        let events = [
            PingEvent::Sent(Sequence(1)),
            PingEvent::Reply(reply(1)),
            PingEvent::Sent(Sequence(2)),
            PingEvent::IcmpError {
                sequence: Sequence(2),
                addr: ADDR,
                error: IcmpError::DestinationUnreachable(IcmpCode(1)),
            },
            PingEvent::SendFailed {
                sequence: Sequence(3),
                error: String::from("No route to host"),
            },
            PingEvent::Sent(Sequence(4)),
        ];
        let expected = format!(".\x08 \x08.E.\n{EMPTY_SUMMARY}");
        pretty_assertions::assert_eq!(expected, render(false, true, &events));
    }

    #[test]
    fn test_interrupted_summary_starts_on_new_line() {
        let mut buf = Vec::new();
        let reporter = Reporter::new(&mut buf, "localhost", false, false);
        reporter
            .finish(&Outcome {
                statistics: Statistics::default(),
                reason: CompletionReason::Interrupted,
            })
            .unwrap();
        let expected = format!("\n{EMPTY_SUMMARY}");
        pretty_assertions::assert_eq!(expected, String::from_utf8(buf).unwrap());
    }

    #[test]
    fn test_summary_full() {
        let summary = Summary {
            host: "example.com",
            transmitted: 10,
            received: 7,
            duplicates: 2,
            errors: 3,
            loss_percent: 30,
            round_trip: Some(RoundTrip {
                min: 0.5,
                avg: 1.25,
                max: 2.0,
                mdev: 0.4321,
            }),
        };
        let expected = "--- example.com ping statistics ---\n\
            10 packets transmitted, 7 packets received, +2 duplicates, +3 errors, 30% packet loss\n\
            round-trip min/avg/max/mdev = 0.500/1.250/2.000/0.432 ms\n";
        pretty_assertions::assert_eq!(expected, summary.to_string());
    }

    #[test_case(IcmpError::TimeExceeded(IcmpCode(1)), "Frag reassembly time exceeded")]
    #[test_case(IcmpError::DestinationUnreachable(IcmpCode(0)), "Destination Net Unreachable")]
    #[test_case(IcmpError::DestinationUnreachable(IcmpCode(1)), "Destination Host Unreachable")]
    #[test_case(IcmpError::DestinationUnreachable(IcmpCode(3)), "Destination Port Unreachable")]
    #[test_case(IcmpError::DestinationUnreachable(IcmpCode(13)), "Communication prohibited by filter")]
    #[test_case(IcmpError::DestinationUnreachable(IcmpCode(99)), "Dest Unreachable, Bad Code: 99")]
    #[test_case(IcmpError::SourceQuench(IcmpCode(0)), "Source Quench")]
    #[test_case(IcmpError::Redirect(IcmpCode(1)), "Redirect")]
    #[test_case(IcmpError::ParameterProblem(IcmpCode(0)), "Parameter problem")]
    fn test_describe(error: IcmpError, expected: &str) {
        assert_eq!(expected, describe(error));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_error_returned_on_finish() {
        let mut reporter = Reporter::new(BrokenPipe, "localhost", false, false);
        reporter.event(&PingEvent::Reply(reply(1)));
        let err = reporter
            .finish(&Outcome {
                statistics: Statistics::default(),
                reason: CompletionReason::CountReached,
            })
            .unwrap_err();
        assert_eq!(io::ErrorKind::BrokenPipe, err.kind());
    }
}
