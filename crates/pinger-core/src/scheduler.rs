use crate::config::SchedulerConfig;
use crate::error::{Error, Result};
use crate::interrupt::Interrupt;
use crate::net::Network;
use crate::probe::{IcmpError, Response};
use crate::session::{ReplyOutcome, Session, Statistics};
use crate::types::{PayloadSize, Sequence, TimeToLive};
use std::net::Ipv4Addr;
use std::time::{Duration, Instant};
use tracing::instrument;

/// An event published while a session runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PingEvent {
    /// The session has started.
    Started {
        target: Ipv4Addr,
        payload_size: PayloadSize,
    },
    /// An echo request was handed to the network.
    Sent(Sequence),
    /// An echo reply matched one of our probes.
    Reply(Reply),
    /// A host reported an `ICMP` error for one of our probes.
    IcmpError {
        sequence: Sequence,
        addr: Ipv4Addr,
        error: IcmpError,
    },
    /// No answer arrived for a probe within the timeout.
    Timeout(Sequence),
    /// An echo request could not be sent, the session continues.
    SendFailed { sequence: Sequence, error: String },
}

/// An echo reply for one of our probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reply {
    pub sequence: Sequence,
    pub addr: Ipv4Addr,
    pub ttl: TimeToLive,
    /// The size of the `ICMP` message in bytes.
    pub bytes: usize,
    /// The round trip time, if known.
    ///
    /// Always known for the first reply to a probe, only known for a duplicate if the payload
    /// carried the send timestamp.
    pub rtt: Option<Duration>,
    pub duplicate: bool,
    pub checksum_valid: bool,
}

/// The result of a completed session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Outcome {
    pub statistics: Statistics,
    pub reason: CompletionReason,
}

/// Indicates what triggered the completion of the session.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum CompletionReason {
    /// Termination was requested.
    Interrupted,
    /// The configured deadline elapsed.
    DeadlineReached,
    /// The configured number of probes were sent and the last was answered or timed out.
    CountReached,
}

/// Send echo requests at a fixed interval and match the replies.
#[derive(Debug)]
pub struct Scheduler<F> {
    config: SchedulerConfig,
    interrupt: Interrupt,
    publish: F,
}

impl<F: FnMut(&PingEvent)> Scheduler<F> {
    #[instrument(skip_all, level = "trace")]
    pub fn new(config: &SchedulerConfig, interrupt: Interrupt, publish: F) -> Self {
        tracing::debug!(?config);
        Self {
            config: *config,
            interrupt,
            publish,
        }
    }

    /// Run the session until it is interrupted, the deadline passes or the count is reached.
    ///
    /// Each pass through the loop expires overdue probes, sends the next probe if it is due and
    /// then waits for a response until the next thing is due to happen.  The interrupt is checked
    /// on every pass, so before and after every timed receive.
    #[instrument(skip(self, network), level = "trace")]
    pub fn run<N: Network>(mut self, mut network: N) -> Result<Outcome> {
        let start = Instant::now();
        let deadline = self.config.deadline.map(|deadline| start + deadline);
        let mut session = Session::new(self.config.identifier, start);
        let mut attempts = 0_usize;
        let mut next_tick = start;
        (self.publish)(&PingEvent::Started {
            target: self.config.target_addr,
            payload_size: self.config.payload_size,
        });
        let reason = loop {
            if self.interrupt.is_requested() {
                break CompletionReason::Interrupted;
            }
            let now = Instant::now();
            if deadline.is_some_and(|deadline| now >= deadline) {
                break CompletionReason::DeadlineReached;
            }
            for sequence in session.expire_overdue(now, self.config.timeout) {
                tracing::debug!(%sequence, "probe timed out");
                (self.publish)(&PingEvent::Timeout(sequence));
            }
            let more_to_send = self
                .config
                .max_count
                .map_or(true, |max_count| attempts < max_count.0.get());
            if !more_to_send && session.outstanding() == 0 {
                break CompletionReason::CountReached;
            }
            if more_to_send && now >= next_tick && session.outstanding() == 0 {
                self.send_probe(&mut network, &mut session, now)?;
                attempts += 1;
                next_tick = now + self.config.interval;
                continue;
            }
            let target = session
                .next_expiry(self.config.timeout)
                .unwrap_or(next_tick);
            let target = deadline.map_or(target, |deadline| target.min(deadline));
            let wait = target.saturating_duration_since(now);
            if wait.is_zero() {
                continue;
            }
            if let Some(resp) = network.recv_probe(wait)? {
                self.handle_response(&mut session, resp);
            }
        };
        tracing::debug!(?reason, statistics = ?session.statistics());
        Ok(Outcome {
            statistics: *session.statistics(),
            reason,
        })
    }

    /// Send the next probe and handle errors.
    ///
    /// A probe which fails because the host or network is unreachable is reported and not
    /// counted as transmitted, any other failure is fatal.
    fn send_probe<N: Network>(
        &mut self,
        network: &mut N,
        session: &mut Session,
        now: Instant,
    ) -> Result<()> {
        let probe = session.next_probe(now);
        match network.send_probe(probe) {
            Ok(()) => {
                session.record_sent(&probe);
                (self.publish)(&PingEvent::Sent(probe.sequence));
                Ok(())
            }
            Err(Error::ProbeFailed(err)) => {
                tracing::debug!(sequence = %probe.sequence, %err, "probe failed");
                (self.publish)(&PingEvent::SendFailed {
                    sequence: probe.sequence,
                    error: err.to_string(),
                });
                Ok(())
            }
            Err(err) => Err(err),
        }
    }

    fn handle_response(&mut self, session: &mut Session, resp: Response) {
        let data = resp.data();
        if data.identifier != session.identifier().0 {
            tracing::trace!(identifier = data.identifier, "ignoring foreign packet");
            return;
        }
        let sequence = Sequence(data.sequence);
        match resp {
            Response::EchoReply(data) => {
                let (rtt, duplicate) =
                    match session.record_reply(sequence, data.recv, data.timestamp) {
                        ReplyOutcome::Accepted(rtt) => (Some(rtt), false),
                        ReplyOutcome::Duplicate(rtt) => (rtt, true),
                        outcome @ (ReplyOutcome::Late | ReplyOutcome::Unknown) => {
                            tracing::debug!(%sequence, ?outcome, "ignoring reply");
                            return;
                        }
                    };
                if !data.checksum_valid {
                    tracing::debug!(%sequence, "reply checksum did not verify");
                }
                (self.publish)(&PingEvent::Reply(Reply {
                    sequence,
                    addr: data.addr,
                    ttl: TimeToLive(data.ttl),
                    bytes: data.bytes,
                    rtt,
                    duplicate,
                    checksum_valid: data.checksum_valid,
                }));
            }
            Response::Error(data, error) => {
                if session.record_error(sequence) {
                    (self.publish)(&PingEvent::IcmpError {
                        sequence,
                        addr: data.addr,
                        error,
                    });
                } else {
                    tracing::debug!(%sequence, ?error, "ignoring error for unknown probe");
                }
            }
        }
    }
}
