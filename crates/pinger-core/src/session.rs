use crate::probe::Probe;
use crate::types::{Identifier, Sequence};
use indexmap::IndexMap;
use std::time::{Duration, Instant};

/// The state of a ping session.
///
/// Hands out sequence numbers, remembers when each probe was sent and matches replies back to
/// them.  Every sequence number is tracked as sent, answered or lost so that duplicate and late
/// replies can be told apart from replies to probes we never sent.
#[derive(Debug)]
pub struct Session {
    identifier: Identifier,
    /// The time the session started, the origin of the payload timestamp.
    epoch: Instant,
    next_sequence: Sequence,
    /// Probes awaiting a reply, in the order they were sent.
    in_flight: IndexMap<Sequence, Instant>,
    sent: SequenceSet,
    answered: SequenceSet,
    lost: SequenceSet,
    statistics: Statistics,
}

/// How a reply was matched against the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    /// The first reply for an outstanding probe, with its round trip time.
    Accepted(Duration),
    /// Another reply for a probe which was already answered.
    ///
    /// The round trip time is recovered from the payload timestamp, if present.
    Duplicate(Option<Duration>),
    /// A reply for a probe which had already been given up on.
    Late,
    /// A reply for a sequence we never sent.
    Unknown,
}

impl Session {
    #[must_use]
    pub fn new(identifier: Identifier, epoch: Instant) -> Self {
        Self {
            identifier,
            epoch,
            next_sequence: Sequence(1),
            in_flight: IndexMap::new(),
            sent: SequenceSet::new(),
            answered: SequenceSet::new(),
            lost: SequenceSet::new(),
            statistics: Statistics::default(),
        }
    }

    #[must_use]
    pub const fn identifier(&self) -> Identifier {
        self.identifier
    }

    #[must_use]
    pub const fn statistics(&self) -> &Statistics {
        &self.statistics
    }

    /// The number of probes awaiting a reply.
    #[must_use]
    pub fn outstanding(&self) -> usize {
        self.in_flight.len()
    }

    /// Create the next `Probe` and advance the sequence.
    ///
    /// The probe is not considered sent until [`Session::record_sent`] is called.
    pub fn next_probe(&mut self, now: Instant) -> Probe {
        let sequence = self.next_sequence;
        self.next_sequence = sequence.next();
        Probe::new(
            sequence,
            self.identifier,
            now,
            now.saturating_duration_since(self.epoch),
        )
    }

    /// Record that a probe was handed to the network.
    ///
    /// Any history from a previous use of the same sequence number is discarded.
    pub fn record_sent(&mut self, probe: &Probe) {
        self.statistics.transmitted += 1;
        self.in_flight.insert(probe.sequence, probe.sent);
        self.sent.insert(probe.sequence);
        self.answered.remove(probe.sequence);
        self.lost.remove(probe.sequence);
    }

    /// Match an echo reply for `sequence` received at `recv`.
    pub fn record_reply(
        &mut self,
        sequence: Sequence,
        recv: Instant,
        timestamp: Option<Duration>,
    ) -> ReplyOutcome {
        if let Some(sent) = self.in_flight.shift_remove(&sequence) {
            let rtt = recv.saturating_duration_since(sent);
            self.statistics.record_rtt(rtt);
            self.answered.insert(sequence);
            ReplyOutcome::Accepted(rtt)
        } else if self.answered.contains(sequence) {
            self.statistics.duplicates += 1;
            let rtt = timestamp
                .and_then(|offset| self.epoch.checked_add(offset))
                .map(|sent| recv.saturating_duration_since(sent));
            ReplyOutcome::Duplicate(rtt)
        } else if self.lost.contains(sequence) {
            ReplyOutcome::Late
        } else {
            ReplyOutcome::Unknown
        }
    }

    /// Record an `ICMP` error reported for `sequence`.
    ///
    /// If the probe was still outstanding it is now considered lost.  Returns `false`, and counts
    /// nothing, if we never sent `sequence`.
    pub fn record_error(&mut self, sequence: Sequence) -> bool {
        if !self.sent.contains(sequence) {
            return false;
        }
        self.statistics.errors += 1;
        if self.in_flight.shift_remove(&sequence).is_some() {
            self.lost.insert(sequence);
        }
        true
    }

    /// The time at which the oldest outstanding probe expires, if any.
    #[must_use]
    pub fn next_expiry(&self, timeout: Duration) -> Option<Instant> {
        self.in_flight.first().map(|(_, &sent)| sent + timeout)
    }

    /// Give up on every probe sent more than `timeout` before `now`, oldest first.
    pub fn expire_overdue(&mut self, now: Instant, timeout: Duration) -> Vec<Sequence> {
        let mut expired = vec![];
        while let Some((&sequence, &sent)) = self.in_flight.first() {
            if now.saturating_duration_since(sent) < timeout {
                break;
            }
            self.in_flight.shift_remove_index(0);
            self.lost.insert(sequence);
            expired.push(sequence);
        }
        expired
    }
}

/// Summary statistics for a session.
///
/// Round trip times are accumulated in milliseconds.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Statistics {
    transmitted: usize,
    received: usize,
    duplicates: usize,
    errors: usize,
    min_ms: f64,
    max_ms: f64,
    sum_ms: f64,
    sum_sq_ms: f64,
}

/// Round trip time summary, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoundTrip {
    pub min: f64,
    pub avg: f64,
    pub max: f64,
    pub mdev: f64,
}

impl Statistics {
    #[must_use]
    pub const fn transmitted(&self) -> usize {
        self.transmitted
    }

    #[must_use]
    pub const fn received(&self) -> usize {
        self.received
    }

    #[must_use]
    pub const fn duplicates(&self) -> usize {
        self.duplicates
    }

    #[must_use]
    pub const fn errors(&self) -> usize {
        self.errors
    }

    /// The percentage of transmitted probes which were not answered, rounded half up.
    #[must_use]
    pub const fn loss_percent(&self) -> usize {
        if self.transmitted == 0 {
            0
        } else {
            let lost = self.transmitted - self.received;
            (200 * lost + self.transmitted) / (2 * self.transmitted)
        }
    }

    /// The round trip summary, if any reply was received.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn round_trip(&self) -> Option<RoundTrip> {
        if self.received == 0 {
            return None;
        }
        let n = self.received as f64;
        let avg = self.sum_ms / n;
        let mdev = (self.sum_sq_ms / n - avg * avg).abs().sqrt();
        Some(RoundTrip {
            min: self.min_ms,
            avg,
            max: self.max_ms,
            mdev,
        })
    }

    fn record_rtt(&mut self, rtt: Duration) {
        let ms = rtt.as_secs_f64() * 1000.0;
        if self.received == 0 {
            self.min_ms = ms;
            self.max_ms = ms;
        } else {
            self.min_ms = self.min_ms.min(ms);
            self.max_ms = self.max_ms.max(ms);
        }
        self.received += 1;
        self.sum_ms += ms;
        self.sum_sq_ms += ms * ms;
    }
}

/// The number of 64 bit words needed to hold a bit for every sequence number.
const SEQUENCE_WORDS: usize = (u16::MAX as usize + 1) / 64;

/// A fixed size bit set over the whole sequence number space.
#[derive(Debug, Clone)]
struct SequenceSet(Vec<u64>);

impl SequenceSet {
    fn new() -> Self {
        Self(vec![0; SEQUENCE_WORDS])
    }

    fn insert(&mut self, sequence: Sequence) {
        let (word, bit) = Self::locate(sequence);
        self.0[word] |= bit;
    }

    fn remove(&mut self, sequence: Sequence) {
        let (word, bit) = Self::locate(sequence);
        self.0[word] &= !bit;
    }

    fn contains(&self, sequence: Sequence) -> bool {
        let (word, bit) = Self::locate(sequence);
        self.0[word] & bit != 0
    }

    const fn locate(sequence: Sequence) -> (usize, u64) {
        let index = sequence.0 as usize;
        (index / 64, 1 << (index % 64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    fn send(session: &mut Session, now: Instant) -> Probe {
        let probe = session.next_probe(now);
        session.record_sent(&probe);
        probe
    }

    #[test]
    fn test_next_probe() {
        let epoch = Instant::now();
        let mut session = Session::new(Identifier(1234), epoch);
        let first = session.next_probe(epoch + ms(5));
        let second = session.next_probe(epoch + ms(10));
        assert_eq!(Sequence(1), first.sequence);
        assert_eq!(Identifier(1234), first.identifier);
        assert_eq!(ms(5), first.offset);
        assert_eq!(Sequence(2), second.sequence);
        assert_eq!(ms(10), second.offset);
        assert_eq!(0, session.statistics().transmitted());
    }

    #[test]
    fn test_sequence_wraps() {
        let epoch = Instant::now();
        let mut session = Session::new(Identifier(0), epoch);
        session.next_sequence = Sequence(u16::MAX);
        assert_eq!(Sequence(u16::MAX), session.next_probe(epoch).sequence);
        assert_eq!(Sequence(0), session.next_probe(epoch).sequence);
        assert_eq!(Sequence(1), session.next_probe(epoch).sequence);
    }

    #[test]
    fn test_accepted_reply() {
        let epoch = Instant::now();
        let mut session = Session::new(Identifier(0), epoch);
        let probe = send(&mut session, epoch);
        assert_eq!(1, session.outstanding());
        let outcome = session.record_reply(probe.sequence, epoch + ms(12), None);
        assert_eq!(ReplyOutcome::Accepted(ms(12)), outcome);
        assert_eq!(1, session.statistics().transmitted());
        assert_eq!(1, session.statistics().received());
        assert_eq!(0, session.outstanding());
    }

    #[test]
    fn test_duplicate_reply() {
        let epoch = Instant::now();
        let mut session = Session::new(Identifier(0), epoch);
        let probe = send(&mut session, epoch + ms(100));
        session.record_reply(probe.sequence, epoch + ms(110), Some(ms(100)));
        let outcome = session.record_reply(probe.sequence, epoch + ms(130), Some(ms(100)));
        assert_eq!(ReplyOutcome::Duplicate(Some(ms(30))), outcome);
        let outcome = session.record_reply(probe.sequence, epoch + ms(140), None);
        assert_eq!(ReplyOutcome::Duplicate(None), outcome);
        assert_eq!(1, session.statistics().received());
        assert_eq!(2, session.statistics().duplicates());
    }

    #[test]
    fn test_late_reply() {
        let epoch = Instant::now();
        let mut session = Session::new(Identifier(0), epoch);
        let probe = send(&mut session, epoch);
        assert_eq!(vec![probe.sequence], session.expire_overdue(epoch + ms(1000), ms(1000)));
        assert!(session.expire_overdue(epoch + ms(2000), ms(1000)).is_empty());
        let outcome = session.record_reply(probe.sequence, epoch + ms(2000), None);
        assert_eq!(ReplyOutcome::Late, outcome);
        assert_eq!(0, session.statistics().received());
        assert_eq!(0, session.statistics().duplicates());
    }

    #[test]
    fn test_unknown_reply() {
        let epoch = Instant::now();
        let mut session = Session::new(Identifier(0), epoch);
        send(&mut session, epoch);
        let outcome = session.record_reply(Sequence(99), epoch + ms(1), None);
        assert_eq!(ReplyOutcome::Unknown, outcome);
        assert_eq!(0, session.statistics().received());
    }

    #[test]
    fn test_record_error() {
        let epoch = Instant::now();
        let mut session = Session::new(Identifier(0), epoch);
        let probe = send(&mut session, epoch);
        assert!(session.record_error(probe.sequence));
        assert_eq!(0, session.outstanding());
        assert!(session.record_error(probe.sequence));
        assert!(!session.record_error(Sequence(42)));
        assert_eq!(2, session.statistics().errors());
        assert_eq!(0, session.statistics().received());
        assert_eq!(
            ReplyOutcome::Late,
            session.record_reply(probe.sequence, epoch + ms(1), None)
        );
    }

    #[test]
    fn test_expire_overdue() {
        let epoch = Instant::now();
        let mut session = Session::new(Identifier(0), epoch);
        let first = send(&mut session, epoch);
        let second = send(&mut session, epoch + ms(500));
        let third = send(&mut session, epoch + ms(900));
        session.record_reply(second.sequence, epoch + ms(600), None);
        assert_eq!(Some(epoch + ms(1000)), session.next_expiry(ms(1000)));
        let expired = session.expire_overdue(epoch + ms(1500), ms(1000));
        assert_eq!(vec![first.sequence], expired);
        assert_eq!(1, session.outstanding());
        let expired = session.expire_overdue(epoch + ms(1900), ms(1000));
        assert_eq!(vec![third.sequence], expired);
        assert_eq!(0, session.outstanding());
        assert_eq!(None, session.next_expiry(ms(1000)));
    }

    #[test]
    fn test_reused_sequence_forgets_history() {
        let epoch = Instant::now();
        let mut session = Session::new(Identifier(0), epoch);
        let probe = send(&mut session, epoch);
        session.expire_overdue(epoch + ms(1000), ms(1000));
        session.record_sent(&probe);
        assert_eq!(
            ReplyOutcome::Accepted(ms(5)),
            session.record_reply(probe.sequence, epoch + ms(5), None)
        );
    }

    #[test]
    fn test_round_trip() {
        let mut stats = Statistics::default();
        assert_eq!(None, stats.round_trip());
        stats.record_rtt(ms(10));
        stats.record_rtt(ms(20));
        stats.record_rtt(ms(30));
        let round_trip = stats.round_trip().unwrap();
        assert!((round_trip.min - 10.0).abs() < 1e-9);
        assert!((round_trip.avg - 20.0).abs() < 1e-9);
        assert!((round_trip.max - 30.0).abs() < 1e-9);
        assert!((round_trip.mdev - (200.0_f64 / 3.0).sqrt()).abs() < 1e-9);
    }

    #[test_case(0, 0, 0)]
    #[test_case(1, 1, 0)]
    #[test_case(1, 0, 100)]
    #[test_case(3, 2, 33)]
    #[test_case(3, 1, 67)]
    #[test_case(8, 7, 13; "12.5 rounds up")]
    #[test_case(200, 199, 1; "0.5 rounds up")]
    fn test_loss_percent(transmitted: usize, received: usize, expected: usize) {
        let stats = Statistics {
            transmitted,
            received,
            ..Default::default()
        };
        assert_eq!(expected, stats.loss_percent());
    }

    #[test]
    fn test_sequence_set() {
        let mut set = SequenceSet::new();
        for sequence in [Sequence(0), Sequence(63), Sequence(64), Sequence(u16::MAX)] {
            assert!(!set.contains(sequence));
            set.insert(sequence);
            assert!(set.contains(sequence));
        }
        assert!(!set.contains(Sequence(1)));
        set.remove(Sequence(64));
        assert!(!set.contains(Sequence(64)));
        assert!(set.contains(Sequence(63)));
    }
}
