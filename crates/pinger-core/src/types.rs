use derive_more::{Display, From};
use std::num::NonZeroUsize;

/// `TimeToLive` (ttl) newtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Hash, Display, From)]
pub struct TimeToLive(pub u8);

/// `Sequence` number newtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Hash, Display, From)]
pub struct Sequence(pub u16);

impl Sequence {
    /// The sequence that follows this one, wrapping at `u16::MAX`.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// `Identifier` newtype, the `ICMP` echo identifier shared by every probe of a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Hash, Display, From)]
pub struct Identifier(pub u16);

/// `PayloadSize` newtype, the number of data bytes following the `ICMP` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, Display, From)]
pub struct PayloadSize(pub u16);

/// `PayloadPattern` newtype.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Ord, PartialOrd, From)]
pub struct PayloadPattern(pub u8);

/// `MaxCount` newtype, the number of probes after which a session ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Ord, PartialOrd, From)]
pub struct MaxCount(pub NonZeroUsize);

impl From<Sequence> for usize {
    fn from(sequence: Sequence) -> Self {
        Self::from(sequence.0)
    }
}
