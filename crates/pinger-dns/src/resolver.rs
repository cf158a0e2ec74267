use std::net::Ipv4Addr;
use thiserror::Error;

/// A DNS resolver.
pub trait Resolver {
    /// Perform a blocking DNS hostname lookup and return the resolved `IPv4` addresses.
    ///
    /// The result is never empty.
    fn lookup(&self, hostname: impl AsRef<str>) -> Result<ResolvedIpAddrs>;
}

/// A DNS resolver result.
pub type Result<T> = std::result::Result<T, Error>;

/// A DNS resolver error.
#[derive(Error, Debug)]
pub enum Error {
    /// The resolver could not find the host.
    #[error("{0}: unknown host ({1})")]
    LookupFailed(String, Box<dyn std::error::Error + Send + Sync + 'static>),
    /// The host exists but has no `IPv4` address.
    #[error("{0}: unknown host (no IPv4 address)")]
    NoIpv4Address(String),
}

/// The resolved `IPv4` addresses of a hostname, in resolver order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ResolvedIpAddrs(pub(super) Vec<Ipv4Addr>);

impl ResolvedIpAddrs {
    pub fn iter(&self) -> impl Iterator<Item = &'_ Ipv4Addr> {
        self.0.iter()
    }

    /// The address to use when a single target is needed.
    #[must_use]
    pub fn first(&self) -> Option<Ipv4Addr> {
        self.0.first().copied()
    }
}

impl IntoIterator for ResolvedIpAddrs {
    type Item = Ipv4Addr;
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
