use crate::resolver::{Error, ResolvedIpAddrs, Resolver, Result};
use itertools::{Either, Itertools};
use std::net::{IpAddr, Ipv4Addr};

/// A [`Resolver`] backed by the system `getaddrinfo`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemResolver;

impl SystemResolver {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Resolver for SystemResolver {
    #[tracing::instrument(skip(self, hostname), fields(hostname = hostname.as_ref()), level = "debug")]
    fn lookup(&self, hostname: impl AsRef<str>) -> Result<ResolvedIpAddrs> {
        let hostname = hostname.as_ref();
        if let Ok(addr) = hostname.parse::<Ipv4Addr>() {
            return Ok(ResolvedIpAddrs(vec![addr]));
        }
        let all = dns_lookup::lookup_host(hostname)
            .map_err(|err| Error::LookupFailed(hostname.to_string(), Box::new(err)))?;
        let (ipv4, ipv6): (Vec<_>, Vec<_>) = all.into_iter().partition_map(|ip| match ip {
            IpAddr::V4(addr) => Either::Left(addr),
            IpAddr::V6(addr) => Either::Right(addr),
        });
        tracing::debug!(?ipv4, ?ipv6, "resolved");
        if ipv4.is_empty() {
            Err(Error::NoIpv4Address(hostname.to_string()))
        } else {
            Ok(ResolvedIpAddrs(ipv4))
        }
    }
}
