//! Forward hostname resolution for pinger.
//!
//! Only `IPv4` addresses are returned.  Dotted-quad literals are accepted
//! without consulting the system resolver.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! use pinger_dns::{Resolver, SystemResolver};
//!
//! let resolver = SystemResolver::new();
//! let addrs = resolver.lookup("example.com")?;
//! for addr in addrs.iter() {
//!     println!("{addr}");
//! }
//! # Ok(())
//! # }
//! ```
#![warn(clippy::all, clippy::pedantic, clippy::nursery, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod resolver;
mod system;

pub use resolver::{Error, ResolvedIpAddrs, Resolver, Result};
pub use system::SystemResolver;
