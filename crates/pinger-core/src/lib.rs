//! pinger - An `ICMP` echo library.
//!
//! This crate provides the core facility used by the standalone `pinger`
//! command line tool: it sends `ICMP` echo requests to an `IPv4` target over
//! a raw socket at a fixed interval, matches the replies and `ICMP` errors
//! to the requests and keeps the round trip statistics of the session.
//!
//! # Example
//!
//! The following example pings a target five times and prints each event
//! followed by the session statistics:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! # use std::net::Ipv4Addr;
//! # use std::str::FromStr;
//! use pinger_core::Builder;
//!
//! let addr = Ipv4Addr::from_str("1.1.1.1")?;
//! let outcome = Builder::new(addr)
//!     .count(Some(5))
//!     .build()?
//!     .run_with(|event| println!("{:?}", event))?;
//! println!("{:?}", outcome.statistics);
//! # Ok(())
//! # }
//! ```
//!
//! The session can be ended early from another thread, such as a signal
//! handler, by triggering its [`Interrupt`]:
//!
//! ```no_run
//! # fn main() -> anyhow::Result<()> {
//! # use std::net::Ipv4Addr;
//! use pinger_core::{Builder, Interrupt};
//!
//! let interrupt = Interrupt::new()?;
//! let handle = interrupt.clone();
//! std::thread::spawn(move || {
//!     std::thread::sleep(std::time::Duration::from_secs(3));
//!     handle.trigger();
//! });
//! Builder::new(Ipv4Addr::LOCALHOST)
//!     .interrupt(interrupt)
//!     .build()?
//!     .run()?;
//! # Ok(())
//! # }
//! ```
//!
//! # See Also
//!
//! - [`Builder`] - Build a [`Pinger`].
//! - [`Pinger::run`] - Run the session on the current thread.
//! - [`Pinger::run_with`] - Run the session with a custom event handler.
#![deny(unsafe_code)]

mod builder;
mod config;
mod constants;
mod error;
mod interrupt;
mod net;
mod pinger;
mod probe;
mod scheduler;
mod session;
mod types;

pub use builder::Builder;
pub use config::defaults;
pub use constants::{MAX_PAYLOAD_SIZE, MIN_INTERVAL};
pub use error::{Error, IoError};
pub use interrupt::Interrupt;
pub use pinger::Pinger;
pub use probe::{IcmpCode, IcmpError, Probe};
pub use scheduler::{CompletionReason, Outcome, PingEvent, Reply};
pub use session::{RoundTrip, Statistics};
pub use types::{
    Identifier, MaxCount, PayloadPattern, PayloadSize, Sequence, TimeToLive,
};
