#![forbid(unsafe_code)]

use clap::Parser;
use config::{Args, PingerConfig, UsageError};
use std::process::{self, ExitCode};

mod app;
mod config;
mod report;

/// The exit status used for usage errors.
const USAGE_EXIT_STATUS: u8 = 2;

fn main() -> ExitCode {
    let args = Args::parse();
    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            println!("pinger: {err:#}");
            if err.downcast_ref::<UsageError>().is_some() {
                ExitCode::from(USAGE_EXIT_STATUS)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    let cfg = PingerConfig::from(args)?;
    let pid = u16::try_from(process::id() % u32::from(u16::MAX))?;
    app::run_pinger(&cfg, pid)
}
