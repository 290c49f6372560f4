#![warn(missing_docs)]

//! Entry point for the `storefront` binary.

mod check;
mod cli;
mod error;
mod host;
mod render;
mod simulate;

use std::process;

use clap::Parser;
use storefront_engine::available_icons;
use tokio::runtime;
use tracing::error;

use crate::{
    cli::{Cli, Commands},
    error::Result,
};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, and dispatch to the chosen subcommand.
fn run() -> Result<()> {
    let Cli { log, command } = Cli::parse();
    logging::init(&log.spec());

    match command {
        Commands::Render(args) => render::run(&args),
        Commands::Check(args) => check::run(&args),
        Commands::Icons => {
            for name in available_icons() {
                println!("{name}");
            }
            Ok(())
        }
        Commands::Simulate(args) => {
            let rt = runtime::Builder::new_current_thread().enable_time().build()?;
            rt.block_on(simulate::run(&args))
        }
    }
}
