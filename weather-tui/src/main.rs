//! Binary crate for the `weather` terminal screen.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Terminal rendering of the screen and its event loop

use clap::Parser;

mod app;
mod cli;
mod logging;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cmd = cli::Cli::parse();
    cmd.run().await
}
