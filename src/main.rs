//! goodfirst - first contributions vs. good first issues
//!
//! Mines the first commit of every contributor to a repository and
//! cross-references those contributors with the assignees of issues
//! carrying an entry-level label.

use anyhow::Result;
use clap::Parser;
use goodfirst::cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // RUST_LOG wins over --log-level; logs go to stderr so stdout stays clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level)))
        .init();

    cli::run(cli)
}
