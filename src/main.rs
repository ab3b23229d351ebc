//! Spectera Transfer CLI
//!
//! Command-line interface for transferring base station settings.

use anyhow::Context;
use clap::Parser;
use env_logger::Env;
use log::debug;

use spectera_transfer::cli::{commands, Cli, Commands};
use spectera_transfer::TransferError;

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    debug!("Spectera Transfer v{}", env!("CARGO_PKG_VERSION"));

    if let Err(err) = run(cli.command) {
        eprintln!("error: {:#}", err);
        for hint in error_hints(&err) {
            eprintln!("  {}", hint);
        }
        std::process::exit(1);
    }
}

fn run(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Inspect { path } => commands::inspect(&path)
            .with_context(|| format!("inspecting {}", path.display()))?,
        Commands::Devices { path } => commands::list_devices(&path)
            .with_context(|| format!("listing devices of {}", path.display()))?,
        Commands::Transfer(args) => commands::transfer(&args).context("transfer failed")?,
    }
    Ok(())
}

/// What to tell the operator after a failed command.
fn error_hints(err: &anyhow::Error) -> Vec<&'static str> {
    match err.downcast_ref::<TransferError>() {
        Some(transfer_err) if transfer_err.is_recoverable() => transfer_err.recovery_suggestions(),
        _ => vec!["Run again with --verbose and report the log if the problem persists"],
    }
}
