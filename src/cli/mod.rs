//! CLI Module
//!
//! Command-line interface for transferring base station settings.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::transfer::SelectionMode;

/// Spectera base station settings transfer
#[derive(Parser, Debug)]
#[command(name = "spectera-transfer")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show what a configuration export contains
    #[command(name = "inspect")]
    Inspect {
        /// Path to the export
        path: PathBuf,
    },

    /// List the paired devices of a source export
    #[command(name = "devices")]
    Devices {
        /// Path to the source export
        path: PathBuf,
    },

    /// Transfer devices and routing from a source export into a target export
    #[command(name = "transfer")]
    Transfer(TransferArgs),
}

#[derive(clap::Args, Debug, Clone)]
pub struct TransferArgs {
    /// Export of the original base station
    #[arg(short, long)]
    pub source: PathBuf,

    /// Export of the destination base station with re-paired devices
    #[arg(short, long)]
    pub target: PathBuf,

    /// Which source devices to transfer
    #[arg(short, long, value_enum, default_value_t = SelectionMode::TransferSelected)]
    pub mode: SelectionMode,

    /// Source device index to transfer (repeatable)
    #[arg(short = 'd', long = "device")]
    pub devices: Vec<usize>,

    /// Source device UID to transfer (repeatable)
    #[arg(short = 'u', long = "uid")]
    pub uids: Vec<String>,

    /// Output file (defaults to a timestamped file next to the source)
    #[arg(short, long, conflicts_with = "output_dir")]
    pub output: Option<PathBuf>,

    /// Directory for the timestamped output file
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Write single-line JSON as the base station exports it
    #[arg(long)]
    pub compact: bool,

    /// Continue without asking when some devices cannot be mapped
    #[arg(short, long)]
    pub yes: bool,

    /// Print the output instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}
