//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use chrono::Local;
use log::{info, warn};

use crate::cli::TransferArgs;
use crate::error::Result;
use crate::snapshot::{
    default_output_dir, output_filename, present_link, save_snapshot, LinkRef, OutputFormat,
    Snapshot, SnapshotRole, Uid,
};
use crate::transfer::{
    flags_from_indices, flags_from_uids, ConfirmPartial, GenerationRequest, PartialMapping,
    SelectionMode, TransferSession,
};

/// Asks on the terminal whether to continue with a partial mapping.
pub struct TerminalConfirm {
    /// Answer yes without asking.
    pub assume_yes: bool,
}

impl ConfirmPartial for TerminalConfirm {
    fn confirm(&mut self, warning: &PartialMapping) -> bool {
        if self.assume_yes {
            info!("Continuing with partial mapping (--yes)");
            return true;
        }

        println!("{}", warning);
        print!("Continue anyway? [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }

        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                warn!("Could not read confirmation: {}", e);
                false
            }
        }
    }
}

/// Print a summary of an export.
pub fn inspect(path: &Path) -> Result<()> {
    let snapshot = Snapshot::load(path, SnapshotRole::Export)?;

    println!("File: {}", path.display());
    println!("Number of Portable devices available: {}", snapshot.device_count());
    println!("Audio links: {}", snapshot.audiolinks.len());
    println!("Audio inputs: {}", snapshot.audio_inputs.len());
    println!("Audio outputs: {}", snapshot.audio_outputs.len());
    if !snapshot.extra.is_empty() {
        let keys: Vec<&str> = snapshot.extra.keys().map(String::as_str).collect();
        println!("Other sections: {}", keys.join(", "));
    }

    Ok(())
}

/// List the paired devices of a source export.
pub fn list_devices(path: &Path) -> Result<()> {
    let snapshot = Snapshot::load(path, SnapshotRole::Source)?;

    if snapshot.paired_devices.is_empty() {
        println!("No devices found in source file");
        return Ok(());
    }

    for (index, device) in snapshot.paired_devices.iter().enumerate() {
        println!(
            "[{}] {} (UID: {})  iem: {}  mic: {}",
            index,
            device.display_name(),
            device.mt_uid,
            link_label(device.iem_audiolink_id),
            link_label(device.mic_audiolink_id)
        );
    }

    Ok(())
}

fn link_label(link: LinkRef) -> String {
    match present_link(link) {
        Some(id) => id.to_string(),
        None => "-".to_string(),
    }
}

/// Transfer devices and routing from the source export into the target export.
pub fn transfer(args: &TransferArgs) -> Result<()> {
    let source = Snapshot::load(&args.source, SnapshotRole::Source)?;
    let target = Snapshot::load(&args.target, SnapshotRole::Target)?;

    let request = build_request(args, &source)?;
    let session = TransferSession::new(source, target);

    let mut confirm = TerminalConfirm {
        assume_yes: args.yes,
    };
    let generation = session.generate(&request, &mut confirm)?;

    let format = if args.compact {
        OutputFormat::Compact
    } else {
        OutputFormat::Pretty
    };

    if args.dry_run {
        println!("{}", generation.snapshot.to_json(format)?);
        eprintln!("{} (dry run, nothing written)", generation.summary());
        return Ok(());
    }

    let path = output_path(args);
    let saved = save_snapshot(&generation.snapshot, &path, format)?;
    info!("Successfully saved: {}", saved.path.display());

    println!("Output file saved: {}", saved.path.display());
    println!("Operation: {}", generation.summary());
    println!("Devices: {}", generation.snapshot.paired_devices.len());
    println!("SHA-256: {}", saved.sha256);

    Ok(())
}

fn build_request(args: &TransferArgs, source: &Snapshot) -> Result<GenerationRequest> {
    match args.mode {
        SelectionMode::TransferAll => Ok(GenerationRequest::all()),
        SelectionMode::TransferSelected => {
            let mut checked = flags_from_indices(source.device_count(), &args.devices)?;
            let uids: Vec<Uid> = args.uids.iter().map(|u| Uid::from(u.as_str())).collect();
            let by_uid = flags_from_uids(&source.paired_devices, &uids)?;
            for (flag, extra) in checked.iter_mut().zip(by_uid) {
                *flag |= extra;
            }
            Ok(GenerationRequest::selected(checked))
        }
    }
}

fn output_path(args: &TransferArgs) -> PathBuf {
    if let Some(path) = &args.output {
        return path.clone();
    }
    let dir = args
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(&args.source));
    dir.join(output_filename(Local::now()))
}
