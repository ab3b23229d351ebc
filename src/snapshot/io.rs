//! Snapshot loading and saving.
//!
//! Reads base station exports from disk and writes generated setups back out
//! under a timestamped filename.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, TransferError};
use crate::snapshot::model::Snapshot;

/// Prefix for generated setup files.
pub const OUTPUT_PREFIX: &str = "Spectera_Setup_";

/// Extension for generated setup files.
pub const OUTPUT_EXTENSION: &str = ".json";

/// Which side of the transfer a snapshot plays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotRole {
    Source,
    Target,
    /// Loaded on its own, outside a transfer.
    Export,
}

impl fmt::Display for SnapshotRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SnapshotRole::Source => write!(f, "source"),
            SnapshotRole::Target => write!(f, "target"),
            SnapshotRole::Export => write!(f, "export"),
        }
    }
}

/// How the output document is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Indented, for reviewing diffs.
    #[default]
    Pretty,
    /// Single line, as the base station exports it.
    Compact,
}

/// A setup file written to disk.
#[derive(Debug, Clone)]
pub struct SavedOutput {
    pub path: PathBuf,
    pub bytes_written: usize,
    /// Hex SHA-256 of the written bytes.
    pub sha256: String,
}

impl Snapshot {
    /// Parse a snapshot from raw JSON bytes.
    pub fn from_json_bytes(bytes: &[u8], role: SnapshotRole) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| TransferError::LoadParse {
            role,
            message: e.to_string(),
        })
    }

    /// Load a snapshot from a file on disk.
    pub fn load(path: &Path, role: SnapshotRole) -> Result<Self> {
        if !path.exists() {
            return Err(TransferError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let bytes = fs::read(path).map_err(|e| TransferError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        let snapshot = Self::from_json_bytes(&bytes, role)?;
        info!(
            "Loaded {} file {}: {} devices found",
            role,
            path.display(),
            snapshot.device_count()
        );
        Ok(snapshot)
    }

    /// Serialize the snapshot in the requested layout.
    pub fn to_json(&self, format: OutputFormat) -> Result<String> {
        let text = match format {
            OutputFormat::Pretty => serde_json::to_string_pretty(self)?,
            OutputFormat::Compact => serde_json::to_string(self)?,
        };
        Ok(text)
    }
}

/// Filename for a setup generated at `at`.
pub fn output_filename(at: DateTime<Local>) -> String {
    format!(
        "{}{}{}",
        OUTPUT_PREFIX,
        at.format("%Y-%m-%d_%H-%M-%S"),
        OUTPUT_EXTENSION
    )
}

/// Directory a setup is saved to when none is given: next to the source file.
pub fn default_output_dir(source_path: &Path) -> PathBuf {
    match source_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Write a snapshot to `path`.
pub fn save_snapshot(snapshot: &Snapshot, path: &Path, format: OutputFormat) -> Result<SavedOutput> {
    let content = snapshot.to_json(format)?;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| TransferError::FileWrite {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    fs::write(path, &content).map_err(|e| TransferError::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    let sha256 = format!("{:x}", Sha256::digest(content.as_bytes()));
    debug!("Wrote {} bytes to {} (sha256 {})", content.len(), path.display(), sha256);

    Ok(SavedOutput {
        path: path.to_path_buf(),
        bytes_written: content.len(),
        sha256,
    })
}
