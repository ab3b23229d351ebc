//! Error handling for Spectera Transfer
//!
//! Every failure carries an error code and, where one exists, a remediation
//! the operator can follow.

use std::path::PathBuf;

use thiserror::Error;

use crate::snapshot::SnapshotRole;

/// Result type alias for transfer operations
pub type Result<T> = std::result::Result<T, TransferError>;

/// Main error type for transfer operations
#[derive(Error, Debug)]
pub enum TransferError {
    // File Errors
    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Failed to read file: {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}: {source}")]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to load {role} file: {message}")]
    LoadParse { role: SnapshotRole, message: String },

    // Generation Errors
    #[error("No devices selected for transfer")]
    EmptySelection,

    #[error("The target file has no paired devices")]
    NoTargetDevices,

    #[error("Transfer aborted: only {mapped} of {selected} devices could be mapped to target UIDs")]
    PartialMappingDeclined { mapped: usize, selected: usize },

    // Selection Errors
    #[error("Device index {index} out of range (source has {len} devices)")]
    DeviceIndexOutOfRange { index: usize, len: usize },

    #[error("No source device with UID {uid}")]
    UnknownDeviceUid { uid: String },

    // Serialization Errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TransferError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            TransferError::FileNotFound { .. } => "FILE_NOT_FOUND",
            TransferError::FileRead { .. } => "FILE_READ_ERROR",
            TransferError::FileWrite { .. } => "FILE_WRITE_ERROR",
            TransferError::LoadParse { .. } => "LOAD_PARSE_ERROR",
            TransferError::EmptySelection => "EMPTY_SELECTION",
            TransferError::NoTargetDevices => "NO_TARGET_DEVICES",
            TransferError::PartialMappingDeclined { .. } => "PARTIAL_MAPPING_DECLINED",
            TransferError::DeviceIndexOutOfRange { .. } => "DEVICE_INDEX_OUT_OF_RANGE",
            TransferError::UnknownDeviceUid { .. } => "UNKNOWN_DEVICE_UID",
            TransferError::Serialization(_) => "SERIALIZATION_ERROR",
            TransferError::Io(_) => "IO_ERROR",
        }
    }

    /// Check if the operator can fix the input and run again
    pub fn is_recoverable(&self) -> bool {
        !matches!(
            self,
            TransferError::Serialization(_) | TransferError::Io(_)
        )
    }

    /// Get recovery suggestions for this error
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            TransferError::FileNotFound { .. } => vec![
                "Check the file path is correct",
                "Verify the file hasn't been moved or deleted",
            ],
            TransferError::LoadParse { .. } => vec![
                "Make sure the file is a configuration exported from the base station",
                "Re-export the configuration if the file was edited by hand",
            ],
            TransferError::EmptySelection => vec![
                "Select at least one device with --device or --uid",
                "Use --mode transfer_all to transfer every source device",
            ],
            TransferError::NoTargetDevices => vec![
                "1. Pair your devices to the destination base station",
                "2. Save that configuration file (this becomes your target file)",
                "3. Use this tool to transfer settings from the original base station",
                "4. Load the output file into the destination base station",
            ],
            TransferError::PartialMappingDeclined { .. } => vec![
                "Pair more devices on the destination base station and export again",
                "Select fewer devices, or pass --yes to keep the original UIDs",
            ],
            TransferError::DeviceIndexOutOfRange { .. } | TransferError::UnknownDeviceUid { .. } => {
                vec!["Run 'spectera-transfer devices <source>' to list the source devices"]
            }
            _ => vec![],
        }
    }
}
