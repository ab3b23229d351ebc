//! Spectera Transfer - Base Station Settings Transfer
//!
//! Moves wireless device pairings and their audio routing from one base
//! station configuration export (the source) into another (the target).
//!
//! # Architecture
//!
//! - Snapshot: the export schema plus loading and saving
//! - Transfer: device selection, positional UID mapping, routing graft and
//!   output composition
//! - CLI: inspect exports, list devices, run a transfer

pub mod cli;
pub mod error;
pub mod snapshot;
pub mod transfer;

pub use error::{Result, TransferError};
pub use snapshot::{Device, Snapshot, SnapshotRole, Uid};
pub use transfer::{Generation, GenerationRequest, SelectionMode, TransferSession};
