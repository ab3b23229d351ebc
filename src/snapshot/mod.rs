//! Snapshot Module
//!
//! Base station configuration exports: the schema shared by source, target
//! and output, and the file I/O around it.

pub mod io;
pub mod model;

pub use io::{
    default_output_dir, output_filename, save_snapshot, OutputFormat, SavedOutput, SnapshotRole,
};
pub use model::{
    present_link, AudioInput, AudioLink, AudioOutput, AudiolinkId, Device, InputId, LinkRef, OutputId,
    Snapshot, Uid,
};
