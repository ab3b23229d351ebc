//! Device selection.
//!
//! Turns a selection mode plus per-device checked flags into the ordered
//! subset of source devices to transfer.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TransferError};
use crate::snapshot::{Device, Uid};

/// Which source devices a transfer covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SelectionMode {
    /// Every source device, regardless of flags.
    #[value(name = "transfer_all")]
    TransferAll,
    /// Only the devices flagged as checked.
    #[default]
    #[value(name = "transfer_selected")]
    TransferSelected,
}

/// Selected source devices in source order.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    entries: Vec<(usize, &'a Device)>,
}

impl<'a> Selection<'a> {
    /// Source indices of the selected devices.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.entries.iter().map(|(i, _)| *i)
    }

    /// Selected devices, un-remapped.
    pub fn devices(&self) -> impl Iterator<Item = &'a Device> + '_ {
        self.entries.iter().map(|(_, d)| *d)
    }

    /// `(source index, device)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &'a Device)> + '_ {
        self.entries.iter().copied()
    }

    pub fn contains_index(&self, index: usize) -> bool {
        // Entries are sorted by index.
        self.entries.binary_search_by_key(&index, |(i, _)| *i).is_ok()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Select source devices for transfer.
///
/// `checked[i]` flags the device at source index `i`; missing flags count as
/// unchecked. `TransferAll` ignores the flags entirely.
///
/// # Errors
/// Returns `TransferError::EmptySelection` if nothing ends up selected.
pub fn select_devices<'a>(
    mode: SelectionMode,
    devices: &'a [Device],
    checked: &[bool],
) -> Result<Selection<'a>> {
    let entries: Vec<(usize, &Device)> = match mode {
        SelectionMode::TransferAll => devices.iter().enumerate().collect(),
        SelectionMode::TransferSelected => devices
            .iter()
            .enumerate()
            .filter(|(i, _)| checked.get(*i).copied().unwrap_or(false))
            .collect(),
    };

    if entries.is_empty() {
        return Err(TransferError::EmptySelection);
    }

    Ok(Selection { entries })
}

/// Checked flags for the given source indices.
pub fn flags_from_indices(device_count: usize, indices: &[usize]) -> Result<Vec<bool>> {
    let mut flags = vec![false; device_count];
    for &index in indices {
        let flag = flags
            .get_mut(index)
            .ok_or(TransferError::DeviceIndexOutOfRange {
                index,
                len: device_count,
            })?;
        *flag = true;
    }
    Ok(flags)
}

/// Checked flags for the source devices carrying the given UIDs.
pub fn flags_from_uids(devices: &[Device], uids: &[Uid]) -> Result<Vec<bool>> {
    let mut flags = vec![false; devices.len()];
    for uid in uids {
        let index = devices
            .iter()
            .position(|d| &d.mt_uid == uid)
            .ok_or_else(|| TransferError::UnknownDeviceUid {
                uid: uid.to_string(),
            })?;
        flags[index] = true;
    }
    Ok(flags)
}
