//! Positional UID mapping.
//!
//! The device list index stands for a physical channel slot: the selected
//! source device in slot `i` takes over the UID of the target device in slot
//! `i`. Slots the target does not have keep the source UID.

use std::fmt;

use crate::snapshot::{Device, Uid};
use crate::transfer::selector::Selection;

/// One selected source device and the UID it will carry in the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UidMapEntry {
    pub source_index: usize,
    pub source_uid: Uid,
    pub effective_uid: Uid,
    /// Whether a target slot existed for this device.
    pub positional: bool,
}

/// Source → effective UID mapping for a selection.
#[derive(Debug, Clone, Default)]
pub struct UidMapping {
    entries: Vec<UidMapEntry>,
}

/// Not every selected device found a target slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartialMapping {
    pub mapped: usize,
    pub selected: usize,
}

impl fmt::Display for PartialMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Only {} of {} devices could be mapped to target UIDs. \
             The remaining devices will keep their original UIDs.",
            self.mapped, self.selected
        )
    }
}

impl UidMapping {
    pub fn entries(&self) -> &[UidMapEntry] {
        &self.entries
    }

    /// Effective UID for a source UID.
    pub fn get(&self, source_uid: &Uid) -> Option<&Uid> {
        self.entries
            .iter()
            .find(|e| &e.source_uid == source_uid)
            .map(|e| &e.effective_uid)
    }

    /// Effective UID for the device at a source index.
    pub fn effective_for_index(&self, source_index: usize) -> Option<&Uid> {
        self.entries
            .iter()
            .find(|e| e.source_index == source_index)
            .map(|e| &e.effective_uid)
    }

    /// Devices that received a target slot.
    pub fn mapped_count(&self) -> usize {
        self.entries.iter().filter(|e| e.positional).count()
    }

    /// Devices whose UID actually changes.
    pub fn changed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.source_uid != e.effective_uid)
            .count()
    }

    /// The warning to raise when fewer than `selected` devices were mapped.
    pub fn partial(&self, selected: usize) -> Option<PartialMapping> {
        let mapped = self.mapped_count();
        (mapped < selected).then_some(PartialMapping { mapped, selected })
    }
}

/// Map each selected source device onto the target slot at the same index.
pub fn map_uids(source: &[Device], target: &[Device], selection: &Selection<'_>) -> UidMapping {
    let entries = source
        .iter()
        .enumerate()
        .filter(|(i, _)| selection.contains_index(*i))
        .map(|(i, device)| match target.get(i) {
            Some(slot) => UidMapEntry {
                source_index: i,
                source_uid: device.mt_uid.clone(),
                effective_uid: slot.mt_uid.clone(),
                positional: true,
            },
            None => UidMapEntry {
                source_index: i,
                source_uid: device.mt_uid.clone(),
                effective_uid: device.mt_uid.clone(),
                positional: false,
            },
        })
        .collect();

    UidMapping { entries }
}
