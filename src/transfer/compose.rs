//! Output composition and the generation session.
//!
//! A generation validates the request, maps UIDs, asks for confirmation when
//! the mapping is partial, and only then builds the output. Any failure
//! leaves nothing behind.

use log::{info, warn};

use crate::error::{Result, TransferError};
use crate::snapshot::Snapshot;
use crate::transfer::graft::{graft_routing, GraftSummary, Routing};
use crate::transfer::selector::{select_devices, Selection, SelectionMode};
use crate::transfer::uid_map::{map_uids, PartialMapping, UidMapping};

/// Decides whether to go ahead when some devices keep their source UID.
pub trait ConfirmPartial {
    fn confirm(&mut self, warning: &PartialMapping) -> bool;
}

impl<F> ConfirmPartial for F
where
    F: FnMut(&PartialMapping) -> bool,
{
    fn confirm(&mut self, warning: &PartialMapping) -> bool {
        self(warning)
    }
}

/// What to transfer.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub mode: SelectionMode,
    /// Checked flags by source device index.
    pub checked: Vec<bool>,
}

impl GenerationRequest {
    pub fn all() -> Self {
        Self {
            mode: SelectionMode::TransferAll,
            checked: Vec::new(),
        }
    }

    pub fn selected(checked: Vec<bool>) -> Self {
        Self {
            mode: SelectionMode::TransferSelected,
            checked,
        }
    }
}

/// A produced output and how it came about.
#[derive(Debug, Clone)]
pub struct Generation {
    pub snapshot: Snapshot,
    pub mapping: UidMapping,
    pub graft: GraftSummary,
}

impl Generation {
    /// One-line description of the transfer.
    pub fn summary(&self) -> String {
        format!(
            "Transferred {} device(s), {} UIDs mapped",
            self.snapshot.paired_devices.len(),
            self.mapping.changed_count()
        )
    }
}

/// Loaded source and target snapshots, read-only for every generation.
#[derive(Debug, Clone)]
pub struct TransferSession {
    source: Snapshot,
    target: Snapshot,
}

impl TransferSession {
    pub fn new(source: Snapshot, target: Snapshot) -> Self {
        Self { source, target }
    }

    pub fn source(&self) -> &Snapshot {
        &self.source
    }

    pub fn target(&self) -> &Snapshot {
        &self.target
    }

    /// Run one generation.
    ///
    /// # Errors
    /// - `EmptySelection` if the request selects nothing
    /// - `NoTargetDevices` if the target has no paired devices
    /// - `PartialMappingDeclined` if `confirm` rejects a partial mapping
    pub fn generate(
        &self,
        request: &GenerationRequest,
        confirm: &mut dyn ConfirmPartial,
    ) -> Result<Generation> {
        let selection = select_devices(request.mode, &self.source.paired_devices, &request.checked)?;

        if self.target.paired_devices.is_empty() {
            return Err(TransferError::NoTargetDevices);
        }

        let mapping = map_uids(
            &self.source.paired_devices,
            &self.target.paired_devices,
            &selection,
        );
        info!(
            "Selected {} device(s), {} mapped to target slots",
            selection.len(),
            mapping.mapped_count()
        );

        if let Some(warning) = mapping.partial(selection.len()) {
            warn!("{}", warning);
            if !confirm.confirm(&warning) {
                return Err(TransferError::PartialMappingDeclined {
                    mapped: warning.mapped,
                    selected: warning.selected,
                });
            }
        }

        let (snapshot, graft) = compose_output(&self.source, &self.target, &selection, &mapping);
        info!(
            "Grafted routing: {} link(s) added, {} input(s) and {} output(s) touched",
            graft.links_added,
            graft.inputs_merged + graft.inputs_added,
            graft.outputs_merged + graft.outputs_added
        );

        Ok(Generation {
            snapshot,
            mapping,
            graft,
        })
    }
}

/// Build the output snapshot.
///
/// Starts from a clone of `target`, replaces the paired devices with the
/// selected source devices carrying their mapped UIDs, and grafts the
/// routing they reference onto the target's routing.
pub fn compose_output(
    source: &Snapshot,
    target: &Snapshot,
    selection: &Selection<'_>,
    mapping: &UidMapping,
) -> (Snapshot, GraftSummary) {
    let mut output = target.clone();

    output.paired_devices = selection
        .iter()
        .map(|(index, device)| {
            let mut device = device.clone();
            if let Some(uid) = mapping.effective_for_index(index) {
                device.mt_uid = uid.clone();
            }
            device
        })
        .collect();

    let (routing, graft) = graft_routing(source, selection.devices(), &Routing::of(target));
    routing.install(&mut output);

    (output, graft)
}
