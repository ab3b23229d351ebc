//! Routing graft.
//!
//! Carries the part of the source routing graph that the selected devices
//! reach over to the output. Target routing is never dropped: links are only
//! appended, inputs and outputs are merged by ID.

use std::collections::{BTreeSet, HashMap};
use std::hash::Hash;

use log::debug;

use crate::snapshot::{
    present_link, AudioInput, AudioLink, AudioOutput, AudiolinkId, Device, InputId, LinkRef,
    OutputId, Snapshot,
};

/// Routing collections of a snapshot.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Routing {
    pub audiolinks: Vec<AudioLink>,
    pub audio_inputs: Vec<AudioInput>,
    pub audio_outputs: Vec<AudioOutput>,
}

impl Routing {
    /// Clone the routing collections out of a snapshot.
    pub fn of(snapshot: &Snapshot) -> Self {
        Self {
            audiolinks: snapshot.audiolinks.clone(),
            audio_inputs: snapshot.audio_inputs.clone(),
            audio_outputs: snapshot.audio_outputs.clone(),
        }
    }

    /// Replace the routing collections of `snapshot` with these.
    pub fn install(self, snapshot: &mut Snapshot) {
        snapshot.audiolinks = self.audiolinks;
        snapshot.audio_inputs = self.audio_inputs;
        snapshot.audio_outputs = self.audio_outputs;
    }
}

/// What a graft changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraftSummary {
    pub used_links: usize,
    pub links_added: usize,
    pub inputs_merged: usize,
    pub inputs_added: usize,
    pub outputs_merged: usize,
    pub outputs_added: usize,
}

/// Routing entries merged by ID and filtered by the link they reference.
pub trait RoutingEntry: Clone {
    type Id: Copy + Eq + Hash;

    fn id(&self) -> Self::Id;

    /// The link reference used to decide whether the entry is carried over.
    fn link_ref(&self) -> LinkRef;

    /// Overwrite every field `other` defines, `null` included; leave the
    /// rest alone.
    fn merge_from(&mut self, other: &Self);
}

impl RoutingEntry for AudioInput {
    type Id = InputId;

    fn id(&self) -> InputId {
        self.input_id
    }

    fn link_ref(&self) -> LinkRef {
        self.iem_audiolink_id
    }

    fn merge_from(&mut self, other: &Self) {
        if other.iem_audiolink_id.is_some() {
            self.iem_audiolink_id = other.iem_audiolink_id;
        }
        for (key, value) in &other.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

impl RoutingEntry for AudioOutput {
    type Id = OutputId;

    fn id(&self) -> OutputId {
        self.output_id
    }

    fn link_ref(&self) -> LinkRef {
        self.mic_audiolink_id
    }

    fn merge_from(&mut self, other: &Self) {
        if other.mic_audiolink_id.is_some() {
            self.mic_audiolink_id = other.mic_audiolink_id;
        }
        for (key, value) in &other.extra {
            self.extra.insert(key.clone(), value.clone());
        }
    }
}

/// Every present link reference across the given devices.
pub fn used_audiolink_ids<'a>(devices: impl IntoIterator<Item = &'a Device>) -> BTreeSet<AudiolinkId> {
    devices
        .into_iter()
        .flat_map(|device| device.audiolink_refs())
        .collect()
}

/// Graft the routing reachable from `selected` onto `base`.
///
/// `selected` must be the un-remapped source devices: link references are
/// source-side IDs. `base` is the routing the output starts from, normally
/// the target's.
pub fn graft_routing<'a>(
    source: &Snapshot,
    selected: impl IntoIterator<Item = &'a Device>,
    base: &Routing,
) -> (Routing, GraftSummary) {
    let used = used_audiolink_ids(selected);

    let (audiolinks, links_added) = append_links(&base.audiolinks, &source.audiolinks, &used);
    let (audio_inputs, inputs_merged, inputs_added) =
        merge_by_id(&base.audio_inputs, &source.audio_inputs, &used);
    let (audio_outputs, outputs_merged, outputs_added) =
        merge_by_id(&base.audio_outputs, &source.audio_outputs, &used);

    let summary = GraftSummary {
        used_links: used.len(),
        links_added,
        inputs_merged,
        inputs_added,
        outputs_merged,
        outputs_added,
    };
    debug!("Routing graft over links {:?}: {:?}", used, summary);

    (
        Routing {
            audiolinks,
            audio_inputs,
            audio_outputs,
        },
        summary,
    )
}

/// Append the used source links the base does not have yet.
fn append_links(
    base: &[AudioLink],
    source: &[AudioLink],
    used: &BTreeSet<AudiolinkId>,
) -> (Vec<AudioLink>, usize) {
    let mut links = base.to_vec();
    let mut known: BTreeSet<AudiolinkId> = links.iter().map(|l| l.audiolink_id).collect();
    let mut added = 0;

    for link in source {
        if used.contains(&link.audiolink_id) && known.insert(link.audiolink_id) {
            links.push(link.clone());
            added += 1;
        }
    }

    (links, added)
}

/// Merge used source entries into the base table keyed by ID.
///
/// Base entries keep their positions; new entries follow in source order.
fn merge_by_id<T: RoutingEntry>(
    base: &[T],
    source: &[T],
    used: &BTreeSet<AudiolinkId>,
) -> (Vec<T>, usize, usize) {
    let mut table: Vec<T> = Vec::with_capacity(base.len());
    let mut slots: HashMap<T::Id, usize> = HashMap::new();

    for entry in base {
        match slots.get(&entry.id()) {
            // Duplicate base ID: the later entry wins, in the first slot.
            Some(&slot) => table[slot] = entry.clone(),
            None => {
                slots.insert(entry.id(), table.len());
                table.push(entry.clone());
            }
        }
    }

    let mut merged = 0;
    let mut added = 0;
    for entry in source {
        let Some(link) = present_link(entry.link_ref()) else {
            continue;
        };
        if !used.contains(&link) {
            continue;
        }
        match slots.get(&entry.id()) {
            Some(&slot) => {
                table[slot].merge_from(entry);
                merged += 1;
            }
            None => {
                slots.insert(entry.id(), table.len());
                table.push(entry.clone());
                added += 1;
            }
        }
    }

    (table, merged, added)
}
