//! Transfer Module
//!
//! Moves selected devices and the routing they depend on from a source
//! snapshot into a target snapshot:
//! - `selector`: which source devices take part
//! - `uid_map`: which UID each of them carries in the output
//! - `graft`: which links, inputs and outputs come along
//! - `compose`: the output snapshot and the generation session

pub mod compose;
pub mod graft;
pub mod selector;
pub mod uid_map;

pub use compose::{compose_output, ConfirmPartial, Generation, GenerationRequest, TransferSession};
pub use graft::{graft_routing, used_audiolink_ids, GraftSummary, Routing};
pub use selector::{flags_from_indices, flags_from_uids, select_devices, Selection, SelectionMode};
pub use uid_map::{map_uids, PartialMapping, UidMapEntry, UidMapping};
