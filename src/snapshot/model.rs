//! Base station snapshot schema.
//!
//! Field names follow the base station's export format. Anything the schema
//! does not name is kept in `extra` and written back unchanged, in document
//! order. Named fields are always written first, ahead of `extra`.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Audio link identifier.
pub type AudiolinkId = i64;

/// Audio input identifier.
pub type InputId = i64;

/// Audio output identifier.
pub type OutputId = i64;

/// A link reference as written in the export.
///
/// `None` when the key is missing, `Some(None)` for an explicit `null`. Both
/// are written back the way they were read.
pub type LinkRef = Option<Option<AudiolinkId>>;

/// Returns the link reference if it is present.
///
/// A reference is present when it is defined and non-negative; the base
/// station writes `-1` for an unrouted device.
pub fn present_link(link: LinkRef) -> Option<AudiolinkId> {
    link.flatten().filter(|id| *id >= 0)
}

/// Keeps an explicit `null` apart from a missing key.
mod nullable {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

/// Device identifier as exported by the base station.
///
/// Any JSON number or string; compared by value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Uid {
    Number(Number),
    Text(String),
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Uid::Number(n) => write!(f, "{}", n),
            Uid::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<u64> for Uid {
    fn from(value: u64) -> Self {
        Uid::Number(value.into())
    }
}

impl From<i64> for Uid {
    fn from(value: i64) -> Self {
        Uid::Number(value.into())
    }
}

impl From<&str> for Uid {
    fn from(value: &str) -> Self {
        // CLI input: "1001" means the numeric UID 1001.
        match value.parse::<Number>() {
            Ok(n) => Uid::Number(n),
            Err(_) => Uid::Text(value.to_string()),
        }
    }
}

/// A wireless device paired to the base station.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub mt_uid: Uid,

    /// Link feeding the in-ear monitor.
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub iem_audiolink_id: LinkRef,

    /// Link carrying the microphone signal.
    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub mic_audiolink_id: LinkRef,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Device {
    pub fn new(mt_uid: impl Into<Uid>) -> Self {
        Self {
            mt_uid: mt_uid.into(),
            iem_audiolink_id: None,
            mic_audiolink_id: None,
            extra: Map::new(),
        }
    }

    /// Present link references of this device, IEM first.
    pub fn audiolink_refs(&self) -> impl Iterator<Item = AudiolinkId> {
        [self.iem_audiolink_id, self.mic_audiolink_id]
            .into_iter()
            .filter_map(present_link)
    }

    /// Name for display, `Unnamed` when the export has none.
    pub fn display_name(&self) -> &str {
        self.extra
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or("Unnamed")
    }
}

/// A routing channel between a microphone path and an IEM path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioLink {
    pub audiolink_id: AudiolinkId,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An audio input feeding an IEM link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioInput {
    pub input_id: InputId,

    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub iem_audiolink_id: LinkRef,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// An audio output fed by a microphone link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioOutput {
    pub output_id: OutputId,

    #[serde(
        default,
        deserialize_with = "nullable::deserialize",
        skip_serializing_if = "Option::is_none"
    )]
    pub mic_audiolink_id: LinkRef,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A full configuration export of a base station.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub paired_devices: Vec<Device>,

    #[serde(default)]
    pub audiolinks: Vec<AudioLink>,

    #[serde(default)]
    pub audio_inputs: Vec<AudioInput>,

    #[serde(default)]
    pub audio_outputs: Vec<AudioOutput>,

    /// Top-level fields outside the transfer's scope, preserved verbatim.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Snapshot {
    /// Number of paired devices.
    pub fn device_count(&self) -> usize {
        self.paired_devices.len()
    }
}
