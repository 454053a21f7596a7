// ── Device records ──
//
// A device record bundles default trigger parameters (host/port/protocol)
// shared by every button that references its deviceID.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::model::button::de_port;

/// Named bundle of default trigger parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_field_names)] // field names mirror the document format
pub struct DeviceRecord {
    #[serde(rename = "deviceID")]
    pub device_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "de_port")]
    pub port: Option<u16>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DeviceDocument {
    devices: Vec<DeviceRecord>,
}

/// Flat device list, keyed by `deviceID`.
///
/// Duplicate ids resolve last-wins; buttons referencing an id that is not
/// present get no device-level fields at resolution time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceList {
    records: HashMap<String, DeviceRecord>,
}

impl DeviceList {
    /// Parse a device document. Valid iff it deserializes to an object
    /// with a top-level `devices` array.
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        let doc: DeviceDocument =
            serde_json::from_str(raw).map_err(|err| CoreError::ConfigInvalid {
                reason: format!("device document: {err}"),
            })?;
        Ok(Self::from_records(doc.devices))
    }

    pub fn from_records(records: Vec<DeviceRecord>) -> Self {
        Self {
            records: records
                .into_iter()
                .map(|r| (r.device_id.clone(), r))
                .collect(),
        }
    }

    pub fn get(&self, device_id: &str) -> Option<&DeviceRecord> {
        self.records.get(device_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
