//! Device inventory model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::devices::error::{DeviceError, DeviceResult};

/// Store-assigned device identifier
pub type DeviceId = u64;

/// Key of the creation time field in partial updates
pub const CREATION_TIME_KEY: &str = "creationTime";

/// Device lifecycle state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeviceState {
    /// Ready to be handed out
    #[default]
    Available,

    /// Assigned; name and brand are frozen
    InUse,

    /// Retired or out of service
    Inactive,
}

impl DeviceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceState::Available => "AVAILABLE",
            DeviceState::InUse => "IN_USE",
            DeviceState::Inactive => "INACTIVE",
        }
    }

    pub fn is_in_use(&self) -> bool {
        *self == DeviceState::InUse
    }
}

impl std::fmt::Display for DeviceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for DeviceState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AVAILABLE" => Ok(DeviceState::Available),
            "IN_USE" => Ok(DeviceState::InUse),
            "INACTIVE" => Ok(DeviceState::Inactive),
            _ => Err(format!("Invalid device state: {}", s)),
        }
    }
}

/// A managed inventory record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// Store-assigned id, never changes
    pub id: DeviceId,

    /// Device name
    pub name: String,

    /// Device brand
    pub brand: String,

    /// Lifecycle state
    pub state: DeviceState,

    /// Set once on creation
    pub creation_time: DateTime<Utc>,
}

/// A device that has not been inserted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDevice {
    pub name: String,
    pub brand: String,
    pub state: DeviceState,
    pub creation_time: DateTime<Utc>,
}

impl NewDevice {
    /// A fresh `AVAILABLE` device stamped with the current time
    pub fn new(name: String, brand: String) -> Self {
        Self {
            name,
            brand,
            state: DeviceState::Available,
            creation_time: Utc::now(),
        }
    }

    /// Attach the id assigned by a store
    pub fn with_id(self, id: DeviceId) -> Device {
        Device {
            id,
            name: self.name,
            brand: self.brand,
            state: self.state,
            creation_time: self.creation_time,
        }
    }
}

/// Replacement payload of a full update
///
/// `id` and `creation_time` are whatever the client sent; they are never
/// written to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDetails {
    pub id: Option<DeviceId>,
    pub name: String,
    pub brand: String,
    pub state: DeviceState,
    pub creation_time: Option<DateTime<Utc>>,
}

impl DeviceDetails {
    pub fn new(name: impl Into<String>, brand: impl Into<String>, state: DeviceState) -> Self {
        Self {
            id: None,
            name: name.into(),
            brand: brand.into(),
            state,
            creation_time: None,
        }
    }
}

/// Field changes of a partial update
///
/// Only fields present in the request are `Some`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeviceChanges {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub state: Option<DeviceState>,

    /// The request carried the creation time key
    pub creation_time_requested: bool,

    /// First unknown or malformed field, reported after the lookup and
    /// creation time checks
    pub invalid: Option<String>,
}

impl DeviceChanges {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    pub fn with_state(mut self, state: DeviceState) -> Self {
        self.state = Some(state);
        self
    }

    /// Build changes from a JSON field map
    ///
    /// Recognised keys are `name`, `brand`, `state` and the creation time key.
    /// Parsing never stops early: the first bad field is kept in `invalid`
    /// and the remaining keys are still scanned for the creation time key.
    pub fn from_fields(fields: impl IntoIterator<Item = (String, Value)>) -> Self {
        let mut changes = DeviceChanges::default();

        for (key, value) in fields {
            let parsed = match key.as_str() {
                "name" => expect_string(&key, value).map(|name| changes.name = Some(name)),
                "brand" => expect_string(&key, value).map(|brand| changes.brand = Some(brand)),
                "state" => expect_string(&key, value)
                    .and_then(|raw| raw.parse::<DeviceState>())
                    .map(|state| changes.state = Some(state)),
                CREATION_TIME_KEY => {
                    changes.creation_time_requested = true;
                    Ok(())
                }
                _ => Err(format!("Unknown or read-only field: {}", key)),
            };

            if let Err(message) = parsed {
                changes.invalid.get_or_insert(message);
            }
        }

        changes
    }

    /// Fail with the first bad field seen while parsing
    pub fn ensure_valid(&self) -> DeviceResult<()> {
        match &self.invalid {
            Some(message) => Err(DeviceError::Validation(message.clone())),
            None => Ok(()),
        }
    }

    /// Merge the supplied fields onto a copy of `device`
    pub fn apply_to(&self, device: &Device) -> Device {
        let mut merged = device.clone();
        if let Some(name) = &self.name {
            merged.name = name.clone();
        }
        if let Some(brand) = &self.brand {
            merged.brand = brand.clone();
        }
        if let Some(state) = self.state {
            merged.state = state;
        }
        merged
    }
}

fn expect_string(key: &str, value: Value) -> Result<String, String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(format!("Field '{}' must be a string, got {}", key, other)),
    }
}

/// Store-side filter for device listings
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceFilter {
    Brand(String),
    State(DeviceState),
}

impl DeviceFilter {
    pub fn matches(&self, device: &Device) -> bool {
        match self {
            DeviceFilter::Brand(brand) => device.brand == *brand,
            DeviceFilter::State(state) => device.state == *state,
        }
    }
}
