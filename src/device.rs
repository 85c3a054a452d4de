//! # Device Label Data
//!
//! The minimal projection of an inventory device needed to render one
//! label, plus the machine-readable payload embedded in its QR symbol.
//!
//! Lookup, validation and deduplication of devices happen upstream; this
//! module only sees already-resolved records.

use serde::{Deserialize, Serialize};

use crate::error::LabelError;

/// One device's label-relevant fields.
///
/// Only `id` is guaranteed to be present. Every other field may be an
/// empty string when unknown and must render as empty, never panic.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeviceLabelData {
    /// Device identifier (always present).
    pub id: u64,
    /// Building name of the device's location.
    pub building: String,
    /// Room number within the building.
    pub room: String,
    /// Display name of the responsible person.
    pub owner: String,
    /// Inventory number.
    pub inventory_number: String,
    /// Manufacturer serial number.
    pub serial_number: String,
    /// Manufacturer name.
    pub manufacturer: String,
    /// Model name.
    pub model: String,
}

impl DeviceLabelData {
    /// Manufacturer and model joined for a single caption line.
    ///
    /// Empty components are dropped so the line never renders a stray
    /// space.
    pub fn model_line(&self) -> String {
        match (self.manufacturer.is_empty(), self.model.is_empty()) {
            (true, true) => String::new(),
            (true, false) => self.model.clone(),
            (false, true) => self.manufacturer.clone(),
            (false, false) => format!("{} {}", self.manufacturer, self.model),
        }
    }
}

/// The machine-readable subset of [`DeviceLabelData`] embedded in the QR
/// symbol.
///
/// Field order is fixed by the struct definition, so serialization is
/// deterministic: identical device data always produces byte-identical
/// payloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    pub id: u64,
    pub serial_number: String,
    pub inventory_number: String,
}

impl QrPayload {
    /// Project a device record into its QR payload.
    pub fn from_device(device: &DeviceLabelData) -> Self {
        Self {
            id: device.id,
            serial_number: device.serial_number.clone(),
            inventory_number: device.inventory_number.clone(),
        }
    }

    /// Serialize to the exact bytes fed to the QR encoder.
    pub fn to_bytes(&self) -> Result<Vec<u8>, LabelError> {
        serde_json::to_vec(self).map_err(|e| LabelError::QrEncoding(e.to_string()))
    }
}

// ============================================================================
// TESTS
// ============================================================================
