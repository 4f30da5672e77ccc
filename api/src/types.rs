//! Records returned by the backend.
//!
//! Every field defaults when absent and identifiers accept either JSON
//! strings or numbers; unknown fields are ignored.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// SHARED
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub address_line1: String,
    pub address_line2: String,
    pub city: String,
    pub state: String,
    pub country: String,
    #[serde(deserialize_with = "lenient_string")]
    pub postal_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Designation {
    #[serde(deserialize_with = "lenient_string")]
    pub identifier: String,
    pub name: String,
}

// =============================================================================
// RECORDS
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    #[serde(deserialize_with = "lenient_string")]
    pub identifier: String,
    pub name: String,
    pub email: String,
    pub role: String,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    pub address: Option<Address>,
    pub dob: String,
    #[serde(deserialize_with = "lenient_string")]
    pub age: String,
    pub designation_details: String,
    pub designation: Option<Designation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Hospital {
    #[serde(deserialize_with = "lenient_string")]
    pub hospital_identifier: String,
    pub hospital_name: String,
    pub address: Option<Address>,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bed {
    pub hospital_bed_identifier: String,
    #[serde(deserialize_with = "lenient_string")]
    pub room_number: String,
    pub bed_type: String,
    pub status: String,
    pub active: bool,
    pub price: f64,
    pub tax_percentage: f64,
    pub description: String,
    pub hospital_identifier: String,
}

impl Default for Bed {
    fn default() -> Self {
        Self {
            hospital_bed_identifier: String::new(),
            room_number: String::new(),
            bed_type: String::new(),
            status: String::new(),
            active: true,
            price: 0.0,
            tax_percentage: 0.0,
            description: String::new(),
            hospital_identifier: String::new(),
        }
    }
}

/// One hospital's stock line of a product. Quantity and price keys are snake_case on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stock {
    #[serde(rename = "hospitalIdentifier")]
    pub hospital_identifier: String,
    #[serde(rename = "stockIdentifier")]
    pub stock_identifier: String,
    pub stock_qty: f64,
    pub update_stock_qty: f64,
    pub selling_price: f64,
    pub mrp: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub identifier: String,
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub hsn: String,
    pub description: String,
    pub gst: f64,
    pub category: String,
    pub unit: String,
    pub stocks: Vec<Stock>,
}

impl Product {
    /// The stock line for `hospital`, if the product is stocked there.
    #[must_use]
    pub fn stock_for(&self, hospital: &str) -> Option<&Stock> {
        self.stocks.iter().find(|s| s.hospital_identifier == hospital)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Patient {
    #[serde(alias = "patientIdentifier", deserialize_with = "lenient_string")]
    pub identifier: String,
    pub username: String,
    pub dob: String,
    #[serde(deserialize_with = "lenient_string")]
    pub age: String,
    pub gender: String,
    #[serde(deserialize_with = "lenient_string")]
    pub phone: String,
    pub email: String,
    pub address: Option<Address>,
    pub patient_status: String,
    pub hospital_identifier: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Appointment {
    pub appointment_identifier: String,
    pub hospital_identifier: String,
    pub patient_identifier: String,
    pub doctor_identifier: String,
    pub date_time: String,
    pub reason: String,
    pub status: String,
}

// =============================================================================
// SERDE HELPERS
// =============================================================================

/// Accept a JSON string, number, boolean, or null as a `String`.
pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Null => Ok(String::new()),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        other => Err(serde::de::Error::custom(format!("expected a scalar, got {other}"))),
    }
}
