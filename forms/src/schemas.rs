//! Built-in schemas for the admin form pages.
//!
//! Field names match the JSON keys the pages submit; messages match what the
//! pages show.

#[cfg(test)]
#[path = "schemas_test.rs"]
mod schemas_test;

use crate::schema::{CrossCheck, FieldSpec, FormSchema};

/// Names accepted by [`by_name`].
pub const SCHEMA_NAMES: [&str; 7] = ["medicine", "hospital", "bed", "user_edit", "user_create", "sign_in", "admission"];

/// Look up a built-in schema by name.
#[must_use]
pub fn by_name(name: &str) -> Option<FormSchema> {
    match name {
        "medicine" => Some(medicine()),
        "hospital" => Some(hospital()),
        "bed" => Some(bed()),
        "user_edit" => Some(user_edit()),
        "user_create" => Some(user_create()),
        "sign_in" => Some(sign_in()),
        "admission" => Some(admission()),
        _ => None,
    }
}

/// Add / edit medicine (product with one stock line).
#[must_use]
pub fn medicine() -> FormSchema {
    FormSchema::new("medicine")
        .field(FieldSpec::new("name", "Medicine name").required().min_len(3).message("Name must be at least 3 characters"))
        .field(FieldSpec::new("hsn", "HSN").required().message("HSN code is required").digits())
        .field(FieldSpec::new("description", "Description").required().min_len(5))
        .field(
            FieldSpec::new("gst", "GST")
                .required()
                .message("GST percentage is required")
                .decimal()
                .between(0.0, 100.0),
        )
        .field(FieldSpec::new("category", "Category").required())
        .field(FieldSpec::new("unit", "Unit").required())
        .field(FieldSpec::new("stock_qty", "Stock quantity").required().decimal().non_negative())
        .field(FieldSpec::new("selling_price", "Selling price").required().decimal().non_negative())
        .field(FieldSpec::new("mrp", "MRP").required().decimal().non_negative())
        .cross(CrossCheck::at_least("mrp", "selling_price", "MRP should be greater than or equal to selling price"))
}

/// Create hospital. Address lines and postal code are optional.
#[must_use]
pub fn hospital() -> FormSchema {
    FormSchema::new("hospital")
        .field(FieldSpec::new("hospitalName", "Hospital name").required().min_len(3))
        .field(FieldSpec::new("phone", "Phone number").required().phone())
        .field(FieldSpec::new("email", "Email").required().email())
        .field(FieldSpec::new("city", "City").required())
        .field(FieldSpec::new("state", "State").required())
        .field(FieldSpec::new("country", "Country").required())
}

/// Create bed.
#[must_use]
pub fn bed() -> FormSchema {
    FormSchema::new("bed")
        .field(FieldSpec::new("roomNumber", "Room number").required())
        .field(FieldSpec::new("bedType", "Bed type").required().min_len(2))
        .field(FieldSpec::new("description", "Description").required().min_len(5))
        .field(FieldSpec::new("price", "Price").required().decimal().non_negative())
        .field(FieldSpec::new("taxPercentage", "Tax percentage").required().decimal().between(0.0, 100.0))
}

/// Edit user.
#[must_use]
pub fn user_edit() -> FormSchema {
    FormSchema::new("user_edit")
        .field(FieldSpec::new("name", "Name").required().min_len(3))
        .field(FieldSpec::new("phone", "Phone number").required().phone())
        .field(FieldSpec::new("email", "Email").required().email())
        .field(FieldSpec::new("role", "Role").required())
}

/// Create user: the edit rules plus a password that must be typed twice.
#[must_use]
pub fn user_create() -> FormSchema {
    FormSchema::new("user_create")
        .field(FieldSpec::new("name", "Name").required().min_len(3))
        .field(FieldSpec::new("phoneNumber", "Phone number").required().phone())
        .field(FieldSpec::new("email", "Email").required().email())
        .field(FieldSpec::new("role", "Role").required())
        .field(FieldSpec::new("password", "Password").required())
        .cross(CrossCheck::matches("retypePassword", "password", "Both the passwords don't match"))
}

/// Sign in.
#[must_use]
pub fn sign_in() -> FormSchema {
    FormSchema::new("sign_in")
        .field(FieldSpec::new("username", "Username").required())
        .field(FieldSpec::new("password", "Password").required())
}

/// Inpatient admission.
#[must_use]
pub fn admission() -> FormSchema {
    FormSchema::new("admission")
        .field(FieldSpec::new("bedType", "Bed type").required().message("Please select a bed type"))
        .field(FieldSpec::new("admissionDate", "Admission date").required().message("Please select admission date"))
        .field(FieldSpec::new("admissionTime", "Admission time").required().message("Please select admission time"))
        .field(FieldSpec::new("chiefComplaint", "Chief complaint").required().message("Please enter chief complaint"))
}
