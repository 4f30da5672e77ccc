//! Request bodies built from validated form data.
//!
//! Every `from_form` constructor runs the matching [`forms::schemas`] schema
//! first and checks the request context, so a draft that exists is one the
//! backend should accept.

#[cfg(test)]
#[path = "drafts_test.rs"]
mod drafts_test;

use forms::rules::number;
use forms::{FieldSpec, FormData, FormSchema, ValidationErrors, age_on, parse_date, schemas};
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::context::RequestContext;
use crate::error::ApiError;
use crate::types::{Address, Designation, Stock};

pub const DEFAULT_BED_STATUS: &str = "AVAILABLE";
pub const DEFAULT_APPOINTMENT_REASON: &str = "General Checkup";

// =============================================================================
// BED
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BedDraft {
    pub room_number: String,
    pub bed_type: String,
    pub status: String,
    pub active: bool,
    pub price: f64,
    pub tax_percentage: f64,
    pub description: String,
    pub hospital_identifier: String,
    pub hospital_bed_identifier: String,
}

impl BedDraft {
    /// # Errors
    ///
    /// [`ApiError::Form`] when the bed schema fails, [`ApiError::MissingContext`]
    /// without a hospital.
    pub fn from_form(data: &FormData, ctx: &RequestContext) -> Result<Self, ApiError> {
        schemas::bed().validate(data)?;
        let hospital = ctx.hospital()?;
        let status = match text(data, "status") {
            "" => DEFAULT_BED_STATUS.to_owned(),
            s => s.to_owned(),
        };
        Ok(Self {
            room_number: text(data, "roomNumber").to_owned(),
            bed_type: text(data, "bedType").to_owned(),
            status,
            active: flag(data, "active", true),
            price: decimal(data, "price")?,
            tax_percentage: decimal(data, "taxPercentage")?,
            description: text(data, "description").to_owned(),
            hospital_identifier: hospital.to_owned(),
            hospital_bed_identifier: new_id(),
        })
    }
}

// =============================================================================
// MEDICINE
// =============================================================================

/// Product body with one stock line for the caller's hospital.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedicineDraft {
    pub identifier: String,
    pub name: String,
    pub hsn: u64,
    pub description: String,
    pub gst: f64,
    pub category: String,
    pub unit: String,
    pub stocks: Vec<Stock>,
}

impl MedicineDraft {
    /// Build a create body (`identifier == None`, a fresh id is minted) or
    /// an update body for an existing product.
    ///
    /// # Errors
    ///
    /// [`ApiError::Form`] when the medicine schema fails (including MRP below
    /// selling price), [`ApiError::MissingContext`] without a hospital.
    pub fn from_form(data: &FormData, ctx: &RequestContext, identifier: Option<&str>) -> Result<Self, ApiError> {
        schemas::medicine().validate(data)?;
        let hospital = ctx.hospital()?;
        let qty = decimal(data, "stock_qty")?;
        let stock = Stock {
            hospital_identifier: hospital.to_owned(),
            stock_identifier: new_id(),
            stock_qty: qty,
            update_stock_qty: qty,
            selling_price: decimal(data, "selling_price")?,
            mrp: decimal(data, "mrp")?,
        };
        let hsn = text(data, "hsn").parse::<u64>().map_err(|_| invalid("hsn", "HSN code is too long"))?;
        Ok(Self {
            identifier: identifier.map_or_else(new_id, str::to_owned),
            name: text(data, "name").to_owned(),
            hsn,
            description: text(data, "description").to_owned(),
            gst: decimal(data, "gst")?,
            category: text(data, "category").to_owned(),
            unit: text(data, "unit").to_owned(),
            stocks: vec![stock],
        })
    }
}

// =============================================================================
// HOSPITAL
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalDraft {
    pub hospital_name: String,
    pub address: Address,
    pub phone: String,
    pub email: String,
}

impl HospitalDraft {
    /// # Errors
    ///
    /// [`ApiError::Form`] when the hospital schema fails.
    pub fn from_form(data: &FormData) -> Result<Self, ApiError> {
        schemas::hospital().validate(data)?;
        Ok(Self {
            hospital_name: text(data, "hospitalName").to_owned(),
            address: address(data),
            phone: text(data, "phone").to_owned(),
            email: text(data, "email").to_owned(),
        })
    }
}

// =============================================================================
// USER
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDraft {
    pub identifier: String,
    pub dob: String,
    pub age: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub password: String,
    pub phone: String,
    pub address: Address,
    pub hospital_identifier: String,
    pub designation_details: String,
    pub designation: Option<Designation>,
}

impl UserDraft {
    /// Body for `POST /user`. The phone field is `phoneNumber` on this form
    /// and the password must be typed twice.
    ///
    /// # Errors
    ///
    /// [`ApiError::Form`] on schema or date failures, [`ApiError::MissingContext`]
    /// without a hospital.
    pub fn create(data: &FormData, ctx: &RequestContext, today: Date) -> Result<Self, ApiError> {
        schemas::user_create().validate(data)?;
        Self::build(data, ctx, new_id(), text(data, "phoneNumber"), text(data, "password"), today)
    }

    /// Body for `PUT /user`. The password is sent empty and left unchanged.
    ///
    /// # Errors
    ///
    /// As for [`UserDraft::create`].
    pub fn update(data: &FormData, ctx: &RequestContext, identifier: &str, today: Date) -> Result<Self, ApiError> {
        schemas::user_edit().validate(data)?;
        Self::build(data, ctx, identifier.to_owned(), text(data, "phone"), "", today)
    }

    fn build(
        data: &FormData,
        ctx: &RequestContext,
        identifier: String,
        phone: &str,
        password: &str,
        today: Date,
    ) -> Result<Self, ApiError> {
        let hospital = ctx.hospital()?;
        let (dob, age) = dob_and_age(data, today)?;
        let designation = match text(data, "designation") {
            "" => None,
            id => Some(Designation { identifier: id.to_owned(), name: text(data, "designationName").to_owned() }),
        };
        Ok(Self {
            identifier,
            dob,
            age,
            name: text(data, "name").to_owned(),
            email: text(data, "email").to_owned(),
            role: text(data, "role").to_owned(),
            password: password.to_owned(),
            phone: phone.to_owned(),
            address: address(data),
            hospital_identifier: hospital.to_owned(),
            designation_details: text(data, "designationName").to_owned(),
            designation,
        })
    }
}

// =============================================================================
// PATIENT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDraft {
    pub identifier: String,
    pub status: String,
    pub username: String,
    pub dob: String,
    pub age: String,
    pub gender: String,
    pub phone: String,
    pub email: String,
    pub address: Address,
    pub patient_status: String,
    pub hospital_identifier: String,
}

impl PatientDraft {
    /// # Errors
    ///
    /// [`ApiError::Form`] on a missing name, a bad phone, email or date of
    /// birth; [`ApiError::MissingContext`] without a hospital.
    pub fn from_form(data: &FormData, ctx: &RequestContext, today: Date) -> Result<Self, ApiError> {
        patient_schema().validate(data)?;
        let hospital = ctx.hospital()?;
        let (dob, age) = dob_and_age(data, today)?;
        let gender = match text(data, "gender") {
            "" => "MALE".to_owned(),
            g => g.to_uppercase(),
        };
        Ok(Self {
            identifier: new_id(),
            status: "ACTIVE".to_owned(),
            username: text(data, "username").to_owned(),
            dob,
            age,
            gender,
            phone: text(data, "phone").to_owned(),
            email: text(data, "email").to_owned(),
            address: address(data),
            patient_status: "ACTIVE".to_owned(),
            hospital_identifier: hospital.to_owned(),
        })
    }
}

fn patient_schema() -> FormSchema {
    FormSchema::new("patient")
        .field(FieldSpec::new("username", "Patient name").required().min_len(3))
        .field(FieldSpec::new("phone", "Phone number").phone())
        .field(FieldSpec::new("email", "Email").email())
}

// =============================================================================
// APPOINTMENT / ADMISSION
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDraft {
    pub appointment_identifier: String,
    pub hospital_identifier: String,
    pub patient_identifier: String,
    pub doctor_identifier: String,
    pub date_time: String,
    pub reason: String,
    pub status: String,
}

impl AppointmentDraft {
    /// An `OPEN` appointment. A blank reason becomes
    /// [`DEFAULT_APPOINTMENT_REASON`].
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingContext`] without a hospital, [`ApiError::Encode`]
    /// if the time cannot be formatted.
    pub fn new(
        ctx: &RequestContext,
        patient: &str,
        doctor: &str,
        at: OffsetDateTime,
        reason: &str,
    ) -> Result<Self, ApiError> {
        let hospital = ctx.hospital()?;
        let reason = if reason.trim().is_empty() { DEFAULT_APPOINTMENT_REASON } else { reason.trim() };
        Ok(Self {
            appointment_identifier: new_id(),
            hospital_identifier: hospital.to_owned(),
            patient_identifier: patient.to_owned(),
            doctor_identifier: doctor.to_owned(),
            date_time: rfc3339(at)?,
            reason: reason.to_owned(),
            status: "OPEN".to_owned(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdmissionDraft {
    pub admission_identifier: String,
    pub patient_identifier: String,
    pub appointment_identifier: String,
    pub hospital_identifier: String,
    pub bed_type: String,
    pub room_number: String,
    pub admission_date_time: String,
    pub admitting_doctor: String,
    pub chief_complaint: String,
    pub provisional_diagnosis: String,
    pub treatment_plan: String,
    pub status: String,
    pub created_by: String,
    pub created_date_time: String,
}

impl AdmissionDraft {
    /// An `ADMITTED` record; the acting user is both admitting doctor and creator.
    ///
    /// # Errors
    ///
    /// [`ApiError::Form`] when the admission schema fails,
    /// [`ApiError::MissingContext`] without a hospital or user.
    pub fn from_form(data: &FormData, ctx: &RequestContext, now: OffsetDateTime) -> Result<Self, ApiError> {
        schemas::admission().validate(data)?;
        let hospital = ctx.hospital()?;
        let user = ctx.user()?;
        parse_date(text(data, "admissionDate")).map_err(|e| invalid("admissionDate", &e.to_string()))?;
        Ok(Self {
            admission_identifier: new_id(),
            patient_identifier: text(data, "patientIdentifier").to_owned(),
            appointment_identifier: text(data, "appointmentIdentifier").to_owned(),
            hospital_identifier: hospital.to_owned(),
            bed_type: text(data, "bedType").to_owned(),
            room_number: text(data, "roomNumber").to_owned(),
            admission_date_time: format!("{}T{}", text(data, "admissionDate"), text(data, "admissionTime")),
            admitting_doctor: user.to_owned(),
            chief_complaint: text(data, "chiefComplaint").to_owned(),
            provisional_diagnosis: text(data, "provisionalDiagnosis").to_owned(),
            treatment_plan: text(data, "treatmentPlan").to_owned(),
            status: "ADMITTED".to_owned(),
            created_by: user.to_owned(),
            created_date_time: rfc3339(now)?,
        })
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn text<'a>(data: &'a FormData, field: &str) -> &'a str {
    data.get(field).map_or("", |v| v.trim())
}

fn flag(data: &FormData, field: &str, default: bool) -> bool {
    match text(data, field) {
        "true" | "on" | "1" => true,
        "false" | "off" | "0" => false,
        _ => default,
    }
}

fn decimal(data: &FormData, field: &str) -> Result<f64, ApiError> {
    number(text(data, field)).ok_or_else(|| invalid(field, "must be a valid number"))
}

fn address(data: &FormData) -> Address {
    Address {
        address_line1: text(data, "addressLine1").to_owned(),
        address_line2: text(data, "addressLine2").to_owned(),
        city: text(data, "city").to_owned(),
        state: text(data, "state").to_owned(),
        country: text(data, "country").to_owned(),
        postal_code: text(data, "postalCode").to_owned(),
    }
}

/// `dob` as typed plus the age derived from it; both empty when no dob was given.
fn dob_and_age(data: &FormData, today: Date) -> Result<(String, String), ApiError> {
    match text(data, "dob") {
        "" => Ok((String::new(), String::new())),
        raw => {
            let dob = parse_date(raw).map_err(|e| invalid("dob", &e.to_string()))?;
            Ok((raw.to_owned(), age_on(dob, today).to_string()))
        }
    }
}

fn invalid(field: &str, message: &str) -> ApiError {
    let mut errors = ValidationErrors::new();
    errors.insert(field, message);
    ApiError::Form(errors)
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn rfc3339(at: OffsetDateTime) -> Result<String, ApiError> {
    at.format(&Rfc3339).map_err(|e| ApiError::Encode(e.to_string()))
}
