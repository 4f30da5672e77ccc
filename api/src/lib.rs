//! Typed REST client for the hospital admin backend.
//!
//! Every call takes an explicit [`RequestContext`] (token, acting user,
//! hospital) instead of reading ambient session storage. Request bodies are
//! drafts built from form data that already passed the matching
//! [`forms`] schema.
//!
//! | Module | Role |
//! |--------|------|
//! | [`config`] | `ApiConfig::from_env` |
//! | [`context`] | `RequestContext`, login `Session` |
//! | [`routes`] | Endpoint paths and methods |
//! | [`client`] | `HmsClient` |
//! | [`types`] | Records returned by the backend |
//! | [`drafts`] | Request bodies built from validated forms |
//! | [`error`] | `ApiError` and status mapping |

pub mod client;
pub mod config;
pub mod context;
pub mod drafts;
pub mod error;
pub mod routes;
pub mod types;

pub use client::HmsClient;
pub use config::{ApiConfig, Timeouts};
pub use context::{RequestContext, Session};
pub use drafts::{AdmissionDraft, AppointmentDraft, BedDraft, HospitalDraft, MedicineDraft, PatientDraft, UserDraft};
pub use error::ApiError;
pub use types::{Address, Appointment, Bed, Designation, Hospital, Patient, Product, Stock, User};
