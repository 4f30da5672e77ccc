//! Explicit credentials for each call, and the login response they come from.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::types::lenient_string;

/// Who is calling and for which hospital. Passed to every [`crate::HmsClient`] call.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub token: String,
    pub user_identifier: Option<String>,
    pub hospital_identifier: Option<String>,
}

impl RequestContext {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into(), ..Self::default() }
    }

    /// Set the acting user. Blank values leave it unset.
    #[must_use]
    pub fn with_user(mut self, id: impl Into<String>) -> Self {
        self.user_identifier = non_blank(id.into());
        self
    }

    /// Set the hospital. Blank values leave it unset.
    #[must_use]
    pub fn with_hospital(mut self, id: impl Into<String>) -> Self {
        self.hospital_identifier = non_blank(id.into());
        self
    }

    /// # Errors
    ///
    /// [`ApiError::MissingContext`] when no hospital is set.
    pub fn hospital(&self) -> Result<&str, ApiError> {
        self.hospital_identifier.as_deref().ok_or(ApiError::MissingContext("hospital identifier"))
    }

    /// # Errors
    ///
    /// [`ApiError::MissingContext`] when no user is set.
    pub fn user(&self) -> Result<&str, ApiError> {
        self.user_identifier.as_deref().ok_or(ApiError::MissingContext("user identifier"))
    }

    /// Headers sent with every request: `Authorization` always,
    /// `CurrentUserId` and `HospitalIdentifier` when set.
    #[must_use]
    pub fn headers(&self) -> Vec<(&'static str, String)> {
        let mut headers = vec![("Authorization", format!("Bearer {}", self.token))];
        if let Some(user) = &self.user_identifier {
            headers.push(("CurrentUserId", user.clone()));
        }
        if let Some(hospital) = &self.hospital_identifier {
            headers.push(("HospitalIdentifier", hospital.clone()));
        }
        headers
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestContext")
            .field("token", &"<redacted>")
            .field("user_identifier", &self.user_identifier)
            .field("hospital_identifier", &self.hospital_identifier)
            .finish()
    }
}

/// Body of a successful `auth/login`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    #[serde(rename = "hospitalID", default, deserialize_with = "lenient_string")]
    pub hospital_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub hospital: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub username: String,
    #[serde(rename = "userid", default, deserialize_with = "lenient_string")]
    pub user_id: String,
    #[serde(rename = "useridentifier", default, deserialize_with = "lenient_string")]
    pub user_identifier: String,
}

impl Session {
    /// The context for calls made as this user in their own hospital.
    #[must_use]
    pub fn context(&self) -> RequestContext {
        RequestContext::new(self.token.clone())
            .with_user(self.user_identifier.clone())
            .with_hospital(self.hospital_id.clone())
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("hospital_id", &self.hospital_id)
            .field("hospital", &self.hospital)
            .field("username", &self.username)
            .field("user_identifier", &self.user_identifier)
            .finish_non_exhaustive()
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() { None } else { Some(value) }
}
