//! Hospital backend REST client.
//!
//! Thin HTTP wrapper over [`crate::routes`]. Status mapping and body decoding
//! are pure functions in [`crate::error`] for testability.

#[cfg(test)]
#[path = "client_test.rs"]
mod client_test;

use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ApiConfig;
use crate::context::{RequestContext, Session};
use crate::drafts::{AdmissionDraft, AppointmentDraft, BedDraft, HospitalDraft, MedicineDraft, PatientDraft, UserDraft};
use crate::error::{ApiError, check_status, parse_json};
use crate::routes::{self, Route};
use crate::types::{Appointment, Bed, Designation, Hospital, Patient, Product, User};

// =============================================================================
// CLIENT
// =============================================================================

pub struct HmsClient {
    http: reqwest::Client,
    base_url: String,
}

impl HmsClient {
    /// # Errors
    ///
    /// [`ApiError::HttpClientBuild`] if the TLS backend cannot initialize.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| ApiError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, base_url: config.base_url.clone() })
    }

    /// Absolute URL of `route`.
    #[must_use]
    pub fn url(&self, route: &Route) -> String {
        format!("{}/{}", self.base_url, route.path.trim_start_matches('/'))
    }

    /// Sign in. Blank credentials fail validation without a request.
    ///
    /// # Errors
    ///
    /// [`ApiError::Form`] for blank fields, otherwise any transport or status error.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, ApiError> {
        let form = forms::form_data([("username", username), ("password", password)]);
        forms::schemas::sign_in().validate(&form)?;
        let body = serde_json::json!({ "username": username, "password": password });
        let text = self.execute(&routes::login(), self.http.post(self.url(&routes::login())).json(&body)).await?;
        parse_json(&text)
    }

    // --- users ---

    pub async fn users(&self, ctx: &RequestContext) -> Result<Vec<User>, ApiError> {
        self.list(ctx, routes::users()).await
    }

    pub async fn user(&self, ctx: &RequestContext, id: &str) -> Result<User, ApiError> {
        self.fetch(ctx, routes::user(id)).await
    }

    pub async fn user_by_identifier(&self, ctx: &RequestContext, id: &str) -> Result<User, ApiError> {
        self.fetch(ctx, routes::user_by_identifier(id)).await
    }

    pub async fn create_user(&self, ctx: &RequestContext, draft: &UserDraft) -> Result<serde_json::Value, ApiError> {
        self.send(ctx, routes::create_user(), draft).await
    }

    pub async fn update_user(&self, ctx: &RequestContext, draft: &UserDraft) -> Result<serde_json::Value, ApiError> {
        self.send(ctx, routes::update_user(), draft).await
    }

    pub async fn delete_user(&self, ctx: &RequestContext, id: &str) -> Result<serde_json::Value, ApiError> {
        self.fetch(ctx, routes::delete_user(id)).await
    }

    pub async fn designations(&self, ctx: &RequestContext) -> Result<Vec<Designation>, ApiError> {
        self.list(ctx, routes::designations()).await
    }

    pub async fn users_by_designation(&self, ctx: &RequestContext, id: &str) -> Result<Vec<User>, ApiError> {
        self.list(ctx, routes::users_by_designation(id)).await
    }

    // --- hospitals and beds ---

    pub async fn hospitals(&self, ctx: &RequestContext) -> Result<Vec<Hospital>, ApiError> {
        self.list(ctx, routes::hospitals()).await
    }

    pub async fn hospital(&self, ctx: &RequestContext, id: &str) -> Result<Hospital, ApiError> {
        self.fetch(ctx, routes::hospital(id)).await
    }

    pub async fn create_hospital(
        &self,
        ctx: &RequestContext,
        draft: &HospitalDraft,
    ) -> Result<serde_json::Value, ApiError> {
        self.send(ctx, routes::create_hospital(), draft).await
    }

    /// Beds of the context's hospital.
    pub async fn beds(&self, ctx: &RequestContext) -> Result<Vec<Bed>, ApiError> {
        let hospital = ctx.hospital()?;
        self.list(ctx, routes::beds(hospital)).await
    }

    pub async fn create_bed(&self, ctx: &RequestContext, draft: &BedDraft) -> Result<serde_json::Value, ApiError> {
        self.send(ctx, routes::create_bed(), draft).await
    }

    // --- products ---

    pub async fn product(&self, ctx: &RequestContext, id: &str) -> Result<Product, ApiError> {
        self.fetch(ctx, routes::product(id)).await
    }

    pub async fn create_product(
        &self,
        ctx: &RequestContext,
        draft: &MedicineDraft,
    ) -> Result<serde_json::Value, ApiError> {
        self.send(ctx, routes::create_product(), draft).await
    }

    pub async fn update_product(
        &self,
        ctx: &RequestContext,
        draft: &MedicineDraft,
    ) -> Result<serde_json::Value, ApiError> {
        self.send(ctx, routes::update_product(), draft).await
    }

    // --- patients, appointments, admissions ---

    pub async fn patients(&self, ctx: &RequestContext) -> Result<Vec<Patient>, ApiError> {
        self.list(ctx, routes::patients()).await
    }

    pub async fn patient(&self, ctx: &RequestContext, id: &str) -> Result<Patient, ApiError> {
        self.fetch(ctx, routes::patient(id)).await
    }

    pub async fn create_patient(
        &self,
        ctx: &RequestContext,
        draft: &PatientDraft,
    ) -> Result<serde_json::Value, ApiError> {
        self.send(ctx, routes::create_patient(), draft).await
    }

    pub async fn appointments(&self, ctx: &RequestContext) -> Result<Vec<Appointment>, ApiError> {
        self.list(ctx, routes::appointments()).await
    }

    pub async fn create_appointment(
        &self,
        ctx: &RequestContext,
        draft: &AppointmentDraft,
    ) -> Result<serde_json::Value, ApiError> {
        self.send(ctx, routes::create_appointment(), draft).await
    }

    pub async fn create_admission(
        &self,
        ctx: &RequestContext,
        draft: &AdmissionDraft,
    ) -> Result<serde_json::Value, ApiError> {
        self.send(ctx, routes::create_admission(), draft).await
    }

    // =========================================================================
    // PLUMBING
    // =========================================================================

    /// A request builder for `route` carrying the context headers.
    ///
    /// # Errors
    ///
    /// [`ApiError::MissingContext`] for a hospital-scoped route without a hospital.
    pub fn request(&self, ctx: &RequestContext, route: &Route) -> Result<reqwest::RequestBuilder, ApiError> {
        if route.hospital_scoped {
            ctx.hospital()?;
        }
        let mut builder = self.http.request(route.method.clone(), self.url(route));
        for (name, value) in ctx.headers() {
            builder = builder.header(name, value);
        }
        Ok(builder)
    }

    async fn fetch<T: DeserializeOwned>(&self, ctx: &RequestContext, route: Route) -> Result<T, ApiError> {
        let builder = self.request(ctx, &route)?;
        let text = self.execute(&route, builder).await?;
        parse_json(&text)
    }

    /// GET a list. An empty or `null` body is an empty list.
    async fn list<T: DeserializeOwned>(&self, ctx: &RequestContext, route: Route) -> Result<Vec<T>, ApiError> {
        let items: Option<Vec<T>> = self.fetch(ctx, route).await?;
        Ok(items.unwrap_or_default())
    }

    async fn send<B: Serialize>(
        &self,
        ctx: &RequestContext,
        route: Route,
        body: &B,
    ) -> Result<serde_json::Value, ApiError> {
        let builder = self.request(ctx, &route)?.json(body);
        let text = self.execute(&route, builder).await?;
        parse_json(&text)
    }

    async fn execute(&self, route: &Route, builder: reqwest::RequestBuilder) -> Result<String, ApiError> {
        let response = match builder.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(method = %route.method, path = %route.path, error = %e, "hms request failed");
                return Err(ApiError::Request(e.to_string()));
            }
        };
        let status = response.status().as_u16();
        let text = response.text().await.map_err(|e| ApiError::Request(e.to_string()))?;
        tracing::info!(method = %route.method, path = %route.path, status, "hms request");
        check_status(status, text)
    }
}
