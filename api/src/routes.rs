//! Endpoint table: method, path, and whether the call is hospital-scoped.
//!
//! Paths are relative to the configured base URL.

#[cfg(test)]
#[path = "routes_test.rs"]
mod routes_test;

use reqwest::Method;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub method: Method,
    pub path: String,
    /// The call needs a hospital in the request context.
    pub hospital_scoped: bool,
}

impl Route {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), hospital_scoped: false }
    }

    fn scoped(mut self) -> Self {
        self.hospital_scoped = true;
        self
    }
}

#[must_use]
pub fn login() -> Route {
    Route::new(Method::POST, "auth/login")
}

// --- users ---

#[must_use]
pub fn users() -> Route {
    Route::new(Method::GET, "user")
}

#[must_use]
pub fn user(id: &str) -> Route {
    Route::new(Method::GET, format!("user/{id}"))
}

#[must_use]
pub fn user_by_identifier(id: &str) -> Route {
    Route::new(Method::GET, format!("user/GetUserByIdentifier/{id}"))
}

#[must_use]
pub fn create_user() -> Route {
    Route::new(Method::POST, "user")
}

#[must_use]
pub fn update_user() -> Route {
    Route::new(Method::PUT, "user")
}

#[must_use]
pub fn delete_user(id: &str) -> Route {
    Route::new(Method::DELETE, format!("user/{id}"))
}

#[must_use]
pub fn designations() -> Route {
    Route::new(Method::GET, "user/getAllDesignations")
}

#[must_use]
pub fn users_by_designation(id: &str) -> Route {
    Route::new(Method::GET, format!("user/filterUserByDesignation/{id}"))
}

// --- hospitals and beds ---

#[must_use]
pub fn hospitals() -> Route {
    Route::new(Method::GET, "hospital")
}

#[must_use]
pub fn hospital(id: &str) -> Route {
    Route::new(Method::GET, format!("hospital/{id}"))
}

#[must_use]
pub fn create_hospital() -> Route {
    Route::new(Method::POST, "hospital")
}

#[must_use]
pub fn beds(hospital: &str) -> Route {
    Route::new(Method::GET, format!("hospital/bed/getAll/{hospital}")).scoped()
}

#[must_use]
pub fn create_bed() -> Route {
    Route::new(Method::POST, "hospital/bed").scoped()
}

// --- products ---

#[must_use]
pub fn product(id: &str) -> Route {
    Route::new(Method::GET, format!("product/{id}"))
}

#[must_use]
pub fn create_product() -> Route {
    Route::new(Method::POST, "product").scoped()
}

#[must_use]
pub fn update_product() -> Route {
    Route::new(Method::PUT, "product").scoped()
}

// --- patients, appointments, admissions ---

#[must_use]
pub fn patients() -> Route {
    Route::new(Method::GET, "patient")
}

#[must_use]
pub fn patient(id: &str) -> Route {
    Route::new(Method::GET, format!("patient/{id}"))
}

#[must_use]
pub fn create_patient() -> Route {
    Route::new(Method::POST, "patients").scoped()
}

#[must_use]
pub fn appointments() -> Route {
    Route::new(Method::GET, "appointment")
}

#[must_use]
pub fn create_appointment() -> Route {
    Route::new(Method::POST, "appointment").scoped()
}

#[must_use]
pub fn create_admission() -> Route {
    Route::new(Method::POST, "admission").scoped()
}
