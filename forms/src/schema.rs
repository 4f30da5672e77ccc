//! Form schemas: per-field rule lists plus cross-field checks.
//!
//! A [`FormSchema`] replaces a hand-written `validateField` switch. Field
//! rules run in declaration order and the first failure wins; cross checks
//! run afterwards and overwrite the message of the field they name.

#[cfg(test)]
#[path = "schema_test.rs"]
mod schema_test;

use std::collections::BTreeMap;

use serde::Serialize;

use crate::rules::{Rule, number};

/// Submitted form values keyed by field name. Missing fields read as empty.
pub type FormData = BTreeMap<String, String>;

/// Build [`FormData`] from `(field, value)` pairs.
pub fn form_data<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> FormData
where
    K: Into<String>,
    V: Into<String>,
{
    pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect()
}

/// Errors from reading form values out of JSON.
#[derive(Debug, thiserror::Error)]
pub enum FormParseError {
    #[error("form data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("form data must be a JSON object of field values")]
    NotAnObject,
    #[error("field {0} must be a string, number, boolean or null")]
    NotAScalar(String),
}

/// Read a flat JSON object into [`FormData`]. Numbers and booleans are kept
/// as their JSON text; `null` becomes empty.
///
/// # Errors
///
/// Returns [`FormParseError`] for malformed JSON, a non-object, or nested values.
pub fn parse_form(raw: &str) -> Result<FormData, FormParseError> {
    let value: serde_json::Value = serde_json::from_str(raw)?;
    let serde_json::Value::Object(map) = value else {
        return Err(FormParseError::NotAnObject);
    };
    let mut data = FormData::new();
    for (field, value) in map {
        let text = match value {
            serde_json::Value::String(s) => s,
            serde_json::Value::Null => String::new(),
            serde_json::Value::Number(n) => n.to_string(),
            serde_json::Value::Bool(b) => b.to_string(),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => return Err(FormParseError::NotAScalar(field)),
        };
        data.insert(field, text);
    }
    Ok(data)
}

/// Field name to message for every field that failed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(transparent)]
#[error("please fix the validation errors ({})", self.summary())]
pub struct ValidationErrors {
    errors: BTreeMap<String, String>,
}

impl ValidationErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record (or replace) the message for `field`.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.insert(field.into(), message.into());
    }

    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `field: message` pairs joined with `; `.
    #[must_use]
    pub fn summary(&self) -> String {
        let joined: Vec<String> = self.iter().map(|(field, msg)| format!("{field}: {msg}")).collect();
        joined.join("; ")
    }
}

/// One rule with the message shown when it fails.
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub rule: Rule,
    pub message: String,
}

/// A field's name, display label, and ordered checks.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub label: String,
    pub checks: Vec<Check>,
}

impl FieldSpec {
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>) -> Self {
        Self { name: name.into(), label: label.into(), checks: Vec::new() }
    }

    /// Append a rule with its default message.
    #[must_use]
    pub fn rule(mut self, rule: Rule) -> Self {
        let message = rule.default_message(&self.label);
        self.checks.push(Check { rule, message });
        self
    }

    /// Replace the message of the most recently added rule.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        if let Some(last) = self.checks.last_mut() {
            last.message = message.into();
        }
        self
    }

    #[must_use]
    pub fn required(self) -> Self {
        self.rule(Rule::Required)
    }

    #[must_use]
    pub fn min_len(self, n: usize) -> Self {
        self.rule(Rule::MinLen(n))
    }

    #[must_use]
    pub fn digits(self) -> Self {
        self.rule(Rule::Digits)
    }

    #[must_use]
    pub fn decimal(self) -> Self {
        self.rule(Rule::Decimal)
    }

    #[must_use]
    pub fn phone(self) -> Self {
        self.rule(Rule::Phone)
    }

    #[must_use]
    pub fn email(self) -> Self {
        self.rule(Rule::Email)
    }

    #[must_use]
    pub fn between(self, min: f64, max: f64) -> Self {
        self.rule(Rule::Between { min, max })
    }

    #[must_use]
    pub fn non_negative(self) -> Self {
        self.rule(Rule::NonNegative)
    }

    /// The first failing check's message, if any.
    ///
    /// A blank value on a field without `Required` skips the remaining
    /// checks, so optional fields may be left empty.
    #[must_use]
    pub fn validate(&self, value: &str) -> Option<&str> {
        let required = self.checks.iter().any(|c| c.rule == Rule::Required);
        if !required && value.trim().is_empty() {
            return None;
        }
        self.checks.iter().find(|c| !c.rule.passes(value)).map(|c| c.message.as_str())
    }
}

/// A rule relating two fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CrossCheck {
    /// `field` must be numerically `>=` `other` (when both parse).
    AtLeast { field: String, other: String, message: String },
    /// `field` must equal `other` exactly.
    Matches { field: String, other: String, message: String },
}

impl CrossCheck {
    #[must_use]
    pub fn at_least(field: impl Into<String>, other: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AtLeast { field: field.into(), other: other.into(), message: message.into() }
    }

    #[must_use]
    pub fn matches(field: impl Into<String>, other: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Matches { field: field.into(), other: other.into(), message: message.into() }
    }

    /// The field the failure is reported against and its message, if failing.
    #[must_use]
    pub fn check(&self, data: &FormData) -> Option<(&str, &str)> {
        match self {
            Self::AtLeast { field, other, message } => {
                let (a, b) = (number(value(data, field))?, number(value(data, other))?);
                (a < b).then_some((field.as_str(), message.as_str()))
            }
            Self::Matches { field, other, message } => {
                (value(data, field) != value(data, other)).then_some((field.as_str(), message.as_str()))
            }
        }
    }
}

/// A named form: its fields and cross-field checks.
#[derive(Debug, Clone, PartialEq)]
pub struct FormSchema {
    pub name: String,
    pub fields: Vec<FieldSpec>,
    pub cross: Vec<CrossCheck>,
}

impl FormSchema {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), fields: Vec::new(), cross: Vec::new() }
    }

    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    #[must_use]
    pub fn cross(mut self, check: CrossCheck) -> Self {
        self.cross.push(check);
        self
    }

    /// Look up a field by name.
    #[must_use]
    pub fn spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Validate a single field as the user edits it. Unknown fields pass.
    #[must_use]
    pub fn validate_field(&self, name: &str, value: &str) -> Option<&str> {
        self.spec(name)?.validate(value)
    }

    /// Validate a whole submission.
    ///
    /// # Errors
    ///
    /// Returns every failing field with its message.
    pub fn validate(&self, data: &FormData) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        for spec in &self.fields {
            if let Some(message) = spec.validate(value(data, &spec.name)) {
                errors.insert(spec.name.as_str(), message);
            }
        }
        for check in &self.cross {
            if let Some((field, message)) = check.check(data) {
                errors.insert(field, message);
            }
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

fn value<'a>(data: &'a FormData, field: &str) -> &'a str {
    data.get(field).map_or("", String::as_str)
}
