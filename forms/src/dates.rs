//! Date helpers for patient and user forms.

#[cfg(test)]
#[path = "dates_test.rs"]
mod dates_test;

use time::Date;
use time::macros::format_description;

/// Errors from reading a date field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("invalid date {0:?}; expected YYYY-MM-DD")]
    Invalid(String),
}

/// Parse a `YYYY-MM-DD` date field.
///
/// # Errors
///
/// Returns [`DateError::Invalid`] for anything else.
pub fn parse_date(raw: &str) -> Result<Date, DateError> {
    Date::parse(raw.trim(), format_description!("[year]-[month]-[day]")).map_err(|_| DateError::Invalid(raw.to_owned()))
}

/// Completed years between `dob` and `today`. Zero if `dob` is in the future.
#[must_use]
pub fn age_on(dob: Date, today: Date) -> u32 {
    let mut years = today.year() - dob.year();
    if (u8::from(today.month()), today.day()) < (u8::from(dob.month()), dob.day()) {
        years -= 1;
    }
    u32::try_from(years).unwrap_or(0)
}
