//! Single-field validation rules and their default messages.
//!
//! Every rule works on the raw text the user typed. Digits are ASCII only,
//! the way the browser's `\d` class behaves.

#[cfg(test)]
#[path = "rules_test.rs"]
mod rules_test;

/// A check applied to one field's text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rule {
    /// Non-blank after trimming.
    Required,
    /// At least `n` characters after trimming.
    MinLen(usize),
    /// One or more ASCII digits, nothing else.
    Digits,
    /// Digits with an optional fraction of one or two digits (`12`, `12.5`, `12.50`).
    Decimal,
    /// Exactly ten ASCII digits.
    Phone,
    /// `local@domain.tld` with no whitespace and a single `@`.
    Email,
    /// Numeric value within `min..=max`.
    Between { min: f64, max: f64 },
    /// Numeric value `>= 0`.
    NonNegative,
}

impl Rule {
    /// Whether `value` satisfies the rule.
    #[must_use]
    pub fn passes(&self, value: &str) -> bool {
        match *self {
            Self::Required => !value.trim().is_empty(),
            Self::MinLen(n) => value.trim().chars().count() >= n,
            Self::Digits => is_digits(value),
            Self::Decimal => is_decimal(value),
            Self::Phone => value.len() == 10 && is_digits(value),
            Self::Email => is_email(value),
            Self::Between { min, max } => number(value).is_some_and(|v| (min..=max).contains(&v)),
            Self::NonNegative => number(value).is_some_and(|v| v >= 0.0),
        }
    }

    /// Message shown when the rule fails on a field labelled `label`.
    #[must_use]
    pub fn default_message(&self, label: &str) -> String {
        match *self {
            Self::Required => format!("{label} is required"),
            Self::MinLen(n) => format!("{label} must be at least {n} characters"),
            Self::Digits | Self::Decimal => format!("{label} must be a valid number"),
            Self::Phone => format!("{label} must be exactly 10 digits"),
            Self::Email => "Please enter a valid email address".to_owned(),
            Self::Between { min, max } => format!("{label} must be between {min} and {max}"),
            Self::NonNegative => format!("{label} cannot be negative"),
        }
    }
}

/// Parse a field as a number, ignoring surrounding whitespace.
#[must_use]
pub fn number(value: &str) -> Option<f64> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Some(v),
        _ => None,
    }
}

fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_decimal(value: &str) -> bool {
    match value.split_once('.') {
        None => is_digits(value),
        Some((whole, frac)) => is_digits(whole) && (1..=2).contains(&frac.len()) && is_digits(frac),
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let clean = |s: &str| !s.is_empty() && !s.contains('@') && !s.chars().any(char::is_whitespace);
    if !clean(local) || !clean(domain) {
        return false;
    }
    // Some dot with at least one character on each side.
    domain.char_indices().any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}
