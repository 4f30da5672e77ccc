use super::*;

// --- Required / MinLen ---

#[test]
fn required_trims() {
    assert!(Rule::Required.passes("x"));
    assert!(!Rule::Required.passes(""));
    assert!(!Rule::Required.passes("   "));
}

#[test]
fn min_len_counts_trimmed_chars() {
    assert!(Rule::MinLen(3).passes("abc"));
    assert!(!Rule::MinLen(3).passes(" ab "));
    assert!(Rule::MinLen(3).passes("äöü"));
}

// --- numeric formats ---

#[test]
fn digits_only_ascii_digits() {
    assert!(Rule::Digits.passes("300490"));
    assert!(!Rule::Digits.passes(""));
    assert!(!Rule::Digits.passes("12a"));
    assert!(!Rule::Digits.passes("1.5"));
    assert!(!Rule::Digits.passes("-1"));
}

#[test]
fn decimal_allows_one_or_two_fraction_digits() {
    for ok in ["0", "12", "12.5", "12.50"] {
        assert!(Rule::Decimal.passes(ok), "{ok}");
    }
    for bad in ["", ".5", "12.", "12.555", "1e3", "-3", "1.2.3", " 12"] {
        assert!(!Rule::Decimal.passes(bad), "{bad}");
    }
}

#[test]
fn phone_is_exactly_ten_digits() {
    assert!(Rule::Phone.passes("9876543210"));
    assert!(!Rule::Phone.passes("987654321"));
    assert!(!Rule::Phone.passes("98765432100"));
    assert!(!Rule::Phone.passes("98765-4321"));
}

#[test]
fn email_shape() {
    for ok in ["a@b.co", "first.last@hospital.example.in", "x@y.z"] {
        assert!(Rule::Email.passes(ok), "{ok}");
    }
    for bad in ["", "plain", "a@b", "a@@b.com", "a b@c.com", "@b.com", "a@.com", "a@b.", "a@b@c.com"] {
        assert!(!Rule::Email.passes(bad), "{bad}");
    }
}

#[test]
fn between_is_inclusive() {
    let rule = Rule::Between { min: 0.0, max: 100.0 };
    assert!(rule.passes("0"));
    assert!(rule.passes("100"));
    assert!(rule.passes("18.5"));
    assert!(!rule.passes("100.01"));
    assert!(!rule.passes("abc"));
}

#[test]
fn non_negative() {
    assert!(Rule::NonNegative.passes("0"));
    assert!(Rule::NonNegative.passes("3.25"));
    assert!(!Rule::NonNegative.passes("-0.5"));
    assert!(!Rule::NonNegative.passes("NaN"));
}

// --- messages ---

#[test]
fn default_messages_use_label() {
    assert_eq!(Rule::Required.default_message("City"), "City is required");
    assert_eq!(Rule::MinLen(5).default_message("Description"), "Description must be at least 5 characters");
    assert_eq!(Rule::Decimal.default_message("MRP"), "MRP must be a valid number");
    assert_eq!(Rule::Phone.default_message("Phone number"), "Phone number must be exactly 10 digits");
    assert_eq!(Rule::Email.default_message("Email"), "Please enter a valid email address");
    assert_eq!(
        Rule::Between { min: 0.0, max: 100.0 }.default_message("Tax percentage"),
        "Tax percentage must be between 0 and 100"
    );
    assert_eq!(Rule::NonNegative.default_message("Price"), "Price cannot be negative");
}

#[test]
fn number_parses_trimmed_finite_values() {
    assert_eq!(number(" 4.5 "), Some(4.5));
    assert_eq!(number("inf"), None);
    assert_eq!(number(""), None);
}
