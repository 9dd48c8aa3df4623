//! Property-based tests for sieve-validator.

use proptest::prelude::*;
use sieve_validator::prelude::*;
use sieve_validator::rules::{PasswordViolation, escape_html, luhn_valid, validate_password};

fn check_digit(payload: &str) -> char {
    ('0'..='9')
        .find(|d| luhn_valid(&format!("{payload}{d}")))
        .unwrap()
}

// ============================================================================
// TRANSFORMS
// ============================================================================

proptest! {
    #[test]
    fn trim_is_idempotent(s in ".{0,40}") {
        let field = Field::from(text().trim());
        let once = field.transform(Value::from(s)).unwrap();
        let twice = field.transform(once.clone()).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn lowercase_after_trim_never_has_outer_whitespace(s in "[ \\tA-Za-z]{0,30}") {
        let field = Field::from(text().trim().lowercase());
        let cleaned = field.transform(Value::from(s)).unwrap();
        let cleaned = cleaned.as_str().unwrap();
        prop_assert_eq!(cleaned, cleaned.trim());
        prop_assert!(!cleaned.chars().any(|c| c.is_ascii_uppercase()));
    }

    #[test]
    fn escaped_html_has_no_angle_brackets(s in ".{0,60}") {
        let escaped = escape_html(&s);
        prop_assert!(!escaped.contains('<'));
        prop_assert!(!escaped.contains('>'));
    }
}

// ============================================================================
// LUHN
// ============================================================================

proptest! {
    #[test]
    fn luhn_has_exactly_one_check_digit(payload in "[0-9]{1,18}") {
        let valid = ('0'..='9')
            .filter(|d| luhn_valid(&format!("{payload}{d}")))
            .count();
        prop_assert_eq!(valid, 1);
    }

    #[test]
    fn luhn_detects_single_digit_errors(
        payload in "[0-9]{1,18}",
        position in any::<prop::sample::Index>(),
        delta in 1u32..10,
    ) {
        let number = format!("{payload}{}", check_digit(&payload));
        let i = position.index(number.len());
        let mut digits: Vec<u32> = number.chars().filter_map(|c| c.to_digit(10)).collect();
        digits[i] = (digits[i] + delta) % 10;
        let corrupted: String = digits.iter().map(u32::to_string).collect();
        prop_assert!(!luhn_valid(&corrupted));
    }

    #[test]
    fn luhn_rejects_non_digits(s in "[0-9]{0,8}[a-z -][0-9]{0,8}") {
        prop_assert!(!luhn_valid(&s));
    }
}

// ============================================================================
// PASSWORD & NUMBER CHECKS
// ============================================================================

proptest! {
    #[test]
    fn short_passwords_always_too_short(s in "[A-Za-z0-9!@#]{0,7}") {
        let violations = validate_password(&s, &PasswordPolicy::new());
        prop_assert!(violations.contains(&PasswordViolation::TooShort(8)));
    }

    #[test]
    fn integer_multiples_pass_multiple_of(k in -10_000i64..10_000) {
        let schema = Schema::new().field("n", number().multiple_of(0.5));
        let n = k as f64 * 0.5;
        let result = schema.validate(&record! { "n" => n });
        prop_assert!(!result.has_errors());
    }
}

// ============================================================================
// SCHEMA INVARIANTS
// ============================================================================

fn profile() -> Schema {
    Schema::new().shape(shape! {
        "name" => text().trim().min(2).max(10).required(),
        "age" => number().integer().between(0.0, 150.0),
    })
}

proptest! {
    #[test]
    fn valid_data_present_iff_no_errors(name in ".{0,15}", age in -10i64..200) {
        let result = profile().validate(&record! { "name" => name, "age" => age });
        prop_assert_eq!(result.valid_data().is_some(), !result.has_errors());
    }

    #[test]
    fn validation_is_deterministic(name in ".{0,15}", age in -10i64..200) {
        let data = record! { "name" => name, "age" => age };
        let first = profile().validate(&data);
        let second = profile().validate(&data);
        prop_assert_eq!(first.errors(), second.errors());
    }
}
