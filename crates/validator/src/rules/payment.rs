//! Payment identifiers: card numbers and IBANs.

use std::sync::LazyLock;

use num_bigint::BigUint;
use regex::Regex;

static VISA: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^4[0-9]{12}(?:[0-9]{3})?$").expect("card regex is valid"));
static MASTERCARD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^5[1-5][0-9]{14}$").expect("card regex is valid"));
static AMEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^3[47][0-9]{13}$").expect("card regex is valid"));

static IBAN_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}\d{2}[A-Z0-9]{4,}$").expect("iban regex is valid"));

// ============================================================================
// LUHN
// ============================================================================

/// Luhn (mod 10) checksum over a string of ASCII digits.
///
/// Every second digit counted from the right is doubled, subtracting 9 when
/// the product exceeds 9. Any non-digit character, or an empty input, fails.
#[must_use]
pub fn luhn_valid(digits: &str) -> bool {
    if digits.is_empty() {
        return false;
    }

    let mut sum = 0u32;
    for (i, c) in digits.chars().rev().enumerate() {
        let Some(mut digit) = c.to_digit(10) else {
            return false;
        };
        if i % 2 == 1 {
            digit *= 2;
            if digit > 9 {
                digit -= 9;
            }
        }
        sum += digit;
    }
    sum % 10 == 0
}

// ============================================================================
// CREDIT CARD
// ============================================================================

/// Checks a card number, optionally pinned to a brand.
///
/// Separators and any other non-digit characters are removed first. Known
/// brands are `visa`, `mastercard` and `amex` (case-insensitive); an unknown
/// brand never matches.
///
/// ```rust,ignore
/// use sieve_validator::rules::is_valid_credit_card;
///
/// assert!(is_valid_credit_card("4532 0151 1283 0366", Some("visa")));
/// assert!(!is_valid_credit_card("4532015112830366", Some("amex")));
/// ```
#[must_use]
pub fn is_valid_credit_card(number: &str, brand: Option<&str>) -> bool {
    let digits: String = number.chars().filter(char::is_ascii_digit).collect();

    if let Some(brand) = brand.filter(|b| !b.is_empty()) {
        let pattern = match brand.to_ascii_lowercase().as_str() {
            "visa" => &*VISA,
            "mastercard" => &*MASTERCARD,
            "amex" => &*AMEX,
            _ => return false,
        };
        if !pattern.is_match(&digits) {
            return false;
        }
    }

    luhn_valid(&digits)
}

// ============================================================================
// IBAN
// ============================================================================

/// Expected IBAN length for an ISO 3166 country code (ISO 13616 registry).
#[must_use]
pub fn iban_length(country: &str) -> Option<usize> {
    let len = match country {
        "AD" => 24,
        "AE" => 23,
        "AL" => 28,
        "AT" => 20,
        "AZ" => 28,
        "BA" => 20,
        "BE" => 16,
        "BG" => 22,
        "BH" => 22,
        "BR" => 29,
        "BY" => 28,
        "CH" => 21,
        "CR" => 22,
        "CY" => 28,
        "CZ" => 24,
        "DE" => 22,
        "DK" => 18,
        "DO" => 28,
        "EE" => 20,
        "ES" => 24,
        "FI" => 18,
        "FO" => 18,
        "FR" => 27,
        "GB" => 22,
        "GE" => 22,
        "GI" => 23,
        "GL" => 18,
        "GR" => 27,
        "GT" => 28,
        "HR" => 21,
        "HU" => 28,
        "IE" => 22,
        "IL" => 23,
        "IS" => 26,
        "IT" => 27,
        "JO" => 30,
        "KW" => 30,
        "KZ" => 20,
        "LB" => 28,
        "LI" => 21,
        "LT" => 20,
        "LU" => 20,
        "LV" => 21,
        "MC" => 27,
        "MD" => 24,
        "ME" => 22,
        "MK" => 19,
        "MR" => 27,
        "MT" => 31,
        "MU" => 30,
        "NL" => 18,
        "NO" => 15,
        "PK" => 24,
        "PL" => 28,
        "PS" => 29,
        "PT" => 25,
        "QA" => 29,
        "RO" => 24,
        "RS" => 22,
        "SA" => 24,
        "SE" => 24,
        "SI" => 19,
        "SK" => 24,
        "SM" => 27,
        "TN" => 24,
        "TR" => 26,
        "UA" => 29,
        "VA" => 22,
        "VG" => 24,
        "XK" => 20,
        _ => return None,
    };
    Some(len)
}

/// Checks an IBAN with the ISO 7064 mod 97-10 checksum.
///
/// Input is uppercased and spaces are removed. With a country code the IBAN
/// must start with that code and have the registered length; an unknown
/// country never matches.
#[must_use]
pub fn is_valid_iban(iban: &str, country: Option<&str>) -> bool {
    let iban: String = iban
        .chars()
        .filter(|c| *c != ' ')
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if let Some(country) = country.filter(|c| !c.is_empty()) {
        let country = country.to_ascii_uppercase();
        match iban_length(&country) {
            Some(len) if iban.len() == len && iban.starts_with(&country) => {}
            _ => return false,
        }
    }

    if !IBAN_SHAPE.is_match(&iban) {
        return false;
    }

    mod97(&iban) == Some(1)
}

/// Moves the first four characters to the end, expands letters to
/// `A=10 .. Z=35` and returns the remainder modulo 97.
fn mod97(iban: &str) -> Option<u32> {
    let (head, tail) = iban.split_at(4);
    let mut numeric = String::with_capacity(iban.len() * 2);
    for c in tail.chars().chain(head.chars()) {
        match c {
            '0'..='9' => numeric.push(c),
            'A'..='Z' => numeric.push_str(&(u32::from(c) - u32::from('A') + 10).to_string()),
            _ => return None,
        }
    }

    let number = BigUint::parse_bytes(numeric.as_bytes(), 10)?;
    let remainder = number % 97u32;
    u32::try_from(remainder).ok()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const VISA_OK: &str = "4532015112830366";

    #[test]
    fn test_luhn() {
        assert!(luhn_valid("79927398713"));
        assert!(!luhn_valid("79927398710"));
        assert!(!luhn_valid("7992-7398713"));
        assert!(!luhn_valid(""));
    }

    #[test]
    fn test_credit_card_brands() {
        assert!(is_valid_credit_card(VISA_OK, Some("visa")));
        assert!(is_valid_credit_card(VISA_OK, None));
        assert!(is_valid_credit_card("4532-0151-1283-0366", Some("VISA")));
        assert!(is_valid_credit_card("5500000000000004", Some("mastercard")));
        assert!(is_valid_credit_card("378282246310005", Some("amex")));
        assert!(!is_valid_credit_card(VISA_OK, Some("amex")));
        assert!(!is_valid_credit_card(VISA_OK, Some("discover")));
    }

    #[test]
    fn test_every_single_digit_change_breaks_luhn() {
        for pos in 0..VISA_OK.len() {
            let original = VISA_OK.as_bytes()[pos];
            for replacement in b'0'..=b'9' {
                if replacement == original {
                    continue;
                }
                let mut mutated = VISA_OK.as_bytes().to_vec();
                mutated[pos] = replacement;
                let mutated = String::from_utf8(mutated).unwrap();
                assert!(!luhn_valid(&mutated), "{mutated} should fail");
            }
        }
    }

    #[test]
    fn test_iban() {
        assert!(is_valid_iban("TR330006100519786457841326", Some("TR")));
        assert!(is_valid_iban("tr33 0006 1005 1978 6457 8413 26", Some("tr")));
        assert!(is_valid_iban("DE89370400440532013000", None));
        assert!(is_valid_iban("GB82WEST12345698765432", Some("GB")));
        assert!(!is_valid_iban("DE89370400440532013000", Some("TR")));
        assert!(!is_valid_iban("DE89370400440532013001", None));
        assert!(!is_valid_iban("DE89370400440532013000", Some("ZZ")));
        assert!(!is_valid_iban("XX", None));
    }

    proptest! {
        #[test]
        fn luhn_rejects_non_digits(prefix in "[0-9]{0,8}", bad in "[a-z ]", suffix in "[0-9]{0,8}") {
            let input = format!("{prefix}{bad}{suffix}");
            prop_assert!(!luhn_valid(&input));
        }

        #[test]
        fn iban_never_panics(s in "\\PC{0,40}") {
            let _ = is_valid_iban(&s, None);
            let _ = is_valid_iban(&s, Some("TR"));
        }
    }
}
