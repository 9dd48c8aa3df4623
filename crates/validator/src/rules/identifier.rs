//! UUID predicates

use std::sync::LazyLock;

use regex::Regex;

static UUID_ANY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("uuid regex is valid")
});

/// Per-version patterns: version nibble fixed, RFC 4122 variant `[89ab]`.
static UUID_VERSIONED: LazyLock<[(u8, Regex); 4]> = LazyLock::new(|| {
    [1u8, 3, 4, 5].map(|v| {
        let pattern =
            format!(r"^[0-9a-f]{{8}}-[0-9a-f]{{4}}-{v}[0-9a-f]{{3}}-[89ab][0-9a-f]{{3}}-[0-9a-f]{{12}}$");
        (v, Regex::new(&pattern).expect("uuid regex is valid"))
    })
});

/// Checks a lowercase hyphenated UUID.
///
/// `version` 0 accepts any 8-4-4-4-12 hex layout; 1, 3, 4 and 5 pin the
/// version nibble and variant bits. Other versions never match.
///
/// ```rust,ignore
/// use sieve_validator::rules::is_valid_uuid;
///
/// assert!(is_valid_uuid("550e8400-e29b-41d4-a716-446655440000", 4));
/// assert!(!is_valid_uuid("550e8400-e29b-41d4-a716-446655440000", 1));
/// ```
#[must_use]
pub fn is_valid_uuid(s: &str, version: u8) -> bool {
    if version == 0 {
        return UUID_ANY.is_match(s);
    }
    UUID_VERSIONED
        .iter()
        .find(|(v, _)| *v == version)
        .is_some_and(|(_, re)| re.is_match(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    const V4: &str = "550e8400-e29b-41d4-a716-446655440000";
    const V1: &str = "6ba7b810-9dad-11d1-80b4-00c04fd430c8";

    #[test]
    fn test_versioned() {
        assert!(is_valid_uuid(V4, 4));
        assert!(!is_valid_uuid(V4, 1));
        assert!(is_valid_uuid(V1, 1));
        assert!(!is_valid_uuid(V1, 5));
    }

    #[test]
    fn test_any_version() {
        assert!(is_valid_uuid(V4, 0));
        assert!(is_valid_uuid("00000000-0000-0000-0000-000000000000", 0));
        assert!(!is_valid_uuid("550e8400e29b41d4a716446655440000", 0));
    }

    #[test]
    fn test_uppercase_and_unknown_versions_rejected() {
        assert!(!is_valid_uuid(&V4.to_uppercase(), 0));
        assert!(!is_valid_uuid(V4, 2));
        assert!(!is_valid_uuid(V4, 7));
    }
}
