//! String format predicates

use std::net::IpAddr;
use std::sync::LazyLock;

use base64::Engine as _;
use regex::Regex;

static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]+([._+-][a-zA-Z0-9]+)*@[a-zA-Z0-9]+([.-][a-zA-Z0-9]+)*\.[a-zA-Z]{2,}$")
        .expect("email regex is valid")
});

static URL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^https?://[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?(\.[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?)+(:[0-9]+)?(/[^\s]*)?(\?[^\s]*)?$",
    )
    .expect("url regex is valid")
});

static MAC_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([0-9A-Fa-f]{2}[:-]){5}([0-9A-Fa-f]{2})$").expect("mac regex is valid")
});

static PHONE_TR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(05|5)[0-9]{9}$").expect("phone regex is valid"));

static PHONE_US: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+1|1)?[2-9]\d{2}[2-9]\d{2}\d{4}$").expect("phone regex is valid")
});

// ============================================================================
// EMAIL / URL
// ============================================================================

/// Checks an email address.
///
/// Local part and domain labels are alphanumeric runs joined by single
/// separators, and the top-level label has at least two letters.
#[must_use]
pub fn is_valid_email(s: &str) -> bool {
    EMAIL_REGEX.is_match(s) && !s.contains("..")
}

/// Checks an absolute `http`/`https` URL with a dotted host.
#[must_use]
pub fn is_valid_url(s: &str) -> bool {
    !s.contains(char::is_whitespace) && URL_REGEX.is_match(s)
}

// ============================================================================
// NETWORK
// ============================================================================

/// IP address family accepted by [`is_valid_ip`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IpVersion {
    /// Dotted quad, including IPv4-mapped IPv6 notation.
    V4,
    /// Native IPv6 (IPv4-mapped addresses are rejected).
    V6,
    /// Either family.
    #[default]
    Any,
}

/// Checks an IP address of the given family.
#[must_use]
pub fn is_valid_ip(s: &str, version: IpVersion) -> bool {
    let Ok(addr) = s.parse::<IpAddr>() else {
        return false;
    };
    match (version, addr) {
        (IpVersion::Any, _) | (IpVersion::V4, IpAddr::V4(_)) => true,
        (IpVersion::V4, IpAddr::V6(v6)) => v6.to_ipv4_mapped().is_some(),
        (IpVersion::V6, IpAddr::V4(_)) => false,
        (IpVersion::V6, IpAddr::V6(v6)) => v6.to_ipv4_mapped().is_none(),
    }
}

/// Checks a phone number for a country (`TR` or `US`).
///
/// Spaces, hyphens and parentheses are ignored. Unknown countries never
/// match.
#[must_use]
pub fn is_valid_phone(s: &str, country: &str) -> bool {
    let pattern = match country.to_ascii_uppercase().as_str() {
        "TR" => &*PHONE_TR,
        "US" => &*PHONE_US,
        _ => return false,
    };
    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();
    pattern.is_match(&cleaned)
}

// ============================================================================
// CHARACTER CLASSES
// ============================================================================

/// Non-empty and ASCII letters only.
#[must_use]
pub fn is_alpha(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphabetic())
}

/// Non-empty and ASCII letters or digits only.
#[must_use]
pub fn is_alphanumeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

/// Non-empty and ASCII digits only.
#[must_use]
pub fn is_numeric(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

/// Non-empty and hexadecimal digits only.
#[must_use]
pub fn is_hex(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_hexdigit())
}

/// Six colon- or hyphen-separated octets.
#[must_use]
pub fn is_mac(s: &str) -> bool {
    MAC_REGEX.is_match(s)
}

/// Decodes as padded standard-alphabet base64.
#[must_use]
pub fn is_base64(s: &str) -> bool {
    base64::engine::general_purpose::STANDARD.decode(s).is_ok()
}

// ============================================================================
// TESTS
// ============================================================================
