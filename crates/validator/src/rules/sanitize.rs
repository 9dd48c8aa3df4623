//! Sanitizers and content checks for free-form text.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Longest filename [`sanitize_filename`] returns, in bytes.
pub const MAX_FILENAME_LEN: usize = 255;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<\s*/?\s*([a-zA-Z][a-zA-Z0-9]*)?[^>]*>").expect("tag regex is valid"));

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-zA-Z0-9\-_.]").expect("filename regex is valid"));

static CONSECUTIVE_DOTS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.{2,}").expect("dots regex is valid"));

static EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x{1F600}-\x{1F64F}\x{1F300}-\x{1F5FF}\x{1F680}-\x{1F6FF}\x{2600}-\x{26FF}\x{2700}-\x{27BF}]")
        .expect("emoji regex is valid")
});

static LATIN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\p{Latin}+$").expect("latin regex is valid"));

static DOMAIN_WITH_SUBDOMAINS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?\.)+[a-zA-Z]{2,}$")
        .expect("domain regex is valid")
});

static DOMAIN_SINGLE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9-]*[a-zA-Z0-9])?\.[a-zA-Z]{2,}$")
        .expect("domain regex is valid")
});

const TURKISH_CHARS: &[char] = &['ç', 'Ç', 'ğ', 'Ğ', 'ı', 'İ', 'ö', 'Ö', 'ş', 'Ş', 'ü', 'Ü'];

// ============================================================================
// HTML
// ============================================================================

/// Removes HTML tags, keeping those whose name is in `allowed`
/// (case-insensitive).
///
/// ```rust,ignore
/// use sieve_validator::rules::strip_html_tags;
///
/// assert_eq!(strip_html_tags("<p>Hi <b>there</b></p>", &["b"]), "Hi <b>there</b>");
/// ```
#[must_use]
pub fn strip_html_tags(input: &str, allowed: &[&str]) -> String {
    HTML_TAG
        .replace_all(input, |caps: &Captures<'_>| {
            let keep = caps.get(1).is_some_and(|name| {
                allowed
                    .iter()
                    .any(|tag| tag.eq_ignore_ascii_case(name.as_str()))
            });
            if keep {
                caps[0].to_string()
            } else {
                String::new()
            }
        })
        .into_owned()
}

/// Escapes `& < > " '` as HTML entities.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

// ============================================================================
// FILENAMES / EMOJI
// ============================================================================

/// Produces a portable filename.
///
/// Turkish letters are transliterated, anything outside `[A-Za-z0-9-_.]` is
/// dropped, dot runs collapse to one dot, a leading and a trailing dot are
/// removed and the result is capped at [`MAX_FILENAME_LEN`] bytes.
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    let transliterated: String = name.chars().map(transliterate_turkish).collect();
    let safe = UNSAFE_FILENAME_CHARS.replace_all(&transliterated, "");
    let collapsed = CONSECUTIVE_DOTS.replace_all(&safe, ".");
    let collapsed: &str = &collapsed;

    let trimmed = collapsed.strip_prefix('.').unwrap_or(collapsed);
    let trimmed = trimmed.strip_suffix('.').unwrap_or(trimmed);

    // only ASCII survives the filter, so byte truncation is char-safe
    let end = trimmed.len().min(MAX_FILENAME_LEN);
    trimmed[..end].to_string()
}

const fn transliterate_turkish(c: char) -> char {
    match c {
        'ç' => 'c',
        'Ç' => 'C',
        'ğ' => 'g',
        'Ğ' => 'G',
        'ı' => 'i',
        'İ' => 'I',
        'ö' => 'o',
        'Ö' => 'O',
        'ş' => 's',
        'Ş' => 'S',
        'ü' => 'u',
        'Ü' => 'U',
        other => other,
    }
}

/// Removes common emoji and pictograph ranges when `remove` is set.
#[must_use]
pub fn filter_emoji(input: &str, remove: bool) -> String {
    if !remove {
        return input.to_string();
    }
    match EMOJI.replace_all(input, "") {
        Cow::Borrowed(unchanged) => unchanged.to_string(),
        Cow::Owned(filtered) => filtered,
    }
}

// ============================================================================
// CONTENT CHECKS
// ============================================================================

/// Returns `true` if any Turkish-specific letter is present.
#[must_use]
pub fn has_turkish_chars(input: &str) -> bool {
    input.contains(TURKISH_CHARS)
}

/// Checks a domain name.
///
/// Labels start and end with an alphanumeric character, hyphens only
/// inside, and the TLD has at least two letters. Without
/// `allow_subdomains` exactly one label precedes the TLD.
#[must_use]
pub fn is_valid_domain(domain: &str, allow_subdomains: bool) -> bool {
    if allow_subdomains {
        DOMAIN_WITH_SUBDOMAINS.is_match(domain)
    } else {
        DOMAIN_SINGLE_LABEL.is_match(domain)
    }
}

/// Checks that every character belongs to a named set: `latin`,
/// `alphanumeric`, `numeric` or `alpha`. Unknown names never match.
#[must_use]
pub fn validate_charset(input: &str, charset: &str) -> bool {
    match charset {
        "latin" => LATIN.is_match(input),
        "alphanumeric" => super::is_alphanumeric(input),
        "numeric" => super::is_numeric(input),
        "alpha" => super::is_alpha(input),
        _ => false,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_html_tags("<p>Hello <b>World</b></p>", &[]), "Hello World");
        assert_eq!(
            strip_html_tags("<p>Hi <B>there</B><script>x</script></p>", &["b"]),
            "Hi <B>there</B>x"
        );
        assert_eq!(strip_html_tags("a <!-- note --> b", &["b"]), "a  b");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#39;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Çalışma Planı.pdf"), "CalismaPlani.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd"), "etcpasswd");
        assert_eq!(sanitize_filename(".hidden..file."), "hidden.file");
        assert_eq!(sanitize_filename(&"a".repeat(300)).len(), MAX_FILENAME_LEN);
    }

    #[test]
    fn test_filter_emoji() {
        assert_eq!(filter_emoji("hi 😀 there ☀", true), "hi  there ");
        assert_eq!(filter_emoji("hi 😀", false), "hi 😀");
    }

    #[test]
    fn test_turkish_and_charset() {
        assert!(has_turkish_chars("şeker"));
        assert!(!has_turkish_chars("seker"));
        assert!(validate_charset("Straße", "latin"));
        assert!(!validate_charset("Москва", "latin"));
        assert!(validate_charset("abc123", "alphanumeric"));
        assert!(!validate_charset("abc", "klingon"));
    }

    #[test]
    fn test_domains() {
        assert!(is_valid_domain("example.com", false));
        assert!(!is_valid_domain("www.example.com", false));
        assert!(is_valid_domain("www.example.com", true));
        assert!(!is_valid_domain("-bad.com", true));
        assert!(!is_valid_domain("bad-.com", true));
        assert!(!is_valid_domain("example.c", true));
    }
}
