//! Password policy evaluation.
//!
//! [`validate_password`] runs every check of a [`PasswordPolicy`] and returns
//! all violations, never just the first one. Violations are structured so
//! the caller decides how to phrase them; text fields render them through
//! the message catalog.

use std::collections::HashSet;
use std::fmt;

use crate::i18n::{MessageKey, Translator};

/// Blocklist compared case-insensitively against the whole password.
const COMMON_PASSWORDS: &[&str] = &[
    "password", "123456", "qwerty", "111111", "abc123", "letmein", "admin", "welcome", "monkey",
    "dragon",
];

/// Sequences rejected anywhere in the lowercased password, forwards or
/// reversed.
const KEYBOARD_SEQUENCES: &[&str] = &[
    "qwerty", "asdfgh", "zxcvbn", "123456", "654321", "abc", "cba", "xyz",
];

// ============================================================================
// POLICY
// ============================================================================

/// Password requirements.
///
/// # Examples
///
/// ```rust,ignore
/// use sieve_validator::rules::{PasswordPolicy, validate_password};
///
/// let policy = PasswordPolicy::new().min_length(10).min_entropy(60.0);
/// assert!(!validate_password("Short1!", &policy).is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PasswordPolicy {
    min_length: usize,
    max_length: usize,
    require_uppercase: bool,
    require_lowercase: bool,
    require_numeric: bool,
    require_special: bool,
    special_chars: String,
    min_unique_chars: usize,
    max_repeating_chars: usize,
    disallow_common: bool,
    disallow_keyboard: bool,
    min_entropy: f64,
}

impl PasswordPolicy {
    /// Default set of special characters.
    pub const DEFAULT_SPECIAL_CHARS: &'static str = "!@#$%^&*(),.?\":{}|<>+-";

    /// Strict defaults: 8..=72 characters, all four classes, six unique
    /// characters, runs of at most three, blocklist and keyboard checks, and
    /// at least 50 bits of entropy.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_length: 8,
            max_length: 72,
            require_uppercase: true,
            require_lowercase: true,
            require_numeric: true,
            require_special: true,
            special_chars: Self::DEFAULT_SPECIAL_CHARS.to_string(),
            min_unique_chars: 6,
            max_repeating_chars: 3,
            disallow_common: true,
            disallow_keyboard: true,
            min_entropy: 50.0,
        }
    }

    /// Length and class requirements only.
    #[must_use]
    pub fn relaxed() -> Self {
        Self::new()
            .require_special(false)
            .min_unique_chars(0)
            .max_repeating_chars(0)
            .disallow_keyboard(false)
            .min_entropy(0.0)
    }

    /// Sets the minimum length in characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = len;
        self
    }

    /// Sets the maximum length in characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = len;
        self
    }

    /// Requires an ASCII uppercase letter.
    #[must_use = "builder methods must be chained or built"]
    pub fn require_uppercase(mut self, required: bool) -> Self {
        self.require_uppercase = required;
        self
    }

    /// Requires an ASCII lowercase letter.
    #[must_use = "builder methods must be chained or built"]
    pub fn require_lowercase(mut self, required: bool) -> Self {
        self.require_lowercase = required;
        self
    }

    /// Requires an ASCII digit.
    #[must_use = "builder methods must be chained or built"]
    pub fn require_numeric(mut self, required: bool) -> Self {
        self.require_numeric = required;
        self
    }

    /// Requires one of [`special_chars`](Self::special_chars).
    #[must_use = "builder methods must be chained or built"]
    pub fn require_special(mut self, required: bool) -> Self {
        self.require_special = required;
        self
    }

    /// Replaces the accepted special characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn special_chars(mut self, chars: impl Into<String>) -> Self {
        self.special_chars = chars.into();
        self
    }

    /// Minimum number of distinct characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn min_unique_chars(mut self, count: usize) -> Self {
        self.min_unique_chars = count;
        self
    }

    /// Longest allowed run of one repeated character; 0 disables the check.
    #[must_use = "builder methods must be chained or built"]
    pub fn max_repeating_chars(mut self, count: usize) -> Self {
        self.max_repeating_chars = count;
        self
    }

    /// Toggles the common-password blocklist.
    #[must_use = "builder methods must be chained or built"]
    pub fn disallow_common(mut self, enabled: bool) -> Self {
        self.disallow_common = enabled;
        self
    }

    /// Toggles keyboard-sequence detection.
    #[must_use = "builder methods must be chained or built"]
    pub fn disallow_keyboard(mut self, enabled: bool) -> Self {
        self.disallow_keyboard = enabled;
        self
    }

    /// Minimum entropy in bits, see [`password_entropy`].
    #[must_use = "builder methods must be chained or built"]
    pub fn min_entropy(mut self, bits: f64) -> Self {
        self.min_entropy = bits;
        self
    }
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// VIOLATIONS
// ============================================================================

/// A single failed policy check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordViolation {
    /// Shorter than the minimum.
    TooShort(usize),
    /// Longer than the maximum.
    TooLong(usize),
    /// No uppercase letter.
    MissingUppercase,
    /// No lowercase letter.
    MissingLowercase,
    /// No digit.
    MissingNumeric,
    /// None of the listed special characters.
    MissingSpecial(String),
    /// Fewer distinct characters than required.
    TooFewUnique(usize),
    /// Contains a keyboard sequence.
    KeyboardSequence,
    /// A character repeats more often in a row than allowed.
    Repeating(usize),
    /// On the blocklist.
    Common,
    /// Entropy below the threshold.
    Weak,
}

impl PasswordViolation {
    /// Catalog key used to render this violation.
    #[must_use]
    pub const fn message_key(&self) -> MessageKey {
        match self {
            Self::TooShort(_) => MessageKey::MinLength,
            Self::TooLong(_) => MessageKey::MaxLength,
            Self::MissingUppercase => MessageKey::PasswordUppercase,
            Self::MissingLowercase => MessageKey::PasswordLowercase,
            Self::MissingNumeric => MessageKey::PasswordNumeric,
            Self::MissingSpecial(_) => MessageKey::PasswordSpecial,
            Self::TooFewUnique(_) => MessageKey::PasswordUniqueChars,
            Self::KeyboardSequence => MessageKey::PasswordKeyboard,
            Self::Repeating(_) => MessageKey::PasswordRepeating,
            Self::Common => MessageKey::PasswordCommon,
            Self::Weak => MessageKey::PasswordWeak,
        }
    }

    /// Renders the violation for a field label.
    #[must_use]
    pub fn localize(&self, translator: &Translator, label: &str) -> String {
        let key = self.message_key();
        match self {
            Self::TooShort(n) | Self::TooLong(n) | Self::TooFewUnique(n) | Self::Repeating(n) => {
                translator.format(key, &[&label, n])
            }
            Self::MissingSpecial(chars) => translator.format(key, &[&label, chars]),
            _ => translator.format(key, &[&label]),
        }
    }
}

impl fmt::Display for PasswordViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort(n) => write!(f, "must be at least {n} characters long"),
            Self::TooLong(n) => write!(f, "must be at most {n} characters long"),
            Self::MissingUppercase => f.write_str("must contain at least one uppercase letter"),
            Self::MissingLowercase => f.write_str("must contain at least one lowercase letter"),
            Self::MissingNumeric => f.write_str("must contain at least one number"),
            Self::MissingSpecial(chars) => {
                write!(f, "must contain at least one special character ({chars})")
            }
            Self::TooFewUnique(n) => write!(f, "must contain at least {n} unique characters"),
            Self::KeyboardSequence => f.write_str("cannot contain keyboard sequences"),
            Self::Repeating(n) => write!(f, "cannot have more than {n} repeating characters"),
            Self::Common => f.write_str("is too common"),
            Self::Weak => f.write_str("is not strong enough"),
        }
    }
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Runs every check of `policy` against `password`.
///
/// An empty vector means the password complies.
#[must_use]
pub fn validate_password(password: &str, policy: &PasswordPolicy) -> Vec<PasswordViolation> {
    let mut violations = Vec::new();
    let len = password.chars().count();

    if len < policy.min_length {
        violations.push(PasswordViolation::TooShort(policy.min_length));
    }
    if len > policy.max_length {
        violations.push(PasswordViolation::TooLong(policy.max_length));
    }
    if policy.require_uppercase && !password.chars().any(|c| c.is_ascii_uppercase()) {
        violations.push(PasswordViolation::MissingUppercase);
    }
    if policy.require_lowercase && !password.chars().any(|c| c.is_ascii_lowercase()) {
        violations.push(PasswordViolation::MissingLowercase);
    }
    if policy.require_numeric && !password.chars().any(|c| c.is_ascii_digit()) {
        violations.push(PasswordViolation::MissingNumeric);
    }
    if policy.require_special && !password.chars().any(|c| policy.special_chars.contains(c)) {
        violations.push(PasswordViolation::MissingSpecial(policy.special_chars.clone()));
    }
    if count_unique_chars(password) < policy.min_unique_chars {
        violations.push(PasswordViolation::TooFewUnique(policy.min_unique_chars));
    }
    if policy.disallow_keyboard && has_keyboard_sequence(password) {
        violations.push(PasswordViolation::KeyboardSequence);
    }
    if policy.max_repeating_chars > 0
        && max_consecutive_repeated(password) > policy.max_repeating_chars
    {
        violations.push(PasswordViolation::Repeating(policy.max_repeating_chars));
    }
    if policy.disallow_common && is_common_password(password) {
        violations.push(PasswordViolation::Common);
    }
    if password_entropy(password) < policy.min_entropy {
        violations.push(PasswordViolation::Weak);
    }

    violations
}

/// `length * log2(pool)` where the pool sums 26 (lowercase), 26
/// (uppercase), 10 (digits) and 32 (anything else) for each class present.
#[must_use]
pub fn password_entropy(password: &str) -> f64 {
    let (mut lower, mut upper, mut digit, mut other) = (false, false, false, false);
    let mut len = 0usize;
    for c in password.chars() {
        len += 1;
        match c {
            'a'..='z' => lower = true,
            'A'..='Z' => upper = true,
            '0'..='9' => digit = true,
            _ => other = true,
        }
    }

    let pool = [(lower, 26.0), (upper, 26.0), (digit, 10.0), (other, 32.0)]
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, size)| size)
        .sum::<f64>();

    if pool == 0.0 {
        return 0.0;
    }
    len as f64 * pool.log2()
}

fn count_unique_chars(password: &str) -> usize {
    password.chars().collect::<HashSet<_>>().len()
}

fn max_consecutive_repeated(password: &str) -> usize {
    let mut max = 0;
    let mut current = 0;
    let mut prev: Option<char> = None;

    for c in password.chars() {
        if Some(c) == prev {
            current += 1;
        } else {
            current = 1;
        }
        max = max.max(current);
        prev = Some(c);
    }

    max
}

fn has_keyboard_sequence(password: &str) -> bool {
    let lower = password.to_lowercase();
    KEYBOARD_SEQUENCES.iter().any(|seq| {
        let reversed: String = seq.chars().rev().collect();
        lower.contains(seq) || lower.contains(&reversed)
    })
}

fn is_common_password(password: &str) -> bool {
    let lower = password.to_lowercase();
    COMMON_PASSWORDS.iter().any(|&common| lower == common)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_strong_password_passes_defaults() {
        assert_eq!(validate_password("Str0ng!Pass99", &PasswordPolicy::new()), vec![]);
    }

    #[test]
    fn test_weak_password_collects_all_violations() {
        let violations = validate_password("Weak1", &PasswordPolicy::new());
        assert_eq!(
            violations,
            vec![
                PasswordViolation::TooShort(8),
                PasswordViolation::MissingSpecial(PasswordPolicy::DEFAULT_SPECIAL_CHARS.into()),
                PasswordViolation::TooFewUnique(6),
                PasswordViolation::Weak,
            ]
        );
    }

    #[test]
    fn test_common_and_keyboard() {
        let policy = PasswordPolicy::relaxed().require_uppercase(false).require_numeric(false);
        assert!(validate_password("Password", &policy).contains(&PasswordViolation::Common));

        let strict = PasswordPolicy::new();
        assert!(
            validate_password("Aa1!ytrewq99", &strict).contains(&PasswordViolation::KeyboardSequence)
        );
        assert!(
            validate_password("Zz9!CBAmnop", &strict).contains(&PasswordViolation::KeyboardSequence)
        );
    }

    #[test]
    fn test_repeating_run() {
        let policy = PasswordPolicy::new();
        assert!(validate_password("Baaaa1!Xcdefg", &policy).contains(&PasswordViolation::Repeating(3)));
        assert!(!validate_password("Aaa1!Bcdefgh", &policy).contains(&PasswordViolation::Repeating(3)));
        assert_eq!(max_consecutive_repeated(""), 0);
    }

    #[test]
    fn test_entropy_by_class_presence() {
        assert_eq!(password_entropy(""), 0.0);
        assert!((password_entropy("aaaa") - 4.0 * 26f64.log2()).abs() < 1e-9);
        assert!((password_entropy("aA1!") - 4.0 * 94f64.log2()).abs() < 1e-9);
    }

    #[test]
    fn test_localized_violation() {
        let t = Translator::default();
        assert_eq!(
            PasswordViolation::TooShort(8).localize(&t, "Password"),
            "Password must be at least 8 characters long"
        );
        assert_eq!(
            PasswordViolation::MissingUppercase.localize(&t.with_locale("tr"), "Şifre"),
            "Şifre en az bir büyük harf içermelidir"
        );
    }
}
