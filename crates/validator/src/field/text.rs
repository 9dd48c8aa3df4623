//! String field

use regex::Regex;

use super::{FieldBase, impl_common_builders, map_text};
use crate::i18n::MessageKey;
use crate::result::ValidationResult;
use crate::rules::{self, IpVersion, PasswordPolicy};
use crate::value::Value;

/// A user pattern. Compilation errors are kept and reported at validation
/// time so that building a schema never fails.
#[derive(Debug, Clone)]
enum Pattern {
    Compiled(Regex),
    Invalid(String),
}

/// String field with length, format and content checks.
///
/// Length is counted in characters, not bytes.
///
/// ```rust,ignore
/// use sieve_validator::prelude::*;
///
/// let username = text().trim().min(3).max(20).alphanumeric().required();
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextField {
    pub(super) base: FieldBase,
    min_len: Option<usize>,
    max_len: Option<usize>,
    email: bool,
    url: bool,
    one_of: Option<Vec<String>>,
    password: Option<PasswordPolicy>,
    ip: Option<IpVersion>,
    phone: Option<String>,
    alpha: bool,
    alphanumeric: bool,
    numeric: bool,
    starts_with: Option<String>,
    ends_with: Option<String>,
    contains: Option<String>,
    pattern: Option<Pattern>,
    mac: bool,
    hex: bool,
    base64: bool,
}

impl_common_builders!(TextField, base, &str, Value::as_str);

impl TextField {
    /// Creates an unconstrained optional string field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Transforms
    // ------------------------------------------------------------------------

    /// Removes leading and trailing whitespace.
    #[must_use = "builder methods must be chained or built"]
    pub fn trim(self) -> Self {
        self.transform(|v| Ok(map_text(v, |s| s.trim().to_string())))
    }

    /// Lowercases the text.
    #[must_use = "builder methods must be chained or built"]
    pub fn lowercase(self) -> Self {
        self.transform(|v| Ok(map_text(v, str::to_lowercase)))
    }

    /// Uppercases the text.
    #[must_use = "builder methods must be chained or built"]
    pub fn uppercase(self) -> Self {
        self.transform(|v| Ok(map_text(v, str::to_uppercase)))
    }

    /// Removes every HTML tag.
    #[must_use = "builder methods must be chained or built"]
    pub fn strip_tags(self) -> Self {
        self.strip_tags_except(&[])
    }

    /// Removes HTML tags except the listed ones.
    #[must_use = "builder methods must be chained or built"]
    pub fn strip_tags_except(self, allowed: &[&str]) -> Self {
        let allowed: Vec<String> = allowed.iter().map(|t| (*t).to_string()).collect();
        self.transform(move |v| {
            let tags: Vec<&str> = allowed.iter().map(String::as_str).collect();
            Ok(map_text(v, |s| rules::strip_html_tags(s, &tags)))
        })
    }

    /// Escapes HTML special characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn escape_html(self) -> Self {
        self.transform(|v| Ok(map_text(v, rules::escape_html)))
    }

    // ------------------------------------------------------------------------
    // Checks
    // ------------------------------------------------------------------------

    /// Minimum length in characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn min(mut self, len: usize) -> Self {
        self.min_len = Some(len);
        self
    }

    /// Maximum length in characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn max(mut self, len: usize) -> Self {
        self.max_len = Some(len);
        self
    }

    /// Requires an email address.
    #[must_use = "builder methods must be chained or built"]
    pub fn email(mut self) -> Self {
        self.email = true;
        self
    }

    /// Requires an http(s) or ftp URL.
    #[must_use = "builder methods must be chained or built"]
    pub fn url(mut self) -> Self {
        self.url = true;
        self
    }

    /// Restricts the value to an allowed set.
    #[must_use = "builder methods must be chained or built"]
    pub fn one_of<I, S>(mut self, allowed: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.one_of = Some(allowed.into_iter().map(Into::into).collect());
        self
    }

    /// Applies the default [`PasswordPolicy`].
    #[must_use = "builder methods must be chained or built"]
    pub fn password(self) -> Self {
        self.password_policy(PasswordPolicy::default())
    }

    /// Applies a custom [`PasswordPolicy`].
    #[must_use = "builder methods must be chained or built"]
    pub fn password_policy(mut self, policy: PasswordPolicy) -> Self {
        self.password = Some(policy);
        self
    }

    /// Requires an IPv4 or IPv6 address.
    #[must_use = "builder methods must be chained or built"]
    pub fn ip(self) -> Self {
        self.ip_version(IpVersion::Any)
    }

    /// Requires an IP address of one family.
    #[must_use = "builder methods must be chained or built"]
    pub fn ip_version(mut self, version: IpVersion) -> Self {
        self.ip = Some(version);
        self
    }

    /// Requires a phone number for a country code (`TR`, `US`).
    #[must_use = "builder methods must be chained or built"]
    pub fn phone(mut self, country: impl Into<String>) -> Self {
        self.phone = Some(country.into());
        self
    }

    /// ASCII letters only.
    #[must_use = "builder methods must be chained or built"]
    pub fn alpha(mut self) -> Self {
        self.alpha = true;
        self
    }

    /// ASCII letters and digits only.
    #[must_use = "builder methods must be chained or built"]
    pub fn alphanumeric(mut self) -> Self {
        self.alphanumeric = true;
        self
    }

    /// ASCII digits only.
    #[must_use = "builder methods must be chained or built"]
    pub fn numeric(mut self) -> Self {
        self.numeric = true;
        self
    }

    /// Requires a prefix.
    #[must_use = "builder methods must be chained or built"]
    pub fn starts_with(mut self, prefix: impl Into<String>) -> Self {
        self.starts_with = Some(prefix.into());
        self
    }

    /// Requires a suffix.
    #[must_use = "builder methods must be chained or built"]
    pub fn ends_with(mut self, suffix: impl Into<String>) -> Self {
        self.ends_with = Some(suffix.into());
        self
    }

    /// Requires a substring.
    #[must_use = "builder methods must be chained or built"]
    pub fn contains(mut self, needle: impl Into<String>) -> Self {
        self.contains = Some(needle.into());
        self
    }

    /// Requires a regex match. An invalid pattern is reported when the field
    /// is validated.
    #[must_use = "builder methods must be chained or built"]
    pub fn regex(mut self, pattern: &str) -> Self {
        self.pattern = Some(match Regex::new(pattern) {
            Ok(re) => Pattern::Compiled(re),
            Err(e) => {
                tracing::warn!(pattern, error = %e, "invalid regex pattern");
                Pattern::Invalid(e.to_string())
            }
        });
        self
    }

    /// Requires a MAC address.
    #[must_use = "builder methods must be chained or built"]
    pub fn mac(mut self) -> Self {
        self.mac = true;
        self
    }

    /// Requires hexadecimal digits.
    #[must_use = "builder methods must be chained or built"]
    pub fn hex(mut self) -> Self {
        self.hex = true;
        self
    }

    /// Requires standard base64.
    #[must_use = "builder methods must be chained or built"]
    pub fn base64(mut self) -> Self {
        self.base64 = true;
        self
    }

    // ------------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------------

    /// Default substitution and user transforms.
    pub fn clean(&self, raw: Value) -> Result<Value, crate::error::TransformError> {
        self.base.apply_transforms(raw)
    }

    /// Presence, type, constraints, then custom rules.
    pub fn validate(&self, path: &str, value: &Value, result: &mut ValidationResult) {
        if !self.base.check_presence(path, value, result) {
            return;
        }
        let label = self.base.label_for(path);
        let Some(s) = value.as_str() else {
            result.add_message(path, MessageKey::String, &[&label]);
            return;
        };
        self.check(path, label, s, result);
        self.base.run_custom(path, value, result);
    }

    pub(super) fn check(&self, path: &str, label: &str, s: &str, result: &mut ValidationResult) {
        let len = s.chars().count();
        if let Some(min) = self.min_len
            && len < min
        {
            result.add_message(path, MessageKey::MinLength, &[&label, &min]);
        }
        if let Some(max) = self.max_len
            && len > max
        {
            result.add_message(path, MessageKey::MaxLength, &[&label, &max]);
        }

        if self.email && !rules::is_valid_email(s) {
            result.add_message(path, MessageKey::Email, &[&label]);
        }
        if self.url && !rules::is_valid_url(s) {
            result.add_message(path, MessageKey::Url, &[&label]);
        }
        if let Some(allowed) = &self.one_of
            && !allowed.iter().any(|a| a == s)
        {
            result.add_message(path, MessageKey::OneOf, &[&label, &allowed.join(", ")]);
        }

        if let Some(policy) = &self.password {
            let messages: Vec<String> = rules::validate_password(s, policy)
                .iter()
                .map(|v| v.localize(result.translator(), label))
                .collect();
            for message in messages {
                result.add_error(path, message);
            }
        }

        if let Some(version) = self.ip
            && !rules::is_valid_ip(s, version)
        {
            result.add_message(path, MessageKey::Ip, &[&label]);
        }
        if let Some(country) = &self.phone
            && !rules::is_valid_phone(s, country)
        {
            result.add_message(path, MessageKey::Phone, &[&label, country]);
        }

        if self.alpha && !rules::is_alpha(s) {
            result.add_message(path, MessageKey::Alpha, &[&label]);
        }
        if self.alphanumeric && !rules::is_alphanumeric(s) {
            result.add_message(path, MessageKey::Alphanumeric, &[&label]);
        }
        if self.numeric && !rules::is_numeric(s) {
            result.add_message(path, MessageKey::NumericString, &[&label]);
        }

        if let Some(prefix) = &self.starts_with
            && !s.starts_with(prefix.as_str())
        {
            result.add_message(path, MessageKey::StartsWith, &[&label, prefix]);
        }
        if let Some(suffix) = &self.ends_with
            && !s.ends_with(suffix.as_str())
        {
            result.add_message(path, MessageKey::EndsWith, &[&label, suffix]);
        }
        if let Some(needle) = &self.contains
            && !s.contains(needle.as_str())
        {
            result.add_message(path, MessageKey::Contains, &[&label, needle]);
        }

        match &self.pattern {
            Some(Pattern::Compiled(re)) if !re.is_match(s) => {
                result.add_message(path, MessageKey::Regex, &[&label]);
            }
            Some(Pattern::Invalid(error)) => {
                result.add_message(path, MessageKey::InvalidPattern, &[&label, error]);
            }
            _ => {}
        }

        if self.mac && !rules::is_mac(s) {
            result.add_message(path, MessageKey::Mac, &[&label]);
        }
        if self.hex && !rules::is_hex(s) {
            result.add_message(path, MessageKey::Hex, &[&label]);
        }
        if self.base64 && !rules::is_base64(s) {
            result.add_message(path, MessageKey::Base64, &[&label]);
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
