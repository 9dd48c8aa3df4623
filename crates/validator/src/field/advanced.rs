//! String field with sanitizers and content checks

use super::{TextField, impl_common_builders, map_text};
use crate::error::TransformError;
use crate::i18n::MessageKey;
use crate::result::ValidationResult;
use crate::rules;
use crate::value::Value;

/// A [`TextField`] plus sanitizing transforms and content checks.
///
/// The wrapped text checks run first, then the checks declared here, then
/// custom rules.
///
/// ```rust,ignore
/// use sieve_validator::prelude::*;
///
/// let upload = advanced_text()
///     .sanitize_filename()
///     .text(|t| t.ends_with(".pdf"))
///     .required();
/// ```
#[derive(Debug, Clone, Default)]
pub struct AdvancedTextField {
    inner: TextField,
    turkish_chars: Option<bool>,
    domain: Option<bool>,
    charset: Option<String>,
}

impl_common_builders!(AdvancedTextField, inner.base, &str, Value::as_str);

impl From<TextField> for AdvancedTextField {
    fn from(inner: TextField) -> Self {
        Self {
            inner,
            ..Self::default()
        }
    }
}

impl TextField {
    /// Upgrades to an [`AdvancedTextField`], keeping every setting.
    #[must_use]
    pub fn advanced(self) -> AdvancedTextField {
        AdvancedTextField::from(self)
    }
}

impl AdvancedTextField {
    /// Creates an unconstrained optional field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the wrapped text field.
    #[must_use = "builder methods must be chained or built"]
    pub fn text(mut self, configure: impl FnOnce(TextField) -> TextField) -> Self {
        self.inner = configure(self.inner);
        self
    }

    /// Removes HTML tags except the listed ones.
    #[must_use = "builder methods must be chained or built"]
    pub fn strip_tags(mut self, allowed: &[&str]) -> Self {
        self.inner = self.inner.strip_tags_except(allowed);
        self
    }

    /// Escapes HTML special characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn escape_html(mut self) -> Self {
        self.inner = self.inner.escape_html();
        self
    }

    /// Rewrites the value into a portable filename.
    #[must_use = "builder methods must be chained or built"]
    pub fn sanitize_filename(self) -> Self {
        self.transform(|v| Ok(map_text(v, rules::sanitize_filename)))
    }

    /// Drops emoji when `remove` is set.
    #[must_use = "builder methods must be chained or built"]
    pub fn filter_emoji(self, remove: bool) -> Self {
        self.transform(move |v| Ok(map_text(v, |s| rules::filter_emoji(s, remove))))
    }

    /// `true` requires at least one Turkish letter, `false` forbids them.
    #[must_use = "builder methods must be chained or built"]
    pub fn turkish_chars(mut self, allow: bool) -> Self {
        self.turkish_chars = Some(allow);
        self
    }

    /// Requires a domain name.
    #[must_use = "builder methods must be chained or built"]
    pub fn domain(mut self, allow_subdomains: bool) -> Self {
        self.domain = Some(allow_subdomains);
        self
    }

    /// Requires every character to be in a named set, see
    /// [`validate_charset`](crate::rules::validate_charset).
    #[must_use = "builder methods must be chained or built"]
    pub fn charset(mut self, name: impl Into<String>) -> Self {
        self.charset = Some(name.into());
        self
    }

    /// Default substitution and user transforms.
    pub fn clean(&self, raw: Value) -> Result<Value, TransformError> {
        self.inner.clean(raw)
    }

    /// Presence, type, text checks, content checks, then custom rules.
    pub fn validate(&self, path: &str, value: &Value, result: &mut ValidationResult) {
        let base = &self.inner.base;
        if !base.check_presence(path, value, result) {
            return;
        }
        let label = base.label_for(path);
        let Some(s) = value.as_str() else {
            result.add_message(path, MessageKey::String, &[&label]);
            return;
        };

        self.inner.check(path, label, s, result);

        if let Some(allow) = self.turkish_chars {
            match (allow, rules::has_turkish_chars(s)) {
                (true, false) => result.add_message(path, MessageKey::TurkishChars, &[&label]),
                (false, true) => result.add_message(path, MessageKey::NoTurkishChars, &[&label]),
                _ => {}
            }
        }
        if let Some(allow_subdomains) = self.domain
            && !rules::is_valid_domain(s, allow_subdomains)
        {
            result.add_message(path, MessageKey::Domain, &[&label]);
        }
        if let Some(charset) = &self.charset
            && !rules::validate_charset(s, charset)
        {
            result.add_message(path, MessageKey::Charset, &[&label, charset]);
        }

        base.run_custom(path, value, result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, advanced_text, text};
    use pretty_assertions::assert_eq;

    fn run(field: AdvancedTextField, value: &str) -> ValidationResult {
        let field = Field::from(field);
        let mut result = ValidationResult::default();
        let cleaned = field.transform(Value::from(value)).unwrap();
        field.validate("f", &cleaned, &mut result);
        result
    }

    #[test]
    fn test_sanitizers() {
        let field = advanced_text().strip_tags(&[]).filter_emoji(true).escape_html();
        assert_eq!(
            field.clean(Value::from("<p>Tom & 😀 Jerry</p>")).unwrap(),
            Value::from("Tom &amp;  Jerry")
        );

        let file = advanced_text().sanitize_filename();
        assert_eq!(file.clean(Value::from("Özet Raporu.PDF")).unwrap(), Value::from("OzetRaporu.PDF"));
    }

    #[test]
    fn test_turkish_chars() {
        assert!(!run(advanced_text().turkish_chars(true), "şehir").has_errors());
        assert_eq!(
            run(advanced_text().turkish_chars(true), "city").field_errors("f"),
            ["f must contain Turkish characters"]
        );
        assert_eq!(
            run(advanced_text().turkish_chars(false), "şehir").field_errors("f"),
            ["f must not contain Turkish characters"]
        );
    }

    #[test]
    fn test_text_checks_run_before_content_checks() {
        let field = text().min(20).advanced().domain(false).label("Site");
        assert_eq!(
            run(field, "www.example.com").field_errors("f"),
            [
                "Site must be at least 20 characters long",
                "Site must be a valid domain name",
            ]
        );
    }

    #[test]
    fn test_charset() {
        let field = advanced_text().charset("numeric");
        assert!(!run(field.clone(), "12345").has_errors());
        assert_eq!(run(field, "12a45").field_errors("f"), ["f must contain only 'numeric' characters"]);
    }

    #[test]
    fn test_required_configured_through_wrapper() {
        let field = Field::from(advanced_text().text(|t| t.min(3)).required());
        let mut result = ValidationResult::default();
        field.validate("f", &Value::Null, &mut result);
        assert_eq!(result.field_errors("f"), ["f is required"]);
    }
}
