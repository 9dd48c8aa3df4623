//! Error types
//!
//! Two channels exist and they never mix at the type level:
//!
//! - [`ValidationError`] is what user callbacks, [`Rule`](crate::custom::Rule)s
//!   and cross-field validators return when a value is rejected.
//! - [`TransformError`] is what a sanitization step returns when it cannot
//!   produce a value at all (for example an unparseable date).
//!
//! The [`Schema`](crate::Schema) funnels both into the same per-field list of
//! messages inside a [`ValidationResult`](crate::ValidationResult).

use std::borrow::Cow;
use std::fmt;

use smallvec::SmallVec;

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// A structured rejection raised by a callback or rule.
///
/// Uses `Cow<'static, str>` so static codes and messages never allocate.
///
/// # Examples
///
/// ```rust,ignore
/// use sieve_validator::ValidationError;
///
/// let error = ValidationError::new("blacklisted", "value is blacklisted")
///     .with_param("value", "root");
/// assert_eq!(error.param("value"), Some("root"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Error code for programmatic handling.
    pub code: Cow<'static, str>,

    /// Human-readable message. This is the text recorded in the result.
    pub message: Cow<'static, str>,

    /// Optional field path the error refers to.
    pub field: Option<Cow<'static, str>>,

    /// Ordered template parameters (typically 0-2).
    pub params: SmallVec<[(Cow<'static, str>, Cow<'static, str>); 2]>,
}

impl ValidationError {
    /// Creates a new validation error with a code and message.
    pub fn new(code: impl Into<Cow<'static, str>>, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
            params: SmallVec::new(),
        }
    }

    /// Creates a "custom" error with a message.
    pub fn custom(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new("custom", message)
    }

    /// Sets the field path for this error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_field(mut self, field: impl Into<Cow<'static, str>>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Adds a parameter to the error.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for ValidationError {}

impl From<&'static str> for ValidationError {
    fn from(message: &'static str) -> Self {
        Self::custom(message)
    }
}

impl From<String> for ValidationError {
    fn from(message: String) -> Self {
        Self::custom(message)
    }
}

// ============================================================================
// TRANSFORM ERROR
// ============================================================================

/// Failure raised by a transform step.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TransformError {
    /// The value does not have the runtime shape the step expects.
    #[error("expected {expected}, got {actual}")]
    TypeMismatch {
        /// Expected shape name.
        expected: &'static str,
        /// Actual shape name.
        actual: &'static str,
    },

    /// A date string did not match the configured layout.
    #[error("'{input}' does not match date layout '{layout}'")]
    DateParse {
        /// Offending input.
        input: String,
        /// chrono format string.
        layout: String,
    },

    /// An element of a list failed to transform.
    #[error("index {index}: {source}")]
    Element {
        /// Element index.
        index: usize,
        /// Underlying failure.
        source: Box<TransformError>,
    },

    /// A child of a struct failed to transform.
    #[error("field '{field}': {source}")]
    Child {
        /// Child key.
        field: String,
        /// Underlying failure.
        source: Box<TransformError>,
    },

    /// Free-form failure from a user transform.
    #[error("{0}")]
    Custom(String),
}

impl TransformError {
    /// Shorthand for [`TransformError::TypeMismatch`].
    pub(crate) fn mismatch(expected: &'static str, actual: &crate::Value) -> Self {
        Self::TypeMismatch {
            expected,
            actual: actual.type_name(),
        }
    }

    /// Shorthand for [`TransformError::Custom`].
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom(message.into())
    }
}

// ============================================================================
// ASYNC ERROR
// ============================================================================

/// Failure of the opt-in async runner itself, not of the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AsyncError {
    /// The caller's cancellation token fired.
    #[error("validation cancelled")]
    Cancelled,

    /// The configured deadline elapsed.
    #[error("validation timed out after {0:?}")]
    TimedOut(std::time::Duration),
}

// ============================================================================
// CONFIG ERROR
// ============================================================================

/// Failure loading a [`ValidatorConfig`](crate::config::ValidatorConfig).
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The document is not valid JSON for the config shape.
    #[error("invalid validator config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured locale has no catalog entry.
    #[error("unknown locale '{0}'")]
    UnknownLocale(String),
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_with_params() {
        let error = ValidationError::new("min", "Too small")
            .with_field("age")
            .with_param("min", "5");

        assert_eq!(error.param("min"), Some("5"));
        assert_eq!(error.param("max"), None);
        assert_eq!(error.field.as_deref(), Some("age"));
    }

    #[test]
    fn test_display_is_message() {
        let error = ValidationError::custom("value is blacklisted");
        assert_eq!(error.to_string(), "value is blacklisted");
        assert_eq!(error.code, "custom");
    }

    #[test]
    fn test_zero_alloc_static_strings() {
        let error = ValidationError::new("required", "This field is required");
        assert!(matches!(error.code, Cow::Borrowed(_)));
        assert!(matches!(error.message, Cow::Borrowed(_)));
    }

    #[test]
    fn test_transform_error_nesting() {
        let err = TransformError::Child {
            field: "born".into(),
            source: Box::new(TransformError::DateParse {
                input: "tomorrow".into(),
                layout: "%Y-%m-%d".into(),
            }),
        };
        assert_eq!(
            err.to_string(),
            "field 'born': 'tomorrow' does not match date layout '%Y-%m-%d'"
        );
    }
}
