//! Configuration for validation
//!
//! Settings that are usually shared by every schema of an application. The
//! struct is serde-friendly so it can live in a larger config file:
//!
//! ```rust,ignore
//! use sieve_validator::config::ValidatorConfig;
//!
//! let config = ValidatorConfig::from_json(r#"{ "locale": { "locale": "tr" } }"#)?;
//! let schema = Schema::new().with_config(&config);
//! ```

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::field::{DEFAULT_DATE_LAYOUT, DateField};
use crate::i18n::{Catalog, Translator};

/// Main configuration for validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Message locale settings
    pub locale: LocaleConfig,
    /// chrono layout for fields built with [`ValidatorConfig::date`]
    pub date_layout: String,
    /// Deadline for async validators, in milliseconds
    pub async_timeout_ms: Option<u64>,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            locale: LocaleConfig::default(),
            date_layout: DEFAULT_DATE_LAYOUT.to_string(),
            async_timeout_ms: None,
        }
    }
}

impl ValidatorConfig {
    /// Create a new configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Turkish messages with English fallback and a five second async deadline
    #[must_use]
    pub fn turkish() -> Self {
        Self {
            locale: LocaleConfig {
                locale: "tr".to_string(),
                fallback: true,
            },
            async_timeout_ms: Some(5_000),
            ..Self::default()
        }
    }

    /// Parse a JSON document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] for malformed JSON or mistyped values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the locale against a catalog.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownLocale`] when `catalog` has no such locale.
    pub fn validate(&self, catalog: &Catalog) -> Result<(), ConfigError> {
        if catalog.has_locale(&self.locale.locale) {
            Ok(())
        } else {
            Err(ConfigError::UnknownLocale(self.locale.locale.clone()))
        }
    }

    /// Translator over the built-in catalog.
    #[must_use]
    pub fn translator(&self) -> Translator {
        self.configure(Translator::default())
    }

    /// Translator over a custom catalog.
    #[must_use]
    pub fn translator_with(&self, catalog: Arc<Catalog>) -> Translator {
        self.configure(Translator::new(catalog))
    }

    fn configure(&self, translator: Translator) -> Translator {
        translator
            .with_locale(self.locale.locale.clone())
            .with_fallback(self.locale.fallback)
    }

    /// Date field using the configured layout.
    #[must_use]
    pub fn date(&self) -> DateField {
        DateField::new().layout(self.date_layout.clone())
    }

    /// Configured async deadline.
    #[must_use]
    pub fn async_timeout(&self) -> Option<Duration> {
        self.async_timeout_ms.map(Duration::from_millis)
    }

    /// Async context carrying the configured deadline.
    #[cfg(feature = "async")]
    #[must_use]
    pub fn async_context(&self) -> crate::schema::AsyncContext {
        let ctx = crate::schema::AsyncContext::new();
        match self.async_timeout() {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx,
        }
    }
}

/// Message locale settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocaleConfig {
    /// Active locale code
    pub locale: String,
    /// Fall back to the catalog's default locale for missing keys
    pub fallback: bool,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ValidatorConfig::from_json(r#"{ "locale": { "locale": "tr" } }"#).unwrap();
        assert_eq!(config.locale.locale, "tr");
        assert!(config.locale.fallback);
        assert_eq!(config.date_layout, DEFAULT_DATE_LAYOUT);
        assert_eq!(config.async_timeout(), None);
    }

    #[test]
    fn test_malformed_json() {
        let err = ValidatorConfig::from_json(r#"{ "async_timeout_ms": "soon" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_unknown_locale() {
        let mut config = ValidatorConfig::new();
        config.locale.locale = "xx".into();
        assert!(matches!(
            config.validate(&Catalog::builtin()),
            Err(ConfigError::UnknownLocale(l)) if l == "xx"
        ));
        assert!(ValidatorConfig::turkish().validate(&Catalog::builtin()).is_ok());
    }

    #[test]
    fn test_translator_follows_locale() {
        let translator = ValidatorConfig::turkish().translator();
        assert_eq!(translator.locale(), "tr");
    }

    #[test]
    fn test_date_layout() {
        let config = ValidatorConfig {
            date_layout: "%d.%m.%Y".into(),
            ..ValidatorConfig::default()
        };
        assert_eq!(config.date().layout_str(), "%d.%m.%Y");
    }

    #[test]
    fn test_round_trip() {
        let config = ValidatorConfig::turkish();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ValidatorConfig::from_json(&json).unwrap(), config);
    }
}
