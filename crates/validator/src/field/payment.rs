//! IBAN and credit card fields

use super::{FieldBase, impl_common_builders};
use crate::error::TransformError;
use crate::i18n::MessageKey;
use crate::result::ValidationResult;
use crate::rules;
use crate::value::Value;

// ============================================================================
// IBAN
// ============================================================================

/// IBAN checked with mod 97-10, optionally for one country.
#[derive(Debug, Clone, Default)]
pub struct IbanField {
    base: FieldBase,
    country: Option<String>,
}

impl_common_builders!(IbanField, base, &str, Value::as_str);

impl IbanField {
    /// Creates an optional field accepting any country.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires the country prefix and its registered length.
    #[must_use = "builder methods must be chained or built"]
    pub fn country(mut self, code: impl Into<String>) -> Self {
        self.country = Some(code.into());
        self
    }

    /// Default substitution and user transforms.
    pub fn clean(&self, raw: Value) -> Result<Value, TransformError> {
        self.base.apply_transforms(raw)
    }

    /// Presence, type, checksum, then custom rules.
    pub fn validate(&self, path: &str, value: &Value, result: &mut ValidationResult) {
        if !self.base.check_presence(path, value, result) {
            return;
        }
        let label = self.base.label_for(path);
        let Some(s) = value.as_str() else {
            result.add_message(path, MessageKey::String, &[&label]);
            return;
        };
        if !rules::is_valid_iban(s, self.country.as_deref()) {
            result.add_message(path, MessageKey::Iban, &[&label]);
        }
        self.base.run_custom(path, value, result);
    }
}

// ============================================================================
// CREDIT CARD
// ============================================================================

/// Card number checked with Luhn, optionally for one brand.
#[derive(Debug, Clone, Default)]
pub struct CreditCardField {
    base: FieldBase,
    brand: Option<String>,
}

impl_common_builders!(CreditCardField, base, &str, Value::as_str);

impl CreditCardField {
    /// Creates an optional field accepting any brand.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires a brand pattern: `visa`, `mastercard` or `amex`.
    #[must_use = "builder methods must be chained or built"]
    pub fn brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = Some(brand.into());
        self
    }

    /// Default substitution and user transforms.
    pub fn clean(&self, raw: Value) -> Result<Value, TransformError> {
        self.base.apply_transforms(raw)
    }

    /// Presence, type, checksum and brand, then custom rules.
    pub fn validate(&self, path: &str, value: &Value, result: &mut ValidationResult) {
        if !self.base.check_presence(path, value, result) {
            return;
        }
        let label = self.base.label_for(path);
        let Some(s) = value.as_str() else {
            result.add_message(path, MessageKey::String, &[&label]);
            return;
        };
        if !rules::is_valid_credit_card(s, self.brand.as_deref()) {
            result.add_message(path, MessageKey::CreditCard, &[&label]);
        }
        self.base.run_custom(path, value, result);
    }
}
