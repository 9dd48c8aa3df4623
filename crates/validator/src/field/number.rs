//! Numeric field

use super::{FieldBase, impl_common_builders};
use crate::error::TransformError;
use crate::i18n::MessageKey;
use crate::result::ValidationResult;
use crate::value::Value;

/// Tolerance for the integer and multiple-of checks.
const EPSILON: f64 = 1e-9;

/// Integer or float field.
///
/// Any numeric width is accepted and compared as `f64`. Text and booleans are
/// never coerced, `"42"` is a type error.
#[derive(Debug, Clone, Default)]
pub struct NumberField {
    base: FieldBase,
    integer: bool,
    min: Option<f64>,
    max: Option<f64>,
    positive: bool,
    negative: bool,
    multiple_of: Option<f64>,
    between: Option<(f64, f64)>,
}

impl_common_builders!(NumberField, base, f64, Value::as_f64);

impl NumberField {
    /// Creates an unconstrained optional numeric field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requires a whole number.
    #[must_use = "builder methods must be chained or built"]
    pub fn integer(mut self) -> Self {
        self.integer = true;
        self
    }

    /// Inclusive lower bound.
    #[must_use = "builder methods must be chained or built"]
    pub fn min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Inclusive upper bound.
    #[must_use = "builder methods must be chained or built"]
    pub fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Strictly greater than zero.
    #[must_use = "builder methods must be chained or built"]
    pub fn positive(mut self) -> Self {
        self.positive = true;
        self
    }

    /// Strictly less than zero.
    #[must_use = "builder methods must be chained or built"]
    pub fn negative(mut self) -> Self {
        self.negative = true;
        self
    }

    /// Requires a multiple of `divisor`. A zero divisor never matches.
    #[must_use = "builder methods must be chained or built"]
    pub fn multiple_of(mut self, divisor: f64) -> Self {
        self.multiple_of = Some(divisor);
        self
    }

    /// Inclusive range reported as a single message.
    #[must_use = "builder methods must be chained or built"]
    pub fn between(mut self, min: f64, max: f64) -> Self {
        self.between = Some((min, max));
        self
    }

    /// Default substitution and user transforms.
    pub fn clean(&self, raw: Value) -> Result<Value, TransformError> {
        self.base.apply_transforms(raw)
    }

    /// Presence, type, bounds, then custom rules.
    pub fn validate(&self, path: &str, value: &Value, result: &mut ValidationResult) {
        if !self.base.check_presence(path, value, result) {
            return;
        }
        let label = self.base.label_for(path);
        let Some(n) = value.as_f64() else {
            result.add_message(path, MessageKey::Numeric, &[&label]);
            return;
        };

        if self.integer && (!n.is_finite() || n.fract() != 0.0) {
            result.add_message(path, MessageKey::Integer, &[&label]);
        }
        if let Some(min) = self.min
            && n < min
        {
            result.add_message(path, MessageKey::Min, &[&label, &min]);
        }
        if let Some(max) = self.max
            && n > max
        {
            result.add_message(path, MessageKey::Max, &[&label, &max]);
        }
        if self.positive && n <= 0.0 {
            result.add_message(path, MessageKey::Positive, &[&label]);
        }
        if self.negative && n >= 0.0 {
            result.add_message(path, MessageKey::Negative, &[&label]);
        }
        if let Some(divisor) = self.multiple_of
            && !is_multiple(n, divisor)
        {
            result.add_message(path, MessageKey::MultipleOf, &[&label, &divisor]);
        }
        if let Some((lo, hi)) = self.between
            && !(lo..=hi).contains(&n)
        {
            result.add_message(path, MessageKey::Between, &[&label, &lo, &hi]);
        }

        self.base.run_custom(path, value, result);
    }
}

/// Float remainders drift (`0.3 % 0.1` is just under `0.1`), so a
/// remainder close to either end counts as exact.
fn is_multiple(n: f64, divisor: f64) -> bool {
    if divisor == 0.0 {
        return false;
    }
    let rem = (n % divisor).abs();
    rem <= EPSILON || (divisor.abs() - rem) <= EPSILON
}
