//! Date field

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{FieldBase, impl_common_builders};
use crate::error::TransformError;
use crate::i18n::MessageKey;
use crate::result::ValidationResult;
use crate::value::Value;

/// Layout used when none is configured.
pub const DEFAULT_DATE_LAYOUT: &str = "%Y-%m-%d";

/// Text parsed into a [`Value::DateTime`] during transform.
///
/// Layouts use chrono's `strftime` syntax. A layout without time fields
/// parses to midnight. Bounds are given as strings in the same layout.
///
/// ```rust,ignore
/// use sieve_validator::prelude::*;
///
/// let birthday = date().min("1900-01-01").max("2010-12-31").required();
/// let created = date().layout("%Y-%m-%d %H:%M");
/// ```
#[derive(Debug, Clone)]
pub struct DateField {
    base: FieldBase,
    layout: String,
    min: Option<String>,
    max: Option<String>,
}

impl Default for DateField {
    fn default() -> Self {
        Self {
            base: FieldBase::default(),
            layout: DEFAULT_DATE_LAYOUT.to_string(),
            min: None,
            max: None,
        }
    }
}

impl_common_builders!(DateField, base, &NaiveDateTime, Value::as_datetime);

impl DateField {
    /// Creates an optional date field using [`DEFAULT_DATE_LAYOUT`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the parse layout.
    #[must_use = "builder methods must be chained or built"]
    pub fn layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = layout.into();
        self
    }

    /// Earliest accepted date, in the field's layout.
    #[must_use = "builder methods must be chained or built"]
    pub fn min(mut self, date: impl Into<String>) -> Self {
        self.min = Some(date.into());
        self
    }

    /// Latest accepted date, in the field's layout.
    #[must_use = "builder methods must be chained or built"]
    pub fn max(mut self, date: impl Into<String>) -> Self {
        self.max = Some(date.into());
        self
    }

    /// Configured parse layout.
    #[must_use]
    pub fn layout_str(&self) -> &str {
        &self.layout
    }

    /// Default substitution, user transforms, then parsing.
    ///
    /// Values that are already timestamps pass through.
    pub fn clean(&self, raw: Value) -> Result<Value, TransformError> {
        match self.base.apply_transforms(raw)? {
            Value::Text(s) => parse(&s, &self.layout).map(Value::DateTime),
            value @ (Value::Null | Value::DateTime(_)) => Ok(value),
            other => Err(TransformError::mismatch("date string", &other)),
        }
    }

    /// Presence, type, bounds, then custom rules.
    pub fn validate(&self, path: &str, value: &Value, result: &mut ValidationResult) {
        if !self.base.check_presence(path, value, result) {
            return;
        }
        let label = self.base.label_for(path);
        let Some(dt) = value.as_datetime() else {
            result.add_message(path, MessageKey::Date, &[&label]);
            return;
        };

        if let Some(min) = &self.min {
            match parse(min, &self.layout) {
                Ok(bound) if *dt < bound => {
                    result.add_message(path, MessageKey::DateMin, &[&label, min]);
                }
                Ok(_) => {}
                Err(_) => result.add_message(path, MessageKey::DateFormat, &[&label, &self.layout]),
            }
        }
        if let Some(max) = &self.max {
            match parse(max, &self.layout) {
                Ok(bound) if *dt > bound => {
                    result.add_message(path, MessageKey::DateMax, &[&label, max]);
                }
                Ok(_) => {}
                Err(_) => result.add_message(path, MessageKey::DateFormat, &[&label, &self.layout]),
            }
        }

        self.base.run_custom(path, value, result);
    }
}

/// Parses with time fields first, falling back to a date at midnight.
fn parse(input: &str, layout: &str) -> Result<NaiveDateTime, TransformError> {
    NaiveDateTime::parse_from_str(input, layout)
        .or_else(|_| NaiveDate::parse_from_str(input, layout).map(|d| d.and_time(NaiveTime::MIN)))
        .map_err(|_| TransformError::DateParse {
            input: input.to_string(),
            layout: layout.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Field, date};
    use pretty_assertions::assert_eq;

    fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_time(NaiveTime::MIN)
    }

    #[test]
    fn test_parse_default_layout() {
        assert_eq!(
            date().clean(Value::from("2024-02-29")).unwrap(),
            Value::DateTime(midnight(2024, 2, 29))
        );
        assert!(matches!(
            date().clean(Value::from("29/02/2024")),
            Err(TransformError::DateParse { .. })
        ));
        assert!(matches!(
            date().clean(Value::from(20240229)),
            Err(TransformError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_parse_with_time() {
        let field = date().layout("%Y-%m-%d %H:%M");
        let Value::DateTime(dt) = field.clean(Value::from("2024-01-05 13:45")).unwrap() else {
            panic!("expected a timestamp");
        };
        assert_eq!(dt.format("%H:%M").to_string(), "13:45");
    }

    #[test]
    fn test_bounds() {
        let field = Field::from(date().min("2000-01-01").max("2000-12-31").label("Start"));
        let check = |value: NaiveDateTime| {
            let mut result = ValidationResult::default();
            field.validate("start", &Value::DateTime(value), &mut result);
            result.field_errors("start").to_vec()
        };

        assert!(check(midnight(2000, 6, 1)).is_empty());
        assert_eq!(check(midnight(1999, 12, 31)), ["Start cannot be before 2000-01-01"]);
        assert_eq!(check(midnight(2001, 1, 1)), ["Start cannot be after 2000-12-31"]);
    }

    #[test]
    fn test_bad_bound_reports_format() {
        let field = Field::from(date().min("yesterday"));
        let mut result = ValidationResult::default();
        field.validate("d", &Value::DateTime(midnight(2000, 1, 1)), &mut result);
        assert_eq!(
            result.field_errors("d"),
            ["d is not in a valid date format. Expected: %Y-%m-%d"]
        );
    }
}
