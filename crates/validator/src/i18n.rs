//! Localized messages
//!
//! Every message a built-in check produces goes through a [`Translator`].
//! A translator is an immutable value: a shared [`Catalog`] plus the active
//! locale. Schemas own one, so two schemas validating concurrently in
//! different locales never interfere.
//!
//! Templates use positional placeholders: `{0}` is the field label, the
//! following indices are key-specific arguments.
//!
//! # Examples
//!
//! ```rust,ignore
//! use sieve_validator::i18n::{MessageKey, Translator};
//!
//! let tr = Translator::default().with_locale("tr");
//! assert_eq!(tr.format(MessageKey::Required, &[&"E-posta"]), "E-posta alanı zorunludur");
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::sync::{Arc, LazyLock};

/// Locale used when nothing else is configured.
pub const DEFAULT_LOCALE: &str = "en";

// ============================================================================
// MESSAGE KEYS
// ============================================================================

macro_rules! message_keys {
    ($($variant:ident => $key:literal),* $(,)?) => {
        /// Identifier of a localized message template.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[non_exhaustive]
        pub enum MessageKey {
            $(
                #[doc = concat!("`validation.", $key, "`")]
                $variant,
            )*
        }

        impl MessageKey {
            /// Every key, in declaration order.
            pub const ALL: &'static [MessageKey] = &[$(MessageKey::$variant),*];

            /// Dotted catalog key, e.g. `validation.required`.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(MessageKey::$variant => concat!("validation.", $key),)*
                }
            }
        }
    };
}

message_keys! {
    Required => "required",
    Min => "min",
    Max => "max",
    Email => "email",
    Url => "url",
    Ip => "ip",
    Uuid => "uuid",
    Iban => "iban",
    CreditCard => "credit_card",
    Phone => "phone",
    Integer => "integer",
    Numeric => "numeric",
    Boolean => "boolean",
    String => "string",
    Array => "array",
    Object => "object",
    Date => "date",
    DateFormat => "date_format",
    DateMin => "date_min",
    DateMax => "date_max",
    OneOf => "one_of",
    MinLength => "min_length",
    MaxLength => "max_length",
    MinElements => "min_elements",
    MaxElements => "max_elements",
    Password => "password",
    PasswordUppercase => "password.uppercase",
    PasswordLowercase => "password.lowercase",
    PasswordNumeric => "password.numeric",
    PasswordSpecial => "password.special",
    PasswordUniqueChars => "password.unique_chars",
    PasswordRepeating => "password.repeating",
    PasswordCommon => "password.common",
    PasswordKeyboard => "password.keyboard",
    PasswordWeak => "password.weak",
    TurkishChars => "turkish_chars",
    NoTurkishChars => "no_turkish_chars",
    Domain => "domain",
    Charset => "charset",
    Alpha => "alpha",
    Alphanumeric => "alphanumeric",
    NumericString => "numeric_string",
    StartsWith => "starts_with",
    EndsWith => "ends_with",
    Contains => "contains",
    Regex => "regex",
    InvalidPattern => "invalid_pattern",
    Mac => "mac",
    Hex => "hex",
    Base64 => "base64",
    NotEmpty => "not_empty",
    Unique => "unique",
    ArrayContains => "array_contains",
    Positive => "positive",
    Negative => "negative",
    MultipleOf => "multiple_of",
    Between => "between",
    TransformError => "transform_error",
    CrossValidation => "cross_validation",
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// BUILT-IN TABLES
// ============================================================================

const EN: &[(MessageKey, &str)] = &[
    (MessageKey::Required, "{0} is required"),
    (MessageKey::Min, "{0} must be at least {1}"),
    (MessageKey::Max, "{0} must be at most {1}"),
    (MessageKey::Email, "{0} must be a valid email address"),
    (MessageKey::Url, "{0} must be a valid URL"),
    (MessageKey::Ip, "{0} must be a valid IP address"),
    (MessageKey::Uuid, "{0} must be a valid UUID"),
    (MessageKey::Iban, "{0} must be a valid IBAN"),
    (MessageKey::CreditCard, "{0} must be a valid credit card number"),
    (MessageKey::Phone, "{0} must be a valid {1} phone number"),
    (MessageKey::Integer, "{0} must be an integer"),
    (MessageKey::Numeric, "{0} must be a numeric value"),
    (MessageKey::Boolean, "{0} must be a boolean value"),
    (MessageKey::String, "{0} must be a string"),
    (MessageKey::Array, "{0} must be an array"),
    (MessageKey::Object, "{0} must be an object"),
    (MessageKey::Date, "{0} must be a valid date"),
    (MessageKey::DateFormat, "{0} is not in a valid date format. Expected: {1}"),
    (MessageKey::DateMin, "{0} cannot be before {1}"),
    (MessageKey::DateMax, "{0} cannot be after {1}"),
    (MessageKey::OneOf, "{0} must be one of: {1}"),
    (MessageKey::MinLength, "{0} must be at least {1} characters long"),
    (MessageKey::MaxLength, "{0} must be at most {1} characters long"),
    (MessageKey::MinElements, "{0} must contain at least {1} elements"),
    (MessageKey::MaxElements, "{0} must contain at most {1} elements"),
    (MessageKey::Password, "{0} must meet password requirements"),
    (MessageKey::PasswordUppercase, "{0} must contain at least one uppercase letter"),
    (MessageKey::PasswordLowercase, "{0} must contain at least one lowercase letter"),
    (MessageKey::PasswordNumeric, "{0} must contain at least one number"),
    (MessageKey::PasswordSpecial, "{0} must contain at least one special character ({1})"),
    (MessageKey::PasswordUniqueChars, "{0} must contain at least {1} unique characters"),
    (MessageKey::PasswordRepeating, "{0} cannot have more than {1} repeating characters"),
    (MessageKey::PasswordCommon, "{0} is too common, please choose a more secure password"),
    (MessageKey::PasswordKeyboard, "{0} cannot contain keyboard sequences"),
    (MessageKey::PasswordWeak, "{0} is not strong enough, please choose a more complex password"),
    (MessageKey::TurkishChars, "{0} must contain Turkish characters"),
    (MessageKey::NoTurkishChars, "{0} must not contain Turkish characters"),
    (MessageKey::Domain, "{0} must be a valid domain name"),
    (MessageKey::Charset, "{0} must contain only '{1}' characters"),
    (MessageKey::Alpha, "{0} must contain only letters"),
    (MessageKey::Alphanumeric, "{0} must contain only letters and digits"),
    (MessageKey::NumericString, "{0} must contain only digits"),
    (MessageKey::StartsWith, "{0} must start with '{1}'"),
    (MessageKey::EndsWith, "{0} must end with '{1}'"),
    (MessageKey::Contains, "{0} must contain '{1}'"),
    (MessageKey::Regex, "{0} has an invalid format"),
    (MessageKey::InvalidPattern, "{0}: invalid pattern: {1}"),
    (MessageKey::Mac, "{0} must be a valid MAC address"),
    (MessageKey::Hex, "{0} must be a hexadecimal value"),
    (MessageKey::Base64, "{0} must be valid base64"),
    (MessageKey::NotEmpty, "{0} cannot be empty"),
    (MessageKey::Unique, "{0} must contain unique elements"),
    (MessageKey::ArrayContains, "{0} must contain {1}"),
    (MessageKey::Positive, "{0} must be positive"),
    (MessageKey::Negative, "{0} must be negative"),
    (MessageKey::MultipleOf, "{0} must be a multiple of {1}"),
    (MessageKey::Between, "{0} must be between {1} and {2}"),
    (MessageKey::TransformError, "Transformation error: {0}"),
    (MessageKey::CrossValidation, "Cross-field validation failed: {0}"),
];

const TR: &[(MessageKey, &str)] = &[
    (MessageKey::Required, "{0} alanı zorunludur"),
    (MessageKey::Min, "{0} alanı en az {1} olmalıdır"),
    (MessageKey::Max, "{0} alanı en fazla {1} olmalıdır"),
    (MessageKey::Email, "{0} alanı geçerli bir e-posta adresi olmalıdır"),
    (MessageKey::Url, "{0} alanı geçerli bir URL olmalıdır"),
    (MessageKey::Ip, "{0} alanı geçerli bir IP adresi olmalıdır"),
    (MessageKey::Uuid, "{0} alanı geçerli bir UUID olmalıdır"),
    (MessageKey::Iban, "{0} alanı geçerli bir IBAN olmalıdır"),
    (MessageKey::CreditCard, "{0} alanı geçerli bir kredi kartı numarası olmalıdır"),
    (MessageKey::Phone, "{0} alanı geçerli bir {1} telefon numarası olmalıdır"),
    (MessageKey::Integer, "{0} alanı tamsayı olmalıdır"),
    (MessageKey::Numeric, "{0} alanı sayısal bir değer olmalıdır"),
    (MessageKey::Boolean, "{0} alanı boolean tipinde olmalıdır"),
    (MessageKey::String, "{0} alanı metin tipinde olmalıdır"),
    (MessageKey::Array, "{0} alanı dizi (array) tipinde olmalıdır"),
    (MessageKey::Object, "{0} alanı nesne (object) tipinde olmalıdır"),
    (MessageKey::Date, "{0} alanı geçerli bir tarih olmalıdır"),
    (MessageKey::DateFormat, "{0} geçerli bir tarih formatı değil. Beklenen: {1}"),
    (MessageKey::DateMin, "{0} alanı {1} tarihinden önce olamaz"),
    (MessageKey::DateMax, "{0} alanı {1} tarihinden sonra olamaz"),
    (MessageKey::OneOf, "{0} alanı şunlardan biri olmalıdır: {1}"),
    (MessageKey::MinLength, "{0} alanı en az {1} karakter olmalıdır"),
    (MessageKey::MaxLength, "{0} alanı en fazla {1} karakter olmalıdır"),
    (MessageKey::MinElements, "{0} alanında en az {1} eleman olmalıdır"),
    (MessageKey::MaxElements, "{0} alanında en fazla {1} eleman olmalıdır"),
    (MessageKey::Password, "{0} şifre gereksinimlerini karşılamalıdır"),
    (MessageKey::PasswordUppercase, "{0} en az bir büyük harf içermelidir"),
    (MessageKey::PasswordLowercase, "{0} en az bir küçük harf içermelidir"),
    (MessageKey::PasswordNumeric, "{0} en az bir rakam içermelidir"),
    (MessageKey::PasswordSpecial, "{0} en az bir özel karakter içermelidir ({1})"),
    (MessageKey::PasswordUniqueChars, "{0} en az {1} farklı karakter içermelidir"),
    (MessageKey::PasswordRepeating, "{0} en fazla {1} adet tekrar eden karakter içerebilir"),
    (MessageKey::PasswordCommon, "{0} çok yaygın bir şifre, lütfen daha güvenli bir şifre seçin"),
    (MessageKey::PasswordKeyboard, "{0} klavye düzeninde sıralı karakterler içeremez"),
    (MessageKey::PasswordWeak, "{0} yeterince karmaşık değil, lütfen daha güçlü bir şifre seçin"),
    (MessageKey::TurkishChars, "{0} alanında Türkçe karakter bulunmalıdır"),
    (MessageKey::NoTurkishChars, "{0} alanında Türkçe karakter bulunmamalıdır"),
    (MessageKey::Domain, "{0} alanı geçerli bir alan adı olmalıdır"),
    (MessageKey::Charset, "{0} alanı '{1}' karakter setine uymalıdır"),
    (MessageKey::Alpha, "{0} alanı yalnızca harf içermelidir"),
    (MessageKey::Alphanumeric, "{0} alanı yalnızca harf ve rakam içermelidir"),
    (MessageKey::NumericString, "{0} alanı yalnızca rakam içermelidir"),
    (MessageKey::StartsWith, "{0} alanı '{1}' ile başlamalıdır"),
    (MessageKey::EndsWith, "{0} alanı '{1}' ile bitmelidir"),
    (MessageKey::Contains, "{0} alanı '{1}' içermelidir"),
    (MessageKey::Regex, "{0} alanının formatı geçersiz"),
    (MessageKey::InvalidPattern, "{0}: geçersiz desen: {1}"),
    (MessageKey::Mac, "{0} alanı geçerli bir MAC adresi olmalıdır"),
    (MessageKey::Hex, "{0} alanı onaltılık (hex) bir değer olmalıdır"),
    (MessageKey::Base64, "{0} alanı geçerli bir base64 değeri olmalıdır"),
    (MessageKey::NotEmpty, "{0} alanı boş olamaz"),
    (MessageKey::Unique, "{0} alanındaki elemanlar benzersiz olmalıdır"),
    (MessageKey::ArrayContains, "{0} alanı {1} değerini içermelidir"),
    (MessageKey::Positive, "{0} alanı pozitif olmalıdır"),
    (MessageKey::Negative, "{0} alanı negatif olmalıdır"),
    (MessageKey::MultipleOf, "{0} alanı {1} sayısının katı olmalıdır"),
    (MessageKey::Between, "{0} alanı {1} ile {2} arasında olmalıdır"),
    (MessageKey::TransformError, "Dönüşüm hatası: {0}"),
    (MessageKey::CrossValidation, "Alanlar arası doğrulama başarısız: {0}"),
];

static BUILTIN: LazyLock<Arc<Catalog>> = LazyLock::new(|| Arc::new(Catalog::builtin()));

// ============================================================================
// CATALOG
// ============================================================================

/// Message tables for every known locale.
#[derive(Debug, Clone)]
pub struct Catalog {
    tables: HashMap<Cow<'static, str>, HashMap<MessageKey, Cow<'static, str>>>,
    default_locale: Cow<'static, str>,
}

impl Catalog {
    /// Empty catalog with `en` as default locale.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            tables: HashMap::new(),
            default_locale: Cow::Borrowed(DEFAULT_LOCALE),
        }
    }

    /// Catalog preloaded with the `en` and `tr` tables.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        catalog.add_messages("en", EN.iter().map(|(k, v)| (*k, Cow::Borrowed(*v))));
        catalog.add_messages("tr", TR.iter().map(|(k, v)| (*k, Cow::Borrowed(*v))));
        catalog
    }

    /// Merges templates into a locale, creating it if needed.
    ///
    /// Existing templates for the same key are overwritten.
    pub fn add_messages<I, S>(&mut self, locale: impl Into<Cow<'static, str>>, entries: I)
    where
        I: IntoIterator<Item = (MessageKey, S)>,
        S: Into<Cow<'static, str>>,
    {
        let table = self.tables.entry(locale.into()).or_default();
        for (key, template) in entries {
            table.insert(key, template.into());
        }
    }

    /// Builder form of [`add_messages`](Self::add_messages).
    #[must_use = "builder methods must be chained or built"]
    pub fn with_messages<I, S>(mut self, locale: impl Into<Cow<'static, str>>, entries: I) -> Self
    where
        I: IntoIterator<Item = (MessageKey, S)>,
        S: Into<Cow<'static, str>>,
    {
        self.add_messages(locale, entries);
        self
    }

    /// Returns `true` if the locale has a table.
    #[must_use]
    pub fn has_locale(&self, locale: &str) -> bool {
        self.tables.contains_key(locale)
    }

    /// Known locales, sorted.
    #[must_use]
    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.tables.keys().map(AsRef::as_ref).collect();
        locales.sort_unstable();
        locales
    }

    /// Locale consulted when the active one lacks a key.
    #[must_use]
    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Changes the fallback locale.
    pub fn set_default_locale(&mut self, locale: impl Into<Cow<'static, str>>) {
        self.default_locale = locale.into();
    }

    /// Raw template lookup without fallback.
    #[must_use]
    pub fn template(&self, locale: &str, key: MessageKey) -> Option<&str> {
        self.tables
            .get(locale)
            .and_then(|table| table.get(&key))
            .map(AsRef::as_ref)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// ============================================================================
// TRANSLATOR
// ============================================================================

/// A catalog bound to an active locale.
#[derive(Debug, Clone)]
pub struct Translator {
    catalog: Arc<Catalog>,
    locale: Cow<'static, str>,
    fallback: bool,
}

impl Translator {
    /// Creates a translator over a custom catalog, using its default locale.
    #[must_use]
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let locale = Cow::Owned(catalog.default_locale().to_owned());
        Self {
            catalog,
            locale,
            fallback: true,
        }
    }

    /// Switches the active locale.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_locale(mut self, locale: impl Into<Cow<'static, str>>) -> Self {
        self.locale = locale.into();
        self
    }

    /// Enables or disables falling back to the catalog default locale.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_fallback(mut self, enabled: bool) -> Self {
        self.fallback = enabled;
        self
    }

    /// Active locale.
    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Underlying catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Renders a message.
    ///
    /// Missing keys render as `[validation.<key>]`.
    #[must_use]
    pub fn format(&self, key: MessageKey, args: &[&dyn fmt::Display]) -> String {
        let template = self.catalog.template(&self.locale, key).or_else(|| {
            self.fallback
                .then(|| self.catalog.template(self.catalog.default_locale(), key))
                .flatten()
        });

        match template {
            Some(template) => render(template, args),
            None => format!("[{}]", key.as_str()),
        }
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::new(Arc::clone(&BUILTIN))
    }
}

/// Substitutes `{n}` placeholders; unknown indices stay verbatim.
fn render(template: &str, args: &[&dyn fmt::Display]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let index = after
            .find('}')
            .and_then(|close| after[..close].parse::<usize>().ok().map(|i| (i, close)));

        match index.and_then(|(i, close)| args.get(i).map(|arg| (arg, close))) {
            Some((arg, close)) => {
                let _ = write!(out, "{arg}");
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_key_has_builtin_templates() {
        let catalog = Catalog::builtin();
        for key in MessageKey::ALL {
            assert!(catalog.template("en", *key).is_some(), "en missing {key}");
            assert!(catalog.template("tr", *key).is_some(), "tr missing {key}");
        }
    }

    #[test]
    fn test_format_positional() {
        let t = Translator::default();
        assert_eq!(t.format(MessageKey::Min, &[&"Age", &18]), "Age must be at least 18");
        assert_eq!(
            t.format(MessageKey::Between, &[&"Score", &1, &10]),
            "Score must be between 1 and 10"
        );
    }

    #[test]
    fn test_locale_switch_is_local() {
        let en = Translator::default();
        let tr = en.clone().with_locale("tr");
        assert_eq!(tr.format(MessageKey::Required, &[&"Ad"]), "Ad alanı zorunludur");
        assert_eq!(en.format(MessageKey::Required, &[&"Name"]), "Name is required");
    }

    #[test]
    fn test_fallback_to_default_locale() {
        let t = Translator::default().with_locale("de");
        assert_eq!(t.format(MessageKey::Email, &[&"Mail"]), "Mail must be a valid email address");

        let strict = t.with_fallback(false);
        assert_eq!(strict.format(MessageKey::Email, &[&"Mail"]), "[validation.email]");
    }

    #[test]
    fn test_custom_locale() {
        let catalog = Catalog::builtin()
            .with_messages("de", [(MessageKey::Required, "{0} ist erforderlich")]);
        assert!(catalog.has_locale("de"));
        assert_eq!(catalog.locales(), vec!["de", "en", "tr"]);

        let t = Translator::new(Arc::new(catalog)).with_locale("de");
        assert_eq!(t.format(MessageKey::Required, &[&"Name"]), "Name ist erforderlich");
        // falls back to en for keys the de table lacks
        assert_eq!(t.format(MessageKey::Url, &[&"Site"]), "Site must be a valid URL");
    }

    #[test]
    fn test_render_leaves_unknown_placeholders() {
        assert_eq!(render("{0} and {5} and {x}", &[&"a"]), "a and {5} and {x}");
        assert_eq!(render("no args", &[]), "no args");
    }
}
