//! Rule predicates
//!
//! Pure functions that check one fact about a string. They have no
//! knowledge of fields, labels or results, which keeps them usable on their
//! own:
//!
//! ```rust,ignore
//! use sieve_validator::rules;
//!
//! assert!(rules::is_valid_email("user@example.com"));
//! assert!(rules::is_valid_credit_card("4532015112830366", Some("visa")));
//! assert!(rules::is_valid_iban("TR330006100519786457841326", Some("TR")));
//! ```
//!
//! ## Categories
//!
//! - **Format**: email, URL, IP, phone, charset classes, MAC, hex, base64
//! - **Identifier**: UUID by version
//! - **Payment**: Luhn, credit card brand, IBAN mod-97
//! - **Password**: policy evaluation and entropy
//! - **Sanitize**: HTML stripping and escaping, filenames, emoji, domains

pub mod format;
pub mod identifier;
pub mod password;
pub mod payment;
pub mod sanitize;

pub use format::{
    IpVersion, is_alpha, is_alphanumeric, is_base64, is_hex, is_mac, is_numeric, is_valid_email,
    is_valid_ip, is_valid_phone, is_valid_url,
};
pub use identifier::is_valid_uuid;
pub use password::{PasswordPolicy, PasswordViolation, password_entropy, validate_password};
pub use payment::{iban_length, is_valid_credit_card, is_valid_iban, luhn_valid};
pub use sanitize::{
    escape_html, filter_emoji, has_turkish_chars, is_valid_domain, sanitize_filename,
    strip_html_tags, validate_charset,
};
