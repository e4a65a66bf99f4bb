//! Check names, built-in default messages, and per-rule overrides.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Fallback message when an async validator reports `valid: false` without
/// a message of its own.
pub const ASYNC_INVALID: &str = "Validation failed.";

/// Message recorded when an async validator errors, panics, or times out.
pub const ASYNC_ERROR: &str = "Asynchronous validation error.";

/// A built-in check whose message can be overridden per rule.
///
/// The override key is the camelCase name used in rule schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Check {
    Required,
    Type,
    Email,
    MinLength,
    MaxLength,
    Regex,
    MaxSize,
}

impl Check {
    /// Stable key used in the `messages` mapping of a rule.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Type => "type",
            Self::Email => "email",
            Self::MinLength => "minLength",
            Self::MaxLength => "maxLength",
            Self::Regex => "regex",
            Self::MaxSize => "maxSize",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "required" => Some(Self::Required),
            "type" => Some(Self::Type),
            "email" => Some(Self::Email),
            "minLength" => Some(Self::MinLength),
            "maxLength" => Some(Self::MaxLength),
            "regex" => Some(Self::Regex),
            "maxSize" => Some(Self::MaxSize),
            _ => None,
        }
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Custom error strings keyed by check name.
///
/// Keys are kept as plain strings so schemas may carry entries for checks
/// this engine does not know about; those are simply never looked up.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Messages(IndexMap<String, String>);

impl Messages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, check: Check, message: impl Into<String>) {
        self.0.insert(check.key().to_string(), message.into());
    }

    pub fn get(&self, check: Check) -> Option<&str> {
        self.0.get(check.key()).map(String::as_str)
    }

    /// The override for `check`, or the lazily built default. An empty
    /// override counts as unset.
    pub fn resolve(&self, check: Check, default: impl FnOnce() -> String) -> String {
        match self.get(check).filter(|m| !m.is_empty()) {
            Some(custom) => custom.to_string(),
            None => default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Messages {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub(crate) fn required() -> String {
    "This field is required.".to_string()
}

pub(crate) fn not_string() -> String {
    "This field must be a string.".to_string()
}

pub(crate) fn not_number() -> String {
    "This field must be a number.".to_string()
}

pub(crate) fn not_object() -> String {
    "This field must be an object.".to_string()
}

pub(crate) fn invalid_email() -> String {
    "Invalid email format.".to_string()
}

pub(crate) fn too_short(min: usize) -> String {
    format!("Must be at least {min} characters.")
}

pub(crate) fn too_long(max: usize) -> String {
    format!("Must be at most {max} characters.")
}

pub(crate) fn invalid_format() -> String {
    "Invalid format.".to_string()
}

pub(crate) fn file_required() -> String {
    "File is required.".to_string()
}

/// Size limit rendered in megabytes; whole numbers print without a fraction.
pub(crate) fn file_too_large(max_size: u64) -> String {
    let mb = max_size as f64 / 1024.0 / 1024.0;
    format!("File size exceeds {mb} MB.")
}

pub(crate) fn invalid_file_type() -> String {
    "Invalid file type.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_keys_round_trip() {
        for check in [
            Check::Required,
            Check::Type,
            Check::Email,
            Check::MinLength,
            Check::MaxLength,
            Check::Regex,
            Check::MaxSize,
        ] {
            assert_eq!(Check::from_key(check.key()), Some(check));
        }
        assert_eq!(Check::from_key("min_length"), None);
    }

    #[test]
    fn resolve_prefers_override() {
        let mut messages = Messages::new();
        messages.set(Check::Required, "X");
        assert_eq!(messages.resolve(Check::Required, required), "X");
        assert_eq!(messages.resolve(Check::Email, invalid_email), "Invalid email format.");
    }

    #[test]
    fn empty_override_falls_back_to_default() {
        let mut messages = Messages::new();
        messages.set(Check::Required, "");
        assert_eq!(messages.resolve(Check::Required, required), "This field is required.");
        assert_eq!(
            messages.resolve(Check::MinLength, || too_short(3)),
            "Must be at least 3 characters."
        );
    }

    #[test]
    fn file_size_message_formats_megabytes() {
        assert_eq!(file_too_large(5 * 1024 * 1024), "File size exceeds 5 MB.");
        assert_eq!(file_too_large(1536 * 1024), "File size exceeds 1.5 MB.");
    }

    #[test]
    fn length_messages_interpolate_bound() {
        assert_eq!(too_short(5), "Must be at least 5 characters.");
        assert_eq!(too_long(10), "Must be at most 10 characters.");
    }

    #[test]
    fn messages_deserialize_from_plain_map() {
        let messages: Messages =
            serde_json::from_value(serde_json::json!({"minLength": "Too short!"})).unwrap();
        assert_eq!(messages.get(Check::MinLength), Some("Too short!"));
        assert_eq!(messages.get(Check::MaxLength), None);
    }
}
