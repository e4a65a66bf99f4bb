//! Field validator: one leaf value against one rule.
//!
//! Checks run in a fixed order and each appends at most one message. Only a
//! missing value short-circuits; every other applicable check runs so the
//! caller sees all problems with a field at once.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

use super::async_check;
use super::messages::{self, Check};
use super::rules::{is_absent, FieldType, Rule};
use crate::config::EngineConfig;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Phone-number-like strings are accepted where a number is expected.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{1,14}$").expect("valid regex"));

/// Validate one value against one rule, returning every violation message.
///
/// `value` is `None` when the field is missing from the data. An empty
/// result means the value passed.
pub async fn validate_field(
    path: &str,
    value: Option<&Value>,
    rule: &Rule,
    config: &EngineConfig,
) -> Vec<String> {
    let mut out = check_static(value, rule);

    if let (Some(value), Some(validator)) = (value, &rule.async_validator) {
        if !is_absent(Some(value)) {
            if let Some(message) =
                async_check::invoke(path, validator.as_ref(), value, config.async_timeout).await
            {
                out.push(message);
            }
        }
    }

    out
}

/// All checks except the external validator.
pub(crate) fn check_static(value: Option<&Value>, rule: &Rule) -> Vec<String> {
    let custom = &rule.messages;
    let mut out = Vec::new();

    let value = match value {
        Some(v) if !is_absent(Some(v)) => v,
        _ => {
            if rule.required {
                out.push(custom.resolve(Check::Required, messages::required));
            }
            return out;
        }
    };

    match &rule.field_type {
        Some(FieldType::String) if !value.is_string() => {
            out.push(custom.resolve(Check::Type, messages::not_string));
        }
        Some(FieldType::Number) if !value.is_number() && !matches(&PHONE_RE, value) => {
            out.push(custom.resolve(Check::Type, messages::not_number));
        }
        Some(FieldType::Email) if !matches(&EMAIL_RE, value) => {
            out.push(custom.resolve(Check::Email, messages::invalid_email));
        }
        Some(FieldType::Object(_)) if !value.is_object() => {
            out.push(custom.resolve(Check::Type, messages::not_object));
        }
        _ => {}
    }

    // Zero bounds are treated as unset.
    let min = rule.min_length.filter(|&n| n > 0);
    let max = rule.max_length.filter(|&n| n > 0);
    if min.is_some() || max.is_some() {
        match length_of(value) {
            Some(len) => {
                if let Some(min) = min.filter(|&min| len < min) {
                    out.push(custom.resolve(Check::MinLength, || messages::too_short(min)));
                }
                if let Some(max) = max.filter(|&max| len > max) {
                    out.push(custom.resolve(Check::MaxLength, || messages::too_long(max)));
                }
            }
            // A declared number already passed or failed its own type check.
            None if matches!(rule.field_type, Some(FieldType::Number)) && value.is_number() => {}
            None => {
                let mismatch = custom.resolve(Check::Type, messages::not_string);
                if !out.contains(&mismatch) {
                    out.push(mismatch);
                }
            }
        }
    }

    if let Some(re) = &rule.regex {
        if !matches(re, value) {
            out.push(custom.resolve(Check::Regex, messages::invalid_format));
        }
    }

    if rule.file {
        check_file(value, rule, &mut out);
    }

    out
}

fn check_file(value: &Value, rule: &Rule, out: &mut Vec<String>) {
    let custom = &rule.messages;

    if is_falsy(value) {
        out.push(custom.resolve(Check::Required, messages::file_required));
        return;
    }

    let size = value.get("size").and_then(Value::as_f64);
    if let (Some(max), Some(size)) = (rule.max_size.filter(|&n| n > 0), size) {
        if size > max as f64 {
            out.push(custom.resolve(Check::MaxSize, || messages::file_too_large(max)));
        }
    }

    if let Some(allowed) = &rule.allowed_types {
        let mime = value.get("type").and_then(Value::as_str);
        if !mime.is_some_and(|mime| allowed.iter().any(|a| a == mime)) {
            out.push(custom.resolve(Check::Type, messages::invalid_file_type));
        }
    }
}

/// Character count for strings, element count for arrays.
fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

/// Text a pattern is tested against. Arrays and mappings have none.
fn stringify(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s)),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

fn matches(re: &Regex, value: &Value) -> bool {
    stringify(value).is_some_and(|text| re.is_match(&text))
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => is_absent(Some(value)),
    }
}
