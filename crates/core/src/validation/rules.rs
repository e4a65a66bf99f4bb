//! Rule, rule set, and result types.

use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::async_check::AsyncValidator;
use super::messages::{Check, Messages};

/// Shared handle to an external validator.
pub type SharedValidator = Arc<dyn AsyncValidator>;

/// Expected type of a field.
///
/// `Object` carries the nested schema its mapping is validated against.
#[derive(Debug, Clone)]
pub enum FieldType {
    String,
    Number,
    Email,
    Object(RuleSet),
}

impl FieldType {
    pub fn nested(&self) -> Option<&RuleSet> {
        match self {
            Self::Object(fields) => Some(fields),
            _ => None,
        }
    }
}

/// Validation rule for a single field.
///
/// Every attribute is optional; an empty rule accepts any present value.
#[derive(Debug, Clone, Default)]
pub struct Rule {
    pub required: bool,
    pub field_type: Option<FieldType>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub regex: Option<Regex>,
    pub file: bool,
    /// Maximum file size in bytes.
    pub max_size: Option<u64>,
    /// Accepted MIME types; `None` accepts all.
    pub allowed_types: Option<Vec<String>>,
    pub async_validator: Option<SharedValidator>,
    pub messages: Messages,
}

impl Rule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn string(mut self) -> Self {
        self.field_type = Some(FieldType::String);
        self
    }

    pub fn number(mut self) -> Self {
        self.field_type = Some(FieldType::Number);
        self
    }

    pub fn email(mut self) -> Self {
        self.field_type = Some(FieldType::Email);
        self
    }

    pub fn object(mut self, fields: RuleSet) -> Self {
        self.field_type = Some(FieldType::Object(fields));
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    pub fn regex(mut self, regex: Regex) -> Self {
        self.regex = Some(regex);
        self
    }

    pub fn file(mut self) -> Self {
        self.file = true;
        self
    }

    pub fn max_size(mut self, bytes: u64) -> Self {
        self.max_size = Some(bytes);
        self
    }

    pub fn allowed_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_types = Some(types.into_iter().map(Into::into).collect());
        self
    }

    pub fn async_validator(mut self, validator: SharedValidator) -> Self {
        self.async_validator = Some(validator);
        self
    }

    pub fn message(mut self, check: Check, text: impl Into<String>) -> Self {
        self.messages.set(check, text);
        self
    }

    /// Nested schema when this is an object rule.
    pub fn nested(&self) -> Option<&RuleSet> {
        self.field_type.as_ref().and_then(FieldType::nested)
    }
}

/// Field name to rule mapping, evaluated in declaration order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet(IndexMap<String, Rule>);

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn field(mut self, name: impl Into<String>, rule: Rule) -> Self {
        self.0.insert(name.into(), rule);
        self
    }

    /// Insert or replace a rule; a replaced rule keeps its original position.
    pub fn insert(&mut self, name: impl Into<String>, rule: Rule) -> Option<Rule> {
        self.0.insert(name.into(), rule)
    }

    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.0.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.0.iter().map(|(name, rule)| (name.as_str(), rule))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Rule)> for RuleSet {
    fn from_iter<I: IntoIterator<Item = (K, Rule)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, r)| (k.into(), r)).collect())
    }
}

/// Outcome of validating one data record.
///
/// Keys are dotted paths. A path appears in at most one of the two maps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub errors: IndexMap<String, Vec<String>>,
    pub data: IndexMap<String, Value>,
}

impl ValidationResult {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of messages across all fields.
    pub fn error_count(&self) -> usize {
        self.errors.values().map(Vec::len).sum()
    }

    /// Record the outcome for one leaf field.
    ///
    /// Messages go to `errors`; otherwise a present value goes to `data`
    /// unchanged. An absent value with no messages is not recorded.
    pub fn record(&mut self, path: String, messages: Vec<String>, value: Option<&Value>) {
        if !messages.is_empty() {
            self.data.shift_remove(&path);
            self.errors.insert(path, messages);
        } else if let Some(value) = value.filter(|v| !is_absent(Some(*v))) {
            self.errors.shift_remove(&path);
            self.data.insert(path, value.clone());
        }
    }
}

/// Missing, `null`, or the empty string.
pub fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn absent_values() {
        assert!(is_absent(None));
        assert!(is_absent(Some(&Value::Null)));
        assert!(is_absent(Some(&json!(""))));
        assert!(!is_absent(Some(&json!(" "))));
        assert!(!is_absent(Some(&json!(0))));
        assert!(!is_absent(Some(&json!(false))));
    }

    #[test]
    fn rule_set_keeps_declaration_order() {
        let rules = RuleSet::new()
            .field("zeta", Rule::new())
            .field("alpha", Rule::new())
            .field("mid", Rule::new());
        let names: Vec<&str> = rules.iter().map(|(name, _)| name).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn object_rule_exposes_nested_schema() {
        let rule = Rule::new().object(RuleSet::new().field("city", Rule::new().required()));
        let nested = rule.nested().expect("nested");
        assert!(nested.get("city").is_some_and(|r| r.required));
        assert!(Rule::new().string().nested().is_none());
    }

    #[test]
    fn record_routes_by_messages() {
        let mut result = ValidationResult::new();
        result.record("a".into(), vec!["bad".into()], Some(&json!("x")));
        result.record("b".into(), Vec::new(), Some(&json!(3)));
        result.record("c".into(), Vec::new(), None);
        result.record("d".into(), Vec::new(), Some(&Value::Null));

        assert_eq!(result.errors.get("a"), Some(&vec!["bad".to_string()]));
        assert!(!result.data.contains_key("a"));
        assert_eq!(result.data.get("b"), Some(&json!(3)));
        assert!(!result.errors.contains_key("c") && !result.data.contains_key("c"));
        assert!(!result.data.contains_key("d"));
        assert_eq!(result.error_count(), 1);
        assert!(!result.is_valid());
    }

    #[test]
    fn result_serializes_as_errors_and_data() {
        let mut result = ValidationResult::new();
        result.record("name".into(), vec!["This field is required.".into()], None);
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(
            json,
            json!({"errors": {"name": ["This field is required."]}, "data": {}})
        );
    }
}
