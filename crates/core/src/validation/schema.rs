//! JSON rule schemas.
//!
//! Schemas use the camelCase attribute names of the rule record
//! (`minLength`, `allowedTypes`, ...). They are parsed once and compiled into
//! a [`RuleSet`]: patterns are compiled, validator names resolved against a
//! [`ValidatorRegistry`], and object rules bound to their nested schema.
//! Structural mistakes are rejected here so validation itself cannot fail.

use indexmap::IndexMap;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use super::async_check::ValidatorRegistry;
use super::messages::Messages;
use super::rules::{FieldType, Rule, RuleSet};
use super::walker::join_path;

/// Errors raised while compiling a rule schema.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Invalid rule schema: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid regex for '{path}': {source}")]
    InvalidRegex {
        path: String,
        #[source]
        source: regex::Error,
    },

    #[error("Unknown async validator '{name}' for '{path}'")]
    UnknownValidator { path: String, name: String },

    #[error("Object rule '{path}' has no fields")]
    MissingFields { path: String },

    #[error("Rule '{path}' declares fields but is not of type object")]
    UnexpectedFields { path: String },

    #[error("Rule '{path}' has minLength {min} greater than maxLength {max}")]
    InvalidBounds { path: String, min: usize, max: usize },
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TypeSpec {
    String,
    Number,
    Email,
    Object,
}

/// Serialized form of a [`Rule`].
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RuleSpec {
    #[serde(default)]
    required: bool,
    #[serde(rename = "type")]
    field_type: Option<TypeSpec>,
    min_length: Option<usize>,
    max_length: Option<usize>,
    regex: Option<String>,
    #[serde(default)]
    file: bool,
    max_size: Option<u64>,
    allowed_types: Option<Vec<String>>,
    async_validator: Option<String>,
    fields: Option<IndexMap<String, RuleSpec>>,
    #[serde(default)]
    messages: Messages,
}

impl RuleSet {
    /// Parse and compile a JSON rule schema.
    pub fn from_json_str(json: &str, registry: &ValidatorRegistry) -> Result<Self, SchemaError> {
        let specs: IndexMap<String, RuleSpec> = serde_json::from_str(json)?;
        compile_set(specs, "", registry)
    }

    /// Compile an already parsed JSON rule schema.
    pub fn from_value(value: Value, registry: &ValidatorRegistry) -> Result<Self, SchemaError> {
        let specs: IndexMap<String, RuleSpec> = serde_json::from_value(value)?;
        compile_set(specs, "", registry)
    }
}

fn compile_set(
    specs: IndexMap<String, RuleSpec>,
    parent: &str,
    registry: &ValidatorRegistry,
) -> Result<RuleSet, SchemaError> {
    specs
        .into_iter()
        .map(|(name, spec)| {
            let path = join_path(parent, &name);
            compile_rule(spec, &path, registry).map(|rule| (name, rule))
        })
        .collect()
}

fn compile_rule(
    spec: RuleSpec,
    path: &str,
    registry: &ValidatorRegistry,
) -> Result<Rule, SchemaError> {
    let field_type = match (spec.field_type, spec.fields) {
        (Some(TypeSpec::Object), Some(fields)) => {
            Some(FieldType::Object(compile_set(fields, path, registry)?))
        }
        (Some(TypeSpec::Object), None) => {
            return Err(SchemaError::MissingFields {
                path: path.to_string(),
            })
        }
        (_, Some(_)) => {
            return Err(SchemaError::UnexpectedFields {
                path: path.to_string(),
            })
        }
        (Some(TypeSpec::String), None) => Some(FieldType::String),
        (Some(TypeSpec::Number), None) => Some(FieldType::Number),
        (Some(TypeSpec::Email), None) => Some(FieldType::Email),
        (None, None) => None,
    };

    if let (Some(min), Some(max)) = (spec.min_length, spec.max_length) {
        if min > 0 && max > 0 && min > max {
            return Err(SchemaError::InvalidBounds {
                path: path.to_string(),
                min,
                max,
            });
        }
    }

    let regex = spec
        .regex
        .map(|pattern| {
            Regex::new(&pattern).map_err(|source| SchemaError::InvalidRegex {
                path: path.to_string(),
                source,
            })
        })
        .transpose()?;

    let async_validator = spec
        .async_validator
        .map(|name| {
            registry
                .get(&name)
                .ok_or_else(|| SchemaError::UnknownValidator {
                    path: path.to_string(),
                    name,
                })
        })
        .transpose()?;

    Ok(Rule {
        required: spec.required,
        field_type,
        min_length: spec.min_length,
        max_length: spec.max_length,
        regex,
        file: spec.file,
        max_size: spec.max_size,
        allowed_types: spec.allowed_types,
        async_validator,
        messages: spec.messages,
    })
}
