//! Validation engine: walks the data, validates every leaf, and aggregates
//! the outcomes into a [`ValidationResult`].

use futures::stream::{self, StreamExt};
use serde_json::{Map, Value};

use super::field::validate_field;
use super::rules::{RuleSet, ValidationResult};
use super::walker::{collect_leaves, Leaf};
use crate::config::EngineConfig;

/// Validate `data` against `rules` with the default configuration.
///
/// Never fails: every problem, including external validator failures, is a
/// field-level message in the result.
pub async fn validate_form(data: &Map<String, Value>, rules: &RuleSet) -> ValidationResult {
    ValidationEngine::default().validate(data, rules).await
}

/// Reusable engine carrying an [`EngineConfig`].
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    config: EngineConfig,
}

impl ValidationEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validate one data record.
    ///
    /// Results are recorded in traversal order regardless of
    /// `max_concurrency`, so concurrent and sequential runs produce the same
    /// result.
    pub async fn validate(&self, data: &Map<String, Value>, rules: &RuleSet) -> ValidationResult {
        let leaves = collect_leaves(data, rules, "");
        let leaf_count = leaves.len();
        let config = &self.config;

        let outcomes: Vec<(Leaf<'_>, Vec<String>)> = if config.max_concurrency <= 1 {
            let mut outcomes = Vec::with_capacity(leaf_count);
            for leaf in leaves {
                let messages = validate_field(&leaf.path, leaf.value, leaf.rule, config).await;
                outcomes.push((leaf, messages));
            }
            outcomes
        } else {
            stream::iter(leaves)
                .map(|leaf| async move {
                    let messages = validate_field(&leaf.path, leaf.value, leaf.rule, config).await;
                    (leaf, messages)
                })
                .buffered(config.max_concurrency)
                .collect()
                .await
        };

        let mut result = ValidationResult::new();
        for (leaf, messages) in outcomes {
            tracing::debug!(path = %leaf.path, errors = messages.len(), "Field validated");
            result.record(leaf.path, messages, leaf.value);
        }

        tracing::debug!(
            fields = leaf_count,
            invalid = result.errors.len(),
            valid = result.data.len(),
            "Validation complete"
        );
        result
    }

    /// Validate an arbitrary JSON value. Anything other than an object is
    /// treated as a record with no fields.
    pub async fn validate_value(&self, data: &Value, rules: &RuleSet) -> ValidationResult {
        match data {
            Value::Object(map) => self.validate(map, rules).await,
            _ => self.validate(&Map::new(), rules).await,
        }
    }
}
