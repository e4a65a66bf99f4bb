//! Object walker: flattens nested data/rule pairs into leaf work items.
//!
//! The walk is purely structural. Each level returns its own leaves, which
//! the caller appends after the leaves already collected, so the final order
//! is depth-first in rule declaration order.

use serde_json::{Map, Value};

use super::rules::{Rule, RuleSet};

/// One leaf field to hand to the field validator.
#[derive(Debug, Clone)]
pub struct Leaf<'a> {
    /// Dotted path from the root, e.g. `address.city`.
    pub path: String,
    /// `None` when the field is missing from the data.
    pub value: Option<&'a Value>,
    pub rule: &'a Rule,
}

/// Collect the leaves of `rules` applied to `data` under `parent`.
///
/// An object rule only recurses when the value is a mapping. A missing,
/// `null`, array, or scalar value falls through as a leaf checked against
/// the object rule itself; the object rule's own checks are never run when
/// recursion happens.
pub fn collect_leaves<'a>(
    data: &'a Map<String, Value>,
    rules: &'a RuleSet,
    parent: &str,
) -> Vec<Leaf<'a>> {
    let mut leaves = Vec::with_capacity(rules.len());

    for (field, rule) in rules.iter() {
        let path = join_path(parent, field);
        let value = data.get(field);

        match (rule.nested(), value) {
            (Some(nested), Some(Value::Object(inner))) => {
                leaves.extend(collect_leaves(inner, nested, &path));
            }
            _ => leaves.push(Leaf { path, value, rule }),
        }
    }

    leaves
}

pub fn join_path(parent: &str, field: &str) -> String {
    if parent.is_empty() {
        field.to_string()
    } else {
        format!("{parent}.{field}")
    }
}
