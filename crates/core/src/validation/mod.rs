//! Form validation engine.
//!
//! Rule types, a JSON schema compiler, the field validator, the object
//! walker, and the evaluator that ties them together. No I/O happens here
//! except through caller-supplied async validators.

pub mod async_check;
pub mod evaluator;
pub mod field;
pub mod messages;
pub mod rules;
pub mod schema;
pub mod walker;

pub use async_check::{validator_fn, AsyncOutcome, AsyncValidator, BoxError, ValidatorRegistry};
pub use evaluator::{validate_form, ValidationEngine};
pub use field::validate_field;
pub use messages::{Check, Messages};
pub use rules::{FieldType, Rule, RuleSet, SharedValidator, ValidationResult};
pub use schema::SchemaError;
