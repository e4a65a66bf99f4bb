//! Declarative validation of nested form data.
//!
//! Validate a record against a [`RuleSet`] and get back per-field error
//! messages plus the values that passed, keyed by dotted path:
//!
//! ```
//! use formrules_core::{validate_form, Rule, RuleSet};
//! use serde_json::json;
//!
//! # tokio_test_block(async {
//! let rules = RuleSet::new()
//!     .field("name", Rule::new().required())
//!     .field("email", Rule::new().email());
//! let data = json!({"name": "", "email": "a@b.com"});
//!
//! let result = validate_form(data.as_object().unwrap(), &rules).await;
//! assert_eq!(result.errors["name"], ["This field is required."]);
//! assert_eq!(result.data["email"], "a@b.com");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
//! #     tokio::runtime::Runtime::new().unwrap().block_on(f)
//! # }
//! ```

pub mod config;
pub mod error;
pub mod validation;

pub use config::{ConfigError, EngineConfig};
pub use error::CoreError;
pub use validation::{
    validate_field, validate_form, validator_fn, AsyncOutcome, AsyncValidator, BoxError, Check,
    FieldType, Messages, Rule, RuleSet, SchemaError, SharedValidator, ValidationEngine,
    ValidationResult, ValidatorRegistry,
};
