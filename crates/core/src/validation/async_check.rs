//! External (asynchronous) validators.
//!
//! An [`AsyncValidator`] is an opaque, possibly suspending predicate attached
//! to a rule, e.g. a uniqueness lookup against a remote store. Failures of
//! the validator itself are never propagated: [`invoke`] downgrades errors,
//! panics, and timeouts to a single field message.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::messages::{ASYNC_ERROR, ASYNC_INVALID};
use super::rules::SharedValidator;

/// Error type returned by external validators.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Verdict of an external validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AsyncOutcome {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl AsyncOutcome {
    pub fn valid() -> Self {
        Self {
            valid: true,
            message: None,
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: Some(message.into()),
        }
    }
}

/// Caller-supplied validation step that may suspend.
#[async_trait]
pub trait AsyncValidator: Send + Sync {
    /// Judge `value`. Returning `Err` is survivable; the field gets a
    /// generic async-error message.
    async fn validate(&self, value: &Value) -> Result<AsyncOutcome, BoxError>;

    /// Name used for registry lookup and logging.
    fn name(&self) -> &str {
        "anonymous"
    }
}

impl fmt::Debug for dyn AsyncValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncValidator")
            .field("name", &self.name())
            .finish()
    }
}

/// Adapter turning an async closure into an [`AsyncValidator`].
pub struct FnValidator<F> {
    name: String,
    f: F,
}

#[async_trait]
impl<F, Fut, E> AsyncValidator for FnValidator<F>
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<AsyncOutcome, E>> + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    async fn validate(&self, value: &Value) -> Result<AsyncOutcome, BoxError> {
        (self.f)(value.clone()).await.map_err(Into::into)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Wrap an async closure as a shared validator.
///
/// ```
/// use formrules_core::validation::async_check::{
///     validator_fn, AsyncOutcome, AsyncValidator, BoxError,
/// };
///
/// let taken = validator_fn("username_taken", |value| async move {
///     if value == "admin" {
///         Ok::<_, BoxError>(AsyncOutcome::invalid("taken"))
///     } else {
///         Ok(AsyncOutcome::valid())
///     }
/// });
/// assert_eq!(taken.name(), "username_taken");
/// ```
pub fn validator_fn<F, Fut, E>(name: impl Into<String>, f: F) -> SharedValidator
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<AsyncOutcome, E>> + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    Arc::new(FnValidator {
        name: name.into(),
        f,
    })
}

/// Run one external validator and translate its verdict into at most one
/// message.
pub(crate) async fn invoke(
    path: &str,
    validator: &dyn AsyncValidator,
    value: &Value,
    timeout: Option<Duration>,
) -> Option<String> {
    let call = AssertUnwindSafe(validator.validate(value)).catch_unwind();

    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, call).await {
            Ok(outcome) => outcome,
            Err(_) => {
                tracing::warn!(
                    path,
                    validator = validator.name(),
                    timeout_ms = limit.as_millis() as u64,
                    "Async validator timed out"
                );
                return Some(ASYNC_ERROR.to_string());
            }
        },
        None => call.await,
    };

    match outcome {
        Ok(Ok(AsyncOutcome { valid: true, .. })) => None,
        Ok(Ok(AsyncOutcome {
            valid: false,
            message,
        })) => Some(
            message
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| ASYNC_INVALID.to_string()),
        ),
        Ok(Err(e)) => {
            tracing::warn!(path, validator = validator.name(), error = %e, "Async validator failed");
            Some(ASYNC_ERROR.to_string())
        }
        Err(_) => {
            tracing::warn!(path, validator = validator.name(), "Async validator panicked");
            Some(ASYNC_ERROR.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Named validators that JSON rule schemas refer to via `asyncValidator`.
#[derive(Debug, Default, Clone)]
pub struct ValidatorRegistry {
    validators: HashMap<String, SharedValidator>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register under the validator's own name.
    pub fn register(&mut self, validator: SharedValidator) {
        let name = validator.name().to_string();
        self.register_as(name, validator);
    }

    /// Register under an explicit name, replacing any earlier entry.
    pub fn register_as(&mut self, name: impl Into<String>, validator: SharedValidator) {
        let name = name.into();
        if self.validators.insert(name.clone(), validator).is_some() {
            tracing::warn!(name = %name, "Replaced previously registered validator");
        }
    }

    pub fn get(&self, name: &str) -> Option<SharedValidator> {
        self.validators.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}
