use std::time::Duration;

/// Errors raised while loading [`EngineConfig`] from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a valid {expected}, got {value:?}")]
    InvalidValue {
        var: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Validation engine configuration.
///
/// The defaults evaluate fields one at a time with no timeout on external
/// validators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Maximum number of leaf fields evaluated concurrently (default: `1`).
    pub max_concurrency: usize,
    /// Upper bound on a single async validator call (default: none).
    pub async_timeout: Option<Duration>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 1,
            async_timeout: None,
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                      | Default |
    /// |------------------------------|---------|
    /// | `FORMRULES_MAX_CONCURRENCY`  | `1`     |
    /// | `FORMRULES_ASYNC_TIMEOUT_MS` | unset   |
    pub fn from_env() -> Result<Self, ConfigError> {
        let max_concurrency = match std::env::var("FORMRULES_MAX_CONCURRENCY") {
            Ok(raw) => parse_positive("FORMRULES_MAX_CONCURRENCY", &raw)?,
            Err(_) => 1,
        };

        let async_timeout = match std::env::var("FORMRULES_ASYNC_TIMEOUT_MS") {
            Ok(raw) => {
                let ms = parse_positive("FORMRULES_ASYNC_TIMEOUT_MS", &raw)?;
                Some(Duration::from_millis(ms as u64))
            }
            Err(_) => None,
        };

        Ok(Self {
            max_concurrency,
            async_timeout,
        })
    }

    /// Evaluate up to `n` leaf fields at once. Zero is clamped to one.
    pub fn with_max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = n.max(1);
        self
    }

    pub fn with_async_timeout(mut self, timeout: Duration) -> Self {
        self.async_timeout = Some(timeout);
        self
    }
}

fn parse_positive(var: &'static str, raw: &str) -> Result<usize, ConfigError> {
    let n: usize = raw
        .trim()
        .parse()
        .map_err(|_| ConfigError::InvalidValue {
            var,
            expected: "positive integer",
            value: raw.to_string(),
        })?;
    if n == 0 {
        return Err(ConfigError::Zero(var));
    }
    Ok(n)
}
