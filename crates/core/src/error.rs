use crate::config::ConfigError;
use crate::validation::schema::SchemaError;

/// Crate-level error type.
///
/// Validation itself never fails; these errors come from building a rule
/// schema or loading engine configuration.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}
