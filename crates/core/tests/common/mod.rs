//! Shared helpers for integration tests.

use std::sync::Once;

use serde_json::{Map, Value};

static TRACING: Once = Once::new();

/// Install a test subscriber once; honours `RUST_LOG` (and a local `.env`).
pub fn init_tracing() {
    TRACING.call_once(|| {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "formrules_core=debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Unwrap a `json!` object literal into a data record.
pub fn record(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}
