//! Error types for the harness.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HarnessError {
    /// A flattened condition list must alternate actual/expected values.
    #[error("conditions must be written in (actual, expected) pairs, got {len} values")]
    UnpairedCondition { len: usize },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialize: {0}")]
    Serialize(#[from] serde_json::Error),
}
