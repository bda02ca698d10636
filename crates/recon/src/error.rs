use thiserror::Error;

use crate::validate::Side;

/// Errors raised around the engine. Reconciliation itself is total and never
/// returns one of these; they come from config loading and from the opt-in
/// precondition checks in [`crate::validate`].
#[derive(Debug, Error)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    #[error("config parse error: {0}")]
    ConfigParse(String),
    /// Config validation error (bad tolerance, empty override, etc.).
    #[error("config validation error: {0}")]
    ConfigValidation(String),
    /// A strict precondition check failed for one dataset.
    #[error("dataset {side}: {message}")]
    Precondition { side: Side, message: String },
}
