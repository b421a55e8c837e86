//! Errors raised at the edges of the engine.
//!
//! Field sampling and tracing never fail; only scene bookkeeping and config
//! parsing do.

use crate::em2d::ChargeId;

/// Errors from mutating a [`Scene`](crate::Scene).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SceneError {
    /// A charge with this id is already in the scene.
    #[error("charge id {0} is already in the scene")]
    DuplicateId(ChargeId),

    /// No charge with this id exists.
    #[error("no charge with id {0}")]
    UnknownId(ChargeId),
}

/// Errors from loading a configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The input was not valid JSON for the config type.
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}
