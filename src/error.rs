//! Input errors raised while interpreting dashboard query parameters.
//!
//! Storage and startup failures are not modelled here: they travel as
//! `sqlx::Error` / `anyhow::Error` and surface as a generic HTTP 500.

use thiserror::Error;

// ---

/// A query parameter the client sent could not be understood.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("unknown range preset '{0}', expected one of 24h, 7d, 30d")]
    UnknownPreset(String),

    #[error("unknown bucket mode '{0}', expected hour or day_hour")]
    UnknownBucketMode(String),

    #[error("invalid timestamp '{0}', expected RFC 3339 or YYYY-MM-DDTHH:MM[:SS]")]
    InvalidTimestamp(String),

    #[error("range start {from} is after range end {to}")]
    InvertedRange { from: String, to: String },

    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),
}
