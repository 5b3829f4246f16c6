//! Error types for Flowtrack.
//!
//! The graph algorithms never fail; errors only surface at the boundary,
//! when external JSON or TOML is turned into the crate's strict types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for all Flowtrack boundary operations.
#[derive(Deserialize, Serialize, Error, Debug, Clone, PartialEq)]
pub enum FlowtrackError {
    /// Configuration parsing or loading errors.
    #[error("{0}")]
    Config(String),

    /// Data conversion errors (JSON, TOML).
    #[error("{0}")]
    Convert(String),

    /// Template-level validation errors.
    #[error("{0}")]
    Template(String),

    /// Element definition errors.
    #[error("{0}")]
    Element(String),

    /// Relation definition errors.
    #[error("{0}")]
    Relation(String),

    /// Connection definition errors.
    #[error("{0}")]
    Connection(String),
}

impl From<FlowtrackError> for String {
    fn from(val: FlowtrackError) -> Self {
        val.to_string()
    }
}

impl From<serde_json::Error> for FlowtrackError {
    fn from(error: serde_json::Error) -> Self {
        FlowtrackError::Convert(error.to_string())
    }
}

impl From<toml::de::Error> for FlowtrackError {
    fn from(error: toml::de::Error) -> Self {
        FlowtrackError::Config(error.to_string())
    }
}
