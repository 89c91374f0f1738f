use crate::bar::BarKind;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// All errors generated in `jackbot-bar`.
///
/// Every variant is a configuration error raised before any event is consumed; once built,
/// computations are infallible.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Error)]
pub enum BarError {
    #[error("invalid {kind} bar interval {interval}: {reason}")]
    InvalidInterval {
        kind: BarKind,
        interval: f64,
        reason: String,
    },

    #[error("unknown bar kind: {0}, expected one of: time, volume, tick")]
    UnknownKind(String),

    #[error("failed to load bar configuration: {0}")]
    Config(String),

    #[error("failed to initialise ComputeRouter due to empty computable factories")]
    FactoriesEmpty,
}

impl From<serde_json::Error> for BarError {
    fn from(value: serde_json::Error) -> Self {
        Self::Config(value.to_string())
    }
}

impl From<std::io::Error> for BarError {
    fn from(value: std::io::Error) -> Self {
        Self::Config(value.to_string())
    }
}
