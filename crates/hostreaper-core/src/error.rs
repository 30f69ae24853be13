//! Core error types for hostreaper-core

use std::num::ParseIntError;

use hostreaper_client::ClientError;
use thiserror::Error;

use crate::stage::Stage;

/// Errors that stop the daemon
///
/// Per-host action failures never surface here; the cycle logs them and
/// moves on.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A numeric environment variable is not an integer
    #[error("unable to parse {var} value {value:?}: {source}")]
    InvalidNumber {
        /// Variable name
        var: String,
        /// Raw value
        value: String,
        /// Parse failure
        source: ParseIntError,
    },

    /// Configuration is well-formed but unusable
    #[error("configuration error: {0}")]
    Config(String),

    /// Listing the hosts for a stage failed
    #[error("unable to retrieve list of {} hosts from api: {source}", .stage.source_state())]
    ListFailed {
        /// Stage whose query failed
        stage: Stage,
        /// Underlying client error
        source: ClientError,
    },
}

impl CoreError {
    /// Stage that was running when the error occurred, if any
    #[must_use]
    pub fn stage(&self) -> Option<Stage> {
        match self {
            CoreError::ListFailed { stage, .. } => Some(*stage),
            CoreError::InvalidNumber { .. } | CoreError::Config(_) => None,
        }
    }
}
