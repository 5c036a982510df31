//! Error types for the JumpKit analysis engine.
//!
//! Every variant describes a data or input condition, never a crash. Errors
//! are `Clone` so a failed stage can hand the exact same value to every
//! stage that depends on it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Error {
    #[error("Insufficient data: need {required} valid body-center points, have {available}")]
    InsufficientData { required: usize, available: usize },

    #[error(
        "Ambiguous segmentation: highest position at frame {min_y_frame} \
         comes after lowest position at frame {max_y_frame}"
    )]
    AmbiguousSegmentation {
        min_y_frame: usize,
        max_y_frame: usize,
    },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<config::ConfigError> for Error {
    fn from(e: config::ConfigError) -> Self {
        Error::Config(e.to_string())
    }
}
