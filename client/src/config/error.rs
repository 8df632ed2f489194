use std::io;
use std::path::PathBuf;

use jetton_core::cell::TonCellError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing required value: {0}")]
    MissingField(&'static str),

    #[error("Invalid value of {field}: {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },

    #[error("Invalid contract code in {}: {source}", path.display())]
    InvalidCode {
        path: PathBuf,
        #[source]
        source: TonCellError,
    },
}

impl ConfigError {
    pub fn invalid_value<M: ToString>(field: &'static str, message: M) -> ConfigError {
        ConfigError::InvalidValue {
            field,
            message: message.to_string(),
        }
    }
}
