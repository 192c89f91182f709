use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error, PartialEq)]
pub enum RestplateError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("Invalid resource '{0}': {1}")]
    ResourceError(String, String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Store error: {0}")]
    StoreError(String),
}

impl From<StoreError> for RestplateError {
    fn from(err: StoreError) -> Self {
        RestplateError::StoreError(err.to_string())
    }
}
