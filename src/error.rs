//! Failure kinds surfaced by dispatch and query
//!
//! There are exactly two: the caller sent something unusable
//! ([`Error::Validation`]) or storage failed ([`Error::Persistence`]).
//! Neither is retried here.

use std::fmt;

use crate::storage::StorageError;
use crate::validate::ValidationError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// The request was rejected before storage was touched
    Validation(ValidationError),

    /// Storage failed; any write was rolled back
    Persistence(StorageError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Validation(err) => write!(f, "validation failed: {}", err),
            Error::Persistence(err) => write!(f, "persistence failed: {}", err),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Validation(err) => Some(err),
            Error::Persistence(err) => Some(err),
        }
    }
}

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Validation(err)
    }
}

impl From<StorageError> for Error {
    fn from(err: StorageError) -> Self {
        Error::Persistence(err)
    }
}
