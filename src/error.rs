//! Persistence error types.
//!
//! The simulation itself never fails: out-of-range numeric state is clamped
//! where it occurs. Only loading and saving records, settings and balance
//! overrides can fail, and callers recover by falling back to defaults.

use std::fmt;

/// Failure while reading or writing persisted data
#[derive(Debug)]
pub enum PersistError {
    /// The backing file could not be read or written
    Io(std::io::Error),
    /// Stored data was not valid JSON for the expected type
    Parse(serde_json::Error),
}

impl fmt::Display for PersistError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PersistError::Io(e) => write!(f, "storage unavailable: {}", e),
            PersistError::Parse(e) => write!(f, "corrupt saved data: {}", e),
        }
    }
}

impl std::error::Error for PersistError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PersistError::Io(e) => Some(e),
            PersistError::Parse(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for PersistError {
    fn from(e: std::io::Error) -> Self {
        PersistError::Io(e)
    }
}

impl From<serde_json::Error> for PersistError {
    fn from(e: serde_json::Error) -> Self {
        PersistError::Parse(e)
    }
}

/// Convenience alias: a `Result` using `PersistError` as the error type.
pub type PersistResult<T> = Result<T, PersistError>;
