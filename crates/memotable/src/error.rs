//! Error types for memotable

use std::error;
use std::fmt;

/// Boxed error produced by a failing compute function.
pub type BoxError = Box<dyn error::Error + Send + Sync + 'static>;

/// Result type alias for memotable operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache operations
#[derive(Debug)]
pub enum Error {
    /// Slot-array allocation failed (carries the requested slot count)
    Alloc(usize),

    /// The compute function failed for the requested key
    Compute(BoxError),

    /// Key not present in the table
    NotFound,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Alloc(slots) => write!(f, "failed to allocate {} slots", slots),
            Error::Compute(e) => write!(f, "compute failed: {}", e),
            Error::NotFound => write!(f, "key not found"),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Compute(e) => Some(&**e),
            _ => None,
        }
    }
}
