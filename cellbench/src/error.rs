//! Error types.

use std::fmt;

/// Error returned by variant lookup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BenchError {
    /// No registered variant has this name.
    UnknownVariant(String),
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BenchError::UnknownVariant(name) => write!(f, "unknown variant `{name}`"),
        }
    }
}

impl std::error::Error for BenchError {}
