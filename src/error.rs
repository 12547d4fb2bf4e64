//! Crate-level error types.

use std::fmt;

/// Errors produced by the flexdock crate.
///
/// The control loop itself never fails; these only surface at the
/// configuration and persistence boundary.
#[derive(Debug)]
pub enum FlexDockError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Persisted mechanism state parsing/serialization failure.
    StateParse(String),
    /// Options parsed but describe an impossible mechanism.
    InvalidOptions(String),
}

impl fmt::Display for FlexDockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::StateParse(msg) => {
                write!(f, "persisted state parse error: {msg}")
            }
            Self::InvalidOptions(msg) => {
                write!(f, "invalid options: {msg}")
            }
        }
    }
}

impl std::error::Error for FlexDockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FlexDockError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
