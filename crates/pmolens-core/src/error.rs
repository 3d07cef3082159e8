#![forbid(unsafe_code)]

//! Error types.
//!
//! Nothing here is fatal to the host page: callers degrade to "show nothing".

use std::fmt;

/// Failure of the location lookup collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// The request could not be sent or the connection failed.
    Network(String),
    /// The body was not a JSON document of the expected shape.
    InvalidBody(String),
    /// The backend answered with an explicit `error` field.
    Backend(String),
}

impl fmt::Display for LookupError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Network(msg) => write!(f, "lookup request failed: {msg}"),
            Self::InvalidBody(msg) => write!(f, "lookup response is not valid location data: {msg}"),
            Self::Backend(msg) => write!(f, "inspector backend error: {msg}"),
        }
    }
}

impl std::error::Error for LookupError {}

/// Invalid inspector configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration document could not be parsed.
    Parse(String),
    /// A keybinding string could not be understood.
    InvalidChord(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(msg) => write!(f, "invalid inspector config: {msg}"),
            Self::InvalidChord(chord) => write!(f, "invalid key chord: {chord:?}"),
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            LookupError::Backend("Metadata not found".into()).to_string(),
            "inspector backend error: Metadata not found"
        );
        assert_eq!(
            ConfigError::InvalidChord("Ctrl+".into()).to_string(),
            "invalid key chord: \"Ctrl+\""
        );
    }
}
