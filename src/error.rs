//! Error types.

use thiserror::Error;

/// Errors raised while defining moves or parsing token notation.
///
/// Lookups never fail: unmatched input is noise, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    /// A move was registered with no tokens. It would name the trie root and
    /// report itself whenever nothing else matched.
    #[error("move '{name}' has an empty input sequence")]
    EmptySequence { name: String },

    #[error("unknown input token '{input}'")]
    UnknownToken { input: String },
}

/// Errors while loading a [`MotionConfig`](crate::config::MotionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid move: {0}")]
    Move(#[from] CommandError),
}
