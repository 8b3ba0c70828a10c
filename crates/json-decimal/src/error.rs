use std::path::PathBuf;

use thiserror::Error;

/// Errors from the document-level entry points.
#[derive(Debug, Error)]
pub enum Error {
    #[error("malformed JSON document: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors while rendering a single wei-style amount.
///
/// These never escape a document conversion; the converter keeps the
/// original value and records a warning instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    #[error("not a base-10 integer: {0:?}")]
    InvalidDigits(String),

    #[error("invalid scientific notation: {0:?}")]
    InvalidScientific(String),
}

/// Errors while loading or validating settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid settings JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid token entry {address:?}: {reason}")]
    InvalidToken { address: String, reason: String },

    #[error("invalid rule {0:?}: expected TOKEN_KEY=AMOUNT_KEY[,AMOUNT_KEY...]")]
    InvalidRule(String),
}
