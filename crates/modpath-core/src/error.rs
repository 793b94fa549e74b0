use std::path::PathBuf;
use thiserror::Error;

/// Core error type for modpath operations.
///
/// Resolution itself never fails on a miss (that is `Ok(None)`); these variants
/// cover I/O and configuration authoring bugs.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid alias pattern `{pattern}`: {source}")]
    InvalidAliasPattern {
        pattern: String,
        #[source]
        source: regex_lite::Error,
    },

    #[error("Invalid scope `{scope}`: {source}")]
    InvalidScope {
        scope: String,
        #[source]
        source: glob::PatternError,
    },

    #[error("Alias substitution failed for `{specifier}`: {message}")]
    Substitution { specifier: String, message: String },

    #[error("{0}")]
    Other(String),
}

impl Error {
    #[must_use]
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Error for a substitution function that cannot produce a target.
    #[must_use]
    pub fn substitution(specifier: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Substitution {
            specifier: specifier.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
