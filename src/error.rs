//! Error types for the word server.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures loading or appending to the word list.
#[derive(Debug, Error)]
pub enum DictionaryError {
    /// The word list could not be opened or read.
    #[error("failed to load word list {path}: {source}")]
    Load {
        /// Path to the word list.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// A new word could not be written to the backing file.
    #[error("failed to append '{word}' to {path}: {source}")]
    Append {
        /// The word being added.
        word: String,
        /// Path to the word list.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Client input that the session refuses to process.
///
/// The `Display` text is sent to the client verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Input is longer than the configured maximum.
    #[error("ERROR: Input is longer than {max}!")]
    TooLong {
        /// Maximum accepted length in characters.
        max: usize,
    },

    /// Input holds something other than letters and single interior spaces.
    #[error("ERROR: Only letters and single spaces are allowed!")]
    InvalidCharacters,

    /// Input splits into more tokens than a session may match at once.
    #[error("ERROR: Too many words ({count}), at most {max} are allowed!")]
    TooManyTokens {
        /// Tokens found in the input.
        count: usize,
        /// Maximum tokens per input line.
        max: usize,
    },
}

/// Failures that end a session early without a summary.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Reading from or writing to the client failed.
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),

    /// An accepted word could not be stored.
    #[error(transparent)]
    Store(#[from] DictionaryError),
}

/// Errors loading server configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The server settings file could not be opened.
    #[error("cannot open server settings {path}: {source}")]
    ReadFile {
        /// Settings file that was requested.
        path: PathBuf,
        /// Cause reported by the filesystem.
        source: io::Error,
    },

    /// The server settings file is not valid TOML for `ServerConfig`.
    #[error("bad server settings in {path}: {source}")]
    ParseToml {
        /// Settings file being parsed.
        path: PathBuf,
        /// Deserializer error, including unknown keys.
        source: toml::de::Error,
    },

    /// A setting holds a value the server cannot run with.
    #[error("invalid setting {field}: {reason}")]
    Invalid {
        /// Name of the offending setting.
        field: &'static str,
        /// Why the value was rejected.
        reason: &'static str,
    },
}
