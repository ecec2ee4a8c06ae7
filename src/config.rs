//! Server configuration.
//!
//! Settings come from an optional TOML file; every field has a default so a
//! partial file, or none at all, is valid. Command-line flags are applied on
//! top by the binary.

use std::{fs, path::Path, path::PathBuf, time::Duration};

use serde::Deserialize;

use crate::error::ConfigError;

/// Longest input line accepted from a client, in characters.
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 100;
/// Most tokens matched for one input line.
pub const DEFAULT_MAX_TOKENS: usize = 50;
/// Candidate slots reported per token.
pub const DEFAULT_SUGGESTIONS: usize = 5;
/// Address the server listens on.
pub const DEFAULT_BIND: &str = "0.0.0.0:60000";
/// Word list loaded at startup.
pub const DEFAULT_DICTIONARY: &str = "basic_english_2000.txt";

/// Per-session protocol limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Longest accepted input line.
    pub max_input_length: usize,
    /// Most tokens per input line.
    pub max_tokens: usize,
    /// Candidate slots per token.
    pub suggestions: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            max_tokens: DEFAULT_MAX_TOKENS,
            suggestions: DEFAULT_SUGGESTIONS,
        }
    }
}

/// Complete server configuration as read from TOML.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Socket address to listen on.
    pub bind: String,
    /// Word list file.
    pub dictionary: PathBuf,
    /// Longest accepted input line.
    pub max_input_length: usize,
    /// Most tokens per input line.
    pub max_tokens: usize,
    /// Candidate slots per token.
    pub suggestions: usize,
    /// Run each connection on its own thread instead of one at a time.
    pub concurrent: bool,
    /// Seconds to wait on a client read; 0 waits forever.
    pub read_timeout_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            dictionary: PathBuf::from(DEFAULT_DICTIONARY),
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            max_tokens: DEFAULT_MAX_TOKENS,
            suggestions: DEFAULT_SUGGESTIONS,
            concurrent: false,
            read_timeout_secs: 0,
        }
    }
}

impl ServerConfig {
    /// Reads and validates a TOML config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings that would make every session fail.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_input_length == 0 {
            return Err(ConfigError::Invalid {
                field: "max_input_length",
                reason: "must be at least 1",
            });
        }
        if self.max_tokens == 0 {
            return Err(ConfigError::Invalid {
                field: "max_tokens",
                reason: "must be at least 1",
            });
        }
        if self.suggestions == 0 {
            return Err(ConfigError::Invalid {
                field: "suggestions",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }

    pub fn limits(&self) -> Limits {
        Limits {
            max_input_length: self.max_input_length,
            max_tokens: self.max_tokens,
            suggestions: self.suggestions,
        }
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_secs > 0).then(|| Duration::from_secs(self.read_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("wordserve.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind, "0.0.0.0:60000");
        assert_eq!(config.limits(), Limits::default());
        assert_eq!(config.read_timeout(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "suggestions = 3\nconcurrent = true\n");

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.suggestions, 3);
        assert!(config.concurrent);
        assert_eq!(config.max_input_length, DEFAULT_MAX_INPUT_LENGTH);
        assert_eq!(config.dictionary, PathBuf::from(DEFAULT_DICTIONARY));
    }

    #[test]
    fn test_full_file() {
        let dir = TempDir::new().unwrap();
        let path = write_config(
            &dir,
            r#"
bind = "127.0.0.1:7000"
dictionary = "/tmp/words.txt"
max_input_length = 80
max_tokens = 10
suggestions = 4
concurrent = false
read_timeout_secs = 30
"#,
        );

        let config = ServerConfig::load(&path).unwrap();
        assert_eq!(config.bind, "127.0.0.1:7000");
        assert_eq!(config.dictionary, PathBuf::from("/tmp/words.txt"));
        assert_eq!(
            config.limits(),
            Limits {
                max_input_length: 80,
                max_tokens: 10,
                suggestions: 4
            }
        );
        assert_eq!(config.read_timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "port = 60000\n");

        let err = ServerConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ParseToml { .. }));
    }

    #[test]
    fn test_zero_suggestions_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write_config(&dir, "suggestions = 0\n");

        let err = ServerConfig::load(&path).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "suggestions",
                ..
            }
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = ServerConfig::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFile { .. }));
    }
}
