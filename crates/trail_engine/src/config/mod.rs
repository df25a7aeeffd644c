//! File-backed configuration support
//!
//! Configuration structs derive serde and implement [`Config`] to gain
//! load/save support for TOML and RON files, selected by file extension.

pub use serde::{Deserialize, Serialize};

/// Trait for serializable configuration types
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from a `.toml` or `.ron` file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse {
                path: path.to_string(),
                reason: e.to_string(),
            })
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse {
                path: path.to_string(),
                reason: e.to_string(),
            })
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to a `.toml` or `.ron` file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error while reading or writing the file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// File contents did not parse as the expected type
    #[error("failed to parse {path}: {reason}")]
    Parse {
        /// Path of the offending file
        path: String,
        /// Parser diagnostic
        reason: String,
    },

    /// Value could not be serialized
    #[error("serialization error: {0}")]
    Serialize(String),

    /// File extension is neither `.toml` nor `.ron`
    #[error("unsupported config format: {0}")]
    UnsupportedFormat(String),
}
