//! Session configuration

use std::path::PathBuf;

/// Defaults applied when a session call leaves directory or extension unset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Used when neither an explicit directory nor the last input directory is known
    pub default_directory: PathBuf,
    /// File extension without the dot
    pub default_extension: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_directory: PathBuf::from("./"),
            default_extension: "xlsx".to_string(),
        }
    }
}

impl SessionConfig {
    pub fn with_directory(mut self, directory: impl Into<PathBuf>) -> Self {
        self.default_directory = directory.into();
        self
    }

    pub fn with_extension(mut self, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        self.default_extension = extension.trim_start_matches('.').to_string();
        self
    }
}
