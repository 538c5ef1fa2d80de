//! Scan configuration.
//!
//! A [`ScanConfig`] carries the extension allow-list, the directory deny-list
//! and the ordering switch. It can be loaded from a TOML file:
//!
//! ```toml
//! extensions = [".c", ".h", ".inc"]
//! skip_dirs = [".git", "build", "third_party"]
//! sort_entries = true
//! ```
//!
//! Missing keys fall back to the defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::filter::{
    normalize_extension, DirectoryFilter, FileClassifier, DEFAULT_EXTENSIONS, DEFAULT_SKIP_DIRS,
};

/// Config file looked up in the scan root when none is given explicitly.
pub const CONFIG_FILE_NAME: &str = ".linebolt.toml";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("empty extension in allow-list")]
    EmptyExtension,

    #[error("empty directory name in deny-list")]
    EmptySkipDir,
}

/// What to count and where not to look.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// File name suffixes to count, e.g. `".c"`.
    pub extensions: Vec<String>,
    /// Directory names never descended into.
    pub skip_dirs: Vec<String>,
    /// Sort directory entries by name for reproducible output.
    pub sort_entries: bool,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
            skip_dirs: DEFAULT_SKIP_DIRS.iter().map(|s| s.to_string()).collect(),
            sort_entries: true,
        }
    }
}

impl ScanConfig {
    /// Load and validate a config from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: ScanConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::debug!(path = %path.display(), "loaded config");
        config.validated()
    }

    /// Load `<root>/.linebolt.toml` if present, otherwise the defaults.
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Replace the extension allow-list.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|ext| ext.as_ref().to_string())
            .collect();
        self.validated()
    }

    /// Replace the directory deny-list.
    pub fn with_skip_dirs<I, S>(mut self, names: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_dirs = names.into_iter().map(Into::into).collect();
        self.validated()
    }

    /// Keep raw filesystem order instead of sorting entries.
    pub fn unsorted(mut self) -> Self {
        self.sort_entries = false;
        self
    }

    /// Classifier for the configured extensions.
    pub fn classifier(&self) -> FileClassifier {
        FileClassifier::new(&self.extensions)
    }

    /// Filter for the configured deny-list.
    pub fn directory_filter(&self) -> DirectoryFilter {
        DirectoryFilter::new(self.skip_dirs.iter().cloned())
    }

    fn validated(mut self) -> Result<Self, ConfigError> {
        self.extensions = self
            .extensions
            .iter()
            .map(|ext| normalize_extension(ext).ok_or(ConfigError::EmptyExtension))
            .collect::<Result<Vec<_>, _>>()?;

        self.skip_dirs = self
            .skip_dirs
            .iter()
            .map(|name| match name.trim() {
                "" => Err(ConfigError::EmptySkipDir),
                name => Ok(name.to_string()),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self)
    }
}
