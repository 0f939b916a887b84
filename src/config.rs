//! Layered configuration.
//!
//! Settings are merged in this order, later layers winning:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config FILE`, else `config.toml` in the platform config
//!    directory, e.g. `~/.config/dupsweep/config.toml`)
//! 3. `DUPSWEEP_*` environment variables (`DUPSWEEP_OUTPUT=run.txt`)
//! 4. CLI flags
//!
//! ```toml
//! output = "result.txt"
//! types = [".jpg", ".png"]
//! hash_errors = "skip"
//! delete_errors = "abort"
//! delete_mode = "trash"
//! follow_symlinks = false
//! io_threads = 4
//! ```

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::actions::DeleteMode;
use crate::cli::Cli;
use crate::duplicates::ErrorPolicy;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "DUPSWEEP_";

/// Default run log file name.
pub const DEFAULT_OUTPUT: &str = "result.txt";

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An explicitly requested config file does not exist.
    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    /// A layer could not be parsed or has a wrong value type.
    #[error("invalid configuration: {0}")]
    Invalid(#[from] Box<figment::Error>),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Run log file, truncated at the start of every run.
    pub output: PathBuf,
    /// Filename suffixes to accept. Empty accepts every file.
    pub types: Vec<String>,
    /// Policy for files that can't be hashed.
    pub hash_errors: ErrorPolicy,
    /// Policy for files that can't be deleted.
    pub delete_errors: ErrorPolicy,
    /// Permanent removal or system trash.
    pub delete_mode: DeleteMode,
    /// Take symlinked entries of listed folders.
    pub follow_symlinks: bool,
    /// Hashing threads; 1 hashes sequentially.
    pub io_threads: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            types: Vec::new(),
            hash_errors: ErrorPolicy::Abort,
            delete_errors: ErrorPolicy::Abort,
            delete_mode: DeleteMode::Permanent,
            follow_symlinks: false,
            io_threads: 1,
        }
    }
}

impl Config {
    /// Load defaults, the config file, and environment overrides.
    ///
    /// With `path = None` the platform default file is used if it exists.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if `path` is given but missing, and `Invalid` if
    /// any layer fails to parse.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(p) if !p.is_file() => return Err(ConfigError::NotFound(p.to_path_buf())),
            Some(p) => Some(p.to_path_buf()),
            None => Self::default_path(),
        };

        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(ref file) = file {
            log::debug!("Reading config from {}", file.display());
            figment = figment.merge(Toml::file(file));
        }
        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        Self::extract(figment)
    }

    /// Extract a config from an already assembled figment.
    ///
    /// # Errors
    ///
    /// Returns `Invalid` if the figment doesn't describe a valid config.
    pub fn extract(figment: Figment) -> Result<Self, ConfigError> {
        let mut config: Config = figment.extract().map_err(Box::new)?;
        config.io_threads = config.io_threads.max(1);
        Ok(config)
    }

    /// Get the default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "dupsweep").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply CLI flags on top of the loaded layers.
    pub fn merge_cli(&mut self, cli: &Cli) {
        if let Some(ref output) = cli.output {
            self.output = output.clone();
        }
        if !cli.types.is_empty() {
            self.types = cli.types.clone();
        }
        if cli.skip_errors {
            self.hash_errors = ErrorPolicy::Skip;
            self.delete_errors = ErrorPolicy::Skip;
        }
        if cli.trash {
            self.delete_mode = DeleteMode::Trash;
        }
        if cli.follow_symlinks {
            self.follow_symlinks = true;
        }
        if let Some(threads) = cli.io_threads {
            self.io_threads = threads.max(1);
        }
    }
}
