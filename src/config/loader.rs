//! Configuration loading and discovery for `tweetsent.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::TweetsentConfig;
use crate::network::OptimizerKind;
use crate::tweet::Representation;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Name of the configuration file.
pub const CONFIG_FILE: &str = "tweetsent.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse tweetsent.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override data directory
    pub data_dir: Option<PathBuf>,
    /// Override results directory
    pub results_dir: Option<PathBuf>,
    /// Override model file
    pub model: Option<PathBuf>,
    /// Override training epochs
    pub epochs: Option<usize>,
    /// Override optimizer
    pub optimizer: Option<OptimizerKind>,
    /// Override tweet representation
    pub representation: Option<Representation>,
    /// Override RNG seed
    pub seed: Option<u64>,
    /// Override top list length
    pub top_k: Option<usize>,
}

/// Find tweetsent.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for tweetsent.toml
/// 2. Check XDG_CONFIG_HOME/tweetsent/tweetsent.toml (or ~/.config/tweetsent/tweetsent.toml)
pub fn find_config() -> Option<PathBuf> {
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    find_xdg_config()
}

/// Find tweetsent.toml in the XDG config directory.
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("tweetsent").join(CONFIG_FILE);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find tweetsent.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration from a tweetsent.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses `find_config()`
/// to locate the config file. If no config file is found, returns the
/// default configuration.
///
/// Relative paths in the `[paths]` section stay relative to the working
/// directory, like the file names given on the command line.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use tweetsent::config::load_config;
///
/// let discovered = load_config(None)?;
/// let explicit = load_config(Some(Path::new("tweetsent.toml")))?;
/// # Ok::<(), tweetsent::config::ConfigError>(())
/// ```
pub fn load_config(path: Option<&Path>) -> Result<TweetsentConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => {
            debug!("no tweetsent.toml found, using defaults");
            Ok(default_config())
        }
    }
}

fn load_config_file(path: &Path) -> Result<TweetsentConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: TweetsentConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}

/// Configuration used when no tweetsent.toml is found.
pub fn default_config() -> TweetsentConfig {
    TweetsentConfig::default()
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values. The merged
/// configuration is validated again, since flags bypass the file checks.
pub fn merge_cli_overrides(config: &mut TweetsentConfig, overrides: &CliOverrides) -> Result<(), ConfigError> {
    if let Some(ref dir) = overrides.data_dir {
        config.paths.data_dir = dir.clone();
    }
    if let Some(ref dir) = overrides.results_dir {
        config.paths.results_dir = dir.clone();
    }
    if let Some(ref model) = overrides.model {
        config.paths.model = model.clone();
    }
    if let Some(epochs) = overrides.epochs {
        config.network.epochs = epochs;
    }
    if let Some(optimizer) = overrides.optimizer {
        config.network.optimizer = optimizer;
    }
    if let Some(representation) = overrides.representation {
        config.network.representation = representation;
    }
    if let Some(seed) = overrides.seed {
        config.network.seed = seed;
    }
    if let Some(top_k) = overrides.top_k {
        config.stats.top_k = top_k;
    }

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }
    Ok(())
}
