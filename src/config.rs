use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::sink::SinkOptions;

/// Main testinel configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub log_level: LogLevel,
    pub reporter: ReporterConfig,
}

/// Log verbosity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ReporterConfig {
    /// Fallback destination when neither `--dsn` nor TESTINEL_DSN is set
    pub dsn: Option<String>,
    /// Sink tunables
    #[serde(flatten)]
    pub sink: SinkOptions,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            let path = Self::expand_path(path);
            return Self::load_from_file(&path).context(format!("Failed to load config from {}", path.display()));
        }

        // Check TESTINEL_CONFIG env var
        if let Ok(env_path) = std::env::var("TESTINEL_CONFIG") {
            let path = Self::expand_path(Path::new(&env_path));
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from TESTINEL_CONFIG: {}", e);
                    }
                }
            }
        }

        // Try ~/.config/testinel/testinel.yaml
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("testinel").join("testinel.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Try ./testinel.yaml (per-project config)
        let local_config = PathBuf::from("testinel.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Pick the destination: explicit flag, then TESTINEL_DSN, then config
    pub fn resolve_dsn(&self, flag: Option<&str>, env_value: Option<String>) -> Option<String> {
        flag.map(str::to_string)
            .or(env_value.filter(|v| !v.is_empty()))
            .or_else(|| self.reporter.dsn.clone())
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }
}
