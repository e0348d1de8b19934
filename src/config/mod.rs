// src/config/mod.rs
mod schema;

use std::path::{Path, PathBuf};
use config::{Config as ConfigLoader, FileFormat};
use tracing::{debug, info, warn};

pub use schema::{Config, FilterConfig, OutputConfig, ProbeConfig};

use crate::error::{ParamCrawlError, ParamCrawlResult};

const DEFAULT_CONFIG: &str = include_str!("../../config/default.toml");

/// Centralized configuration handling
impl Config {
    /// Load configuration from a file, falling back to the default location and built-in defaults
    pub fn load(config_path: Option<&Path>) -> ParamCrawlResult<Self> {
        debug!("Loading configuration");

        let mut config_builder = ConfigLoader::builder();

        // Default configuration
        config_builder = config_builder.add_source(
            config::File::from_str(DEFAULT_CONFIG, FileFormat::Toml)
        );

        // User-provided configuration
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ParamCrawlError::ConfigError(
                    format!("Specified configuration file not found: {}", path.display())
                ));
            }
            config_builder = config_builder.add_source(config::File::from(path));
            info!("Loading user configuration from: {}", path.display());
        } else {
            let default_path = Self::get_default_config_path();
            if default_path.exists() {
                config_builder = config_builder.add_source(config::File::from(default_path.as_path()));
                info!("Loading default configuration from: {}", default_path.display());
            } else {
                debug!("No existing configuration found, using built-in defaults");
            }
        }

        // Environment variables, e.g. PARAMCRAWL_PROBE__TIMEOUT_SECS=5
        config_builder = config_builder.add_source(
            config::Environment::with_prefix("PARAMCRAWL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
        );

        let config: Config = match config_builder.build() {
            Ok(c) => match c.try_deserialize() {
                Ok(config) => config,
                Err(e) => return Err(ParamCrawlError::ConfigError(format!("Failed to parse configuration: {}", e))),
            },
            Err(e) => return Err(ParamCrawlError::ConfigError(format!("Failed to build configuration: {}", e))),
        };

        if config.probe.max_concurrency == Some(0) {
            warn!("max_concurrency of 0 would never run a probe; treating it as unbounded");
            return Ok(Config {
                probe: ProbeConfig { max_concurrency: None, ..config.probe },
                ..config
            });
        }

        Ok(config)
    }

    /// Get the default configuration path
    pub fn get_default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".paramcrawl/config.toml")
    }

    /// Write the default configuration to `path`, or to the default location
    pub fn init(path: Option<&Path>, force: bool) -> ParamCrawlResult<PathBuf> {
        let config_path = path
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::get_default_config_path);

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ParamCrawlError::FileError {
                    path: parent.to_path_buf(),
                    message: format!("Failed to create directory: {}", e),
                })?;
        }

        if config_path.exists() && !force {
            return Err(ParamCrawlError::ConfigError(
                format!("Configuration already exists at {}. Use --force to overwrite.", config_path.display())
            ));
        }

        Config::default().save(&config_path)?;

        Ok(config_path)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> ParamCrawlResult<()> {
        let config_str = toml::to_string_pretty(self)
            .map_err(|e| ParamCrawlError::SerializationError(format!("Failed to serialize configuration: {}", e)))?;

        std::fs::write(path, config_str)
            .map_err(|e| ParamCrawlError::FileError {
                path: path.to_path_buf(),
                message: format!("Failed to write configuration: {}", e),
            })?;

        info!("Configuration saved to {}", path.display());

        Ok(())
    }
}
