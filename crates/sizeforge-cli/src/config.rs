//! Configuration system for the sizeforge CLI.

use serde::{Deserialize, Serialize};
use sizeforge_core::engine::{DEFAULT_MAX_ITERATIONS, MAX_ITERATIONS_LIMIT};
use sizeforge_core::skeleton::CommandEngine;
use sizeforge_core::{BuilderOptions, EngineConfig, GenerateOptions};
use std::fs;
use std::path::{Path, PathBuf};

/// sizeforge configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Padding engine configuration
    #[serde(default)]
    pub engine: EngineSection,
    /// Mailbox engine configuration
    #[serde(default)]
    pub mailbox: MailboxSection,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Padding engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineSection {
    /// Maximum padded builds per run
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    /// Accepted shortfall in bytes for every format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<u64>,
}

/// External PST engine configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MailboxSection {
    /// Program that writes PST files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine: Option<PathBuf>,
    /// Extra arguments passed before `--manifest`
    #[serde(default)]
    pub args: Vec<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,
}

// Default values

fn default_max_iterations() -> usize {
    DEFAULT_MAX_ITERATIONS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            tolerance: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Save configuration to file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let contents = toml::to_string_pretty(self)?;

        // Create parent directory if it doesn't exist
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, contents)?;
        Ok(())
    }

    /// Get default config path
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join("sizeforge/config.toml")
    }

    /// Load config from default path, or create default if it doesn't exist
    ///
    /// # Errors
    ///
    /// Returns an error if reading or creating the config fails.
    pub fn load_or_default() -> anyhow::Result<Self> {
        let path = Self::default_path();

        if path.exists() {
            Self::load(&path)
        } else {
            let config = Self::default();
            config.save(&path)?;
            Ok(config)
        }
    }

    /// Validate configuration
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.engine.max_iterations == 0 || self.engine.max_iterations > MAX_ITERATIONS_LIMIT {
            anyhow::bail!(
                "max_iterations must be between 1 and {}",
                MAX_ITERATIONS_LIMIT
            );
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            anyhow::bail!(
                "Invalid log level: {}. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            );
        }

        if let Some(engine) = &self.mailbox.engine {
            if engine.as_os_str().is_empty() {
                anyhow::bail!("Mailbox engine path is empty");
            }
        }

        Ok(())
    }

    /// Options for the core generator
    #[must_use]
    pub fn generate_options(&self) -> GenerateOptions {
        GenerateOptions {
            engine: EngineConfig {
                max_iterations: self.engine.max_iterations,
                tolerance: self.engine.tolerance,
            },
            builders: BuilderOptions {
                mail_engine: self
                    .mailbox
                    .engine
                    .as_ref()
                    .map(|program| CommandEngine::new(program, self.mailbox.args.clone())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.engine.max_iterations, 5);
        assert_eq!(config.engine.tolerance, None);
        assert_eq!(config.logging.level, "info");
        assert!(config.mailbox.engine.is_none());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        // Invalid log level
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());

        // Invalid iteration budget
        config.logging.level = "debug".to_string();
        config.engine.max_iterations = 0;
        assert!(config.validate().is_err());
        config.engine.max_iterations = MAX_ITERATIONS_LIMIT + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.engine.max_iterations, deserialized.engine.max_iterations);
        assert_eq!(config.logging.level, deserialized.logging.level);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[engine]\ntolerance = 8\n").unwrap();
        assert_eq!(config.engine.tolerance, Some(8));
        assert_eq!(config.engine.max_iterations, 5);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_generate_options_carry_mail_engine() {
        let mut config = Config::default();
        config.mailbox.engine = Some(PathBuf::from("/opt/pst/engine"));
        config.mailbox.args = vec!["--unicode".to_string()];

        let options = config.generate_options();
        let engine = options.builders.mail_engine.expect("engine configured");
        assert_eq!(engine.program(), Path::new("/opt/pst/engine"));
        assert_eq!(options.engine.max_iterations, 5);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        let mut config = Config::default();
        config.engine.tolerance = Some(32);
        config.save(&path).unwrap();

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded.engine.tolerance, Some(32));
    }
}
