use config::{Config as ConfigBuilder, ConfigError, File};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crate::batch::{Granularity, DEFAULT_GRANULARITY, MAX_GRANULARITY};
use crate::errors::{SearchError, SearchResult};

/// Engine configuration shared by the library and the CLI.
///
/// # Configuration Locations
///
/// The configuration can be loaded from multiple locations, later ones
/// overriding earlier ones:
/// 1. Global `conjecturing/config.yaml` in the platform config directory
///    (`$XDG_CONFIG_HOME` or `~/.config` on Linux, `~/Library/Application Support`
///    on macOS, `%APPDATA%` on Windows)
/// 2. Local `.conjecturing.yaml` in the current directory
/// 3. Custom config file specified via `--config` flag
///
/// # Configuration Format
///
/// ```yaml
/// # Number of progress batches a budget is split into
/// granularity: 100
///
/// # Use min(granularity, n) batches instead, avoiding empty batches
/// adaptive_granularity: false
///
/// # Draw a progress bar on stderr
/// show_progress: true
///
/// # Print the heading and result lines around each search
/// show_summary: true
///
/// # Log level (trace, debug, info, warn, error)
/// log_level: "info"
/// ```
///
/// Command-line arguments take precedence over config file values, see
/// [`EngineConfig::merge_with_cli`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Number of batches used for progress reporting
    #[serde(default = "default_granularity")]
    pub granularity: usize,

    /// Cap the batch count at the number of checks
    #[serde(default)]
    pub adaptive_granularity: bool,

    /// Whether a progress bar is drawn while searching
    #[serde(default)]
    pub show_progress: bool,

    /// Whether the human-readable heading and result lines are printed
    #[serde(default = "default_show_summary")]
    pub show_summary: bool,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_granularity() -> usize {
    DEFAULT_GRANULARITY
}

fn default_show_summary() -> bool {
    true
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            granularity: default_granularity(),
            adaptive_granularity: false,
            show_progress: false,
            show_summary: default_show_summary(),
            log_level: default_log_level(),
        }
    }
}

/// Overrides collected from the command line; `None` keeps the file value
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub granularity: Option<usize>,
    pub adaptive_granularity: bool,
    pub show_progress: bool,
    pub quiet: bool,
    pub log_level: Option<String>,
}

impl EngineConfig {
    /// Loads configuration from the default locations plus a specific file
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        let config_files = [
            dirs::config_dir().map(|p| p.join("conjecturing/config.yaml")),
            Some(PathBuf::from(".conjecturing.yaml")),
        ];

        for path in config_files.iter().flatten() {
            if path.exists() {
                builder = builder.add_source(File::from(path.as_path()));
            }
        }

        // An explicitly requested file must exist.
        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path).required(true));
        }

        builder.build()?.try_deserialize()
    }

    /// Merges CLI arguments with configuration file values
    pub fn merge_with_cli(mut self, cli: CliOverrides) -> Self {
        if let Some(granularity) = cli.granularity {
            self.granularity = granularity;
        }
        if cli.adaptive_granularity {
            self.adaptive_granularity = true;
        }
        if cli.show_progress {
            self.show_progress = true;
        }
        if cli.quiet {
            self.show_summary = false;
        }
        if let Some(level) = cli.log_level {
            self.log_level = level;
        }
        self
    }

    /// Checks the values that serde alone cannot
    pub fn validate(&self) -> SearchResult<()> {
        self.granularity().map(|_| ())
    }

    /// The batch granularity described by this configuration
    pub fn granularity(&self) -> SearchResult<Granularity> {
        let count = NonZeroUsize::new(self.granularity)
            .ok_or_else(|| SearchError::config_error("granularity must be at least 1"))?;
        if count.get() > MAX_GRANULARITY {
            return Err(SearchError::config_error(format!(
                "granularity must be at most {}",
                MAX_GRANULARITY
            )));
        }
        Ok(if self.adaptive_granularity {
            Granularity::Adaptive { max: count }
        } else {
            Granularity::Fixed(count)
        })
    }

    /// Renders the effective configuration as YAML
    pub fn to_yaml(&self) -> SearchResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_config_file() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let config_content = r#"
            granularity: 20
            adaptive_granularity: true
            show_progress: true
            show_summary: false
            log_level: "debug"
        "#;

        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let config = EngineConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config.granularity, 20);
        assert!(config.adaptive_granularity);
        assert!(config.show_progress);
        assert!(!config.show_summary);
        assert_eq!(config.log_level, "debug");
        assert_eq!(
            config.granularity().unwrap(),
            Granularity::Adaptive {
                max: NonZeroUsize::new(20).unwrap()
            }
        );
    }

    #[test]
    fn test_default_values() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(b"log_level: \"warn\"\n").unwrap();

        let config = EngineConfig::load_from(Some(&config_path)).unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.granularity().unwrap(), Granularity::default());
    }

    #[test]
    fn test_merge_with_cli() {
        let file_config = EngineConfig {
            granularity: 50,
            adaptive_granularity: false,
            show_progress: false,
            show_summary: true,
            log_level: "warn".to_string(),
        };

        let merged = file_config.clone().merge_with_cli(CliOverrides {
            granularity: Some(10),
            adaptive_granularity: true,
            show_progress: true,
            quiet: true,
            log_level: Some("trace".to_string()),
        });
        assert_eq!(merged.granularity, 10);
        assert!(merged.adaptive_granularity);
        assert!(merged.show_progress);
        assert!(!merged.show_summary);
        assert_eq!(merged.log_level, "trace");

        let untouched = file_config.clone().merge_with_cli(CliOverrides::default());
        assert_eq!(untouched, file_config);
    }

    #[test]
    fn test_zero_granularity_is_rejected() {
        let config = EngineConfig {
            granularity: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SearchError::ConfigError(_))
        ));
    }

    #[test]
    fn test_oversized_granularity_is_rejected() {
        let config = EngineConfig {
            granularity: usize::MAX,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            format!("Configuration error: granularity must be at most {}", MAX_GRANULARITY)
        );

        let config = EngineConfig {
            granularity: MAX_GRANULARITY,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let config_content = r#"
            granularity: "many"
            show_progress: []
        "#;

        let dir = tempdir().unwrap();
        let config_path = dir.path().join("config.yaml");
        let mut file = File::create(&config_path).unwrap();
        file.write_all(config_content.as_bytes()).unwrap();

        let result = EngineConfig::load_from(Some(&config_path));
        assert!(result.is_err(), "Expected error loading invalid config");
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = EngineConfig::load_from(Some(Path::new("nonexistent.yaml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_to_yaml_renders_effective_config() {
        let yaml = EngineConfig::default().to_yaml().unwrap();
        assert!(yaml.contains("granularity: 100"));
        assert!(yaml.contains("log_level: warn"));
    }
}
