//! Configuration for the logger
//!
//! A host can build a [`LoggerConfig`] in code or load it from a TOML file,
//! then push it into a [`Logger`] with [`LoggerConfig::apply`].

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::file_writer::LogFileInfo;
use crate::level::LogLevel;
use crate::logger::Logger;
use crate::rotation::{RotationPolicy, DEFAULT_EXTENSION, DEFAULT_RETENTION};

/// Logger configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Application name used as the log file prefix
    pub app_name: String,

    /// Directory for log files; `~` is expanded. Defaults to the documents directory.
    #[serde(default)]
    pub directory: Option<String>,

    /// Verbosity ceiling (default: debug)
    #[serde(default)]
    pub level: LogLevel,

    /// Historical files kept besides the active one (default: 2)
    #[serde(default = "default_retention")]
    pub retention: usize,

    /// Log file extension (default: ".log")
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Print to the console (default: true)
    #[serde(default = "default_true")]
    pub console: bool,

    /// Write to a log file (default: false)
    #[serde(default)]
    pub file: bool,

    /// Rotation policy (default: sequential)
    #[serde(default)]
    pub rotation: RotationPolicy,
}

fn default_retention() -> usize {
    DEFAULT_RETENTION
}

fn default_extension() -> String {
    DEFAULT_EXTENSION.to_string()
}

fn default_true() -> bool {
    true
}

impl LoggerConfig {
    /// Create a default configuration for `app_name`
    pub fn new(app_name: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            directory: None,
            level: LogLevel::default(),
            retention: default_retention(),
            extension: default_extension(),
            console: true,
            file: false,
            rotation: RotationPolicy::default(),
        }
    }

    /// Load configuration from file, or return the default for `app_name` if not found
    pub fn load(path: &Path, app_name: &str) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path).context("Failed to read logger config")?;
            Self::from_toml(&content)
        } else {
            Ok(Self::new(app_name))
        }
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse logger config")
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize logger config")?;
        std::fs::write(path, content).context("Failed to write logger config")?;
        Ok(())
    }

    /// Resolved log directory
    pub fn log_dir(&self) -> PathBuf {
        match &self.directory {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).into_owned()),
            None => default_log_dir(),
        }
    }

    /// Push this configuration into `logger`
    ///
    /// Returns the log file info when the file sink was enabled.
    pub fn apply(&self, logger: &Logger) -> Result<Option<LogFileInfo>> {
        logger.set_log_level(self.level);
        logger.set_log_rotation(self.rotation.clone(), self.retention);
        logger.set_log_extension(self.extension.clone());

        if self.console {
            logger.enable_log_to_console();
        } else {
            logger.disable_log_to_console();
        }

        if !self.file {
            logger.disable_log_to_file();
            return Ok(None);
        }

        let dir = self.log_dir();
        let info = logger
            .enable_log_to_file(&self.app_name, &dir)
            .map_err(|err| {
                let context = if err.is_configuration_error() {
                    format!("File logging disabled, could not set up {}", dir.display())
                } else {
                    format!("Failed to enable file logging in {}", dir.display())
                };
                anyhow::Error::new(err).context(context)
            })?;
        Ok(Some(info))
    }
}

/// Get the default log directory (the platform documents directory)
///
/// Falls back to the home directory, then to the current directory.
pub fn default_log_dir() -> PathBuf {
    try_default_log_dir().unwrap_or_else(|| {
        tracing::warn!("Could not determine documents directory, logging to current directory");
        PathBuf::from(".")
    })
}

/// Try to get the documents or home directory
pub fn try_default_log_dir() -> Option<PathBuf> {
    dirs::document_dir().or_else(dirs::home_dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_writer::FileSinkState;
    use crate::test_support::capturing_logger;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = LoggerConfig::new("App");
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.rotation, RotationPolicy::Sequential);
        assert_eq!(config.retention, 2);
        assert_eq!(config.extension, ".log");
        assert!(config.console);
        assert!(!config.file);
    }

    #[test]
    fn test_minimal_toml_uses_defaults() {
        let config = LoggerConfig::from_toml("app_name = \"App\"").unwrap();
        assert_eq!(config, LoggerConfig::new("App"));
    }

    #[test]
    fn test_full_toml() {
        let config = LoggerConfig::from_toml(
            r#"
app_name = "App"
directory = "/var/log/app"
level = "warning"
retention = 5
extension = ".txt"
console = false
file = true

[rotation]
kind = "timestamped"
format = "%Y%m%d-%H%M%S"
"#,
        )
        .unwrap();

        assert_eq!(config.level, LogLevel::Warning);
        assert_eq!(
            config.rotation,
            RotationPolicy::Timestamped {
                format: "%Y%m%d-%H%M%S".to_string()
            }
        );
        assert_eq!(config.retention, 5);
        assert_eq!(config.log_dir(), PathBuf::from("/var/log/app"));
        assert!(!config.console);
        assert!(config.file);
    }

    #[test]
    fn test_timestamped_without_format_uses_default() {
        let config = LoggerConfig::from_toml(
            "app_name = \"App\"\n[rotation]\nkind = \"timestamped\"\n",
        )
        .unwrap();
        assert_eq!(config.rotation, RotationPolicy::timestamped());
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        assert!(LoggerConfig::from_toml("app_name = \"App\"\nlevel = \"loud\"").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("logger.toml");
        let mut config = LoggerConfig::new("App");
        config.level = LogLevel::Info;
        config.rotation = RotationPolicy::timestamped();

        config.save(&path).unwrap();
        let loaded = LoggerConfig::load(&path, "Other").unwrap();

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let config = LoggerConfig::load(&temp_dir.path().join("missing.toml"), "App").unwrap();
        assert_eq!(config, LoggerConfig::new("App"));
    }

    #[test]
    fn test_tilde_expansion() {
        let mut config = LoggerConfig::new("App");
        config.directory = Some("~/logs".to_string());
        let dir = config.log_dir();
        assert!(dir.ends_with("logs"));
        if dirs::home_dir().is_some() {
            assert!(!dir.to_string_lossy().starts_with('~'));
        }
    }

    #[test]
    fn test_apply_enables_file_sink() {
        let temp_dir = TempDir::new().unwrap();
        let (logger, _console) = capturing_logger();
        let mut config = LoggerConfig::new("App");
        config.directory = Some(temp_dir.path().to_string_lossy().into_owned());
        config.level = LogLevel::Info;
        config.retention = 4;
        config.console = false;
        config.file = true;

        let info = config.apply(&logger).unwrap().unwrap();

        assert_eq!(info.path, temp_dir.path().join("App-current.log"));
        assert_eq!(logger.level(), LogLevel::Info);
        assert_eq!(logger.rotation().retention, 4);
        assert!(!logger.is_console_enabled());
        assert_eq!(logger.file_sink_state(), FileSinkState::Active);
    }

    #[test]
    fn test_apply_without_file() {
        let (logger, _console) = capturing_logger();
        let config = LoggerConfig::new("App");
        assert!(config.apply(&logger).unwrap().is_none());
        assert!(!logger.is_file_enabled());
    }

    #[test]
    fn test_apply_reports_unusable_directory() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();
        let (logger, _console) = capturing_logger();
        let mut config = LoggerConfig::new("App");
        config.directory = Some(blocker.join("logs").to_string_lossy().into_owned());
        config.file = true;

        let err = config.apply(&logger).unwrap_err();

        assert!(err.to_string().starts_with("File logging disabled"));
        assert!(err
            .downcast_ref::<crate::Error>()
            .is_some_and(|e| e.is_configuration_error()));
        assert_eq!(logger.file_sink_state(), FileSinkState::Disabled);
    }

    #[test]
    fn test_level_aliases_in_toml() {
        for (text, level) in [
            ("warn", LogLevel::Warning),
            ("error", LogLevel::Critical),
            ("off", LogLevel::None),
            ("trace", LogLevel::Debug),
        ] {
            let config =
                LoggerConfig::from_toml(&format!("app_name = \"App\"\nlevel = \"{}\"", text))
                    .unwrap();
            assert_eq!(config.level, level);
            assert_eq!(text.parse::<LogLevel>().unwrap(), level);
        }
    }

    #[test]
    fn test_default_log_dir_does_not_panic() {
        let dir = default_log_dir();
        assert!(!dir.as_os_str().is_empty());
    }
}
