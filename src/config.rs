//! Logger configuration
//!
//! Read from TOML or YAML, chosen by file extension. Every key is optional;
//! missing keys take the default preset.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::level::Level;
use crate::rolling::{RollingOptions, DEFAULT_MAX_SIZE_MB};
use crate::sink::EncoderKeys;

/// Logger configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Minimum level, as a name or a zap code
    /// (-1 debug, 0 info, 1 warn, 2 error, 3 and 4 panic, 5 fatal)
    #[serde(default)]
    pub level: Level,

    /// Key of the message in each entry
    #[serde(default = "default_message_key")]
    pub message_key: String,

    /// Key of the level in each entry
    #[serde(default = "default_level_key")]
    pub level_key: String,

    /// Key of the timestamp in each entry
    #[serde(default = "default_time_key")]
    pub time_key: String,

    /// Key of the caller location in each entry
    #[serde(default = "default_caller_key")]
    pub caller_key: String,

    /// "json" or "console"
    #[serde(default = "default_encoding")]
    pub encoding: String,

    /// Output file; empty means standard output. `~` is expanded.
    #[serde(default)]
    pub file_name: String,

    /// Megabytes before the file is rotated (default: 100)
    #[serde(default = "default_max_size")]
    pub max_size: u64,

    /// Days to keep backups (0 keeps them forever)
    #[serde(default)]
    pub max_age: u64,

    /// Number of backups to keep (0 keeps all)
    #[serde(default)]
    pub max_backups: usize,

    /// Accepted for compatibility. Backups are always stamped in local time.
    #[serde(default)]
    pub local_time: bool,

    /// Gzip rotated backups
    #[serde(default)]
    pub compress: bool,
}

fn default_message_key() -> String {
    "msg".to_string()
}

fn default_level_key() -> String {
    "level".to_string()
}

fn default_time_key() -> String {
    "time".to_string()
}

fn default_caller_key() -> String {
    "caller".to_string()
}

fn default_encoding() -> String {
    "console".to_string()
}

fn default_max_size() -> u64 {
    DEFAULT_MAX_SIZE_MB
}

impl Default for Config {
    fn default() -> Self {
        Self {
            level: Level::Debug,
            message_key: default_message_key(),
            level_key: default_level_key(),
            time_key: default_time_key(),
            caller_key: default_caller_key(),
            encoding: default_encoding(),
            file_name: String::new(),
            max_size: default_max_size(),
            max_age: 0,
            max_backups: 0,
            local_time: false,
            compress: false,
        }
    }
}

impl Config {
    /// Load configuration from a `.toml`, `.yaml` or `.yml` file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = Format::from_path(path)?;
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = format.parse(&content).map_err(|message| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        })?;
        tracing::debug!(path = %path.display(), encoding = %config.encoding, "loaded log configuration");
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Format::Toml.parse(content).map_err(|message| ConfigError::Parse {
            path: PathBuf::new(),
            message,
        })
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Format::Yaml.parse(content).map_err(|message| ConfigError::Parse {
            path: PathBuf::new(),
            message,
        })
    }

    /// Save configuration as TOML
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize log configuration")?;
        fs::write(path, content).context("Failed to write log configuration")?;
        Ok(())
    }

    /// Entry keys for the encoder
    pub fn encoder_keys(&self) -> EncoderKeys {
        EncoderKeys {
            message: self.message_key.clone(),
            level: self.level_key.clone(),
            time: self.time_key.clone(),
            caller: self.caller_key.clone(),
        }
    }

    /// Rotation settings for file output
    pub fn rolling_options(&self) -> RollingOptions {
        RollingOptions {
            max_size: self.max_size,
            max_age: self.max_age,
            max_backups: self.max_backups,
            compress: self.compress,
        }
    }

    /// Output file with `~` expanded, or `None` for standard output
    pub fn output_path(&self) -> Option<PathBuf> {
        let name = self.file_name.trim();
        if name.is_empty() {
            return None;
        }
        Some(PathBuf::from(shellexpand::tilde(name).into_owned()))
    }
}

#[derive(Debug, Clone, Copy)]
enum Format {
    Toml,
    Yaml,
}

impl Format {
    fn from_path(path: &Path) -> Result<Self, ConfigError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Format::Toml),
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Ok(Format::Yaml)
            }
            _ => Err(ConfigError::UnsupportedFormat(path.to_path_buf())),
        }
    }

    fn parse(self, content: &str) -> Result<Config, String> {
        match self {
            Format::Toml => toml::from_str(content).map_err(|e| e.to_string()),
            // An empty YAML document means every default
            Format::Yaml if content.trim().is_empty() => Ok(Config::default()),
            Format::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.level, Level::Debug);
        assert_eq!(config.message_key, "msg");
        assert_eq!(config.encoding, "console");
        assert_eq!(config.max_size, 100);
        assert!(config.output_path().is_none());
    }

    #[test]
    fn test_empty_documents_use_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
        assert_eq!(Config::from_yaml("").unwrap(), Config::default());
    }

    #[test]
    fn test_yaml_keys() {
        let config = Config::from_yaml(
            "level: 1\n\
             message_key: message\n\
             encoding: json\n\
             file_name: /var/log/app.log\n\
             max_size: 10\n\
             max_age: 7\n\
             max_backups: 3\n\
             local_time: true\n\
             compress: true\n",
        )
        .unwrap();

        assert_eq!(config.level, Level::Warn);
        assert_eq!(config.message_key, "message");
        assert_eq!(config.level_key, "level");
        assert_eq!(config.encoding, "json");
        assert_eq!(config.output_path(), Some(PathBuf::from("/var/log/app.log")));
        assert_eq!(
            config.rolling_options(),
            RollingOptions {
                max_size: 10,
                max_age: 7,
                max_backups: 3,
                compress: true,
            }
        );
    }

    #[test]
    fn test_level_by_name_or_code() {
        assert_eq!(Config::from_toml("level = -1").unwrap().level, Level::Debug);
        assert_eq!(Config::from_toml("level = \"fatal\"").unwrap().level, Level::Fatal);
        assert_eq!(Config::from_yaml("level: 5").unwrap().level, Level::Fatal);
        assert!(matches!(
            Config::from_toml("level = 9"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_encoder_keys() {
        let config = Config {
            caller_key: "src".to_string(),
            ..Default::default()
        };
        let keys = config.encoder_keys();
        assert_eq!(keys.caller, "src");
        assert_eq!(keys.time, "time");
    }

    #[test]
    fn test_output_path_expands_tilde() {
        let config = Config {
            file_name: "~/logs/app.log".to_string(),
            ..Default::default()
        };
        let path = config.output_path().unwrap();
        assert!(!path.starts_with("~"));
        assert!(path.ends_with("logs/app.log"));
    }

    #[test]
    fn test_load_by_extension() {
        let temp_dir = TempDir::new().unwrap();

        let toml_path = temp_dir.path().join("log.toml");
        fs::write(&toml_path, "encoding = \"json\"\ntime_key = \"ts\"\n").unwrap();
        let config = Config::load(&toml_path).unwrap();
        assert_eq!(config.encoding, "json");
        assert_eq!(config.time_key, "ts");

        let yml_path = temp_dir.path().join("log.yml");
        fs::write(&yml_path, "level: info\n").unwrap();
        assert_eq!(Config::load(&yml_path).unwrap().level, Level::Info);
    }

    #[test]
    fn test_load_errors() {
        let temp_dir = TempDir::new().unwrap();

        let json_path = temp_dir.path().join("log.json");
        fs::write(&json_path, "{}").unwrap();
        assert!(matches!(
            Config::load(&json_path),
            Err(ConfigError::UnsupportedFormat(_))
        ));

        let missing = temp_dir.path().join("missing.yaml");
        assert!(matches!(
            Config::load(&missing),
            Err(ConfigError::Read { .. })
        ));

        let broken = temp_dir.path().join("broken.toml");
        fs::write(&broken, "encoding = ").unwrap();
        assert!(matches!(
            Config::load(&broken),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_save_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.toml");
        let config = Config {
            level: Level::Error,
            compress: true,
            ..Default::default()
        };

        config.save(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), config);
    }
}
