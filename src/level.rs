//! Severity levels
//!
//! Levels are totally ordered: debug < info < warn < error < fatal < panic.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ConfigError;

/// Severity of a log entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Level {
    #[default]
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
    Panic,
}

impl Level {
    /// All levels in ascending order
    pub const ALL: [Level; 6] = [
        Level::Debug,
        Level::Info,
        Level::Warn,
        Level::Error,
        Level::Fatal,
        Level::Panic,
    ];

    /// Get the display name for this level
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
            Level::Panic => "PANIC",
        }
    }

    /// Numeric code used in configuration files, following zap:
    /// -1 debug, 0 info, 1 warn, 2 error, 4 panic, 5 fatal
    pub fn code(&self) -> i8 {
        match self {
            Level::Debug => -1,
            Level::Info => 0,
            Level::Warn => 1,
            Level::Error => 2,
            Level::Panic => 4,
            Level::Fatal => 5,
        }
    }

    /// Look up a level by its numeric configuration code.
    ///
    /// Code 3 (zap's development panic) reads as panic.
    pub fn from_code(code: i8) -> Option<Self> {
        if code == 3 {
            return Some(Level::Panic);
        }
        Level::ALL.into_iter().find(|l| l.code() == code)
    }

    /// Whether emitting at this level ends normal control flow
    pub fn is_terminal(&self) -> bool {
        matches!(self, Level::Fatal | Level::Panic)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i8>() {
            return Level::from_code(code).ok_or_else(|| ConfigError::InvalidLevel(s.to_string()));
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" => Ok(Level::Error),
            "fatal" => Ok(Level::Fatal),
            "panic" => Ok(Level::Panic),
            _ => Err(ConfigError::InvalidLevel(s.to_string())),
        }
    }
}

impl From<Level> for tracing::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Debug => tracing::Level::DEBUG,
            Level::Info => tracing::Level::INFO,
            Level::Warn => tracing::Level::WARN,
            Level::Error | Level::Fatal | Level::Panic => tracing::Level::ERROR,
        }
    }
}

// Configuration files carry either the numeric code or the level name.
#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Code(i8),
    Name(String),
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i8(self.code())
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match LevelRepr::deserialize(deserializer)? {
            LevelRepr::Code(code) => Level::from_code(code)
                .ok_or_else(|| serde::de::Error::custom(format!("invalid level code {}", code))),
            LevelRepr::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}
