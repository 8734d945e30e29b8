//! Size-based rolling log file
//!
//! Thin wrapper over `file-rotate`. This module only maps the configured
//! policy (size, backup count, age, compression) onto the backend and opens
//! it lazily, so a bad path surfaces as a write error rather than at
//! construction.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{Duration, Local};
use file_rotate::compression::Compression;
use file_rotate::suffix::{AppendTimestamp, FileLimit};
use file_rotate::{ContentLimit, FileRotate};

/// Default maximum file size in megabytes
pub const DEFAULT_MAX_SIZE_MB: u64 = 100;

const MEGABYTE: u64 = 1024 * 1024;

/// Rotation policy, passed through verbatim from configuration
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RollingOptions {
    /// Maximum size in megabytes before rotation (0 means the default, 100)
    pub max_size: u64,
    /// Maximum age in days of backups to keep (0 keeps all)
    pub max_age: u64,
    /// Maximum number of backups to keep (0 keeps all)
    pub max_backups: usize,
    /// Gzip backups after rotation
    pub compress: bool,
}

impl RollingOptions {
    /// Maximum file size in bytes, saturating for huge sizes
    pub fn max_bytes(&self) -> u64 {
        let megabytes = if self.max_size == 0 {
            DEFAULT_MAX_SIZE_MB
        } else {
            self.max_size
        };
        megabytes.saturating_mul(MEGABYTE)
    }

    /// Backup age limit, or `None` when ages are unlimited.
    ///
    /// An age too large to subtract from the current time counts as
    /// unlimited.
    pub fn age_limit(&self) -> Option<Duration> {
        if self.max_age == 0 {
            return None;
        }
        let age = i64::try_from(self.max_age)
            .ok()
            .and_then(Duration::try_days)?;
        // The backend computes its cutoff as now - age
        Local::now().checked_sub_signed(age)?;
        Some(age)
    }

    // A backup count takes precedence over an age limit when both are set.
    fn file_limit(&self) -> FileLimit {
        if self.max_backups > 0 {
            return FileLimit::MaxFiles(self.max_backups);
        }
        match self.age_limit() {
            Some(age) => FileLimit::Age(age),
            None => FileLimit::Unlimited,
        }
    }

    fn compression(&self) -> Compression {
        if self.compress {
            Compression::OnRotate(0)
        } else {
            Compression::None
        }
    }
}

/// A log file that rotates itself once it passes a size limit.
///
/// Backups are named `<file>.<timestamp>` in local time, with `.gz`
/// appended when compressed. Entries are never split across files.
pub struct RollingFile {
    path: PathBuf,
    options: RollingOptions,
    max_bytes: u64,
    inner: Option<FileRotate<AppendTimestamp>>,
}

impl RollingFile {
    /// Create a rolling file. Nothing is opened until the first write.
    pub fn new(path: impl Into<PathBuf>, options: RollingOptions) -> Self {
        let max_bytes = options.max_bytes();
        Self {
            path: path.into(),
            options,
            max_bytes,
            inner: None,
        }
    }

    /// Override the size limit with an exact byte count
    pub fn with_max_bytes(mut self, max_bytes: u64) -> Self {
        self.max_bytes = max_bytes.max(1);
        self
    }

    /// Path of the active log file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn open(&mut self) -> io::Result<&mut FileRotate<AppendTimestamp>> {
        if self.inner.is_none() {
            let path = match self.path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => {
                    fs::create_dir_all(parent)?;
                    self.path.clone()
                }
                _ => Path::new(".").join(&self.path),
            };
            let limit = usize::try_from(self.max_bytes).unwrap_or(usize::MAX);

            tracing::debug!(
                path = %path.display(),
                max_bytes = self.max_bytes,
                max_backups = self.options.max_backups,
                compress = self.options.compress,
                "opening rolling log file"
            );
            self.inner = Some(FileRotate::new(
                path,
                AppendTimestamp::default(self.options.file_limit()),
                ContentLimit::BytesSurpassed(limit),
                self.options.compression(),
                None,
            ));
        }

        self.inner
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::Other, "log file is not open"))
    }
}

impl Write for RollingFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.open()?.write(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.open()?.write_all(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.inner.as_mut() {
            Some(inner) => inner.flush(),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for RollingFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RollingFile")
            .field("path", &self.path)
            .field("options", &self.options)
            .field("max_bytes", &self.max_bytes)
            .field("open", &self.inner.is_some())
            .finish()
    }
}
