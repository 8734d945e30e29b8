//! scopelog - structured logging with context-scoped child loggers
//!
//! A [`Logger`] carries an ordered list of key/value fields. Deriving a child
//! with [`Logger::with`] never changes the parent. Fields can also be added
//! per thread through a shared [`FieldTable`], or propagated through a
//! request with a [`Carrier`]. Output goes to standard output or to a
//! size-rotated file, encoded as JSON or tab-separated console lines.
//!
//! ```no_run
//! use scopelog::{kv, Logger};
//!
//! let logger = Logger::new_default();
//! let request = logger.with(kv!["request_id", "r-1"]);
//! request.infof("served %v in %.1fms", kv!["/health", 0.42]);
//! ```

pub mod carrier;
pub mod config;
pub mod error;
pub mod field;
pub mod level;
pub mod logger;
pub mod rolling;
pub mod sink;

pub use carrier::{Carrier, LOGGER_KEY};
pub use config::Config;
pub use error::ConfigError;
pub use field::{ExecutionId, Field, FieldTable, IntoArgs, Value};
pub use level::Level;
pub use logger::{FatalAction, Logger, LoggerBuilder};
pub use rolling::{RollingFile, RollingOptions};
pub use sink::{BufferSink, Encoder, EncoderKeys, Encoding, Entry, Sink, TracingSink, WriterSink};

use std::io::{self, Write};

use serde::Serialize;

/// Print `value` as indented JSON on standard output.
///
/// Serialization or write failures are reported as diagnostics and otherwise
/// ignored.
pub fn show<T: Serialize + ?Sized>(value: &T) {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(err) = write_pretty(&mut out, value) {
        tracing::warn!(error = %err, "failed to show value");
    }
}

fn write_pretty<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    out.write_all(b"\n")?;
    out.flush()
}
