//! Output sinks
//!
//! A sink receives fully resolved entries (level, message, ordered fields)
//! and is responsible for encoding and persisting them.

mod bridge;
mod buffer;
mod encoder;
mod writer;

pub use bridge::TracingSink;
pub use buffer::{BufferSink, Record};
pub use encoder::{Encoder, EncoderKeys, Encoding, TIME_FORMAT};
pub use writer::WriterSink;

use std::io;
use std::panic::Location;

use chrono::{DateTime, Local};

use crate::field::Field;
use crate::level::Level;

/// A log entry as handed to a sink
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    pub level: Level,
    pub time: DateTime<Local>,
    /// Source location of the logging call, when known
    pub caller: Option<&'static Location<'static>>,
    pub message: &'a str,
    pub fields: &'a [Field],
}

impl<'a> Entry<'a> {
    /// Create an entry stamped with the current time
    pub fn new(level: Level, message: &'a str, fields: &'a [Field]) -> Self {
        Self {
            level,
            time: Local::now(),
            caller: None,
            message,
            fields,
        }
    }

    /// Attach the caller location
    pub fn with_caller(mut self, caller: &'static Location<'static>) -> Self {
        self.caller = Some(caller);
        self
    }

    /// Caller rendered as `dir/file.rs:line`, keeping only the last two path components
    pub fn caller_display(&self) -> Option<String> {
        self.caller
            .map(|loc| format!("{}:{}", short_path(loc.file()), loc.line()))
    }
}

/// Destination for log entries
pub trait Sink: Send + Sync {
    /// Encode and write one entry
    fn write(&self, entry: &Entry<'_>) -> io::Result<()>;

    /// Flush any buffered output
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

fn short_path(file: &str) -> &str {
    let mut separators = file
        .char_indices()
        .rev()
        .filter(|(_, c)| *c == '/' || *c == '\\');
    separators.next();
    match separators.next() {
        Some((idx, _)) => &file[idx + 1..],
        None => file,
    }
}
