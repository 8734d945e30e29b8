//! Encoding sink over a byte writer
//!
//! Writes encoded lines to standard output, a rolling file, or any other
//! `Write` implementation. Writes are serialized so lines never interleave.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};

use crate::rolling::RollingFile;

use super::{Encoder, Entry, Sink};

/// A sink that encodes entries and writes them to a byte stream
pub struct WriterSink {
    encoder: Encoder,
    output: Mutex<Box<dyn Write + Send>>,
}

impl WriterSink {
    /// Create a sink writing to an arbitrary writer
    pub fn new(encoder: Encoder, writer: impl Write + Send + 'static) -> Self {
        Self {
            encoder,
            output: Mutex::new(Box::new(writer)),
        }
    }

    /// Create a sink writing to standard output
    pub fn stdout(encoder: Encoder) -> Self {
        Self::new(encoder, io::stdout())
    }

    /// Create a sink writing to a rolling file
    pub fn rolling(encoder: Encoder, file: RollingFile) -> Self {
        Self::new(encoder, file)
    }

    /// Get the encoder
    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }
}

impl Sink for WriterSink {
    fn write(&self, entry: &Entry<'_>) -> io::Result<()> {
        let mut line = Vec::with_capacity(128);
        self.encoder.encode(entry, &mut line)?;

        // Keep writing after a panic poisoned the lock
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        output.write_all(&line)
    }

    fn flush(&self) -> io::Result<()> {
        let mut output = self.output.lock().unwrap_or_else(PoisonError::into_inner);
        output.flush()
    }
}

impl std::fmt::Debug for WriterSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WriterSink")
            .field("encoder", &self.encoder)
            .finish_non_exhaustive()
    }
}
