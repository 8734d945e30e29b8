//! Immutable context loggers
//!
//! A `Logger` is a cheap handle: a shared core (sink, threshold, optional
//! field table, fatal action) plus the fields baked into it. Deriving a
//! child with `with` never touches the parent.

mod emit;
pub mod format;

use std::fmt;
use std::io;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::carrier::Carrier;
use crate::config::Config;
use crate::error::ConfigError;
use crate::field::{pairs_to_fields, ExecutionId, Field, FieldTable, IntoArgs, Value};
use crate::level::Level;
use crate::rolling::RollingFile;
use crate::sink::{Encoder, EncoderKeys, Encoding, Sink, WriterSink};

/// What happens after a fatal entry has been handed to the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatalAction {
    /// Exit the process with the given status code
    Exit(i32),
    /// Panic with the entry's message instead of exiting
    Panic,
}

impl Default for FatalAction {
    fn default() -> Self {
        FatalAction::Exit(1)
    }
}

impl FatalAction {
    fn run(self, message: &str) -> ! {
        match self {
            FatalAction::Exit(code) => std::process::exit(code),
            FatalAction::Panic => panic!("{}", message),
        }
    }
}

struct Core {
    sink: Arc<dyn Sink>,
    level: Level,
    table: Option<Arc<FieldTable>>,
    on_fatal: FatalAction,
}

/// Builder for a root logger
pub struct LoggerBuilder {
    sink: Arc<dyn Sink>,
    level: Level,
    table: Option<Arc<FieldTable>>,
    on_fatal: FatalAction,
    fields: Vec<Field>,
}

impl LoggerBuilder {
    /// Minimum level that is emitted
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Attach a field table so `add`/`clean` enrich this logger's entries
    pub fn table(mut self, table: Arc<FieldTable>) -> Self {
        self.table = Some(table);
        self
    }

    /// Set what happens after a fatal entry
    pub fn on_fatal(mut self, action: FatalAction) -> Self {
        self.on_fatal = action;
        self
    }

    /// Fields baked into the root logger
    pub fn fields(mut self, fields: Vec<Field>) -> Self {
        self.fields = fields;
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            core: Arc::new(Core {
                sink: self.sink,
                level: self.level,
                table: self.table,
                on_fatal: self.on_fatal,
            }),
            fields: self.fields.into(),
        }
    }
}

/// Immutable structured logger with baked-in fields
#[derive(Clone)]
pub struct Logger {
    core: Arc<Core>,
    fields: Arc<[Field]>,
}

impl Logger {
    /// Start building a logger over `sink`
    pub fn builder(sink: Arc<dyn Sink>) -> LoggerBuilder {
        LoggerBuilder {
            sink,
            level: Level::Debug,
            table: None,
            on_fatal: FatalAction::default(),
            fields: Vec::new(),
        }
    }

    /// Create a logger over `sink` with the given threshold
    pub fn new(sink: Arc<dyn Sink>, level: Level) -> Self {
        Self::builder(sink).level(level).build()
    }

    /// Logger with the default preset: `msg`/`level`/`time`/`caller` keys,
    /// console encoding, debug threshold, standard output, and its own field
    /// table.
    pub fn new_default() -> Self {
        let encoder = Encoder::new(Encoding::Console, EncoderKeys::default());
        Self::builder(Arc::new(WriterSink::stdout(encoder)))
            .level(Level::Debug)
            .table(Arc::new(FieldTable::new()))
            .build()
    }

    /// Build a logger from configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let encoding: Encoding = config.encoding.parse()?;
        let encoder = Encoder::new(encoding, config.encoder_keys());

        let sink: Arc<dyn Sink> = match config.output_path() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "logging to rolling file");
                Arc::new(WriterSink::rolling(
                    encoder,
                    RollingFile::new(path, config.rolling_options()),
                ))
            }
            None => Arc::new(WriterSink::stdout(encoder)),
        };

        Ok(Self::builder(sink)
            .level(config.level)
            .table(Arc::new(FieldTable::new()))
            .build())
    }

    /// Read a configuration file and build a logger from it
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Config::load(path.as_ref())?;
        Self::from_config(&config)
    }

    /// Minimum level this logger emits
    pub fn level(&self) -> Level {
        self.core.level
    }

    /// Check if entries at `level` would be emitted
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.core.level
    }

    /// Fields baked into this logger, in order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// The field table used by `add`/`clean`, if any
    pub fn table(&self) -> Option<&Arc<FieldTable>> {
        self.core.table.as_ref()
    }

    /// Derive a logger with additional fields.
    ///
    /// `pairs` alternates keys and values, e.g. `kv!["a", 1, "b", 2]`. An odd
    /// trailing element is dropped.
    pub fn with(&self, pairs: impl IntoArgs) -> Logger {
        let added = pairs_to_fields(pairs.into_args());
        self.with_fields(added)
    }

    /// Derive a logger with one field whose value is a formatted template
    pub fn withf(&self, key: &str, template: &str, args: impl IntoArgs) -> Logger {
        let value = format::format_message(template, &args.into_args());
        self.with_fields(vec![Field::new(key, value)])
    }

    /// Derive a logger with already built fields
    pub fn with_fields(&self, added: Vec<Field>) -> Logger {
        if added.is_empty() {
            return self.clone();
        }
        let mut fields = Vec::with_capacity(self.fields.len() + added.len());
        fields.extend(self.fields.iter().cloned());
        fields.extend(added);
        Logger {
            core: Arc::clone(&self.core),
            fields: fields.into(),
        }
    }

    /// Derive from the logger attached to `carrier` (or from `self` if none)
    /// and return a new carrier holding the result
    pub fn withc(&self, carrier: &Carrier, pairs: impl IntoArgs) -> Carrier {
        let derived = self.resolve(carrier).with(pairs);
        carrier.with_logger(derived)
    }

    /// Like `withc`, adding one formatted field
    pub fn withcf(&self, carrier: &Carrier, key: &str, template: &str, args: impl IntoArgs) -> Carrier {
        let derived = self.resolve(carrier).withf(key, template, args);
        carrier.with_logger(derived)
    }

    /// Add an ambient field for the calling thread
    pub fn add(&self, key: impl Into<String>, value: impl Into<Value>) {
        match &self.core.table {
            Some(table) => table.add(ExecutionId::current(), key, value),
            None => tracing::debug!("no field table attached, ambient field ignored"),
        }
    }

    /// Remove every ambient field of the calling thread
    pub fn clean(&self) {
        if let Some(table) = &self.core.table {
            table.clean(ExecutionId::current());
        }
    }

    /// Print `value` as indented JSON on standard output
    pub fn show<T: Serialize + ?Sized>(&self, value: &T) {
        crate::show(value);
    }

    /// Flush the sink
    pub fn flush(&self) -> io::Result<()> {
        self.core.sink.flush()
    }

    fn resolve<'a>(&'a self, carrier: &'a Carrier) -> &'a Logger {
        carrier.logger().unwrap_or(self)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.core.level)
            .field("fields", &self.fields)
            .field("table", &self.core.table.is_some())
            .field("on_fatal", &self.core.on_fatal)
            .finish()
    }
}
