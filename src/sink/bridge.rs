//! Sink that forwards entries into `tracing`
//!
//! Lets an application that already installed a `tracing` subscriber route
//! this crate's entries through it. Fields are rendered as `key=value` text
//! since `tracing` field names are static.

use std::io;

use crate::field::Field;
use crate::level::Level;

use super::{Entry, Sink};

/// Forwards entries as `tracing` events under the `scopelog` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TracingSink {
    pub fn new() -> Self {
        Self
    }
}

impl Sink for TracingSink {
    fn write(&self, entry: &Entry<'_>) -> io::Result<()> {
        let fields = render_fields(entry.fields);
        let caller = entry.caller_display().unwrap_or_default();
        let message = entry.message;

        match entry.level {
            Level::Debug => {
                tracing::debug!(target: "scopelog", caller = %caller, fields = %fields, "{}", message)
            }
            Level::Info => {
                tracing::info!(target: "scopelog", caller = %caller, fields = %fields, "{}", message)
            }
            Level::Warn => {
                tracing::warn!(target: "scopelog", caller = %caller, fields = %fields, "{}", message)
            }
            Level::Error | Level::Fatal | Level::Panic => tracing::error!(
                target: "scopelog",
                severity = entry.level.as_str(),
                caller = %caller,
                fields = %fields,
                "{}",
                message
            ),
        }
        Ok(())
    }
}

fn render_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| match &f.value {
            serde_json::Value::String(s) => format!("{}={}", f.key, s),
            other => format!("{}={}", f.key, other),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
