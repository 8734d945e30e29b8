//! Leveled emission
//!
//! Every level has four entry points: plain (`info`), template (`infof`),
//! and the carrier variants (`infoc`, `infocf`) which emit through the
//! logger attached to a carrier when there is one.

use std::borrow::Cow;
use std::panic::Location;

use crate::carrier::Carrier;
use crate::field::{ExecutionId, Field, IntoArgs, Value};
use crate::level::Level;
use crate::sink::Entry;

use super::format::format_message;
use super::Logger;

impl Logger {
    /// Log at `level` with plain arguments
    #[track_caller]
    pub fn log(&self, level: Level, args: impl IntoArgs) {
        self.emit(level, "", args.into_args());
    }

    /// Log at `level` with a template
    #[track_caller]
    pub fn logf(&self, level: Level, template: &str, args: impl IntoArgs) {
        self.emit(level, template, args.into_args());
    }

    #[track_caller]
    pub fn debug(&self, args: impl IntoArgs) {
        self.emit(Level::Debug, "", args.into_args());
    }

    #[track_caller]
    pub fn debugf(&self, template: &str, args: impl IntoArgs) {
        self.emit(Level::Debug, template, args.into_args());
    }

    #[track_caller]
    pub fn debugc(&self, carrier: &Carrier, args: impl IntoArgs) {
        self.resolve(carrier).emit(Level::Debug, "", args.into_args());
    }

    #[track_caller]
    pub fn debugcf(&self, carrier: &Carrier, template: &str, args: impl IntoArgs) {
        self.resolve(carrier).emit(Level::Debug, template, args.into_args());
    }

    #[track_caller]
    pub fn info(&self, args: impl IntoArgs) {
        self.emit(Level::Info, "", args.into_args());
    }

    #[track_caller]
    pub fn infof(&self, template: &str, args: impl IntoArgs) {
        self.emit(Level::Info, template, args.into_args());
    }

    #[track_caller]
    pub fn infoc(&self, carrier: &Carrier, args: impl IntoArgs) {
        self.resolve(carrier).emit(Level::Info, "", args.into_args());
    }

    #[track_caller]
    pub fn infocf(&self, carrier: &Carrier, template: &str, args: impl IntoArgs) {
        self.resolve(carrier).emit(Level::Info, template, args.into_args());
    }

    #[track_caller]
    pub fn warn(&self, args: impl IntoArgs) {
        self.emit(Level::Warn, "", args.into_args());
    }

    #[track_caller]
    pub fn warnf(&self, template: &str, args: impl IntoArgs) {
        self.emit(Level::Warn, template, args.into_args());
    }

    #[track_caller]
    pub fn warnc(&self, carrier: &Carrier, args: impl IntoArgs) {
        self.resolve(carrier).emit(Level::Warn, "", args.into_args());
    }

    #[track_caller]
    pub fn warncf(&self, carrier: &Carrier, template: &str, args: impl IntoArgs) {
        self.resolve(carrier).emit(Level::Warn, template, args.into_args());
    }

    #[track_caller]
    pub fn error(&self, args: impl IntoArgs) {
        self.emit(Level::Error, "", args.into_args());
    }

    #[track_caller]
    pub fn errorf(&self, template: &str, args: impl IntoArgs) {
        self.emit(Level::Error, template, args.into_args());
    }

    #[track_caller]
    pub fn errorc(&self, carrier: &Carrier, args: impl IntoArgs) {
        self.resolve(carrier).emit(Level::Error, "", args.into_args());
    }

    #[track_caller]
    pub fn errorcf(&self, carrier: &Carrier, template: &str, args: impl IntoArgs) {
        self.resolve(carrier).emit(Level::Error, template, args.into_args());
    }

    /// Log, then run the fatal action (exit by default). Does not flush.
    #[track_caller]
    pub fn fatal(&self, args: impl IntoArgs) -> ! {
        self.emit_terminal(Level::Fatal, "", args.into_args())
    }

    #[track_caller]
    pub fn fatalf(&self, template: &str, args: impl IntoArgs) -> ! {
        self.emit_terminal(Level::Fatal, template, args.into_args())
    }

    #[track_caller]
    pub fn fatalc(&self, carrier: &Carrier, args: impl IntoArgs) -> ! {
        self.resolve(carrier)
            .emit_terminal(Level::Fatal, "", args.into_args())
    }

    #[track_caller]
    pub fn fatalcf(&self, carrier: &Carrier, template: &str, args: impl IntoArgs) -> ! {
        self.resolve(carrier)
            .emit_terminal(Level::Fatal, template, args.into_args())
    }

    /// Log, then panic with the message. Does not flush.
    #[track_caller]
    pub fn panic(&self, args: impl IntoArgs) -> ! {
        self.emit_terminal(Level::Panic, "", args.into_args())
    }

    #[track_caller]
    pub fn panicf(&self, template: &str, args: impl IntoArgs) -> ! {
        self.emit_terminal(Level::Panic, template, args.into_args())
    }

    #[track_caller]
    pub fn panicc(&self, carrier: &Carrier, args: impl IntoArgs) -> ! {
        self.resolve(carrier)
            .emit_terminal(Level::Panic, "", args.into_args())
    }

    #[track_caller]
    pub fn paniccf(&self, carrier: &Carrier, template: &str, args: impl IntoArgs) -> ! {
        self.resolve(carrier)
            .emit_terminal(Level::Panic, template, args.into_args())
    }

    #[track_caller]
    fn emit(&self, level: Level, template: &str, args: Vec<Value>) {
        if level.is_terminal() {
            self.emit_terminal(level, template, args);
        }
        if !self.enabled(level) {
            return;
        }
        let message = format_message(template, &args);
        self.dispatch(level, &message, Location::caller());
    }

    // Terminal levels are always written; the action runs only after the
    // sink has been handed the entry.
    #[track_caller]
    fn emit_terminal(&self, level: Level, template: &str, args: Vec<Value>) -> ! {
        let message = format_message(template, &args);
        self.dispatch(level, &message, Location::caller());
        match level {
            Level::Panic => panic!("{}", message),
            _ => self.core.on_fatal.run(&message),
        }
    }

    fn dispatch(&self, level: Level, message: &str, caller: &'static Location<'static>) {
        let fields = self.resolve_fields();
        let entry = Entry::new(level, message, &fields).with_caller(caller);
        if let Err(err) = self.core.sink.write(&entry) {
            tracing::warn!(error = %err, level = level.as_str(), "failed to write log entry");
        }
    }

    /// Baked fields followed by the calling thread's ambient fields
    fn resolve_fields(&self) -> Cow<'_, [Field]> {
        if let Some(table) = &self.core.table {
            let ambient = table.get(ExecutionId::current());
            if !ambient.is_empty() {
                let mut fields = Vec::with_capacity(self.fields.len() + ambient.len());
                fields.extend(self.fields.iter().cloned());
                fields.extend(ambient);
                return Cow::Owned(fields);
            }
        }
        Cow::Borrowed(&*self.fields)
    }
}
