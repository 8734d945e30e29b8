//! Identity-keyed ambient fields
//!
//! A concurrent map from the identity of the running unit of work to the
//! fields accumulated for it. Entries are never expired; every identity that
//! calls `add` is responsible for calling `clean`.

use std::thread::ThreadId;

use dashmap::DashMap;

use super::{Field, Value};

/// Identity of the running unit of work
///
/// Wraps the current thread's id. Tasks that migrate between runtime worker
/// threads should use a `Carrier` instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExecutionId(ThreadId);

impl ExecutionId {
    /// Identity of the calling thread
    pub fn current() -> Self {
        Self(std::thread::current().id())
    }
}

/// Concurrent table of ambient fields, sharded by identity
#[derive(Debug, Default)]
pub struct FieldTable {
    entries: DashMap<ExecutionId, Vec<Field>>,
}

impl FieldTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field to the set owned by `id`, creating the set if needed
    pub fn add(&self, id: ExecutionId, key: impl Into<String>, value: impl Into<Value>) {
        self.add_field(id, Field::new(key, value));
    }

    /// Append an already built field
    pub fn add_field(&self, id: ExecutionId, field: Field) {
        // The shard lock is held for the whole append, so concurrent appends
        // for the same identity are serialized rather than lost.
        self.entries.entry(id).or_default().push(field);
    }

    /// Snapshot of the fields owned by `id` (empty if none)
    pub fn get(&self, id: ExecutionId) -> Vec<Field> {
        self.entries
            .get(&id)
            .map(|fields| fields.value().clone())
            .unwrap_or_default()
    }

    /// Append the fields owned by `id` to `out`
    pub fn extend_into(&self, id: ExecutionId, out: &mut Vec<Field>) {
        if let Some(fields) = self.entries.get(&id) {
            out.extend(fields.iter().cloned());
        }
    }

    /// Remove every field owned by `id`. Idempotent.
    pub fn clean(&self, id: ExecutionId) {
        self.entries.remove(&id);
    }

    /// Number of identities currently holding fields
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if no identity holds fields
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
