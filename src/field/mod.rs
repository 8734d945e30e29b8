//! Key/value fields attached to log entries
//!
//! Fields keep insertion order and duplicate keys are retained. Values are
//! `serde_json::Value`s so any serializable type can be attached.

mod table;

pub use serde_json::Value;
pub use table::{ExecutionId, FieldTable};

use std::fmt;

use serde::Serialize;

/// A single key/value pair
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    /// Create a new field
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Convert any serializable value into a field value.
///
/// Serialization failures never reach the caller: the failure is reported as
/// a diagnostic and a placeholder string takes the value's place.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to serialize log value");
        Value::String(format!("<unserializable: {}>", err))
    })
}

/// Build a flat list of values, typically alternating keys and values.
///
/// ```
/// use scopelog::kv;
///
/// let pairs = kv!["user", "alice", "attempt", 3];
/// assert_eq!(pairs.len(), 4);
/// ```
#[macro_export]
macro_rules! kv {
    () => {
        ::std::vec::Vec::<$crate::Value>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::field::to_value(&$value)),+]
    };
}

/// Anything that can be turned into a list of message arguments
pub trait IntoArgs {
    fn into_args(self) -> Vec<Value>;
}

impl IntoArgs for () {
    fn into_args(self) -> Vec<Value> {
        Vec::new()
    }
}

impl IntoArgs for &str {
    fn into_args(self) -> Vec<Value> {
        vec![Value::from(self)]
    }
}

impl IntoArgs for String {
    fn into_args(self) -> Vec<Value> {
        vec![Value::String(self)]
    }
}

impl IntoArgs for &String {
    fn into_args(self) -> Vec<Value> {
        vec![Value::String(self.clone())]
    }
}

impl IntoArgs for Value {
    fn into_args(self) -> Vec<Value> {
        vec![self]
    }
}

impl IntoArgs for fmt::Arguments<'_> {
    fn into_args(self) -> Vec<Value> {
        vec![Value::String(self.to_string())]
    }
}

impl<T: Into<Value>> IntoArgs for Vec<T> {
    fn into_args(self) -> Vec<Value> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Value>, const N: usize> IntoArgs for [T; N] {
    fn into_args(self) -> Vec<Value> {
        self.into_iter().map(Into::into).collect()
    }
}

impl IntoArgs for &[Value] {
    fn into_args(self) -> Vec<Value> {
        self.to_vec()
    }
}

/// Interpret a flat list as alternating keys and values.
///
/// An odd trailing element is dropped with a diagnostic. Keys that are not
/// strings are kept, using their JSON text as the key.
pub fn pairs_to_fields(pairs: Vec<Value>) -> Vec<Field> {
    let mut fields = Vec::with_capacity(pairs.len() / 2);
    let mut iter = pairs.into_iter();

    while let Some(key) = iter.next() {
        let Some(value) = iter.next() else {
            tracing::warn!(ignored = %key, "odd number of key/value arguments, dropping trailing element");
            break;
        };
        fields.push(Field {
            key: key_to_string(key),
            value,
        });
    }

    fields
}

fn key_to_string(key: Value) -> String {
    match key {
        Value::String(key) => key,
        other => {
            let key = other.to_string();
            tracing::warn!(key = %key, "field key is not a string");
            key
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kv_macro_mixed_types() {
        let values = kv!["a", "1", "b", 2, "c", true];
        assert_eq!(
            values,
            vec![json!("a"), json!("1"), json!("b"), json!(2), json!("c"), json!(true)]
        );
        assert!(kv![].is_empty());
    }

    #[test]
    fn test_pairs_to_fields_keeps_order_and_duplicates() {
        let fields = pairs_to_fields(kv!["a", 1, "b", 2, "a", 3]);
        assert_eq!(
            fields,
            vec![
                Field::new("a", 1),
                Field::new("b", 2),
                Field::new("a", 3)
            ]
        );
    }

    #[test]
    fn test_pairs_to_fields_drops_odd_trailing_element() {
        let fields = pairs_to_fields(kv!["a", 1, "dangling"]);
        assert_eq!(fields, vec![Field::new("a", 1)]);
    }

    #[test]
    fn test_pairs_to_fields_stringifies_non_string_keys() {
        let fields = pairs_to_fields(kv![42, "answer"]);
        assert_eq!(fields, vec![Field::new("42", "answer")]);
    }

    #[test]
    fn test_into_args_variants() {
        assert_eq!("x".into_args(), vec![json!("x")]);
        assert_eq!(().into_args(), Vec::<Value>::new());
        assert_eq!(["a", "b"].into_args(), vec![json!("a"), json!("b")]);
        assert_eq!(format_args!("n={}", 5).into_args(), vec![json!("n=5")]);
        assert_eq!(kv!["x", 1].into_args(), vec![json!("x"), json!(1)]);
    }

    #[test]
    fn test_to_value_struct() {
        #[derive(Serialize)]
        struct User {
            id: u32,
            name: &'static str,
        }

        let value = to_value(&User { id: 1, name: "t" });
        assert_eq!(value, json!({"id": 1, "name": "t"}));
    }
}
