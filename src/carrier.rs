//! Request-scoped context carrier
//!
//! A `Carrier` is an immutable chain of keyed values. Adding a value returns
//! a new carrier that shares its parent, so siblings derived from the same
//! carrier never see each other's values. One well-known key holds a
//! [`Logger`], which the carrier-flavored logging methods emit through.
//!
//! A carrier can also be made ambient for an async task with [`Carrier::scope`]
//! and read back anywhere inside it with [`Carrier::current`].

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use crate::logger::Logger;

/// Key under which the context logger is stored
pub const LOGGER_KEY: &str = "scopelog.logger";

tokio::task_local! {
    static CURRENT: Carrier;
}

struct Node {
    key: &'static str,
    value: Arc<dyn Any + Send + Sync>,
    parent: Option<Arc<Node>>,
}

/// Immutable chain of keyed values propagated through a request
#[derive(Clone, Default)]
pub struct Carrier {
    head: Option<Arc<Node>>,
}

impl Carrier {
    /// An empty carrier
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Return a new carrier with `value` stored under `key`.
    ///
    /// The new value shadows any earlier value with the same key.
    pub fn with_value<T: Any + Send + Sync>(&self, key: &'static str, value: T) -> Self {
        Self {
            head: Some(Arc::new(Node {
                key,
                value: Arc::new(value),
                parent: self.head.clone(),
            })),
        }
    }

    /// Most recent value stored under `key`, if it has type `T`
    pub fn value<T: Any>(&self, key: &str) -> Option<&T> {
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            if n.key == key {
                return (*n.value).downcast_ref::<T>();
            }
            node = n.parent.as_deref();
        }
        None
    }

    /// The logger attached to this carrier, if any
    pub fn logger(&self) -> Option<&Logger> {
        self.value::<Logger>(LOGGER_KEY)
    }

    pub(crate) fn with_logger(&self, logger: Logger) -> Self {
        self.with_value(LOGGER_KEY, logger)
    }

    /// Run `fut` with this carrier as the task's current carrier
    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        CURRENT.scope(self, fut).await
    }

    /// Run `f` with this carrier as the current carrier
    pub fn sync_scope<R>(self, f: impl FnOnce() -> R) -> R {
        CURRENT.sync_scope(self, f)
    }

    /// The current carrier, or an empty one outside any scope
    pub fn current() -> Self {
        CURRENT.try_with(Clone::clone).unwrap_or_default()
    }

    fn keys(&self) -> Vec<&'static str> {
        let mut keys = Vec::new();
        let mut node = self.head.as_deref();
        while let Some(n) = node {
            keys.push(n.key);
            node = n.parent.as_deref();
        }
        keys
    }
}

impl fmt::Debug for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Carrier").field("keys", &self.keys()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv;
    use crate::level::Level;
    use crate::sink::BufferSink;

    fn test_logger() -> (Logger, Arc<BufferSink>) {
        let sink = Arc::new(BufferSink::default());
        (Logger::new(sink.clone(), Level::Debug), sink)
    }

    #[test]
    fn test_empty_carrier() {
        let carrier = Carrier::new();
        assert!(carrier.is_empty());
        assert!(carrier.logger().is_none());
        assert!(carrier.value::<u32>("anything").is_none());
    }

    #[test]
    fn test_values_shadow_and_siblings_stay_apart() {
        let base = Carrier::new().with_value("request", 1u32);
        let left = base.with_value("request", 2u32);
        let right = base.with_value("user", "bob".to_string());

        assert_eq!(base.value::<u32>("request"), Some(&1));
        assert_eq!(left.value::<u32>("request"), Some(&2));
        assert_eq!(right.value::<u32>("request"), Some(&1));
        assert_eq!(right.value::<String>("user").map(String::as_str), Some("bob"));
        assert!(left.value::<String>("user").is_none());
    }

    #[test]
    fn test_wrong_type_is_none() {
        let carrier = Carrier::new().with_value("n", 5i64);
        assert!(carrier.value::<u32>("n").is_none());
    }

    #[test]
    fn test_withc_does_not_mutate_source_carrier() {
        let (logger, _sink) = test_logger();
        let base = logger.withc(&Carrier::new(), kv!["a", 1]);
        let derived = logger.withc(&base, kv!["b", 2]);

        assert_eq!(base.logger().unwrap().fields().len(), 1);
        assert_eq!(derived.logger().unwrap().fields().len(), 2);
        assert_eq!(format!("{:?}", derived), format!("Carrier {{ keys: {:?} }}", [LOGGER_KEY, LOGGER_KEY]));
    }

    #[test]
    fn test_current_outside_scope_is_empty() {
        assert!(Carrier::current().is_empty());
    }

    #[test]
    fn test_sync_scope() {
        let carrier = Carrier::new().with_value("trace", 9u64);
        let seen = carrier.sync_scope(|| Carrier::current().value::<u64>("trace").copied());
        assert_eq!(seen, Some(9));
    }

    #[tokio::test]
    async fn test_scope_follows_task() {
        let (logger, sink) = test_logger();
        let carrier = logger.withc(&Carrier::new(), kv!["request_id", "r-42"]);

        carrier
            .scope(async {
                tokio::task::yield_now().await;
                logger.infoc(&Carrier::current(), "handled");
            })
            .await;
        logger.infoc(&Carrier::current(), "outside");

        let records = sink.records();
        assert_eq!(records[0].keys(), vec!["request_id"]);
        assert!(records[1].fields.is_empty());
    }
}
