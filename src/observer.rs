//! Resolution observers.
//!
//! Observers are notified each time a service is freshly resolved: every
//! factory construction, the first construction of a singleton, and the
//! first hand-out of an instance. Cache hits are never reported.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::info;

use crate::id::Key;
use crate::service::Value;

/// Observer of fresh resolutions.
///
/// Implemented for any `Fn(&Key, &Value)` closure.
///
/// # Examples
///
/// ```rust
/// use anno_di::{Constructible, Container, Key, Value};
/// use std::sync::{Arc, Mutex};
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = seen.clone();
///
/// let container = Container::new();
/// container.singleton_as("port", Constructible::function(|_| Ok(8080u16))).unwrap();
/// container.resolving_any(move |key: &Key, _: &Value| sink.lock().unwrap().push(key.to_string()));
///
/// container.make("port").unwrap();
/// container.make("port").unwrap();
/// assert_eq!(*seen.lock().unwrap(), vec!["port".to_string()]);
/// ```
pub trait ResolutionObserver: Send + Sync {
    fn resolved(&self, key: &Key, value: &Value);
}

impl<F> ResolutionObserver for F
where
    F: Fn(&Key, &Value) + Send + Sync,
{
    fn resolved(&self, key: &Key, value: &Value) {
        self(key, value)
    }
}

/// Registered observers, global and per key.
#[derive(Default)]
pub(crate) struct Observers {
    global: Vec<Arc<dyn ResolutionObserver>>,
    keyed: HashMap<Key, Vec<Arc<dyn ResolutionObserver>>>,
}

impl Observers {
    pub(crate) fn add(&mut self, key: Option<Key>, observer: Arc<dyn ResolutionObserver>) {
        match key {
            Some(key) => self.keyed.entry(key).or_default().push(observer),
            None => self.global.push(observer),
        }
    }

    #[inline]
    pub(crate) fn has_observers(&self) -> bool {
        !self.global.is_empty() || !self.keyed.is_empty()
    }

    /// Observers interested in `key`, also matching the name it was requested
    /// under when that was an alias.
    pub(crate) fn matching(&self, key: &Key, requested: &Key) -> Vec<Arc<dyn ResolutionObserver>> {
        let mut matched = self.global.clone();
        if let Some(observers) = self.keyed.get(key) {
            matched.extend(observers.iter().cloned());
        }
        if requested != key {
            if let Some(observers) = self.keyed.get(requested) {
                matched.extend(observers.iter().cloned());
            }
        }
        matched
    }
}

/// Built-in observer that reports resolutions through `tracing`.
///
/// ```rust
/// use anno_di::{Container, LoggingObserver};
/// use std::sync::Arc;
///
/// let container = Container::new();
/// container.add_observer(Arc::new(LoggingObserver::new()));
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new() -> Self {
        Self {
            prefix: "[anno-di]".to_string(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl ResolutionObserver for LoggingObserver {
    fn resolved(&self, key: &Key, _value: &Value) {
        info!(prefix = %self.prefix, service = %key, "resolved service");
    }
}
