//! Singleton strategy: the first resolved value is cached.

use once_cell::sync::OnceCell;

use super::{Definition, DependencyProvider, Resolution, Resolve};
use crate::error::DiResult;
use crate::service::Value;
use crate::strategy::Strategy;

/// Constructs its value at most once.
///
/// The slot is written by the first successful resolution. Later calls return
/// the cached value without touching dependencies or firing the resolved
/// callback. A failed construction leaves the slot empty, so the next call
/// tries again.
#[derive(Debug)]
pub struct SingletonResolver {
    definition: Definition,
    instance: OnceCell<Value>,
}

impl SingletonResolver {
    pub fn new(definition: Definition) -> Self {
        Self {
            definition,
            instance: OnceCell::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.instance.get().is_some()
    }
}

impl Resolve for SingletonResolver {
    fn strategy(&self) -> Strategy {
        Strategy::Singleton
    }

    fn definition(&self) -> &Definition {
        &self.definition
    }

    fn resolve(&self, provider: &dyn DependencyProvider) -> DiResult<Resolution> {
        if let Some(value) = self.instance.get() {
            return Ok(Resolution::Cached(value.clone()));
        }

        let mut constructed = false;
        let value = self
            .instance
            .get_or_try_init(|| {
                constructed = true;
                self.definition.construct(provider)
            })?
            .clone();

        if constructed {
            self.definition.notify(&value);
            Ok(Resolution::Fresh(value))
        } else {
            Ok(Resolution::Cached(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiError;
    use crate::resolver::tests::MapProvider;
    use crate::service::Constructible;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn second_resolution_hits_cache() {
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        let definition = Definition::new(Constructible::named("Config", |_| Ok(1u64)))
            .unwrap()
            .on_resolved(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        let resolver = SingletonResolver::new(definition);
        let provider = MapProvider::default();

        assert!(!resolver.is_resolved());
        let first = resolver.resolve(&provider).unwrap();
        let second = resolver.resolve(&provider).unwrap();

        assert!(first.is_fresh());
        assert!(!second.is_fresh());
        assert!(Arc::ptr_eq(first.value(), second.value()));
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert!(resolver.is_resolved());
    }

    #[test]
    fn failed_construction_is_retried() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = attempts.clone();
        let definition = Definition::new(Constructible::named("Flaky", move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(DiError::construction("Flaky", "not yet"))
            } else {
                Ok(3u8)
            }
        }))
        .unwrap();
        let resolver = SingletonResolver::new(definition);
        let provider = MapProvider::default();

        assert!(resolver.resolve(&provider).is_err());
        assert!(resolver.resolve(&provider).unwrap().is_fresh());
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }
}
