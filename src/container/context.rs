//! Per-resolution state: the stack of keys being resolved.
//!
//! The stack is thread-local and keyed by container, so a constructor that
//! calls [`Container::make`] on the handle it was given keeps extending the
//! stack of the resolution that invoked it. A key that shows up twice on the
//! stack is a cycle. The check runs before a resolver is entered, so a
//! singleton's slot is never initialised re-entrantly.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use smallvec::SmallVec;
use tracing::{trace, warn};

use super::Container;
use crate::annotation::MetadataStore;
use crate::error::{DiError, DiResult};
use crate::id::{Key, ServiceId, ANONYMOUS};
use crate::resolver::{Definition, DependencyProvider, FactoryResolver, Resolution, Resolve};
use crate::service::Value;

type Stack = SmallVec<[Key; 8]>;

thread_local! {
    static ACTIVE: RefCell<HashMap<usize, Stack>> = RefCell::new(HashMap::new());
}

/// Pops the stack on drop, including on early return through `?` and unwinding.
struct StackGuard {
    container: usize,
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        let _ = ACTIVE.try_with(|active| {
            let mut active = active.borrow_mut();
            if let Some(stack) = active.get_mut(&self.container) {
                stack.pop();
                if stack.is_empty() {
                    active.remove(&self.container);
                }
            }
        });
    }
}

/// Resolution state for one `make` call.
///
/// Contexts created on the same thread for the same container share one
/// stack, however they are nested.
///
/// ```rust
/// use anno_di::{Constructible, Container, DiError};
///
/// let container = Container::new();
/// container.singleton_as("a", Constructible::named("A", |_| Ok(1u8)).with_dependencies(["b"])).unwrap();
/// container.singleton_as("b", Constructible::named("B", |_| Ok(2u8)).with_dependencies(["a"])).unwrap();
///
/// match container.make("a") {
///     Err(DiError::Circular(path)) => assert_eq!(path, vec!["a", "b", "a"]),
///     other => panic!("expected a cycle, got {:?}", other.map(|_| ())),
/// }
/// ```
pub struct ResolutionContext<'c> {
    container: &'c Container,
}

impl<'c> ResolutionContext<'c> {
    pub fn new(container: &'c Container) -> Self {
        Self { container }
    }

    /// Number of services of this container being resolved on this thread.
    pub fn depth(&self) -> usize {
        self.with_stack(|stack| stack.map_or(0, |stack| stack.len()))
    }

    /// Keys currently being resolved on this thread, outermost first.
    pub fn path(&self) -> Vec<Key> {
        self.with_stack(|stack| stack.map(|stack| stack.to_vec()).unwrap_or_default())
    }

    fn with_stack<R>(&self, f: impl FnOnce(Option<&Stack>) -> R) -> R {
        let id = self.container.id();
        ACTIVE.with(|active| f(active.borrow().get(&id)))
    }

    fn enter(&self, key: Key) -> DiResult<StackGuard> {
        let id = self.container.id();
        let max_depth = self.container.config().max_depth;

        ACTIVE.with(|active| {
            let mut active = active.borrow_mut();
            let depth = match active.get(&id) {
                Some(stack) => {
                    if let Some(start) = stack.iter().position(|k| k == &key) {
                        let path: Vec<String> = stack[start..]
                            .iter()
                            .chain(std::iter::once(&key))
                            .map(|k| k.to_string())
                            .collect();
                        warn!(service = %key, path = %path.join(" -> "), "circular dependency detected");
                        return Err(DiError::Circular(path));
                    }
                    stack.len()
                }
                None => 0,
            };

            if depth >= max_depth {
                warn!(service = %key, max_depth, "maximum resolution depth exceeded");
                return Err(DiError::DepthExceeded(max_depth));
            }

            active.entry(id).or_default().push(key);
            Ok(StackGuard { container: id })
        })
    }

    /// Resolves `id` to a value.
    pub fn resolve(&self, id: &ServiceId) -> DiResult<Value> {
        if let ServiceId::Type(constructible) = id {
            if constructible.is_anonymous() {
                let _guard = self.enter(constructible.anonymous_key())?;
                trace!(service = ANONYMOUS, "resolving anonymous function");
                let resolver = FactoryResolver::new(Definition::new(constructible.clone())?);
                return resolver.resolve(self).map(Resolution::into_value);
            }
        }

        let requested = id.normalize()?;
        let (key, registration) = self.container.lookup(&requested)?;

        let registration = match registration {
            Some(registration) => registration,
            None => {
                let config = self.container.config();
                if key.as_str() == config.container_key {
                    trace!(service = %key, "resolving container handle");
                    return Ok(Arc::new(self.container.clone()) as Value);
                }
                match id {
                    ServiceId::Type(constructible) if config.auto_register => {
                        self.container.auto_register(&key, constructible.clone())?
                    }
                    _ => return Err(DiError::NotFound(key.to_string())),
                }
            }
        };

        let resolution = {
            let _guard = self.enter(key.clone())?;
            trace!(service = %key, strategy = %registration.strategy, "resolving service");
            registration.resolver.resolve(self)?
        };

        match resolution {
            Resolution::Fresh(value) => {
                for observer in self.container.observers_for(&key, &requested) {
                    observer.resolved(&key, &value);
                }
                Ok(value)
            }
            Resolution::Cached(value) => {
                trace!(service = %key, "cache hit");
                Ok(value)
            }
        }
    }
}

impl DependencyProvider for ResolutionContext<'_> {
    fn make(&self, id: &ServiceId) -> DiResult<Value> {
        self.resolve(id)
    }

    fn metadata(&self) -> &MetadataStore {
        self.container.metadata()
    }

    fn default_parameters(&self) -> Vec<ServiceId> {
        let config = self.container.config();
        if config.implicit_container_argument {
            vec![ServiceId::Name(config.container_key.clone())]
        } else {
            Vec::new()
        }
    }

    fn caches_arguments(&self) -> bool {
        self.container.config().cache_arguments
    }
}
