//! Service descriptors for introspection and diagnostics.

use crate::id::Key;
use crate::strategy::Strategy;

/// Read-only snapshot of one registration.
///
/// Useful for checking what a container holds at startup, or for dumping its
/// contents while debugging a resolution failure.
///
/// # Examples
///
/// ```rust
/// use anno_di::{Constructible, Container, Instance, Strategy};
///
/// let container = Container::new();
/// container.instance_as("port", Instance::new(5432u16)).unwrap();
/// container.singleton_as("pool", Constructible::named("Pool", |_| Ok(4usize))).unwrap();
/// container.alias("pool", ["connections"]).unwrap();
///
/// let descriptors = container.descriptors();
/// assert_eq!(descriptors.len(), 2);
///
/// let pool = &descriptors[0];
/// assert_eq!(pool.key.as_str(), "pool");
/// assert_eq!(pool.strategy, Strategy::Singleton);
/// assert_eq!(pool.service, "Pool");
/// assert!(pool.is_aliased());
///
/// let port = &descriptors[1];
/// assert_eq!(port.service, "u16");
/// assert!(port.is_shared());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceDescriptor {
    /// Canonical key the service is registered under
    pub key: Key,
    /// Strategy of the registered resolver
    pub strategy: Strategy,
    /// Display name of the registered concrete
    pub service: String,
    /// Aliases resolving to this key, sorted
    pub aliases: Vec<Key>,
}

impl ServiceDescriptor {
    pub fn is_aliased(&self) -> bool {
        !self.aliases.is_empty()
    }

    /// Whether repeated resolutions return the same value.
    pub fn is_shared(&self) -> bool {
        self.strategy.is_shared()
    }
}
