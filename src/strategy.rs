//! Construction strategy tags.

use std::fmt;

/// Strategy a registration resolves with.
///
/// The tag is stored alongside each registration and selects which resolver
/// type is built for a definition.
///
/// - **Factory**: a fresh value on every resolution
/// - **Singleton**: the first resolved value is cached for the container's lifetime
/// - **Instance**: a pre-built value returned verbatim
///
/// # Examples
///
/// ```rust
/// use anno_di::{Arguments, Constructible, Container, Strategy};
/// use std::sync::Arc;
///
/// let container = Container::new();
/// container.bind("request", Constructible::function(|_| Ok(String::from("req")))).unwrap();
/// container.singleton_as("config", Constructible::function(|_| Ok(42u32))).unwrap();
///
/// let a = container.get::<String>("request").unwrap();
/// let b = container.get::<String>("request").unwrap();
/// assert!(!Arc::ptr_eq(&a, &b));
///
/// let c1 = container.get::<u32>("config").unwrap();
/// let c2 = container.get::<u32>("config").unwrap();
/// assert!(Arc::ptr_eq(&c1, &c2));
///
/// let strategies: Vec<Strategy> = container.descriptors().iter().map(|d| d.strategy).collect();
/// assert_eq!(strategies, vec![Strategy::Singleton, Strategy::Factory]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// New value per resolution, never cached
    Factory,
    /// Single value per container, constructed at most once
    Singleton,
    /// Pre-built value, never constructed by the container
    Instance,
}

impl Strategy {
    /// Whether repeated resolutions return the same value.
    pub fn is_shared(self) -> bool {
        !matches!(self, Strategy::Factory)
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Factory => f.pad("factory"),
            Strategy::Singleton => f.pad("singleton"),
            Strategy::Instance => f.pad("instance"),
        }
    }
}
