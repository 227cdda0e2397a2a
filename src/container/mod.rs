//! The dependency injection container.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::annotation::{MetadataStore, Reader};
use crate::config::ContainerConfig;
use crate::descriptors::ServiceDescriptor;
use crate::error::{DiError, DiResult};
use crate::id::{Key, ServiceId};
use crate::observer::{Observers, ResolutionObserver};
use crate::registrar::Registrar;
use crate::resolver::{resolver_for, Concrete, Definition, Resolve};
use crate::service::{Constructible, Injectable, Value};
use crate::strategy::Strategy;

pub mod context;
mod registry;

pub use context::ResolutionContext;

use registry::{Registration, Registry};

struct ContainerInner {
    registry: RwLock<Registry>,
    metadata: MetadataStore,
    observers: RwLock<Observers>,
    config: ContainerConfig,
}

/// Service registry and resolver.
///
/// `Container` is a cheap handle: clones share the same registrations,
/// metadata and observers.
///
/// # Examples
///
/// ```rust
/// use anno_di::{Arguments, Container, DiResult, Inject, Injectable, Reader};
/// use std::sync::Arc;
///
/// struct Wheels;
///
/// impl Injectable for Wheels {
///     fn construct(_: Arguments) -> DiResult<Self> {
///         Ok(Wheels)
///     }
/// }
///
/// struct Engine {
///     wheels: Arc<Wheels>,
/// }
///
/// impl Injectable for Engine {
///     fn annotate(reader: &Reader<'_>) -> DiResult<()> {
///         reader.add_class_annotation(Inject::single("Wheels"))?;
///         Ok(())
///     }
///
///     fn construct(mut args: Arguments) -> DiResult<Self> {
///         Ok(Engine { wheels: args.next()? })
///     }
/// }
///
/// let container = Container::new();
/// container.factory(anno_di::Constructible::of::<Wheels>()).unwrap();
///
/// let engine = container.make_type::<Engine>().unwrap();
/// let _wheels: &Wheels = &engine.wheels;
/// assert!(container.has(anno_di::ServiceId::of::<Engine>()));
/// ```
#[derive(Clone)]
pub struct Container {
    inner: Arc<ContainerInner>,
}

impl Container {
    pub fn new() -> Self {
        Self::with_config(ContainerConfig::default())
    }

    pub fn with_config(config: ContainerConfig) -> Self {
        Self {
            inner: Arc::new(ContainerInner {
                registry: RwLock::new(Registry::default()),
                metadata: MetadataStore::new(),
                observers: RwLock::new(Observers::default()),
                config,
            }),
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.inner.config
    }

    /// Identity shared by every clone of this handle.
    pub(crate) fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as usize
    }

    // ----- Registration -----

    /// Registers `concrete` as a factory under `name`.
    pub fn bind(&self, name: impl Into<ServiceId>, concrete: impl Into<ServiceId>) -> DiResult<&Self> {
        self.install(name.into(), Strategy::Factory, concrete.into())
    }

    /// Registers a factory under the concrete's own name.
    pub fn factory(&self, concrete: impl Into<ServiceId>) -> DiResult<&Self> {
        let concrete = concrete.into();
        self.install(concrete.clone(), Strategy::Factory, concrete)
    }

    pub fn factory_as(&self, id: impl Into<ServiceId>, concrete: impl Into<ServiceId>) -> DiResult<&Self> {
        self.install(id.into(), Strategy::Factory, concrete.into())
    }

    /// Registers a singleton under the concrete's own name.
    pub fn singleton(&self, concrete: impl Into<ServiceId>) -> DiResult<&Self> {
        let concrete = concrete.into();
        self.install(concrete.clone(), Strategy::Singleton, concrete)
    }

    pub fn singleton_as(&self, id: impl Into<ServiceId>, concrete: impl Into<ServiceId>) -> DiResult<&Self> {
        self.install(id.into(), Strategy::Singleton, concrete.into())
    }

    /// Registers a pre-built value under its runtime type name.
    ///
    /// ```rust
    /// use anno_di::{Container, DiError, Instance};
    ///
    /// let container = Container::new();
    /// container.instance_as("port", Instance::new(8080u16)).unwrap();
    /// assert_eq!(*container.get::<u16>("port").unwrap(), 8080);
    ///
    /// let err = container.instance_as("nothing", Instance::new(())).unwrap_err();
    /// assert!(matches!(err, DiError::InvalidDefinition(_)));
    /// ```
    pub fn instance(&self, value: impl Into<ServiceId>) -> DiResult<&Self> {
        let value = value.into();
        self.install(value.clone(), Strategy::Instance, value)
    }

    pub fn instance_as(&self, id: impl Into<ServiceId>, value: impl Into<ServiceId>) -> DiResult<&Self> {
        self.install(id.into(), Strategy::Instance, value.into())
    }

    fn install(&self, id: ServiceId, strategy: Strategy, concrete: ServiceId) -> DiResult<&Self> {
        let key = id.normalize()?;
        let resolver = resolver_for(strategy, Definition::new(concrete)?)?;
        self.register(key, resolver)
    }

    /// Installs a resolver under `name`, replacing any previous registration
    /// or alias of that name.
    pub fn register(&self, name: impl Into<Key>, resolver: Arc<dyn Resolve>) -> DiResult<&Self> {
        self.register_aliased(name.into(), resolver, Vec::new())
    }

    /// Installs a resolver together with its aliases. Nothing is changed
    /// when one of the aliases is rejected.
    pub(crate) fn register_aliased(&self, key: Key, resolver: Arc<dyn Resolve>, aliases: Vec<Key>) -> DiResult<&Self> {
        self.declare(resolver.definition())?;
        debug!(service = %key, strategy = %resolver.strategy(), ?aliases, "registering service");
        self.inner
            .registry
            .write()
            .insert_aliased(key, Registration::new(resolver), aliases)?;
        Ok(self)
    }

    /// Points each of `aliases` at `original`.
    ///
    /// `original` may be registered later; aliases are followed when a
    /// service is resolved.
    ///
    /// ```rust
    /// use anno_di::{Container, Instance};
    ///
    /// let container = Container::new();
    /// container.alias("mailer", ["smtp"]).unwrap();
    /// container.instance_as("mailer", Instance::new(String::from("smtp://localhost"))).unwrap();
    ///
    /// assert!(container.has("smtp"));
    /// assert!(container.alias("mailer", ["smtp"]).is_err());
    /// ```
    pub fn alias<I>(&self, original: impl Into<ServiceId>, aliases: I) -> DiResult<&Self>
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        let original = original.into().normalize()?;
        let aliases: Vec<Key> = aliases.into_iter().map(Into::into).collect();
        self.inner.registry.write().add_aliases(&original, aliases.clone())?;
        debug!(service = %original, ?aliases, "aliased service");
        Ok(self)
    }

    /// Starts a fluent definition of `name`.
    pub fn define(&self, name: impl Into<Key>, concrete: impl Into<ServiceId>) -> Registrar<'_> {
        Registrar::new(self, name.into(), concrete.into())
    }

    fn declare(&self, definition: &Definition) -> DiResult<()> {
        match definition.concrete() {
            Concrete::Type(constructible) => self.inner.metadata.declare(constructible),
            Concrete::Instance(_) => Ok(()),
        }
    }

    // ----- Resolution -----

    /// Whether `id` resolves to a registration, following aliases.
    pub fn has(&self, id: impl Into<ServiceId>) -> bool {
        let Ok(key) = id.into().normalize() else {
            return false;
        };
        let registry = self.inner.registry.read();
        registry
            .canonical(&key)
            .map(|canonical| registry.contains(&canonical))
            .unwrap_or(false)
    }

    /// Resolves `id` to a value.
    pub fn make(&self, id: impl Into<ServiceId>) -> DiResult<Value> {
        ResolutionContext::new(self).resolve(&id.into())
    }

    /// Resolves `id` and downcasts the value to `T`.
    pub fn get<T: Any + Send + Sync>(&self, id: impl Into<ServiceId>) -> DiResult<Arc<T>> {
        let id = id.into();
        self.make(&id)?.downcast::<T>().map_err(|_| DiError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            context: id.describe(),
        })
    }

    /// Resolves an [`Injectable`] type by its declared name.
    pub fn make_type<T: Injectable>(&self) -> DiResult<Arc<T>> {
        self.get::<T>(ServiceId::of::<T>())
    }

    pub(crate) fn lookup(&self, requested: &Key) -> DiResult<(Key, Option<Registration>)> {
        let registry = self.inner.registry.read();
        let key = registry.canonical(requested)?;
        let registration = registry.get(&key).cloned();
        Ok((key, registration))
    }

    pub(crate) fn auto_register(&self, key: &Key, constructible: Constructible) -> DiResult<Registration> {
        self.inner.metadata.declare(&constructible)?;
        let resolver = resolver_for(Strategy::Factory, Definition::new(constructible)?)?;
        debug!(service = %key, "auto-registering factory");
        Ok(self
            .inner
            .registry
            .write()
            .insert_if_absent(key.clone(), Registration::new(resolver)))
    }

    // ----- Observers -----

    /// Calls `callback` whenever `id` is freshly resolved.
    pub fn resolving<F>(&self, id: impl Into<ServiceId>, callback: F) -> DiResult<&Self>
    where
        F: Fn(&Key, &Value) + Send + Sync + 'static,
    {
        let key = id.into().normalize()?;
        self.inner.observers.write().add(Some(key), Arc::new(callback));
        Ok(self)
    }

    /// Calls `callback` whenever any service is freshly resolved.
    pub fn resolving_any<F>(&self, callback: F) -> &Self
    where
        F: Fn(&Key, &Value) + Send + Sync + 'static,
    {
        self.add_observer(Arc::new(callback))
    }

    pub fn add_observer(&self, observer: Arc<dyn ResolutionObserver>) -> &Self {
        self.inner.observers.write().add(None, observer);
        self
    }

    pub(crate) fn observers_for(&self, key: &Key, requested: &Key) -> Vec<Arc<dyn ResolutionObserver>> {
        let observers = self.inner.observers.read();
        if !observers.has_observers() {
            return Vec::new();
        }
        observers.matching(key, requested)
    }

    // ----- Metadata -----

    pub fn metadata(&self) -> &MetadataStore {
        &self.inner.metadata
    }

    /// Annotation reader for `T`, with its annotations declared.
    pub fn reader<T: Injectable>(&self) -> DiResult<Reader<'_>> {
        self.inner.metadata.declare(&Constructible::of::<T>())?;
        Ok(self.inner.metadata.reader(std::any::type_name::<T>()))
    }

    // ----- Introspection -----

    /// Every registration, sorted by key.
    pub fn descriptors(&self) -> Vec<ServiceDescriptor> {
        let registry = self.inner.registry.read();
        let mut descriptors: Vec<ServiceDescriptor> = registry
            .iter()
            .map(|(key, registration)| ServiceDescriptor {
                key: key.clone(),
                strategy: registration.strategy,
                service: registration.resolver.definition().describe().to_string(),
                aliases: registry.aliases_of(key),
            })
            .collect();
        descriptors.sort_by(|a, b| a.key.cmp(&b.key));
        descriptors
    }

    /// Registered keys, sorted.
    pub fn keys(&self) -> Vec<Key> {
        let mut keys: Vec<Key> = self.inner.registry.read().iter().map(|(key, _)| key.clone()).collect();
        keys.sort();
        keys
    }

    /// Aliases that resolve to `name`, sorted.
    pub fn aliases_of(&self, name: impl Into<Key>) -> Vec<Key> {
        self.inner.registry.read().aliases_of(&name.into())
    }
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.inner.registry.read();
        f.debug_struct("Container")
            .field("services", &registry.len())
            .field("aliases", &registry.alias_count())
            .field("config", &self.inner.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::Instance;

    #[test]
    fn unknown_name_leaves_registry_untouched() {
        let container = Container::new();
        assert!(matches!(container.make("nope"), Err(DiError::NotFound(name)) if name == "nope"));
        assert!(container.keys().is_empty());
    }

    #[test]
    fn container_key_resolves_to_handle() {
        let container = Container::new();
        container.instance_as("flag", Instance::new(true)).unwrap();

        let handle = container.get::<Container>("container").unwrap();
        assert!(handle.has("flag"));
    }

    #[test]
    fn binding_container_key_overrides_handle() {
        let container = Container::new();
        container.instance_as("container", Instance::new(1u8)).unwrap();
        assert_eq!(*container.get::<u8>("container").unwrap(), 1);
    }

    #[test]
    fn get_reports_wrong_type() {
        let container = Container::new();
        container.instance_as("n", Instance::new(1u8)).unwrap();
        assert!(matches!(container.get::<String>("n"), Err(DiError::TypeMismatch { .. })));
    }

    #[test]
    fn anonymous_names_cannot_be_registered() {
        let container = Container::new();
        let err = container.factory(Constructible::function(|_| Ok(1u8))).unwrap_err();
        assert!(matches!(err, DiError::InvalidDefinition(_)));
    }

    #[test]
    fn debug_reports_counts() {
        let container = Container::new();
        container.instance_as("a", Instance::new(1u8)).unwrap();
        container.alias("a", ["b"]).unwrap();
        let rendered = format!("{:?}", container);
        assert!(rendered.contains("services: 1"));
        assert!(rendered.contains("aliases: 1"));
    }
}
