//! Fluent service definition.

use std::sync::Arc;

use crate::container::Container;
use crate::error::DiResult;
use crate::id::{Key, ServiceId};
use crate::resolver::{resolver_for, Definition};
use crate::service::Value;
use crate::strategy::Strategy;

type NamedCallback = Arc<dyn Fn(&Key, &Value) + Send + Sync>;

/// Builder returned by [`Container::define`].
///
/// Collects a resolved callback, dependencies and aliases for one service,
/// then installs it with one of the terminal strategy calls.
///
/// # Examples
///
/// ```rust
/// use anno_di::{Arguments, Constructible, Container, Instance, Key, Value};
/// use std::sync::{Arc, Mutex};
///
/// let log = Arc::new(Mutex::new(Vec::new()));
/// let sink = log.clone();
///
/// let container = Container::new();
/// container.instance_as("host", Instance::new(String::from("db.local"))).unwrap();
/// container
///     .define("dsn", Constructible::named("Dsn", |mut args: Arguments| {
///         Ok(format!("postgres://{}", args.next::<String>()?))
///     }))
///     .depends_on(["host"])
///     .resolved(move |key: &Key, _: &Value| sink.lock().unwrap().push(key.to_string()))
///     .alias("database_url")
///     .singleton()
///     .unwrap();
///
/// assert_eq!(*container.get::<String>("database_url").unwrap(), "postgres://db.local");
/// container.make("dsn").unwrap();
/// assert_eq!(*log.lock().unwrap(), vec!["dsn".to_string()]);
/// ```
pub struct Registrar<'c> {
    container: &'c Container,
    name: Key,
    concrete: ServiceId,
    dependencies: Option<Vec<ServiceId>>,
    cache_arguments: Option<bool>,
    on_resolved: Option<NamedCallback>,
    aliases: Vec<Key>,
}

impl<'c> Registrar<'c> {
    pub(crate) fn new(container: &'c Container, name: Key, concrete: ServiceId) -> Self {
        Self {
            container,
            name,
            concrete,
            dependencies: None,
            cache_arguments: None,
            on_resolved: None,
            aliases: Vec::new(),
        }
    }

    pub fn name(&self) -> &Key {
        &self.name
    }

    /// Called with the service name and value on every fresh construction.
    pub fn resolved<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Key, &Value) + Send + Sync + 'static,
    {
        self.on_resolved = Some(Arc::new(callback));
        self
    }

    /// Adds `alias` for this service once it is installed.
    pub fn alias(mut self, alias: impl Into<Key>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Explicit dependencies, overriding any `Inject` annotation.
    pub fn depends_on<I, D>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<ServiceId>,
    {
        self.dependencies = Some(dependencies.into_iter().map(Into::into).collect());
        self
    }

    pub fn cache_arguments(mut self, enabled: bool) -> Self {
        self.cache_arguments = Some(enabled);
        self
    }

    pub fn factory(self) -> DiResult<&'c Container> {
        self.install(Strategy::Factory)
    }

    pub fn singleton(self) -> DiResult<&'c Container> {
        self.install(Strategy::Singleton)
    }

    pub fn instance(self) -> DiResult<&'c Container> {
        self.install(Strategy::Instance)
    }

    fn install(self, strategy: Strategy) -> DiResult<&'c Container> {
        let mut definition = Definition::new(self.concrete)?;
        if let Some(dependencies) = self.dependencies {
            definition = definition.with_parameters(dependencies);
        }
        if let Some(enabled) = self.cache_arguments {
            definition = definition.cache_arguments(enabled);
        }
        if let Some(callback) = self.on_resolved {
            let name = self.name.clone();
            definition = definition.on_resolved(move |value: &Value| callback(&name, value));
        }

        self.container
            .register_aliased(self.name, resolver_for(strategy, definition)?, self.aliases)
    }
}
