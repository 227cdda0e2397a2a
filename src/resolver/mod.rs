//! Resolver strategies.
//!
//! A resolver owns one [`Definition`] and turns it into a value, asking a
//! [`DependencyProvider`] (the container's resolution context) for each
//! dependency. The three strategies are independent types sharing the
//! definition by composition.

use std::fmt;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::annotation::MetadataStore;
use crate::error::{DiError, DiResult};
use crate::id::ServiceId;
use crate::service::{Arguments, Constructible, Instance, Value};
use crate::strategy::Strategy;

pub mod factory;
pub mod instance;
pub mod singleton;

pub use factory::FactoryResolver;
pub use instance::InstanceResolver;
pub use singleton::SingletonResolver;

/// Callback fired with each freshly constructed value.
pub type ResolvedCallback = Arc<dyn Fn(&Value) + Send + Sync>;

/// What a resolver calls back into while resolving dependencies.
pub trait DependencyProvider {
    /// Resolves a dependency identifier.
    fn make(&self, id: &ServiceId) -> DiResult<Value>;

    /// Annotation metadata consulted for `Inject` declarations.
    fn metadata(&self) -> &MetadataStore;

    /// Arguments used when a definition declares no dependencies at all.
    fn default_parameters(&self) -> Vec<ServiceId> {
        Vec::new()
    }

    /// Whether definitions without an explicit setting reuse their first
    /// resolved argument list.
    fn caches_arguments(&self) -> bool {
        false
    }
}

/// Outcome of a single `resolve` call.
#[derive(Clone)]
pub enum Resolution {
    /// Constructed (or announced) by this call
    Fresh(Value),
    /// Served from a resolver's cache
    Cached(Value),
}

impl Resolution {
    pub fn value(&self) -> &Value {
        match self {
            Resolution::Fresh(value) | Resolution::Cached(value) => value,
        }
    }

    pub fn into_value(self) -> Value {
        match self {
            Resolution::Fresh(value) | Resolution::Cached(value) => value,
        }
    }

    pub fn is_fresh(&self) -> bool {
        matches!(self, Resolution::Fresh(_))
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resolution::Fresh(_) => f.write_str("Fresh(..)"),
            Resolution::Cached(_) => f.write_str("Cached(..)"),
        }
    }
}

/// Strategy for producing a service value.
pub trait Resolve: Send + Sync {
    fn strategy(&self) -> Strategy;

    fn definition(&self) -> &Definition;

    fn resolve(&self, provider: &dyn DependencyProvider) -> DiResult<Resolution>;
}

/// A validated service definition: either something to construct or a
/// value to hand back.
#[derive(Debug, Clone)]
pub enum Concrete {
    Type(Constructible),
    Instance(Instance),
}

impl Concrete {
    pub fn describe(&self) -> &str {
        match self {
            Concrete::Type(constructible) => constructible.describe(),
            Concrete::Instance(instance) => instance.type_name(),
        }
    }
}

impl TryFrom<ServiceId> for Concrete {
    type Error = DiError;

    fn try_from(id: ServiceId) -> DiResult<Self> {
        match id {
            ServiceId::Type(constructible) => Ok(Concrete::Type(constructible)),
            ServiceId::Instance(instance) if instance.is_object_like() => Ok(Concrete::Instance(instance)),
            ServiceId::Instance(_) => Err(DiError::InvalidDefinition("()".to_string())),
            ServiceId::Name(name) => Err(DiError::InvalidDefinition(format!("string ({})", name))),
        }
    }
}

/// Service definition shared by every strategy.
///
/// Holds the concrete definition, optional explicit dependencies, the
/// resolved callback and the optional argument cache.
pub struct Definition {
    concrete: Concrete,
    parameters: Option<Vec<ServiceId>>,
    on_resolved: Option<ResolvedCallback>,
    cache_arguments: Option<bool>,
    argument_cache: OnceCell<Vec<Value>>,
}

impl Definition {
    /// Validates `concrete`; plain names are not definitions.
    pub fn new(concrete: impl Into<ServiceId>) -> DiResult<Self> {
        let concrete = Concrete::try_from(concrete.into())?;
        Ok(Self {
            concrete,
            parameters: None,
            on_resolved: None,
            cache_arguments: None,
            argument_cache: OnceCell::new(),
        })
    }

    /// Explicit dependencies, taking precedence over annotations.
    pub fn with_parameters<I, D>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<ServiceId>,
    {
        self.parameters = Some(parameters.into_iter().map(Into::into).collect());
        self
    }

    pub fn on_resolved<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        self.on_resolved = Some(Arc::new(callback));
        self
    }

    /// Reuse the first resolved argument list for every later construction.
    ///
    /// Only sound while the dependencies resolve to the same values each
    /// time; a factory dependency would be frozen at its first value.
    pub fn cache_arguments(mut self, enabled: bool) -> Self {
        self.cache_arguments = Some(enabled);
        self
    }

    pub fn concrete(&self) -> &Concrete {
        &self.concrete
    }

    pub fn describe(&self) -> &str {
        self.concrete.describe()
    }

    /// Dependency identifiers, in order of precedence: explicit parameters,
    /// the `Inject` annotation of the type, the provider's defaults.
    pub fn parameters(&self, provider: &dyn DependencyProvider) -> DiResult<Vec<ServiceId>> {
        if let Some(parameters) = &self.parameters {
            return Ok(parameters.clone());
        }
        let Concrete::Type(constructible) = &self.concrete else {
            return Ok(Vec::new());
        };
        if let Some(parameters) = constructible.parameters() {
            return Ok(parameters.to_vec());
        }
        if let Some(type_key) = constructible.type_key() {
            provider.metadata().declare(constructible)?;
            if let Some(inject) = provider.metadata().reader(type_key).inject() {
                return Ok(inject.into_dependencies());
            }
        }
        Ok(provider.default_parameters())
    }

    /// Resolved dependency values, honoring the argument cache.
    pub fn dependencies(&self, provider: &dyn DependencyProvider) -> DiResult<Vec<Value>> {
        let cached = self
            .cache_arguments
            .unwrap_or_else(|| provider.caches_arguments());
        if cached {
            return self
                .argument_cache
                .get_or_try_init(|| self.resolve_arguments(provider))
                .cloned();
        }
        self.resolve_arguments(provider)
    }

    fn resolve_arguments(&self, provider: &dyn DependencyProvider) -> DiResult<Vec<Value>> {
        let parameters = self.parameters(provider)?;
        parameters
            .iter()
            .enumerate()
            .map(|(index, dependency)| {
                provider.make(dependency).map_err(|err| {
                    if err.is_unresolvable_class() {
                        DiError::Unresolvable {
                            position: index + 1,
                            dependency: dependency.describe(),
                            service: self.describe().to_string(),
                            source: Box::new(err),
                        }
                    } else {
                        err
                    }
                })
            })
            .collect()
    }

    /// Instantiates or calls a constructible with its resolved dependencies;
    /// an instance is returned unchanged.
    pub fn construct(&self, provider: &dyn DependencyProvider) -> DiResult<Value> {
        match &self.concrete {
            Concrete::Instance(instance) => Ok(instance.value().clone()),
            Concrete::Type(constructible) => {
                let values = self.dependencies(provider)?;
                constructible.construct(Arguments::new(values, constructible.describe()))
            }
        }
    }

    pub(crate) fn notify(&self, value: &Value) {
        if let Some(callback) = &self.on_resolved {
            callback(value);
        }
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("concrete", &self.concrete)
            .field("parameters", &self.parameters)
            .field("cache_arguments", &self.cache_arguments)
            .finish()
    }
}

/// Builds the resolver for `strategy`.
pub fn resolver_for(strategy: Strategy, definition: Definition) -> DiResult<Arc<dyn Resolve>> {
    Ok(match strategy {
        Strategy::Factory => Arc::new(FactoryResolver::new(definition)),
        Strategy::Singleton => Arc::new(SingletonResolver::new(definition)),
        Strategy::Instance => Arc::new(InstanceResolver::new(definition)?),
    })
}
