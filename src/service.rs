//! Service definitions: constructible types, pre-built instances and the
//! argument lists handed to constructors.

use std::any::{Any, TypeId};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::annotation::Reader;
use crate::error::{DiError, DiResult};
use crate::id::{short_type_name, Key, ServiceId, ANONYMOUS};

/// Type-erased resolved service value.
pub type Value = Arc<dyn Any + Send + Sync>;

pub(crate) type ConstructorFn = Arc<dyn Fn(Arguments) -> DiResult<Value> + Send + Sync>;
pub(crate) type AnnotateFn = for<'r, 's> fn(&'r Reader<'s>) -> DiResult<()>;

/// A type the container can construct.
///
/// `annotate` attaches metadata to the type (most commonly an
/// [`Inject`](crate::Inject) class annotation listing its constructor
/// dependencies). It runs once per container, when the type is first
/// registered or resolved. `construct` receives the resolved dependencies in
/// declaration order.
///
/// # Examples
///
/// ```rust
/// use anno_di::{Arguments, Container, DiResult, Inject, Injectable, Reader};
/// use std::sync::Arc;
///
/// struct Wheels;
/// impl Injectable for Wheels {
///     fn construct(_: Arguments) -> DiResult<Self> {
///         Ok(Wheels)
///     }
/// }
///
/// struct Engine {
///     wheels: Arc<Wheels>,
/// }
/// impl Injectable for Engine {
///     fn annotate(reader: &Reader<'_>) -> DiResult<()> {
///         reader.add_class_annotation(Inject::single(anno_di::ServiceId::of::<Wheels>()))?;
///         Ok(())
///     }
///
///     fn construct(mut args: Arguments) -> DiResult<Self> {
///         Ok(Engine { wheels: args.next()? })
///     }
/// }
///
/// let container = Container::new();
/// let engine = container.make_type::<Engine>().unwrap();
/// let _wheels: &Arc<Wheels> = &engine.wheels;
/// ```
pub trait Injectable: Any + Send + Sync + Sized {
    /// Declared name, used as the registration key when none is given.
    fn service_name() -> Cow<'static, str> {
        Cow::Owned(short_type_name::<Self>())
    }

    /// Attaches annotations for this type.
    fn annotate(_reader: &Reader<'_>) -> DiResult<()> {
        Ok(())
    }

    /// Builds the value from its resolved dependencies.
    fn construct(args: Arguments) -> DiResult<Self>;
}

/// How a constructible is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocation {
    /// A named type, instantiated through its constructor
    Instantiate,
    /// A plain function, called with the resolved arguments
    Call,
}

/// Constructible type reference.
///
/// Wraps a constructor together with its declared name, the stable type
/// identifier used to key its annotation metadata, and optionally an explicit
/// dependency list that takes precedence over annotations.
#[derive(Clone)]
pub struct Constructible {
    name: Option<Cow<'static, str>>,
    type_key: Option<&'static str>,
    produces: &'static str,
    invocation: Invocation,
    ctor: ConstructorFn,
    annotate: Option<AnnotateFn>,
    parameters: Option<Vec<ServiceId>>,
}

impl Constructible {
    /// Constructible for an [`Injectable`] type.
    pub fn of<T: Injectable>() -> Self {
        Self {
            name: Some(T::service_name()),
            type_key: Some(std::any::type_name::<T>()),
            produces: std::any::type_name::<T>(),
            invocation: Invocation::Instantiate,
            ctor: Arc::new(|args| T::construct(args).map(|value| Arc::new(value) as Value)),
            annotate: Some(T::annotate as AnnotateFn),
            parameters: None,
        }
    }

    /// Anonymous function. It can be resolved directly but has no name to
    /// register under.
    ///
    /// ```rust
    /// use anno_di::{Constructible, Container};
    ///
    /// let container = Container::new();
    /// let value = container
    ///     .get::<u32>(Constructible::function(|_| Ok(7u32)))
    ///     .unwrap();
    /// assert_eq!(*value, 7);
    /// ```
    pub fn function<T, F>(f: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(Arguments) -> DiResult<T> + Send + Sync + 'static,
    {
        Self {
            name: None,
            type_key: None,
            produces: std::any::type_name::<T>(),
            invocation: Invocation::Call,
            ctor: Arc::new(move |args| f(args).map(|value| Arc::new(value) as Value)),
            annotate: None,
            parameters: None,
        }
    }

    /// Named function.
    pub fn named<T, F>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(Arguments) -> DiResult<T> + Send + Sync + 'static,
    {
        Self {
            name: Some(name.into()),
            ..Self::function(f)
        }
    }

    /// Explicit dependency identifiers, used instead of any `Inject` annotation.
    pub fn with_dependencies<I, D>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<ServiceId>,
    {
        self.parameters = Some(dependencies.into_iter().map(Into::into).collect());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_anonymous(&self) -> bool {
        self.name.is_none()
    }

    /// Stable type identifier keying this type's annotation metadata.
    pub fn type_key(&self) -> Option<&'static str> {
        self.type_key
    }

    /// Full type name of the produced value.
    pub fn produces(&self) -> &'static str {
        self.produces
    }

    pub fn invocation(&self) -> Invocation {
        self.invocation
    }

    pub fn parameters(&self) -> Option<&[ServiceId]> {
        self.parameters.as_deref()
    }

    pub fn describe(&self) -> &str {
        self.name.as_deref().unwrap_or(ANONYMOUS)
    }

    pub(crate) fn annotate_hook(&self) -> Option<AnnotateFn> {
        self.annotate
    }

    /// Resolution-stack key of an anonymous function, unique per constructor.
    pub(crate) fn anonymous_key(&self) -> Key {
        Key::new(format!("{}#{:p}", ANONYMOUS, Arc::as_ptr(&self.ctor)))
    }

    pub(crate) fn construct(&self, args: Arguments) -> DiResult<Value> {
        (self.ctor)(args)
    }
}

impl fmt::Debug for Constructible {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Constructible")
            .field("name", &self.describe())
            .field("produces", &self.produces)
            .field("invocation", &self.invocation)
            .field("parameters", &self.parameters)
            .finish()
    }
}

/// A pre-built value registered verbatim.
#[derive(Clone)]
pub struct Instance {
    value: Value,
    type_name: Cow<'static, str>,
    type_id: TypeId,
}

impl Instance {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self::from_arc(Arc::new(value))
    }

    /// Wraps an existing shared value without re-allocating it.
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self {
            value: value as Value,
            type_name: Cow::Owned(short_type_name::<T>()),
            type_id: TypeId::of::<T>(),
        }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Declared name of the runtime type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// The unit type stands in for "no value" and is not a valid instance.
    pub fn is_object_like(&self) -> bool {
        self.type_id != TypeId::of::<()>()
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance").field("type_name", &self.type_name).finish()
    }
}

/// Resolved constructor arguments, in declaration order.
///
/// ```rust
/// use anno_di::{Arguments, Value};
/// use std::sync::Arc;
///
/// let mut args = Arguments::new(vec![Arc::new(8080u16) as Value, Arc::new("db".to_string()) as Value], "Server");
/// let port = args.next::<u16>().unwrap();
/// let host = args.next::<String>().unwrap();
/// assert_eq!((*port, host.as_str()), (8080, "db"));
/// assert!(args.next::<u8>().is_err());
/// ```
pub struct Arguments {
    values: SmallVec<[Value; 4]>,
    cursor: usize,
    service: String,
}

impl Arguments {
    pub fn new<I>(values: I, service: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self {
            values: values.into_iter().collect(),
            cursor: 0,
            service: service.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Name of the service these arguments are being built for.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// Takes the next argument, downcast to `T`.
    pub fn next<T: Any + Send + Sync>(&mut self) -> DiResult<Arc<T>> {
        let value = self.get::<T>(self.cursor)?;
        self.cursor += 1;
        Ok(value)
    }

    /// Argument at `index`, downcast to `T`.
    pub fn get<T: Any + Send + Sync>(&self, index: usize) -> DiResult<Arc<T>> {
        let value = self.raw(index).ok_or_else(|| {
            DiError::construction(&self.service, format!("missing argument #{}", index + 1))
        })?;
        value.clone().downcast::<T>().map_err(|_| DiError::TypeMismatch {
            expected: std::any::type_name::<T>(),
            context: format!("argument #{} of {}", index + 1, self.service),
        })
    }

    pub fn raw(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values.into_vec()
    }
}

impl fmt::Debug for Arguments {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Arguments")
            .field("service", &self.service)
            .field("len", &self.values.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}
