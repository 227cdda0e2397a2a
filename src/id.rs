//! Service identifiers and their canonical keys.

use std::borrow::Borrow;
use std::fmt;

use crate::error::{DiError, DiResult};
use crate::service::{Constructible, Injectable, Instance};

/// Display name used for constructibles that carry no declared name.
pub const ANONYMOUS: &str = "Function@Anonymous";

/// Canonical string key of a registered service.
///
/// Keys are produced by [`ServiceId::normalize`] and are what the container
/// stores resolvers and aliases under.
///
/// ```rust
/// use anno_di::{Key, ServiceId};
///
/// let key = ServiceId::from("mailer").normalize().unwrap();
/// assert_eq!(key, Key::new("mailer"));
/// assert_eq!(key.as_str(), "mailer");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Key(String);

impl Key {
    pub fn new(name: impl Into<String>) -> Self {
        Key(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for Key {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Key {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::new(name)
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key(name)
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

/// Identifier of a service: a name, a constructible type, or an existing instance.
///
/// Every identifier normalizes to a [`Key`]:
///
/// - **Name**: the name itself
/// - **Type**: the declared name of the constructible
/// - **Instance**: the declared name of the instance's runtime type
///
/// Normalization is pure and deterministic.
///
/// # Examples
///
/// ```rust
/// use anno_di::{Arguments, DiResult, Injectable, Instance, ServiceId};
///
/// struct Mailer;
/// impl Injectable for Mailer {
///     fn construct(_: Arguments) -> DiResult<Self> {
///         Ok(Mailer)
///     }
/// }
///
/// assert_eq!(ServiceId::from("mailer").normalize().unwrap().as_str(), "mailer");
/// assert_eq!(ServiceId::of::<Mailer>().normalize().unwrap().as_str(), "Mailer");
/// assert_eq!(ServiceId::from(Instance::new(Mailer)).normalize().unwrap().as_str(), "Mailer");
/// ```
#[derive(Clone)]
pub enum ServiceId {
    /// Plain service name with no type information
    Name(String),
    /// Constructible type reference (named type or function)
    Type(Constructible),
    /// Already-built value
    Instance(Instance),
}

impl ServiceId {
    /// Identifier of an [`Injectable`] type.
    pub fn of<T: Injectable>() -> Self {
        ServiceId::Type(Constructible::of::<T>())
    }

    /// Canonical key of this identifier.
    ///
    /// Fails with [`DiError::InvalidDefinition`] for an anonymous
    /// constructible, which has no name to register under.
    pub fn normalize(&self) -> DiResult<Key> {
        match self {
            ServiceId::Name(name) => Ok(Key::new(name.as_str())),
            ServiceId::Type(constructible) => constructible
                .name()
                .map(Key::new)
                .ok_or_else(|| DiError::InvalidDefinition("anonymous function".to_string())),
            ServiceId::Instance(instance) => Ok(Key::new(instance.type_name())),
        }
    }

    /// Human readable form used in diagnostics. Never fails.
    pub fn describe(&self) -> String {
        match self {
            ServiceId::Name(name) => name.clone(),
            ServiceId::Type(constructible) => constructible.describe().to_string(),
            ServiceId::Instance(instance) => instance.type_name().to_string(),
        }
    }

    pub fn is_type(&self) -> bool {
        matches!(self, ServiceId::Type(_))
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, ServiceId::Type(c) if c.is_anonymous())
    }
}

impl fmt::Debug for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceId::Name(name) => f.debug_tuple("Name").field(name).finish(),
            ServiceId::Type(constructible) => f.debug_tuple("Type").field(constructible).finish(),
            ServiceId::Instance(instance) => f.debug_tuple("Instance").field(instance).finish(),
        }
    }
}

impl fmt::Display for ServiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}

impl From<&str> for ServiceId {
    fn from(name: &str) -> Self {
        ServiceId::Name(name.to_string())
    }
}

impl From<String> for ServiceId {
    fn from(name: String) -> Self {
        ServiceId::Name(name)
    }
}

impl From<&String> for ServiceId {
    fn from(name: &String) -> Self {
        ServiceId::Name(name.clone())
    }
}

impl From<Key> for ServiceId {
    fn from(key: Key) -> Self {
        ServiceId::Name(key.0)
    }
}

impl From<&Key> for ServiceId {
    fn from(key: &Key) -> Self {
        ServiceId::Name(key.0.clone())
    }
}

impl From<Constructible> for ServiceId {
    fn from(constructible: Constructible) -> Self {
        ServiceId::Type(constructible)
    }
}

impl From<Instance> for ServiceId {
    fn from(instance: Instance) -> Self {
        ServiceId::Instance(instance)
    }
}

impl From<&ServiceId> for ServiceId {
    fn from(id: &ServiceId) -> Self {
        id.clone()
    }
}

/// Declared name of a Rust type: its `type_name` with module paths stripped,
/// including inside generic arguments.
///
/// ```rust
/// use anno_di::short_type_name;
///
/// assert_eq!(short_type_name::<String>(), "String");
/// assert_eq!(short_type_name::<Vec<String>>(), "Vec<String>");
/// assert_eq!(short_type_name::<u32>(), "u32");
/// ```
pub fn short_type_name<T: ?Sized>() -> String {
    strip_module_paths(std::any::type_name::<T>())
}

fn strip_module_paths(full: &str) -> String {
    let mut out = String::with_capacity(full.len());
    let mut segment_start = 0;

    for (index, ch) in full.char_indices() {
        if matches!(ch, '<' | '>' | ',' | ' ' | '&' | '(' | ')' | '[' | ']' | ';' | '*') {
            out.push_str(last_segment(&full[segment_start..index]));
            out.push(ch);
            segment_start = index + ch.len_utf8();
        }
    }
    out.push_str(last_segment(&full[segment_start..]));
    out
}

fn last_segment(path: &str) -> &str {
    path.rsplit("::").next().unwrap_or(path)
}
