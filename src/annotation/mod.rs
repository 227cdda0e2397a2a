//! Annotation metadata attached to constructible types.
//!
//! Annotations are stored per type in three buckets (class, method and
//! property) by the [`MetadataStore`] and read back through a [`Reader`].
//! The container consults the class bucket for an [`Inject`] annotation to
//! discover a type's constructor dependencies.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{DiError, DiResult};

pub mod inject;
pub mod reader;

pub use inject::{Inject, INJECT};
pub use reader::{MetadataStore, Reader};

/// Declaration kind an annotation is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Class,
    Method,
    Property,
}

impl Target {
    pub const ALL: &'static [Target] = &[Target::Class, Target::Method, Target::Property];
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Class => f.write_str("Class"),
            Target::Method => f.write_str("Method"),
            Target::Property => f.write_str("Property"),
        }
    }
}

/// Metadata attached to a type, a method or a property.
///
/// Lookup is by [`name`](Annotation::name); [`as_any`](Annotation::as_any)
/// lets callers recover the concrete annotation type.
///
/// # Examples
///
/// ```rust
/// use anno_di::{Annotation, MetadataStore, Target};
/// use std::any::Any;
///
/// #[derive(Debug)]
/// struct Route(&'static str);
///
/// impl Annotation for Route {
///     fn name(&self) -> &str { "Route" }
///     fn targets(&self) -> &'static [Target] { &[Target::Method] }
///     fn as_any(&self) -> &dyn Any { self }
/// }
///
/// let store = MetadataStore::new();
/// let reader = store.reader("app::Controller");
/// reader.add_method_annotation("index", Route("/")).unwrap();
/// assert!(reader.add_class_annotation(Route("/")).is_err());
///
/// let found = reader.method_annotation("Route", Some("index")).unwrap();
/// assert_eq!(found.as_any().downcast_ref::<Route>().unwrap().0, "/");
/// ```
pub trait Annotation: Any + Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Targets this annotation may be attached to.
    fn targets(&self) -> &'static [Target] {
        Target::ALL
    }

    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to a stored annotation.
pub type AnnotationRef = Arc<dyn Annotation>;

pub(crate) fn check_target(annotation: &dyn Annotation, given: Target) -> DiResult<()> {
    let allowed = annotation.targets();
    if allowed.contains(&given) {
        return Ok(());
    }
    Err(DiError::AnnotationTarget {
        annotation: annotation.name().to_string(),
        required: allowed
            .iter()
            .map(Target::to_string)
            .collect::<Vec<_>>()
            .join(", "),
        given: given.to_string(),
    })
}
