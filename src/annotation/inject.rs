//! The `Inject` class annotation.

use std::any::Any;

use super::{Annotation, Target};
use crate::id::ServiceId;

/// Name under which [`Inject`] is stored and looked up.
pub const INJECT: &str = "Inject";

/// Ordered constructor dependencies of a type.
///
/// Built from a list, or from a single identifier which becomes a
/// one-element list.
///
/// ```rust
/// use anno_di::Inject;
///
/// let many = Inject::new(["Config", "Logger"]);
/// assert_eq!(many.len(), 2);
///
/// let one: Inject = "Config".into();
/// assert_eq!(one.dependencies()[0].describe(), "Config");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Inject {
    dependencies: Vec<ServiceId>,
}

impl Inject {
    pub fn new<I, D>(dependencies: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<ServiceId>,
    {
        Self {
            dependencies: dependencies.into_iter().map(Into::into).collect(),
        }
    }

    pub fn single(dependency: impl Into<ServiceId>) -> Self {
        Self {
            dependencies: vec![dependency.into()],
        }
    }

    pub fn dependencies(&self) -> &[ServiceId] {
        &self.dependencies
    }

    pub fn into_dependencies(self) -> Vec<ServiceId> {
        self.dependencies
    }

    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }
}

impl Annotation for Inject {
    fn name(&self) -> &str {
        INJECT
    }

    fn targets(&self) -> &'static [Target] {
        &[Target::Class]
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl From<&str> for Inject {
    fn from(dependency: &str) -> Self {
        Inject::single(dependency)
    }
}

impl From<ServiceId> for Inject {
    fn from(dependency: ServiceId) -> Self {
        Inject::single(dependency)
    }
}

impl From<Vec<ServiceId>> for Inject {
    fn from(dependencies: Vec<ServiceId>) -> Self {
        Self { dependencies }
    }
}

impl<const N: usize> From<[&str; N]> for Inject {
    fn from(dependencies: [&str; N]) -> Self {
        Inject::new(dependencies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_value_wraps_into_list() {
        let inject = Inject::from("Wheels");
        assert_eq!(inject.len(), 1);
        assert_eq!(inject.dependencies()[0].describe(), "Wheels");
    }

    #[test]
    fn list_keeps_declaration_order() {
        let inject = Inject::from(["X", "Y", "Z"]);
        let names: Vec<_> = inject.dependencies().iter().map(ServiceId::describe).collect();
        assert_eq!(names, ["X", "Y", "Z"]);
    }

    #[test]
    fn class_only() {
        assert_eq!(Inject::default().targets(), &[Target::Class]);
    }
}
