//! Factory strategy: a fresh value on every resolution.

use super::{Definition, DependencyProvider, Resolution, Resolve};
use crate::error::DiResult;
use crate::strategy::Strategy;

/// Constructs a new value each time it is resolved.
///
/// Carries no state of its own beyond the definition; every call resolves the
/// dependencies again (unless the definition caches its arguments) and fires
/// the resolved callback.
#[derive(Debug)]
pub struct FactoryResolver {
    definition: Definition,
}

impl FactoryResolver {
    pub fn new(definition: Definition) -> Self {
        Self { definition }
    }
}

impl Resolve for FactoryResolver {
    fn strategy(&self) -> Strategy {
        Strategy::Factory
    }

    fn definition(&self) -> &Definition {
        &self.definition
    }

    fn resolve(&self, provider: &dyn DependencyProvider) -> DiResult<Resolution> {
        let value = self.definition.construct(provider)?;
        self.definition.notify(&value);
        Ok(Resolution::Fresh(value))
    }
}
