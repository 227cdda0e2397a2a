//! Instance strategy: a pre-built value returned verbatim.

use std::sync::atomic::{AtomicBool, Ordering};

use super::{Concrete, Definition, DependencyProvider, Resolution, Resolve};
use crate::error::{DiError, DiResult};
use crate::strategy::Strategy;

/// Hands back the registered value on every resolution.
///
/// The first resolution counts as fresh and fires the resolved callback;
/// later ones are reported as cached.
#[derive(Debug)]
pub struct InstanceResolver {
    definition: Definition,
    announced: AtomicBool,
}

impl InstanceResolver {
    /// Fails with [`DiError::InvalidDefinition`] unless the definition holds an instance.
    pub fn new(definition: Definition) -> DiResult<Self> {
        if let Concrete::Type(constructible) = definition.concrete() {
            return Err(DiError::InvalidDefinition(format!(
                "constructible ({})",
                constructible.describe()
            )));
        }
        Ok(Self {
            definition,
            announced: AtomicBool::new(false),
        })
    }
}

impl Resolve for InstanceResolver {
    fn strategy(&self) -> Strategy {
        Strategy::Instance
    }

    fn definition(&self) -> &Definition {
        &self.definition
    }

    fn resolve(&self, provider: &dyn DependencyProvider) -> DiResult<Resolution> {
        let value = self.definition.construct(provider)?;
        if self.announced.swap(true, Ordering::AcqRel) {
            return Ok(Resolution::Cached(value));
        }
        self.definition.notify(&value);
        Ok(Resolution::Fresh(value))
    }
}
