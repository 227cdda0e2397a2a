//! Service registrations and the alias table.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::id::Key;
use crate::resolver::Resolve;
use crate::strategy::Strategy;

/// A resolver stored under a canonical key.
#[derive(Clone)]
pub(crate) struct Registration {
    pub(crate) strategy: Strategy,
    pub(crate) resolver: Arc<dyn Resolve>,
}

impl Registration {
    pub(crate) fn new(resolver: Arc<dyn Resolve>) -> Self {
        Self {
            strategy: resolver.strategy(),
            resolver,
        }
    }
}

/// Canonical key to registration, plus alias to target name.
///
/// A name is never both a service key and an alias: registering a service
/// drops an alias of the same name, and aliasing an existing service key is
/// rejected.
#[derive(Default)]
pub(crate) struct Registry {
    services: HashMap<Key, Registration>,
    aliases: HashMap<Key, Key>,
}

impl Registry {
    /// Inserts or overwrites the registration under `key`.
    pub(crate) fn insert(&mut self, key: Key, registration: Registration) {
        self.aliases.remove(&key);
        self.services.insert(key, registration);
    }

    /// Inserts `registration` and points `aliases` at it in one step. On an
    /// invalid alias the registry is left as it was.
    pub(crate) fn insert_aliased(&mut self, key: Key, registration: Registration, aliases: Vec<Key>) -> DiResult<()> {
        let displaced = self.aliases.get(&key).cloned();
        let previous = self.services.get(&key).cloned();
        self.insert(key.clone(), registration);

        if let Err(err) = self.add_aliases(&key, aliases) {
            match previous {
                Some(previous) => {
                    self.services.insert(key.clone(), previous);
                }
                None => {
                    self.services.remove(&key);
                }
            }
            if let Some(target) = displaced {
                self.aliases.insert(key, target);
            }
            return Err(err);
        }
        Ok(())
    }

    /// Keeps an existing registration, otherwise inserts `registration`.
    pub(crate) fn insert_if_absent(&mut self, key: Key, registration: Registration) -> Registration {
        self.aliases.remove(&key);
        self.services.entry(key).or_insert(registration).clone()
    }

    pub(crate) fn get(&self, key: &Key) -> Option<&Registration> {
        self.services.get(key)
    }

    pub(crate) fn contains(&self, key: &Key) -> bool {
        self.services.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.services.len()
    }

    pub(crate) fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Points every name in `aliases` at `original`.
    ///
    /// The whole batch is validated before anything is inserted. `original`
    /// does not need to exist yet.
    pub(crate) fn add_aliases(&mut self, original: &Key, aliases: Vec<Key>) -> DiResult<()> {
        let mut pending = HashSet::with_capacity(aliases.len());
        for alias in &aliases {
            if alias == original {
                return Err(DiError::InvalidAlias(format!(
                    "Alias \"{}\" cannot point to itself.",
                    alias
                )));
            }
            if self.services.contains_key(alias) || self.aliases.contains_key(alias) || !pending.insert(alias) {
                return Err(DiError::InvalidAlias(format!("Alias \"{}\" already defined.", alias)));
            }
        }

        // Following the chain from `original` must not lead back to a new alias.
        let mut current = original;
        let mut seen = HashSet::new();
        while let Some(next) = self.aliases.get(current) {
            if pending.contains(next) || !seen.insert(next) {
                return Err(DiError::InvalidAlias(format!(
                    "Alias \"{}\" would create a cycle through \"{}\".",
                    next, original
                )));
            }
            current = next;
        }

        for alias in aliases {
            self.aliases.insert(alias, original.clone());
        }
        Ok(())
    }

    /// Follows aliases from `name` to the key it stands for.
    ///
    /// Returns `name` itself when it is not an alias. A chain longer than the
    /// alias table is a cycle.
    pub(crate) fn canonical(&self, name: &Key) -> DiResult<Key> {
        let mut path = vec![name.clone()];
        let mut current = name;
        while let Some(next) = self.aliases.get(current) {
            path.push(next.clone());
            if path.len() > self.aliases.len() + 1 {
                return Err(DiError::Circular(path.into_iter().map(|k| k.to_string()).collect()));
            }
            current = next;
        }
        Ok(current.clone())
    }

    /// Aliases resolving to `name`, directly or through other aliases.
    pub(crate) fn aliases_of(&self, name: &Key) -> Vec<Key> {
        let mut found: Vec<Key> = self
            .aliases
            .keys()
            .filter(|alias| self.canonical(alias).map(|target| &target == name).unwrap_or(false))
            .cloned()
            .collect();
        found.sort();
        found
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Key, &Registration)> {
        self.services.iter()
    }
}
