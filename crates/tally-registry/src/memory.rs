//! In-memory participant registry for testing and embedding.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tally_types::Identity;
use tracing::debug;

use crate::error::{RegistryError, Result};
use crate::names::validate_name;
use crate::person::Person;
use crate::traits::Registry;

/// An in-memory implementation of [`Registry`].
///
/// Person records live in a `HashMap` next to the registration-order list,
/// both behind one `RwLock` so readers always see them in agreement.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    inner: RwLock<RegistryState>,
}

#[derive(Debug, Default)]
struct RegistryState {
    people: HashMap<Identity, Person>,
    order: Vec<Identity>,
}

impl InMemoryRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // Writers validate before touching state, so a poisoned lock still
    // guards a consistent registry.
    fn read(&self) -> RwLockReadGuard<'_, RegistryState> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, RegistryState> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Registry for InMemoryRegistry {
    fn register(&self, identity: Identity, name: &str) -> Result<Person> {
        let name = validate_name(name)?;
        let mut state = self.write();

        if state.people.contains_key(&identity) {
            return Err(RegistryError::AlreadyRegistered { identity });
        }

        let person = Person::registered(identity, name.to_string());
        state.people.insert(identity, person.clone());
        state.order.push(identity);

        debug!(identity = %identity.short_id(), count = state.order.len(), "person registered");
        Ok(person)
    }

    fn update_name(&self, identity: &Identity, new_name: &str) -> Result<Person> {
        let mut state = self.write();
        let person = state
            .people
            .get_mut(identity)
            .ok_or(RegistryError::NotRegistered {
                identity: *identity,
            })?;
        let name = validate_name(new_name)?;

        person.name = name.to_string();
        Ok(person.clone())
    }

    fn lookup(&self, identity: &Identity) -> Person {
        self.read()
            .people
            .get(identity)
            .cloned()
            .unwrap_or_else(|| Person::unregistered(*identity))
    }

    fn count(&self) -> u64 {
        self.read().order.len() as u64
    }

    fn enumerate(&self) -> Vec<Identity> {
        self.read().order.clone()
    }

    fn people(&self) -> Vec<Person> {
        let state = self.read();
        state
            .order
            .iter()
            .filter_map(|id| state.people.get(id).cloned())
            .collect()
    }
}
