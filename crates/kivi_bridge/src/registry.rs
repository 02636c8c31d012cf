//! Process-wide registry of named instances.

use crate::error::BridgeResult;
use crate::instance::{InstanceConfig, StoreInstance};
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

static GLOBAL: Lazy<Registry> = Lazy::new(Registry::new);

/// A map from instance identifier to its live handle.
///
/// The registry guarantees at most one open instance per identifier within
/// it: repeated lookups with the same identifier share a handle instead of
/// contending for the same on-disk store. Dropping an identifier out of the
/// registry releases the registry's reference; the instance is destroyed
/// when the last outstanding handle goes away.
#[derive(Debug, Default)]
pub struct Registry {
    instances: RwLock<HashMap<String, Arc<StoreInstance>>>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    #[must_use]
    pub fn global() -> &'static Registry {
        &GLOBAL
    }

    /// Returns the instance registered under `id`, if any.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Arc<StoreInstance>> {
        self.instances.read().get(id).cloned()
    }

    /// Returns the open instance for the configuration's identifier,
    /// creating it if absent.
    ///
    /// A registered instance that has been destroyed in the meantime is
    /// replaced, not returned.
    pub fn get_or_create(&self, config: InstanceConfig) -> BridgeResult<Arc<StoreInstance>> {
        let mut instances = self.instances.write();
        if let Some(existing) = instances.get(&config.id) {
            if existing.is_open() {
                return Ok(Arc::clone(existing));
            }
            debug!(id = %config.id, "replacing closed instance");
        }
        let instance = Arc::new(StoreInstance::create(config)?);
        instances.insert(instance.id().to_string(), Arc::clone(&instance));
        Ok(instance)
    }

    /// Unregisters an identifier, returning the handle if it was present.
    pub fn remove(&self, id: &str) -> Option<Arc<StoreInstance>> {
        self.instances.write().remove(id)
    }

    /// Returns the identifiers currently registered.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.instances.read().keys().cloned().collect()
    }

    /// Number of registered instances.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instances.read().len()
    }

    /// Returns true if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instances.read().is_empty()
    }
}
