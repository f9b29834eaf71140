//! Capability index
//!
//! Maps each capability to the components that provide it, in first-seen
//! order. Built once per run and read-only afterwards.

use crate::component::{Capability, ComponentId};
use crate::error::RegistryError;
use crate::loader::Registry;
use indexmap::IndexMap;
use tracing::debug;

/// Providers by capability
#[derive(Debug, Clone, Default)]
pub struct CapabilityIndex {
    providers: IndexMap<Capability, Vec<ComponentId>>,
}

impl CapabilityIndex {
    /// Index every provided capability in `registry`
    ///
    /// # Errors
    /// Returns [`RegistryError::NonUniqueCapability`] when a unique
    /// capability gains a second provider.
    pub fn build(registry: &Registry) -> Result<Self, RegistryError> {
        let mut providers: IndexMap<Capability, Vec<ComponentId>> = IndexMap::new();

        for component in registry.iter() {
            for capability in &component.provides_capabilities {
                let entry = providers.entry(capability.clone()).or_default();
                if capability.is_unique() {
                    if let Some(first) = entry.first() {
                        return Err(RegistryError::NonUniqueCapability {
                            capability: capability.clone(),
                            first: first.clone(),
                            second: component.id.clone(),
                        });
                    }
                }
                entry.push(component.id.clone());
            }
        }

        debug!(capabilities = providers.len(), "capability index built");
        Ok(Self { providers })
    }

    /// Providers of `capability`, empty when nothing provides it
    #[must_use]
    pub fn providers(&self, capability: &str) -> &[ComponentId] {
        self.providers.get(capability).map_or(&[], Vec::as_slice)
    }

    /// Whether anything provides `capability`
    #[inline]
    #[must_use]
    pub fn contains(&self, capability: &str) -> bool {
        self.providers.contains_key(capability)
    }

    /// All capabilities with their providers, in first-provided order
    pub fn iter(&self) -> impl Iterator<Item = (&Capability, &[ComponentId])> {
        self.providers.iter().map(|(c, p)| (c, p.as_slice()))
    }

    /// Number of distinct provided capabilities
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Whether no capability is provided
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
