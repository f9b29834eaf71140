//! Registry loader
//!
//! Merges definition sources into one namespace. Sources are processed in
//! the given order and records in each source's own order; that first-seen
//! order is kept and later serves as the scheduling tie-break.

use crate::component::{Component, ComponentId};
use crate::error::{MalformedReason, RegistryError};
use crate::phase::Phase;
use crate::raw::RawComponent;
use indexmap::IndexMap;
use tracing::{debug, info};

/// One already-parsed definition source
#[derive(Debug, Clone, Default)]
pub struct DefinitionSource {
    /// Label used in diagnostics, usually the file path
    pub origin: String,
    /// Component records keyed by component identifier, in document order
    pub table: toml::Table,
}

impl DefinitionSource {
    /// Wrap a parsed table
    #[must_use]
    pub fn new(origin: impl Into<String>, table: toml::Table) -> Self {
        Self {
            origin: origin.into(),
            table,
        }
    }
}

/// The merged, normalized set of enabled components
#[derive(Debug, Clone, Default)]
pub struct Registry {
    components: IndexMap<ComponentId, Component>,
    origins: IndexMap<ComponentId, String>,
}

impl Registry {
    /// Merge `sources` in order
    ///
    /// # Errors
    /// Fails on the first duplicate identifier or malformed record. Disabled
    /// records are skipped before either check.
    pub fn load<'a, I>(sources: I) -> Result<Self, RegistryError>
    where
        I: IntoIterator<Item = &'a DefinitionSource>,
    {
        let mut registry = Self::default();
        let mut skipped = 0usize;

        for source in sources {
            for (id, value) in &source.table {
                if registry.load_record(source, id, value)? {
                    continue;
                }
                skipped += 1;
            }
        }

        info!(
            components = registry.len(),
            disabled = skipped,
            "component registry loaded"
        );
        Ok(registry)
    }

    /// Returns `false` when the record was disabled and skipped
    fn load_record(
        &mut self,
        source: &DefinitionSource,
        id: &str,
        value: &toml::Value,
    ) -> Result<bool, RegistryError> {
        let malformed = |reason| RegistryError::MalformedComponent {
            id: ComponentId::new(id),
            origin: source.origin.clone(),
            reason,
        };

        let table = value
            .as_table()
            .ok_or_else(|| malformed(MalformedReason::NotATable))?;

        match table.get("disabled") {
            Some(toml::Value::Boolean(true)) => {
                debug!(component = id, origin = %source.origin, "skipping disabled component");
                return Ok(false);
            }
            Some(toml::Value::Boolean(false)) | None => {}
            Some(other) => {
                return Err(malformed(MalformedReason::InvalidField(format!(
                    "`disabled` must be a boolean, found {}",
                    other.type_str()
                ))));
            }
        }

        if let Some(first_origin) = self.origins.get(id) {
            return Err(RegistryError::DuplicateComponent {
                id: ComponentId::new(id),
                origin: source.origin.clone(),
                first_origin: first_origin.clone(),
            });
        }

        let component = RawComponent::from_table(table)
            .and_then(|raw| raw.normalize(id))
            .map_err(malformed)?;

        debug!(
            component = id,
            phase = %component.phase,
            per_cpu = component.is_per_cpu(),
            "loaded component"
        );
        self.origins
            .insert(component.id.clone(), source.origin.clone());
        self.components.insert(component.id.clone(), component);
        Ok(true)
    }

    /// Look up a component
    #[inline]
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    /// Whether `id` names a loaded component
    #[inline]
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.components.contains_key(id)
    }

    /// First-seen position of `id`
    #[inline]
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.components.get_index_of(id)
    }

    /// Source a component was loaded from
    #[must_use]
    pub fn origin(&self, id: &str) -> Option<&str> {
        self.origins.get(id).map(String::as_str)
    }

    /// All components in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.components.values()
    }

    /// Components of `phase` with their first-seen positions
    pub fn in_phase(&self, phase: Phase) -> impl Iterator<Item = (usize, &Component)> {
        self.components
            .values()
            .enumerate()
            .filter(move |(_, c)| c.phase == phase)
    }

    /// Number of enabled components
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether no component is enabled
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(origin: &str, text: &str) -> DefinitionSource {
        DefinitionSource::new(origin, text.parse().unwrap())
    }

    const CORE: &str = r#"
        [gdt]
        name = "GDT"
        required = true
        per_cpu = true
        phase = "processor_early"
        routine = "arch::load_gdt"

        [heap]
        name = "Kernel heap"
        required = true
        per_cpu = false
        phase = "memory_management"
        routine = "kernel::mm::init_heap"
    "#;

    #[test]
    fn preserves_first_seen_order_across_sources() {
        let extra = source(
            "extra.toml",
            r#"
            [serial]
            name = "Serial"
            required = false
            per_cpu = false
            phase = "cpp_init"
            routine = "serial_init"
            "#,
        );
        let registry = Registry::load(&[source("core.toml", CORE), extra]).unwrap();

        let ids: Vec<_> = registry.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["gdt", "heap", "serial"]);
        assert_eq!(registry.position("serial"), Some(2));
        assert_eq!(registry.origin("heap"), Some("core.toml"));
    }

    #[test]
    fn duplicate_across_sources_is_rejected() {
        let err = Registry::load(&[source("a.toml", CORE), source("b.toml", CORE)]).unwrap_err();
        assert_eq!(
            err,
            RegistryError::DuplicateComponent {
                id: ComponentId::new("gdt"),
                origin: "b.toml".into(),
                first_origin: "a.toml".into(),
            }
        );
    }

    #[test]
    fn disabled_records_are_invisible() {
        let disabled = source(
            "b.toml",
            r#"
            [gdt]
            disabled = true
            name = "GDT (legacy)"
            "#,
        );
        let registry = Registry::load(&[source("a.toml", CORE), disabled]).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("gdt").unwrap().display_name, "GDT");
    }

    #[test]
    fn non_table_entry_is_malformed() {
        let err = Registry::load(&[source("a.toml", "gdt = 3")]).unwrap_err();
        assert_eq!(err.malformed_reason(), Some(&MalformedReason::NotATable));
        assert_eq!(err.component().as_str(), "gdt");
    }

    #[test]
    fn in_phase_reports_registry_positions() {
        let registry = Registry::load(&[source("core.toml", CORE)]).unwrap();
        let early: Vec<_> = registry
            .in_phase(Phase::MemoryManagement)
            .map(|(i, c)| (i, c.id.as_str()))
            .collect();
        assert_eq!(early, [(1, "heap")]);
    }
}
