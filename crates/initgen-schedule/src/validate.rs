//! Registry-wide validation
//!
//! Checks that span phases and cannot be expressed as same-phase graph
//! edges. Runs before any phase is sorted.

use crate::error::ScheduleError;
use indexmap::{IndexMap, IndexSet};
use initgen_registry::{Capability, CapabilityIndex, Component, ComponentId, Phase, Registry};
use tracing::debug;

/// Registry-wide validator
pub struct RegistryValidator<'a> {
    registry: &'a Registry,
    capabilities: &'a CapabilityIndex,
}

/// Phase extreme of a capability and the component that set it
#[derive(Debug, Clone, Copy)]
struct PhaseMark<'a> {
    phase: Phase,
    component: &'a ComponentId,
}

impl<'a> RegistryValidator<'a> {
    /// Create a validator over an indexed registry
    #[must_use]
    pub fn new(registry: &'a Registry, capabilities: &'a CapabilityIndex) -> Self {
        Self {
            registry,
            capabilities,
        }
    }

    /// Run every registry-wide check
    ///
    /// 1. Cross-phase capability ordering
    /// 2. Explicit dependency resolution
    /// 3. Capabilities of required components
    /// 4. AP-only capability dependencies
    ///
    /// # Errors
    /// The first failing check.
    pub fn validate_all(&self) -> Result<(), ScheduleError> {
        self.validate_capability_order()?;
        self.validate_explicit_dependencies()?;
        self.validate_required_capabilities()?;
        self.validate_ap_dependencies()?;
        debug!(components = self.registry.len(), "registry-wide validation passed");
        Ok(())
    }

    /// No capability may be provided in a phase later than its earliest consumer
    ///
    /// # Errors
    /// [`ScheduleError::CapabilityOrdering`]
    pub fn validate_capability_order(&self) -> Result<(), ScheduleError> {
        let mut first_use: IndexMap<&Capability, PhaseMark<'_>> = IndexMap::new();
        let mut last_provided: IndexMap<&Capability, PhaseMark<'_>> = IndexMap::new();

        for component in self.registry.iter() {
            let mark = PhaseMark {
                phase: component.phase,
                component: &component.id,
            };
            for capability in component.consumed_capabilities() {
                let entry = first_use.entry(capability).or_insert(mark);
                if mark.phase < entry.phase {
                    *entry = mark;
                }
            }
            for capability in &component.provides_capabilities {
                let entry = last_provided.entry(capability).or_insert(mark);
                if mark.phase > entry.phase {
                    *entry = mark;
                }
            }
        }

        for (capability, consumer) in &first_use {
            let Some(provider) = last_provided.get(capability) else {
                continue;
            };
            if provider.phase > consumer.phase {
                return Err(ScheduleError::CapabilityOrdering {
                    capability: (*capability).clone(),
                    provider: provider.component.clone(),
                    provider_phase: provider.phase,
                    consumer: consumer.component.clone(),
                    consumer_phase: consumer.phase,
                });
            }
        }
        Ok(())
    }

    /// Every `depends_on` target exists and shares the dependent's phase
    ///
    /// # Errors
    /// [`ScheduleError::UnknownDependency`] or [`ScheduleError::CrossPhaseDependency`]
    pub fn validate_explicit_dependencies(&self) -> Result<(), ScheduleError> {
        for component in self.registry.iter() {
            for dependency in &component.depends_on {
                check_explicit_dependency(self.registry, component, dependency)?;
            }
        }
        Ok(())
    }

    /// Every capability a required component depends on has a provider
    ///
    /// # Errors
    /// [`ScheduleError::MissingRequiredCapability`]
    pub fn validate_required_capabilities(&self) -> Result<(), ScheduleError> {
        for component in self.registry.iter().filter(|c| c.required) {
            if let Some(capability) = component
                .depends_on_capabilities
                .iter()
                .find(|c| !self.capabilities.contains(c.as_str()))
            {
                return Err(ScheduleError::MissingRequiredCapability {
                    component: component.id.clone(),
                    capability: capability.clone(),
                });
            }
        }
        Ok(())
    }

    /// AP-only dependencies resolve to capabilities initialized globally before SMP bringup
    ///
    /// # Errors
    /// [`ScheduleError::UnsatisfiedApDependency`]
    pub fn validate_ap_dependencies(&self) -> Result<(), ScheduleError> {
        let available = self.globally_initialized_capabilities();
        for component in self.registry.iter() {
            if let Some(capability) = component
                .ap_depends_on_capabilities
                .iter()
                .find(|c| !available.contains(*c))
            {
                return Err(ScheduleError::UnsatisfiedApDependency {
                    component: component.id.clone(),
                    capability: capability.clone(),
                });
            }
        }
        Ok(())
    }

    /// Capabilities provided by global components whose phase precedes SMP bringup
    #[must_use]
    pub fn globally_initialized_capabilities(&self) -> IndexSet<&'a Capability> {
        self.registry
            .iter()
            .filter(|c| !c.is_per_cpu() && c.phase.precedes_smp())
            .flat_map(|c| c.provides_capabilities.iter())
            .collect()
    }
}

/// `dependency` names a component in the same phase as `component`
pub(crate) fn check_explicit_dependency(
    registry: &Registry,
    component: &Component,
    dependency: &ComponentId,
) -> Result<(), ScheduleError> {
    match registry.get(dependency.as_str()) {
        None => Err(ScheduleError::UnknownDependency {
            component: component.id.clone(),
            dependency: dependency.clone(),
        }),
        Some(target) if target.phase != component.phase => {
            Err(ScheduleError::CrossPhaseDependency {
                component: component.id.clone(),
                phase: component.phase,
                dependency: dependency.clone(),
                dependency_phase: target.phase,
            })
        }
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use initgen_registry::DefinitionSource;

    fn check(text: &str) -> Result<(), ScheduleError> {
        let registry =
            Registry::load(&[DefinitionSource::new("test.toml", text.parse().unwrap())]).unwrap();
        let index = CapabilityIndex::build(&registry).unwrap();
        RegistryValidator::new(&registry, &index).validate_all()
    }

    #[test]
    fn late_provider_violates_capability_order() {
        let err = check(
            r#"
            [consumer]
            name = "Consumer"
            required = false
            per_cpu = false
            phase = "processor_early"
            routine = "consumer"
            depends_on_capabilities = ["x"]

            [early]
            name = "Early"
            required = false
            per_cpu = false
            phase = "cpp_init"
            routine = "early"
            provides_capabilities = ["x"]

            [late]
            name = "Late"
            required = false
            per_cpu = false
            phase = "smp_bringup"
            routine = "late"
            provides_capabilities = ["x"]
            "#,
        )
        .unwrap_err();

        assert_eq!(
            err,
            ScheduleError::CapabilityOrdering {
                capability: Capability::new("x"),
                provider: ComponentId::new("late"),
                provider_phase: Phase::SmpBringup,
                consumer: ComponentId::new("consumer"),
                consumer_phase: Phase::ProcessorEarly,
            }
        );
    }

    #[test]
    fn ap_consumers_count_for_capability_order() {
        let err = check(
            r#"
            [pcpu]
            name = "Per-CPU"
            required = false
            per_cpu = true
            phase = "processor_early"
            routine = "pcpu"
            ap_depends_on_capabilities = ["x"]

            [provider]
            name = "Provider"
            required = false
            per_cpu = false
            phase = "memory_management"
            routine = "provider"
            provides_capabilities = ["x"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ScheduleError::CapabilityOrdering { .. }));
    }

    #[test]
    fn same_phase_provider_is_not_an_ordering_violation() {
        check(
            r#"
            [b]
            name = "B"
            required = true
            per_cpu = false
            phase = "cpp_init"
            routine = "b"
            depends_on_capabilities = ["x"]

            [a]
            name = "A"
            required = false
            per_cpu = false
            phase = "cpp_init"
            routine = "a"
            provides_capabilities = ["x"]
            "#,
        )
        .unwrap();
    }

    #[test]
    fn unknown_explicit_dependency() {
        let err = check(
            r#"
            [a]
            name = "A"
            required = false
            per_cpu = false
            phase = "cpp_init"
            routine = "a"
            depends_on = ["ghost"]
            "#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::UnknownDependency {
                component: ComponentId::new("a"),
                dependency: ComponentId::new("ghost"),
            }
        );
    }

    #[test]
    fn required_component_needs_provided_capabilities() {
        let err = check(
            r#"
            [a]
            name = "A"
            required = true
            per_cpu = false
            phase = "cpp_init"
            routine = "a"
            depends_on_capabilities = ["missing"]
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ScheduleError::MissingRequiredCapability { .. }));
    }

    #[test]
    fn optional_component_may_depend_on_missing_capability() {
        check(
            r#"
            [a]
            name = "A"
            required = false
            per_cpu = false
            phase = "cpp_init"
            routine = "a"
            depends_on_capabilities = ["missing"]
            "#,
        )
        .unwrap();
    }

    #[test]
    fn ap_dependency_on_per_cpu_provider_is_unsatisfied() {
        let err = check(
            r#"
            [pcpu_provider]
            name = "Per-CPU provider"
            required = false
            per_cpu = true
            phase = "cpp_init"
            routine = "pcpu_provider"
            provides_capabilities = ["x"]

            [consumer]
            name = "Consumer"
            required = false
            per_cpu = true
            phase = "core_devices"
            routine = "consumer"
            ap_depends_on_capabilities = ["x"]
            "#,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ScheduleError::UnsatisfiedApDependency {
                component: ComponentId::new("consumer"),
                capability: Capability::new("x"),
            }
        );
    }

    #[test]
    fn ap_dependency_on_global_provider_before_smp_is_satisfied() {
        check(
            r#"
            [heap]
            name = "Heap"
            required = true
            per_cpu = false
            phase = "memory_management"
            routine = "heap"
            provides_capabilities = ["heap"]

            [scheduler]
            name = "Scheduler"
            required = true
            per_cpu = true
            phase = "smp_bringup"
            routine = "scheduler"
            ap_depends_on_capabilities = ["heap"]
            "#,
        )
        .unwrap();
    }
}
