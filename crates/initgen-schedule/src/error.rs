//! Error types for scheduling
//!
//! Any of these means the boot sequence would be unsafe; there is no
//! recovery path and nothing downstream runs.

use initgen_registry::{Capability, ComponentId, Phase, RegistryError};

/// Errors raised while validating and ordering a registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScheduleError {
    /// Capability indexing failed
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// `depends_on` names a component that is not defined (or is disabled)
    #[error("component `{component}` depends on `{dependency}`, which is not defined")]
    UnknownDependency {
        /// Dependent component
        component: ComponentId,
        /// Missing dependency
        dependency: ComponentId,
    },

    /// `depends_on` names a component of another phase
    #[error(
        "component `{component}` in phase {phase} depends on `{dependency}` in phase {dependency_phase}; explicit dependencies must share a phase"
    )]
    CrossPhaseDependency {
        /// Dependent component
        component: ComponentId,
        /// Phase of the dependent
        phase: Phase,
        /// Dependency
        dependency: ComponentId,
        /// Phase of the dependency
        dependency_phase: Phase,
    },

    /// A required component depends on a capability nothing provides
    #[error("required component `{component}` depends on capability `{capability}`, which no component provides")]
    MissingRequiredCapability {
        /// Required component
        component: ComponentId,
        /// Unprovided capability
        capability: Capability,
    },

    /// The same-phase dependency graph cannot be fully ordered
    #[error(
        "dependency cycle in phase {phase} between {}",
        display_ids(.cycle)
    )]
    DependencyCycle {
        /// Phase holding the cycle
        phase: Phase,
        /// Members of one strongly connected component, in first-seen order
        cycle: Vec<ComponentId>,
        /// Every component left unordered (the cycle plus everything behind it)
        unresolved: Vec<ComponentId>,
    },

    /// A capability is still produced after its first consumer ran
    #[error(
        "capability `{capability}` is provided by `{provider}` in phase {provider_phase}, after its first use by `{consumer}` in phase {consumer_phase}"
    )]
    CapabilityOrdering {
        /// Capability
        capability: Capability,
        /// Latest provider
        provider: ComponentId,
        /// Phase of the latest provider
        provider_phase: Phase,
        /// Earliest consumer
        consumer: ComponentId,
        /// Phase of the earliest consumer
        consumer_phase: Phase,
    },

    /// AP-only dependency not initialized globally before other CPUs start
    #[error(
        "component `{component}` specifies AP-specific dependency on capability `{capability}`, which is not globally initialized before SMP bringup"
    )]
    UnsatisfiedApDependency {
        /// Per-CPU component
        component: ComponentId,
        /// Capability
        capability: Capability,
    },
}

impl ScheduleError {
    /// Whether this is a dependency cycle
    #[inline]
    #[must_use]
    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::DependencyCycle { .. })
    }

    /// Component the error is reported against
    #[must_use]
    pub fn component(&self) -> Option<&ComponentId> {
        match self {
            Self::Registry(e) => Some(e.component()),
            Self::UnknownDependency { component, .. }
            | Self::CrossPhaseDependency { component, .. }
            | Self::MissingRequiredCapability { component, .. }
            | Self::UnsatisfiedApDependency { component, .. } => Some(component),
            Self::CapabilityOrdering { provider, .. } => Some(provider),
            Self::DependencyCycle { cycle, .. } => cycle.first(),
        }
    }
}

fn display_ids(ids: &[ComponentId]) -> String {
    ids.iter()
        .map(|id| format!("`{id}`"))
        .collect::<Vec<_>>()
        .join(", ")
}
