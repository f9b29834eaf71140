//! Boot plan
//!
//! The validated result of scheduling: one linear order per phase, in
//! phase precedence. Consumers only ever read the concatenation.

use crate::error::ScheduleError;
use crate::graph::PhaseGraph;
use crate::validate::RegistryValidator;
use initgen_registry::{CapabilityIndex, ComponentId, Phase, Registry};
use tracing::{debug, info};

/// Ordered components of one phase
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseOrder {
    /// Phase
    pub phase: Phase,
    /// Components in execution order
    pub components: Vec<ComponentId>,
}

/// Execution order for every phase
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BootPlan {
    phases: Vec<PhaseOrder>,
}

impl BootPlan {
    /// Per-phase orders, one per [`Phase::ALL`] entry
    #[inline]
    #[must_use]
    pub fn phases(&self) -> &[PhaseOrder] {
        &self.phases
    }

    /// Order of a single phase
    #[must_use]
    pub fn phase(&self, phase: Phase) -> &[ComponentId] {
        self.phases
            .iter()
            .find(|order| order.phase == phase)
            .map_or(&[], |order| order.components.as_slice())
    }

    /// Every component in global execution order
    pub fn iter(&self) -> impl Iterator<Item = &ComponentId> {
        self.phases.iter().flat_map(|order| order.components.iter())
    }

    /// Global position of `id`
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.iter().position(|c| c.as_str() == id)
    }

    /// Number of scheduled components
    #[must_use]
    pub fn len(&self) -> usize {
        self.phases.iter().map(|order| order.components.len()).sum()
    }

    /// Whether nothing is scheduled
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Validate `registry` and order every phase
///
/// Runs capability indexing, the registry-wide validators and then one
/// topological sort per phase, stopping at the first failure.
///
/// # Errors
/// The first [`ScheduleError`] raised by any stage.
pub fn schedule(registry: &Registry) -> Result<BootPlan, ScheduleError> {
    let capabilities = CapabilityIndex::build(registry)?;
    RegistryValidator::new(registry, &capabilities).validate_all()?;

    let mut phases = Vec::with_capacity(Phase::ALL.len());
    for phase in Phase::ALL {
        let components = PhaseGraph::build(registry, &capabilities, phase)?.sort()?;
        debug!(
            phase = %phase,
            order = ?components.iter().map(ComponentId::as_str).collect::<Vec<_>>(),
            "phase ordered"
        );
        phases.push(PhaseOrder { phase, components });
    }

    let plan = BootPlan { phases };
    info!(components = plan.len(), "boot plan scheduled");
    Ok(plan)
}
