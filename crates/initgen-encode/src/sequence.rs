//! Flattened boot sequence
//!
//! The per-phase orders are concatenated with a marker opening each phase.
//! One forward pass threads the "AP id available" latch: once a component
//! providing `logical_cpu_id` has been emitted, every later entry (markers
//! included) carries [`EntryFlags::AP_ID_AVAILABLE`]. The providing entry
//! itself does not.

use crate::flags::EntryFlags;
use initgen_registry::{Component, ComponentId, LoggingImportance, Phase, Registry, Routine};
use initgen_schedule::BootPlan;
use tracing::debug;

/// Importance of the synthetic phase markers
pub const PHASE_MARKER_IMPORTANCE: LoggingImportance = LoggingImportance::Important;

/// What a table entry stands for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    /// Opens a phase; has no routines
    PhaseMarker(Phase),
    /// A real component
    Component {
        /// Registry key
        id: ComponentId,
        /// Routine run on the bootstrap processor
        bootstrap: Routine,
        /// Routine run on application processors
        ap: Routine,
    },
}

/// One entry of the generated table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceEntry {
    /// Name printed by the kernel
    pub name: String,
    /// Marker or component
    pub kind: EntryKind,
    /// Computed flags, latch included
    pub flags: EntryFlags,
    /// Reporting level
    pub logging_importance: LoggingImportance,
}

impl SequenceEntry {
    fn marker(phase: Phase) -> Self {
        Self {
            name: phase.display_name().to_string(),
            kind: EntryKind::PhaseMarker(phase),
            flags: EntryFlags::PHASE_MARKER,
            logging_importance: PHASE_MARKER_IMPORTANCE,
        }
    }

    fn component(component: &Component) -> Self {
        let mut flags = EntryFlags::empty();
        flags.set(EntryFlags::REQUIRED, component.required);
        flags.set(EntryFlags::PER_CPU, component.is_per_cpu());
        Self {
            name: component.display_name.clone(),
            kind: EntryKind::Component {
                id: component.id.clone(),
                bootstrap: component.routines.bootstrap().clone(),
                ap: component.routines.ap().clone(),
            },
            flags,
            logging_importance: component.logging_importance,
        }
    }

    /// Whether this is a phase marker
    #[inline]
    #[must_use]
    pub fn is_phase_marker(&self) -> bool {
        matches!(self.kind, EntryKind::PhaseMarker(_))
    }

    /// Bootstrap and AP routines, `None` for markers
    #[must_use]
    pub fn routines(&self) -> Option<(&Routine, &Routine)> {
        match &self.kind {
            EntryKind::PhaseMarker(_) => None,
            EntryKind::Component { bootstrap, ap, .. } => Some((bootstrap, ap)),
        }
    }
}

/// Flatten `plan` into table entries with their final flags
///
/// Identifiers in `plan` that `registry` does not know are skipped; a plan
/// scheduled from the same registry never has any.
#[must_use]
pub fn flatten(plan: &BootPlan, registry: &Registry) -> Vec<SequenceEntry> {
    let entries = plan.phases().iter().flat_map(move |order| {
        let marker = (SequenceEntry::marker(order.phase), false);
        let components = order
            .components
            .iter()
            .filter_map(move |id| registry.get(id.as_str()))
            .map(|c| (SequenceEntry::component(c), c.provides_logical_cpu_id()));
        std::iter::once(marker).chain(components)
    });

    let sequence: Vec<SequenceEntry> = entries
        .scan(false, |ap_id_available, (mut entry, provides_id)| {
            if *ap_id_available {
                entry.flags |= EntryFlags::AP_ID_AVAILABLE;
            }
            if provides_id {
                *ap_id_available = true;
            }
            Some(entry)
        })
        .collect();

    debug!(
        entries = sequence.len(),
        ap_id_from = sequence
            .iter()
            .position(|e| e.flags.contains(EntryFlags::AP_ID_AVAILABLE)),
        "boot sequence flattened"
    );
    sequence
}
