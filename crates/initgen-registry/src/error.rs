//! Error types for registry assembly
//!
//! Every variant identifies the offending component (and the definition
//! source it came from) so a failed build points straight at the record
//! that needs fixing.

use crate::component::{Capability, ComponentId};

/// Errors raised while merging definition sources into a registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    /// The same component identifier was defined twice across the merged sources
    #[error("component `{id}` from {origin} is already defined (first defined in {first_origin})")]
    DuplicateComponent {
        /// Component identifier
        id: ComponentId,
        /// Source that attempted the second definition
        origin: String,
        /// Source holding the first definition
        first_origin: String,
    },

    /// A record failed schema validation or normalization
    #[error("component `{id}` in {origin} is malformed: {reason}")]
    MalformedComponent {
        /// Component identifier
        id: ComponentId,
        /// Source the record came from
        origin: String,
        /// What is wrong with the record
        reason: MalformedReason,
    },

    /// A capability that must be unique has more than one provider
    #[error("capability `{capability}` is provided by both `{first}` and `{second}`, but must be unique")]
    NonUniqueCapability {
        /// The unique capability
        capability: Capability,
        /// Provider seen first
        first: ComponentId,
        /// Provider that broke uniqueness
        second: ComponentId,
    },
}

impl RegistryError {
    /// Identifier of the component the error is about
    #[must_use]
    pub fn component(&self) -> &ComponentId {
        match self {
            Self::DuplicateComponent { id, .. } | Self::MalformedComponent { id, .. } => id,
            Self::NonUniqueCapability { second, .. } => second,
        }
    }

    /// Reason attached to a malformed record, if this is one
    #[must_use]
    pub fn malformed_reason(&self) -> Option<&MalformedReason> {
        match self {
            Self::MalformedComponent { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Why a single record was rejected during normalization
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedReason {
    /// The entry is not a key/value record
    #[error("definition is not a table")]
    NotATable,

    /// One or more of the required keys is absent
    #[error("missing required keys: {}", .0.join(", "))]
    MissingKeys(Vec<String>),

    /// Keys outside the recognized set
    #[error("invalid keys: {}", .0.join(", "))]
    UnknownKeys(Vec<String>),

    /// A recognized key holds a value of the wrong shape
    #[error("invalid field value: {0}")]
    InvalidField(String),

    /// Global component without `routine`
    #[error("global component is missing `routine`")]
    GlobalMissingRoutine,

    /// Per-CPU component without a usable routine pair
    #[error("per-cpu component is missing its bootstrap or ap routine")]
    PerCpuMissingRoutine,

    /// `routine` given together with a bootstrap/AP specific routine
    #[error("ambiguous routines: `routine` cannot be combined with `bootstrap_routine` or `ap_routine`")]
    AmbiguousRoutines,

    /// Routine reference is not a qualified identifier
    #[error("invalid routine reference `{0}`")]
    InvalidRoutine(String),

    /// Unknown phase key
    #[error("invalid phase `{0}`")]
    InvalidPhase(String),

    /// Unknown logging importance
    #[error("invalid logging importance `{0}`")]
    InvalidLoggingImportance(String),

    /// `ap_depends_on_capabilities` on a component that has no AP side
    #[error("global component specifies AP-specific capability dependencies")]
    ApDependenciesOnGlobal,
}
