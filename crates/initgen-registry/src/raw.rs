//! Raw definition records and their normalization
//!
//! A record arrives as an order-preserving key/value table. It is checked
//! for its key set, deserialized into [`RawComponent`] and then normalized
//! into the canonical [`Component`] shape: routine fields unified, logging
//! importance defaulted, list fields de-duplicated.

use crate::component::{Capability, Component, ComponentId, LoggingImportance, Routine, Routines};
use crate::error::MalformedReason;
use crate::phase::Phase;
use indexmap::IndexSet;
use serde::Deserialize;

/// Keys every record must carry
pub const REQUIRED_KEYS: [&str; 4] = ["name", "required", "per_cpu", "phase"];

/// Keys a record may carry in addition to [`REQUIRED_KEYS`]
pub const OPTIONAL_KEYS: [&str; 9] = [
    "routine",
    "bootstrap_routine",
    "ap_routine",
    "provides_capabilities",
    "depends_on",
    "depends_on_capabilities",
    "ap_depends_on_capabilities",
    "logging_importance",
    "disabled",
];

/// Typed view of a definition record before normalization
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawComponent {
    /// Display name
    pub name: String,
    /// Required flag
    pub required: bool,
    /// Per-CPU flag
    pub per_cpu: bool,
    /// Phase key
    pub phase: String,
    /// Single routine (global, or per-CPU shorthand)
    #[serde(default)]
    pub routine: Option<String>,
    /// Bootstrap processor routine
    #[serde(default)]
    pub bootstrap_routine: Option<String>,
    /// Application processor routine
    #[serde(default)]
    pub ap_routine: Option<String>,
    /// Provided capabilities
    #[serde(default)]
    pub provides_capabilities: Vec<String>,
    /// Explicit same-phase dependencies
    #[serde(default)]
    pub depends_on: Vec<String>,
    /// Capability dependencies
    #[serde(default)]
    pub depends_on_capabilities: Vec<String>,
    /// AP-only capability dependencies; presence matters, not just contents
    #[serde(default)]
    pub ap_depends_on_capabilities: Option<Vec<String>>,
    /// Logging importance key
    #[serde(default)]
    pub logging_importance: Option<String>,
    /// Disabled records are skipped by the loader before they get here
    #[serde(default)]
    pub disabled: bool,
}

impl RawComponent {
    /// Check the key set of `table` and deserialize it
    ///
    /// # Errors
    /// Missing required keys, unknown keys, then field type errors, in that order.
    pub fn from_table(table: &toml::Table) -> Result<Self, MalformedReason> {
        let missing: Vec<String> = REQUIRED_KEYS
            .iter()
            .filter(|key| !table.contains_key(**key))
            .map(ToString::to_string)
            .collect();
        if !missing.is_empty() {
            return Err(MalformedReason::MissingKeys(missing));
        }

        let unknown: Vec<String> = table
            .keys()
            .filter(|key| !REQUIRED_KEYS.contains(&key.as_str()) && !OPTIONAL_KEYS.contains(&key.as_str()))
            .cloned()
            .collect();
        if !unknown.is_empty() {
            return Err(MalformedReason::UnknownKeys(unknown));
        }

        toml::Value::Table(table.clone())
            .try_into()
            .map_err(|e: toml::de::Error| MalformedReason::InvalidField(e.message().to_string()))
    }

    /// Produce the canonical component shape
    ///
    /// # Errors
    /// Returns the first rule the record violates.
    pub fn normalize(self, id: &str) -> Result<Component, MalformedReason> {
        let (bootstrap, ap) = self.routine_pair()?;

        let phase = Phase::from_key(&self.phase)
            .ok_or_else(|| MalformedReason::InvalidPhase(self.phase.clone()))?;

        let logging_importance = match &self.logging_importance {
            None => LoggingImportance::default(),
            Some(key) => LoggingImportance::from_key(key)
                .ok_or_else(|| MalformedReason::InvalidLoggingImportance(key.clone()))?,
        };

        if !self.per_cpu && self.ap_depends_on_capabilities.is_some() {
            return Err(MalformedReason::ApDependenciesOnGlobal);
        }

        let bootstrap = parse_routine(&bootstrap)?;
        let routines = if self.per_cpu {
            Routines::PerCpu {
                bootstrap,
                ap: parse_routine(&ap)?,
            }
        } else {
            Routines::Global(bootstrap)
        };

        Ok(Component {
            id: ComponentId::new(id),
            display_name: self.name,
            required: self.required,
            phase,
            routines,
            provides_capabilities: dedup(self.provides_capabilities, Capability),
            depends_on: dedup(self.depends_on, ComponentId),
            depends_on_capabilities: dedup(self.depends_on_capabilities, Capability),
            ap_depends_on_capabilities: dedup(
                self.ap_depends_on_capabilities.unwrap_or_default(),
                Capability,
            ),
            logging_importance,
        })
    }

    /// Unify the routine fields into a (bootstrap, ap) pair of references
    fn routine_pair(&self) -> Result<(String, String), MalformedReason> {
        let specific = self.bootstrap_routine.is_some() || self.ap_routine.is_some();
        match (&self.routine, specific) {
            (Some(_), true) => Err(MalformedReason::AmbiguousRoutines),
            (Some(routine), false) => Ok((routine.clone(), routine.clone())),
            (None, _) if !self.per_cpu => Err(MalformedReason::GlobalMissingRoutine),
            (None, _) => match (&self.bootstrap_routine, &self.ap_routine) {
                (Some(bootstrap), Some(ap)) => Ok((bootstrap.clone(), ap.clone())),
                _ => Err(MalformedReason::PerCpuMissingRoutine),
            },
        }
    }
}

fn parse_routine(reference: &str) -> Result<Routine, MalformedReason> {
    Routine::parse(reference).ok_or_else(|| MalformedReason::InvalidRoutine(reference.to_string()))
}

fn dedup<T>(values: Vec<String>, wrap: fn(String) -> T) -> Vec<T> {
    values
        .into_iter()
        .collect::<IndexSet<_>>()
        .into_iter()
        .map(wrap)
        .collect()
}
