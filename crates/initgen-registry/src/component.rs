//! Canonical component model
//!
//! Records from definition sources are normalized into [`Component`] before
//! any validation or graph logic sees them.

use crate::phase::Phase;
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Borrow;
use std::fmt;

/// The capability that identifies the current logical CPU
pub const LOGICAL_CPU_ID: &str = "logical_cpu_id";

/// Capabilities that at most one component may provide
pub const UNIQUE_CAPABILITIES: &[&str] = &[LOGICAL_CPU_ID];

/// Registry-wide component identifier (the key of a definition record)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentId(pub String);

impl ComponentId {
    /// Create an identifier
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow as `&str`
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ComponentId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named contract a component satisfies once it completes
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Capability(pub String);

impl Capability {
    /// Create a capability name
    #[inline]
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Borrow as `&str`
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether at most one component may provide this capability
    #[must_use]
    pub fn is_unique(&self) -> bool {
        UNIQUE_CAPABILITIES.contains(&self.0.as_str())
    }
}

impl Borrow<str> for Capability {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static ROUTINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*(::[A-Za-z_][A-Za-z0-9_]*)*$")
        .expect("routine pattern is a valid regex")
});

/// A reference to a kernel routine `bool routine()`, optionally namespace-qualified
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Routine(String);

impl Routine {
    /// Validate a qualified identifier such as `kernel::mm::init`
    #[must_use]
    pub fn parse(reference: &str) -> Option<Self> {
        ROUTINE_PATTERN
            .is_match(reference)
            .then(|| Self(reference.to_string()))
    }

    /// Full reference as written
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Enclosing namespace, `None` for top-level routines
    #[must_use]
    pub fn namespace(&self) -> Option<&str> {
        self.0.rsplit_once("::").map(|(ns, _)| ns)
    }

    /// Unqualified function name
    #[must_use]
    pub fn function(&self) -> &str {
        self.0.rsplit_once("::").map_or(self.0.as_str(), |(_, f)| f)
    }
}

impl fmt::Display for Routine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Entry points of a component
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routines {
    /// Runs exactly once, globally
    Global(Routine),
    /// Runs once on the bootstrap processor and once on every AP
    PerCpu {
        /// Routine for the bootstrap processor
        bootstrap: Routine,
        /// Routine for application processors
        ap: Routine,
    },
}

impl Routines {
    /// Routine run on the bootstrap processor
    #[must_use]
    pub fn bootstrap(&self) -> &Routine {
        match self {
            Routines::Global(routine) => routine,
            Routines::PerCpu { bootstrap, .. } => bootstrap,
        }
    }

    /// Routine run on application processors (the global routine otherwise)
    #[must_use]
    pub fn ap(&self) -> &Routine {
        match self {
            Routines::Global(routine) => routine,
            Routines::PerCpu { ap, .. } => ap,
        }
    }
}

/// Minimum log level at which the kernel reports a component
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LoggingImportance {
    /// Default
    #[default]
    Debug,
    /// Shown at normal verbosity
    Important,
    /// Always shown
    Critical,
    /// Error level
    Error,
}

impl LoggingImportance {
    /// Parse the upper-case spelling used by definition files and the kernel
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "DEBUG" => Some(Self::Debug),
            "IMPORTANT" => Some(Self::Important),
            "CRITICAL" => Some(Self::Critical),
            "ERROR" => Some(Self::Error),
            _ => None,
        }
    }

    /// Enumerator name on the kernel side
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Important => "IMPORTANT",
            Self::Critical => "CRITICAL",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for LoggingImportance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A normalized unit of kernel initialization work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    /// Registry key
    pub id: ComponentId,
    /// Name printed by the kernel
    pub display_name: String,
    /// Capability dependencies must be resolvable
    pub required: bool,
    /// Stage the component runs in
    pub phase: Phase,
    /// Entry points
    pub routines: Routines,
    /// Capabilities satisfied once this component completes
    pub provides_capabilities: Vec<Capability>,
    /// Same-phase components that must complete first
    pub depends_on: Vec<ComponentId>,
    /// Capabilities that must be provided before this component runs
    pub depends_on_capabilities: Vec<Capability>,
    /// Capabilities needed only by the AP routine
    pub ap_depends_on_capabilities: Vec<Capability>,
    /// Reporting level
    pub logging_importance: LoggingImportance,
}

impl Component {
    /// Runs once per logical CPU
    #[inline]
    #[must_use]
    pub fn is_per_cpu(&self) -> bool {
        matches!(self.routines, Routines::PerCpu { .. })
    }

    /// Whether this component provides `capability`
    #[must_use]
    pub fn provides(&self, capability: &str) -> bool {
        self.provides_capabilities
            .iter()
            .any(|c| c.as_str() == capability)
    }

    /// Whether completing this component makes logical CPU ids usable
    #[must_use]
    pub fn provides_logical_cpu_id(&self) -> bool {
        self.provides(LOGICAL_CPU_ID)
    }

    /// Capabilities consumed by either routine, in declaration order
    pub fn consumed_capabilities(&self) -> impl Iterator<Item = &Capability> {
        self.depends_on_capabilities
            .iter()
            .chain(self.ap_depends_on_capabilities.iter())
    }
}
