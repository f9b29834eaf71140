//! Boot phases
//!
//! Phases are totally ordered: every component of one phase completes
//! before any component of the next phase starts.

use std::fmt;

/// One of the five initialization stages, declared in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Global constructors and the C++ runtime
    CppInit,
    /// Bootstrap processor bring-up
    ProcessorEarly,
    /// Physical and virtual memory management
    MemoryManagement,
    /// Timers, interrupt controllers and other core devices
    CoreDevices,
    /// Application processor start-up
    SmpBringup,
}

impl Phase {
    /// All phases in precedence order
    pub const ALL: [Phase; 5] = [
        Phase::CppInit,
        Phase::ProcessorEarly,
        Phase::MemoryManagement,
        Phase::CoreDevices,
        Phase::SmpBringup,
    ];

    /// Key used in definition files
    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Phase::CppInit => "cpp_init",
            Phase::ProcessorEarly => "processor_early",
            Phase::MemoryManagement => "memory_management",
            Phase::CoreDevices => "core_devices",
            Phase::SmpBringup => "smp_bringup",
        }
    }

    /// Name shown by the kernel when the phase starts
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Phase::CppInit => "C++ Initialization",
            Phase::ProcessorEarly => "Early Processor Bringup",
            Phase::MemoryManagement => "Memory Management",
            Phase::CoreDevices => "Core Devices",
            Phase::SmpBringup => "SMP Bringup",
        }
    }

    /// Parse a definition-file key
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|phase| phase.key() == key)
    }

    /// Whether components of this phase finish before application processors start
    #[inline]
    #[must_use]
    pub fn precedes_smp(self) -> bool {
        self < Phase::SmpBringup
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
