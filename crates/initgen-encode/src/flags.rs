//! Entry flags
//!
//! Bit values mirror the kernel's `CF_*` constants. The generated table only
//! refers to the constants by name.

use std::fmt;

bitflags::bitflags! {
    /// Flag set carried by one table entry
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct EntryFlags: u8 {
        /// Capability dependencies were checked as mandatory
        const REQUIRED = 1 << 0;
        /// Runs on the bootstrap processor and again on every AP
        const PER_CPU = 1 << 1;
        /// Synthetic entry opening a phase
        const PHASE_MARKER = 1 << 2;
        /// Logical CPU ids may be used from this entry on
        const AP_ID_AVAILABLE = 1 << 3;
    }
}

/// Kernel-side constant names, in bit order
const CONSTANTS: [(EntryFlags, &str); 4] = [
    (EntryFlags::REQUIRED, "CF_REQUIRED"),
    (EntryFlags::PER_CPU, "CF_PER_CPU"),
    (EntryFlags::PHASE_MARKER, "CF_PHASE_MARKER"),
    (EntryFlags::AP_ID_AVAILABLE, "CF_AP_ID_AVAILABLE"),
];

/// Renders as `CF_A | CF_B` in bit order, or `CF_NONE` when empty
impl fmt::Display for EntryFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = CONSTANTS
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name);
        let Some(first) = names.next() else {
            return f.write_str("CF_NONE");
        };
        f.write_str(first)?;
        for name in names {
            write!(f, " | {name}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_renders_none() {
        assert_eq!(EntryFlags::empty().to_string(), "CF_NONE");
    }

    #[test]
    fn flags_render_in_bit_order() {
        let flags = EntryFlags::AP_ID_AVAILABLE | EntryFlags::PER_CPU | EntryFlags::REQUIRED;
        assert_eq!(flags.to_string(), "CF_REQUIRED | CF_PER_CPU | CF_AP_ID_AVAILABLE");
    }

    #[test]
    fn bit_values_match_kernel_header() {
        assert_eq!(EntryFlags::REQUIRED.bits(), 1);
        assert_eq!(EntryFlags::PER_CPU.bits(), 2);
        assert_eq!(EntryFlags::PHASE_MARKER.bits(), 4);
        assert_eq!(EntryFlags::AP_ID_AVAILABLE.bits(), 8);
    }
}
