//! Encoder configuration
//!
//! Names of the kernel-side symbols the generated table refers to. The
//! defaults match the kernel's `init.h`.

use serde::Deserialize;

/// Kernel-side names used by the renderer
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncoderConfig {
    /// Header included at the top (`#include <header>`)
    pub header: String,
    /// Namespace holding the table and completion array
    pub namespace: String,
    /// Name of the constant entry table
    pub table_name: String,
    /// Name of the per-entry completion array
    pub completion_array: String,
    /// Element type of the entry table
    pub entry_type: String,
    /// Terminating entry
    pub sentinel: String,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            header: "init.h".to_string(),
            namespace: "kernel::init".to_string(),
            table_name: "init_components".to_string(),
            completion_array: "complete_components".to_string(),
            entry_type: "InitComponent".to_string(),
            sentinel: "END_SENTINEL".to_string(),
        }
    }
}
