//! initgen Registry
//!
//! Assembles the kernel initialization registry from already-parsed
//! definition sources.
//!
//! # Core Concepts
//!
//! - [`DefinitionSource`]: one parsed definition file
//! - [`Registry`]: merged, normalized components in first-seen order
//! - [`Component`]: canonical component shape
//! - [`CapabilityIndex`]: providers by capability
//!
//! # Example
//!
//! ```rust,ignore
//! use initgen_registry::{CapabilityIndex, DefinitionSource, Registry};
//!
//! let source = DefinitionSource::new("core.toml", table);
//! let registry = Registry::load(&[source])?;
//! let capabilities = CapabilityIndex::build(&registry)?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod capability;
mod component;
mod error;
mod loader;
mod phase;
mod raw;

pub use capability::CapabilityIndex;
pub use component::{
    Capability, Component, ComponentId, LoggingImportance, Routine, Routines, LOGICAL_CPU_ID,
    UNIQUE_CAPABILITIES,
};
pub use error::{MalformedReason, RegistryError};
pub use loader::{DefinitionSource, Registry};
pub use phase::Phase;
pub use raw::{RawComponent, OPTIONAL_KEYS, REQUIRED_KEYS};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
