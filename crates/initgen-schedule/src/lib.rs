//! initgen Schedule
//!
//! Dependency resolution and ordering for the kernel init registry.
//!
//! # Core Concepts
//!
//! - [`RegistryValidator`]: checks that span phases
//! - [`PhaseGraph`]: same-phase dependency graph with a deterministic Kahn sort
//! - [`BootPlan`]: per-phase orders, concatenated in phase precedence
//!
//! Ties between components that become ready at the same time are broken
//! by first-seen registry order, never by hash iteration.
//!
//! # Example
//!
//! ```rust,ignore
//! use initgen_schedule::schedule;
//!
//! let plan = schedule(&registry)?;
//! for id in plan.iter() {
//!     println!("{id}");
//! }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod graph;
mod plan;
mod validate;

pub use error::ScheduleError;
pub use graph::PhaseGraph;
pub use plan::{schedule, BootPlan, PhaseOrder};
pub use validate::RegistryValidator;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
