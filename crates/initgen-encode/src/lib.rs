//! initgen Encode
//!
//! Turns a scheduled boot plan into the C++ table the kernel iterates at
//! boot.
//!
//! # Core Concepts
//!
//! - [`flatten`]: phase orders to one sequence, with phase markers and the
//!   "AP id available" latch applied
//! - [`EntryFlags`]: per-entry `CF_*` flag set
//! - [`render`]: the generated translation unit
//! - [`EncoderConfig`]: kernel-side symbol names
//!
//! # Example
//!
//! ```rust,ignore
//! use initgen_encode::{flatten, render, EncoderConfig};
//!
//! let entries = flatten(&plan, &registry);
//! let source = render(&entries, &EncoderConfig::default());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod config;
mod flags;
mod render;
mod sequence;

pub use config::EncoderConfig;
pub use flags::EntryFlags;
pub use render::render;
pub use sequence::{flatten, EntryKind, SequenceEntry, PHASE_MARKER_IMPORTANCE};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
