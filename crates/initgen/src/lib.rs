//! initgen
//!
//! Ahead-of-time compiler for the kernel initialization registry. Merges
//! component definitions, validates them as a whole, orders every phase and
//! renders the C++ table the kernel walks at boot.
//!
//! # Pipeline
//!
//! 1. [`Registry::load`]: merge and normalize definition sources
//! 2. [`schedule`]: capability index, registry-wide validation, per-phase sort
//! 3. [`flatten`]: phase markers and the "AP id available" latch
//! 4. [`render`]: the generated translation unit
//!
//! Any failure stops the pipeline; nothing partial is produced.
//!
//! # Example
//!
//! ```rust,ignore
//! use initgen::{generate, read_sources, EncoderConfig};
//!
//! let sources = read_sources(&["kernel/init.toml", "drivers/init.toml"])?;
//! let text = generate(&sources, &EncoderConfig::default())?;
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

mod error;
mod files;

pub use error::GenerateError;
pub use files::{read_config, read_sources, write_atomic};
pub use initgen_encode::{flatten, render, EncoderConfig, SequenceEntry};
pub use initgen_registry::{DefinitionSource, Registry};
pub use initgen_schedule::{schedule, BootPlan};

use tracing::info;

/// Run the whole pipeline over parsed sources
///
/// # Errors
/// The first loading, validation or ordering failure.
pub fn generate(
    sources: &[DefinitionSource],
    config: &EncoderConfig,
) -> Result<String, GenerateError> {
    let registry = Registry::load(sources)?;
    let plan = schedule(&registry)?;
    let entries = flatten(&plan, &registry);
    let text = render(&entries, config);
    info!(
        sources = sources.len(),
        components = plan.len(),
        entries = entries.len(),
        "init table generated"
    );
    Ok(text)
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
