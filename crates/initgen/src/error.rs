//! Pipeline errors

use initgen_registry::RegistryError;
use initgen_schedule::ScheduleError;
use std::path::PathBuf;

/// Errors raised while generating the init table
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// Loading or indexing the registry failed
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Validation or ordering failed
    #[error(transparent)]
    Schedule(#[from] ScheduleError),

    /// A file could not be read or written
    #[error("{}: {source}", path.display())]
    Io {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A definition or configuration file is not valid TOML for its purpose
    #[error("{}: {source}", path.display())]
    Parse {
        /// File involved
        path: PathBuf,
        /// Underlying error
        #[source]
        source: toml::de::Error,
    },
}

impl GenerateError {
    /// Whether the failure came from validating the registry rather than from I/O
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Registry(_) | Self::Schedule(_))
    }
}
