//! File edges of the pipeline
//!
//! Everything that touches the filesystem lives here; the rest of the
//! workspace works on parsed values only.

use crate::error::GenerateError;
use initgen_encode::EncoderConfig;
use initgen_registry::DefinitionSource;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Read and parse definition files, keeping their order
///
/// # Errors
/// The first file that cannot be read or is not a TOML table.
pub fn read_sources<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<DefinitionSource>, GenerateError> {
    paths
        .iter()
        .map(|path| {
            let path = path.as_ref();
            let table: toml::Table = read(path)?
                .parse()
                .map_err(|source| GenerateError::Parse {
                    path: path.to_path_buf(),
                    source,
                })?;
            debug!(path = %path.display(), records = table.len(), "definition file parsed");
            Ok(DefinitionSource::new(path.display().to_string(), table))
        })
        .collect()
}

/// Read an encoder configuration file
///
/// # Errors
/// Unreadable file, invalid TOML or unknown keys.
pub fn read_config(path: &Path) -> Result<EncoderConfig, GenerateError> {
    toml::from_str(&read(path)?).map_err(|source| GenerateError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Replace `path` with `contents` in one step
///
/// The text is written to a temporary file next to `path` and renamed over
/// it, so readers never observe a partial artifact.
///
/// # Errors
/// Any I/O failure; `path` is left untouched.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), GenerateError> {
    let io_error = |source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    };
    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    let mut file = NamedTempFile::new_in(&directory).map_err(io_error)?;
    file.write_all(contents.as_bytes()).map_err(io_error)?;
    file.persist(path).map_err(|e| io_error(e.error))?;
    debug!(path = %path.display(), bytes = contents.len(), "artifact written");
    Ok(())
}

fn read(path: &Path) -> Result<String, GenerateError> {
    fs::read_to_string(path).map_err(|source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    })
}
