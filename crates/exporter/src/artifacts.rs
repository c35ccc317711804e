//! Artifact Writing

use crate::ExportError;
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Serialize a value as pretty JSON and write it atomically: the bytes go
/// to a sibling temp file first, then a rename replaces the target, so an
/// interrupted run never leaves a half-written artifact behind.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, serde_json::to_string_pretty(value)?)?;
    fs::rename(&tmp, path)?;

    debug!("Wrote {}", path.display());
    Ok(())
}
