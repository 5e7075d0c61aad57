//! Snapshot document persistence.
//!
//! The engine never touches the filesystem; this module loads the snapshot
//! before a command and writes the result after it commits.

use std::fs;
use std::io::Write;
use std::path::Path;

use khata_core::Snapshot;
use khata_shared::{AppError, AppResult};
use tempfile::NamedTempFile;
use tracing::debug;

/// Loads the snapshot at `path`; a missing document is an empty snapshot.
pub fn load(path: &Path) -> AppResult<Snapshot> {
    if !path.exists() {
        debug!(path = %path.display(), "Snapshot not found, starting empty");
        return Ok(Snapshot::new());
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Storage(format!("reading {}: {e}", path.display())))?;
    serde_json::from_str(&raw)
        .map_err(|e| AppError::Storage(format!("parsing {}: {e}", path.display())))
}

/// Writes `snapshot` to `path` by replacing the file atomically.
pub fn save(path: &Path, snapshot: &Snapshot) -> AppResult<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let json = serde_json::to_vec_pretty(snapshot)
        .map_err(|e| AppError::Internal(format!("encoding snapshot: {e}")))?;

    let mut file = NamedTempFile::new_in(dir)
        .map_err(|e| AppError::Storage(format!("creating temp file in {}: {e}", dir.display())))?;
    file.write_all(&json)
        .and_then(|()| file.as_file().sync_all())
        .map_err(|e| AppError::Storage(format!("writing {}: {e}", path.display())))?;
    file.persist(path)
        .map_err(|e| AppError::Storage(format!("replacing {}: {e}", path.display())))?;

    debug!(path = %path.display(), version = snapshot.version, "Snapshot saved");
    Ok(())
}
