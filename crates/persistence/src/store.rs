//! File-backed save and load.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use factory_core::GameProfile;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::codec::{from_slice, serialize};
use crate::StoreError;

/// Write `profile` to `path`, replacing any previous content.
///
/// The document is written to a temporary file next to `path`, synced, then
/// renamed over it, so a failed save leaves the old file untouched. Missing
/// parent directories are created.
pub fn save(profile: &GameProfile, path: impl AsRef<Path>) -> Result<(), StoreError> {
    let path = path.as_ref();
    let serialised = serialize(profile)?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|e| StoreError::io(dir, e))?;

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| StoreError::io(dir, e))?;
    tmp.write_all(serialised.as_bytes())
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| StoreError::io(tmp.path(), e))?;
    // temp files are created owner-only; keep whatever the replaced file had
    match fs::metadata(path) {
        Ok(meta) => tmp
            .as_file()
            .set_permissions(meta.permissions())
            .map_err(|e| StoreError::io(tmp.path(), e))?,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(StoreError::io(path, e)),
    }
    tmp.persist(path).map_err(|e| StoreError::io(path, e.error))?;

    debug!(
        path = %path.display(),
        bytes = serialised.len(),
        items = profile.items.len(),
        machines = profile.machines.len(),
        recipes = profile.recipes.len(),
        "profile saved"
    );
    Ok(())
}

/// Read the profile at `path`.
///
/// Returns `Ok(None)` when nothing exists at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Option<GameProfile>, StoreError> {
    let path = path.as_ref();
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no profile at path");
            return Ok(None);
        }
        Err(e) => return Err(StoreError::io(path, e)),
    };
    let profile = from_slice(&bytes).map_err(|e| e.at(path))?;
    debug!(
        path = %path.display(),
        game = %profile.game_name,
        unit = %profile.unit_rate,
        items = profile.items.len(),
        "profile loaded"
    );
    Ok(Some(profile))
}

/// Load the profile at `path`, or build one with `fallback` if none exists.
///
/// Errors other than absence still propagate.
pub fn load_or_default(
    path: impl AsRef<Path>,
    fallback: impl FnOnce() -> GameProfile,
) -> Result<GameProfile, StoreError> {
    let path = path.as_ref();
    match load(path)? {
        Some(profile) => Ok(profile),
        None => {
            info!(path = %path.display(), "no saved profile, using defaults");
            Ok(fallback())
        }
    }
}
