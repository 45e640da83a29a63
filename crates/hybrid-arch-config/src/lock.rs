//! Reading and rewriting `skills.lock.json`.
//!
//! Rewrites edit the raw document, so any entry or field this crate cannot
//! interpret is written back as it was read.

use std::path::Path;

use serde_json::Value;

use hybrid_arch_types::SkillLockFile;

use crate::ConfigError;
use crate::loader::{load_json_or_default, path_exists, write_json_atomic};

fn now_rfc3339() -> String {
    chrono::Utc::now().to_rfc3339()
}

fn malformed(path: &Path, reason: impl Into<String>) -> ConfigError {
    ConfigError::MalformedLock {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

/// Read the lock file; missing or malformed files read as empty.
pub async fn read_lock(path: &Path) -> SkillLockFile {
    load_json_or_default(path).await
}

/// Read the lock file ahead of a rewrite.
///
/// A missing file reads as empty. A file that is not a JSON object is an
/// error, so it is never replaced by a fresh document.
pub async fn read_lock_for_update(path: &Path) -> Result<SkillLockFile, ConfigError> {
    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(SkillLockFile::default()),
        Err(e) => return Err(e.into()),
    };
    json5::from_str(&content).map_err(|e| malformed(path, e.to_string()))
}

/// Write the lock file, flattening `{ "version": v }` entries.
pub async fn write_lock(path: &Path, lock: &SkillLockFile) -> Result<(), ConfigError> {
    let mut lock = lock.clone();
    lock.canonicalize();
    write_json_atomic(path, &lock).await
}

/// Set `name` to `version` and refresh `updatedAt`, creating the file if needed.
pub async fn upsert_lock_skill(path: &Path, name: &str, version: &str) -> Result<(), ConfigError> {
    let mut lock = read_lock_for_update(path).await?;
    lock.skills_mut()
        .ok_or_else(|| malformed(path, "\"skills\" is not an object"))?
        .insert(name.to_string(), Value::String(version.to_string()));
    lock.set_updated_at(now_rfc3339());
    write_lock(path, &lock).await?;
    tracing::debug!(skill = name, version, "Lock entry upserted");
    Ok(())
}

/// Remove `name` from the lock file.
///
/// The file is only rewritten when an entry was actually removed.
pub async fn remove_lock_skill(path: &Path, name: &str) -> Result<bool, ConfigError> {
    if !path_exists(path).await {
        return Ok(false);
    }
    let mut lock = read_lock_for_update(path).await?;
    let removed = match lock.skills_mut() {
        Some(skills) => skills.remove(name).is_some(),
        None => false,
    };
    if !removed {
        return Ok(false);
    }
    lock.set_updated_at(now_rfc3339());
    write_lock(path, &lock).await?;
    Ok(true)
}
