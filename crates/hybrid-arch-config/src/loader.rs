//! Tolerant document loading and atomic writes.

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ConfigError;

pub async fn path_exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(false)
}

/// Load a JSON (or JSON5) document, falling back to `T::default()`.
///
/// A missing file and a malformed file both produce the default; neither is
/// reported to the caller.
pub async fn load_json_or_default<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    let content = match tokio::fs::read_to_string(path).await {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("{} not found, using defaults", path.display());
            return T::default();
        }
        Err(e) => {
            tracing::warn!("Failed to read {}: {e}", path.display());
            return T::default();
        }
    };

    match json5::from_str(&content) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!("Ignoring malformed {}: {e}", path.display());
            T::default()
        }
    }
}

/// Serialize `value` as pretty JSON and replace `path` atomically.
pub async fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let content = serde_json::to_string_pretty(value)?;
    write_atomic(path, content.as_bytes()).await
}

/// Write through a sibling temp file and rename over the target, so readers
/// see either the old or the new content.
pub async fn write_atomic(path: &Path, content: &[u8]) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    tokio::fs::write(&tmp_path, content).await?;
    tokio::fs::rename(&tmp_path, path).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use hybrid_arch_types::ProjectLayerConfig;

    #[tokio::test]
    async fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg: ProjectLayerConfig = load_json_or_default(&dir.path().join("nope.json")).await;
        assert_eq!(cfg, ProjectLayerConfig::default());
    }

    #[tokio::test]
    async fn test_malformed_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        tokio::fs::write(&path, "{ rules: [").await.unwrap();
        let cfg: ProjectLayerConfig = load_json_or_default(&path).await;
        assert_eq!(cfg, ProjectLayerConfig::default());
    }

    #[tokio::test]
    async fn test_json5_comments_are_tolerated() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        tokio::fs::write(&path, "{\n  // project rules\n  rules: [\"AGENTS.md\",],\n}")
            .await
            .unwrap();
        let cfg: ProjectLayerConfig = load_json_or_default(&path).await;
        assert_eq!(cfg.rules, vec!["AGENTS.md"]);
    }

    #[tokio::test]
    async fn test_write_atomic_creates_parent_and_leaves_no_temp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        write_json_atomic(&path, &serde_json::json!({"a": 1})).await.unwrap();

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.contains("\"a\": 1"));
        assert!(!path.with_file_name("out.json.tmp").exists());
    }
}
