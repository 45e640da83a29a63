//! Project root detection and project type classification.

use std::path::{Path, PathBuf};

use hybrid_arch_types::ProjectType;

use crate::loader::path_exists;
use crate::paths::{AGENTS_FILE, LOCK_FILE, TOOL_DIR};

/// Marker names that identify a project root, tested in order at each level.
pub const ROOT_MARKERS: &[&str] = &[
    ".git",
    "package.json",
    "pnpm-lock.yaml",
    "yarn.lock",
    "bun.lockb",
    "Cargo.toml",
    "pyproject.toml",
    "requirements.txt",
    "go.mod",
    "pom.xml",
    "build.gradle",
    "CMakeLists.txt",
    TOOL_DIR,
    AGENTS_FILE,
    LOCK_FILE,
];

/// Walk upward from `start` (inclusive) to the first directory containing
/// any root marker.
///
/// Returns `start` unchanged when no ancestor has a marker.
pub async fn find_project_root(start: &Path) -> PathBuf {
    for dir in start.ancestors() {
        for marker in ROOT_MARKERS {
            if path_exists(&dir.join(marker)).await {
                tracing::debug!(root = %dir.display(), marker, "Detected project root");
                return dir.to_path_buf();
            }
        }
    }
    start.to_path_buf()
}

/// Classify a project by the well-known files at its root.
///
/// Any I/O failure yields [`ProjectType::Generic`].
pub async fn detect_project_type(root: &Path) -> ProjectType {
    let has = |name: &str| {
        let p = root.join(name);
        async move { path_exists(&p).await }
    };

    if has("next.config.js").await || has("next.config.ts").await || has("next.config.mjs").await {
        ProjectType::Nextjs
    } else if has("package.json").await {
        ProjectType::Nodejs
    } else if has("pyproject.toml").await || has("requirements.txt").await {
        ProjectType::Python
    } else if has("Cargo.toml").await {
        ProjectType::Rust
    } else if has("go.mod").await {
        ProjectType::Go
    } else {
        ProjectType::Generic
    }
}
