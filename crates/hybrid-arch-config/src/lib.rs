//! hybrid-arch-config: layer paths, resolution, scaffold and auto-init.
//!
//! Three layers contribute to the effective configuration of a project:
//!
//! - **Global**: `~/.config/opencode/opencode-ai-hybrid/hybrid-arch.json`
//!   (falling back to the legacy `~/.config/opencode/hybrid-arch.json`)
//! - **Skill**: `<project>/skills.lock.json` plus the skill directories
//! - **Project**: `<project>/.opencode/hybrid-arch.json` plus rule files
//!   and doc directories found at the project root
//!
//! Missing or malformed documents always read as empty.

pub mod autoinit;
pub mod loader;
pub mod lock;
pub mod paths;
pub mod project;
pub mod resolver;
pub mod scaffold;

use thiserror::Error;

pub use autoinit::{AutoInitializer, DefaultSkillsPolicy};
pub use paths::ArchPaths;
pub use project::{detect_project_type, find_project_root};
pub use resolver::{ConfigResolver, is_architecture_file};
pub use scaffold::{BuiltinSkillInstaller, ScaffoldOptions};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Home directory not found")]
    NoHomeDir,
    #[error("Refusing to rewrite {path}: {reason}")]
    MalformedLock { path: String, reason: String },
    #[error("Skill install failed: {0}")]
    Install(Box<dyn std::error::Error + Send + Sync>),
}
