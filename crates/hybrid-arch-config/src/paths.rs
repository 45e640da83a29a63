//! On-disk layout of the three layers.

use std::path::{Path, PathBuf};

use crate::ConfigError;

/// Hidden per-project tool directory.
pub const TOOL_DIR: &str = ".opencode";
/// Layer config filename, used both globally and per project.
pub const LAYER_CONFIG_FILE: &str = "hybrid-arch.json";
pub const LOCK_FILE: &str = "skills.lock.json";
pub const AGENTS_FILE: &str = "AGENTS.md";
pub const CLAUDE_FILE: &str = "CLAUDE.md";
pub const CURSOR_RULES_FILE: &str = ".cursorrules";
pub const SKILL_MANIFEST: &str = "SKILL.md";

/// Scoped subdirectory under the host's XDG config dir.
const SCOPED_GLOBAL_DIR: &str = "opencode-ai-hybrid";

/// Overrides the home directory used for every global path.
pub const HOME_ENV: &str = "HYBRID_ARCH_HOME";

/// Project rule files, tested in this order.
pub const PROJECT_RULE_CANDIDATES: &[&str] = &[AGENTS_FILE, CLAUDE_FILE, CURSOR_RULES_FILE];
/// Project documentation directories, tested in this order.
pub const PROJECT_DOC_CANDIDATES: &[&str] = &[".next-docs", "docs"];

/// Resolve the home directory, honoring `HYBRID_ARCH_HOME`.
pub fn home_dir() -> Result<PathBuf, ConfigError> {
    if let Some(dir) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    dirs::home_dir().ok_or(ConfigError::NoHomeDir)
}

/// Every path the resolver, scaffold and skill manager touch, derived from
/// a project root and a home directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchPaths {
    project_root: PathBuf,
    home: PathBuf,
}

impl ArchPaths {
    pub fn new(project_root: impl Into<PathBuf>, home: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            home: home.into(),
        }
    }

    /// Paths for a project using the resolved home directory.
    pub fn for_project(project_root: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        Ok(Self::new(project_root, home_dir()?))
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    // ── global layer ──

    /// `~/.config/opencode`
    pub fn host_config_dir(&self) -> PathBuf {
        self.home.join(".config").join("opencode")
    }

    pub fn global_config_path(&self) -> PathBuf {
        self.host_config_dir()
            .join(SCOPED_GLOBAL_DIR)
            .join(LAYER_CONFIG_FILE)
    }

    pub fn legacy_global_config_path(&self) -> PathBuf {
        self.host_config_dir().join(LAYER_CONFIG_FILE)
    }

    pub fn global_agents_path(&self) -> PathBuf {
        self.host_config_dir().join(SCOPED_GLOBAL_DIR).join(AGENTS_FILE)
    }

    pub fn legacy_global_agents_path(&self) -> PathBuf {
        self.host_config_dir().join(AGENTS_FILE)
    }

    /// The host's own config file, edited by `hybrid-arch install`.
    pub fn host_config_file(&self) -> PathBuf {
        self.host_config_dir().join("opencode.json")
    }

    // ── project layer ──

    pub fn tool_dir(&self) -> PathBuf {
        self.project_root.join(TOOL_DIR)
    }

    pub fn project_config_path(&self) -> PathBuf {
        self.tool_dir().join(LAYER_CONFIG_FILE)
    }

    pub fn commands_dir(&self) -> PathBuf {
        self.tool_dir().join("commands")
    }

    // ── skill layer ──

    pub fn lock_path(&self) -> PathBuf {
        self.project_root.join(LOCK_FILE)
    }

    pub fn project_skills_dir(&self) -> PathBuf {
        self.tool_dir().join("skills")
    }

    pub fn user_skills_dir(&self) -> PathBuf {
        self.home.join(TOOL_DIR).join("skills")
    }

    pub fn xdg_skills_dir(&self) -> PathBuf {
        self.host_config_dir().join("skills")
    }
}
