//! First-session lock file seeding.
//!
//! An existing lock file with at least one skill is never touched, even when
//! none of the default skills are among its entries.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::{Map, Value, json};

use hybrid_arch_types::{ANY_VERSION, InitReport, LockFileAction, SkillLockFile};

use crate::ConfigError;
use crate::loader::path_exists;
use crate::lock::{read_lock_for_update, write_lock};
use crate::paths::ArchPaths;
use crate::project::{detect_project_type, find_project_root};
use crate::scaffold::DEFAULT_BUILTIN_SKILLS;

fn default_true() -> bool {
    true
}

/// The `default_skills` policy read from the global config document.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DefaultSkillsPolicy {
    #[serde(default)]
    pub default_skills: Vec<String>,
    #[serde(default = "default_true")]
    pub auto_apply_defaults: bool,
    #[serde(default = "default_true")]
    pub auto_reload: bool,
}

impl Default for DefaultSkillsPolicy {
    /// Used when no policy document exists or it cannot be parsed.
    fn default() -> Self {
        Self {
            default_skills: DEFAULT_BUILTIN_SKILLS.iter().map(|s| s.to_string()).collect(),
            auto_apply_defaults: true,
            auto_reload: true,
        }
    }
}

impl DefaultSkillsPolicy {
    /// Read the policy; a missing or malformed document yields the built-in default.
    pub async fn load(path: &Path) -> Self {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        json5::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed policy in {}: {e}", path.display());
            Self::default()
        })
    }
}

/// Seeds `skills.lock.json` with default skills for a detected project.
pub struct AutoInitializer {
    paths: ArchPaths,
}

impl AutoInitializer {
    /// Detect the project root from `start` and bind paths to it.
    pub async fn detect(start: &Path, home: impl Into<PathBuf>) -> Self {
        let root = find_project_root(start).await;
        Self {
            paths: ArchPaths::new(root, home),
        }
    }

    pub fn new(paths: ArchPaths) -> Self {
        Self { paths }
    }

    pub fn project_root(&self) -> &Path {
        self.paths.project_root()
    }

    pub fn paths(&self) -> &ArchPaths {
        &self.paths
    }

    /// Policy from the scoped global config, else the legacy one.
    pub async fn load_policy(&self) -> DefaultSkillsPolicy {
        let scoped = self.paths.global_config_path();
        let path = if path_exists(&scoped).await {
            scoped
        } else {
            self.paths.legacy_global_config_path()
        };
        DefaultSkillsPolicy::load(&path).await
    }

    /// Decide and perform the lock file action for `policy`.
    ///
    /// Returns the action and the skills that were written.
    pub async fn apply_default_skills(
        &self,
        policy: &DefaultSkillsPolicy,
    ) -> Result<(LockFileAction, Vec<String>), ConfigError> {
        if !policy.auto_apply_defaults {
            return Ok((LockFileAction::Disabled, Vec::new()));
        }
        if policy.default_skills.is_empty() {
            return Ok((LockFileAction::Skipped, Vec::new()));
        }

        let lock_path = self.paths.lock_path();
        let now = chrono::Utc::now().to_rfc3339();
        let defaults = || {
            policy
                .default_skills
                .iter()
                .map(|name| (name.clone(), ANY_VERSION.to_string()))
        };

        if !path_exists(&lock_path).await {
            let mut lock = SkillLockFile::new(defaults(), now.clone());
            lock.0.insert(
                "metadata".into(),
                json!({ "auto_generated": true, "generated_at": now }),
            );
            write_lock(&lock_path, &lock).await?;
            tracing::info!(skills = ?policy.default_skills, "Created lock file with default skills");
            return Ok((LockFileAction::Created, policy.default_skills.clone()));
        }

        let mut lock = read_lock_for_update(&lock_path).await?;
        if lock.has_skills() {
            tracing::debug!("Lock file already declares skills, leaving it untouched");
            return Ok((LockFileAction::Skipped, Vec::new()));
        }

        let Some(skills) = lock.skills_mut() else {
            return Ok((LockFileAction::Skipped, Vec::new()));
        };
        skills.extend(defaults().map(|(name, version)| (name, Value::String(version))));
        let mut metadata = match lock.0.remove("metadata") {
            Some(Value::Object(m)) => m,
            _ => Map::new(),
        };
        metadata.insert("auto_filled".into(), Value::Bool(true));
        metadata.insert("filled_at".into(), Value::String(now.clone()));
        lock.0.insert("metadata".into(), Value::Object(metadata));
        lock.set_updated_at(now);

        write_lock(&lock_path, &lock).await?;
        tracing::info!(skills = ?policy.default_skills, "Filled empty lock file with default skills");
        Ok((LockFileAction::Filled, policy.default_skills.clone()))
    }

    /// Run the full policy and report; I/O failures are logged, not returned.
    pub async fn initialize(&self) -> InitReport {
        let project_type = detect_project_type(self.project_root()).await;
        let policy = self.load_policy().await;

        let (action, applied) = match self.apply_default_skills(&policy).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!("Auto-init could not update the lock file: {e}");
                (LockFileAction::Skipped, Vec::new())
            }
        };

        InitReport {
            project_root: self.project_root().to_path_buf(),
            project_type,
            lock_file_action: action,
            applied_skills: applied,
            auto_reload: policy.auto_reload,
        }
    }
}
