//! Cached discovery plus project install/uninstall.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use hybrid_arch_config::ArchPaths;
use hybrid_arch_config::BuiltinSkillInstaller;
use hybrid_arch_config::loader::{path_exists, write_atomic};
use hybrid_arch_config::lock::{remove_lock_skill, upsert_lock_skill};
use hybrid_arch_config::paths::SKILL_MANIFEST;
use hybrid_arch_types::DiscoveredSkill;

use crate::SkillError;
use crate::builtin::{builtin_skill, builtin_skill_names};
use crate::loader::{discover_skills, is_valid_skill_name, skill_roots};

/// Owns the discovered skill list for one project.
pub struct SkillManager {
    paths: ArchPaths,
    cached: RwLock<Option<Arc<Vec<DiscoveredSkill>>>>,
}

impl SkillManager {
    pub fn new(paths: ArchPaths) -> Self {
        Self {
            paths,
            cached: RwLock::new(None),
        }
    }

    pub fn paths(&self) -> &ArchPaths {
        &self.paths
    }

    /// Discovered skills, scanned once until [`invalidate`](Self::invalidate).
    pub async fn discover(&self) -> Result<Arc<Vec<DiscoveredSkill>>, SkillError> {
        if let Some(skills) = self.cached.read().await.as_ref() {
            return Ok(skills.clone());
        }

        let mut guard = self.cached.write().await;
        if let Some(skills) = guard.as_ref() {
            return Ok(skills.clone());
        }

        let roots = skill_roots(&self.paths);
        let skills = Arc::new(tokio::task::spawn_blocking(move || discover_skills(&roots)).await?);
        tracing::info!(count = skills.len(), "Skills discovered");
        *guard = Some(skills.clone());
        Ok(skills)
    }

    pub async fn invalidate(&self) {
        *self.cached.write().await = None;
    }

    /// Copy a built-in manifest into `.opencode/skills/<name>` and record it
    /// in the lock file. An unknown name is reported in the returned text.
    pub async fn install_builtin_skill_to_project(&self, name: &str) -> Result<String, SkillError> {
        let Some(skill) = builtin_skill(name) else {
            return Ok(format!(
                "Unknown built-in skill: {name}. Available: {}",
                builtin_skill_names().join(", ")
            ));
        };

        let manifest = self.paths.project_skills_dir().join(name).join(SKILL_MANIFEST);
        write_atomic(&manifest, skill.manifest.as_bytes()).await?;
        upsert_lock_skill(&self.paths.lock_path(), name, skill.version).await?;
        self.invalidate().await;

        tracing::info!(skill = name, version = skill.version, "Installed built-in skill");
        Ok(format!(
            "Installed built-in skill \"{name}\" into .opencode/skills and updated skills.lock.json."
        ))
    }

    /// Remove `.opencode/skills/<name>` and its lock entry.
    pub async fn uninstall_project_skill(&self, name: &str) -> Result<String, SkillError> {
        if !is_valid_skill_name(name) {
            return Ok(format!("Invalid skill name: {name}"));
        }

        let dir = self.paths.project_skills_dir().join(name);
        if path_exists(&dir).await {
            tokio::fs::remove_dir_all(&dir).await?;
        }
        let removed = remove_lock_skill(&self.paths.lock_path(), name).await?;
        self.invalidate().await;

        tracing::info!(skill = name, lock_entry_removed = removed, "Uninstalled project skill");
        Ok(format!(
            "Uninstalled project skill \"{name}\" and updated skills.lock.json."
        ))
    }
}

#[async_trait]
impl BuiltinSkillInstaller for SkillManager {
    async fn install_builtin_skill_to_project(
        &self,
        name: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
        Ok(SkillManager::install_builtin_skill_to_project(self, name).await?)
    }
}
