//! Per-project session owning the resolver and the skill manager.

use std::path::Path;
use std::sync::Arc;

use hybrid_arch_config::project::find_project_root;
use hybrid_arch_config::{ArchPaths, ConfigResolver};
use hybrid_arch_skills::SkillManager;
use hybrid_arch_types::{ArchitectureState, DiscoveredSkill};

use crate::ToolError;

/// Merged state and discovered skills, read together.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub state: Arc<ArchitectureState>,
    pub skills: Arc<Vec<DiscoveredSkill>>,
}

/// Everything one project needs; passed to every tool and hook.
pub struct ArchSession {
    resolver: ConfigResolver,
    skills: SkillManager,
}

impl ArchSession {
    pub fn new(paths: ArchPaths) -> Self {
        Self {
            resolver: ConfigResolver::new(paths.clone()),
            skills: SkillManager::new(paths),
        }
    }

    /// Session for the project containing `dir`, with the default home.
    pub async fn detect(dir: &Path) -> Result<Self, ToolError> {
        let root = find_project_root(dir).await;
        Ok(Self::new(ArchPaths::for_project(root)?))
    }

    pub fn paths(&self) -> &ArchPaths {
        self.resolver.paths()
    }

    pub fn resolver(&self) -> &ConfigResolver {
        &self.resolver
    }

    pub fn skills(&self) -> &SkillManager {
        &self.skills
    }

    /// Memoized state and skills, computed on first use after a reload.
    pub async fn state(&self) -> Result<Snapshot, ToolError> {
        let state = self.resolver.load_merged_state().await;
        let skills = self.skills.discover().await?;
        Ok(Snapshot { state, skills })
    }

    /// Drop both caches.
    pub async fn reload(&self) {
        self.resolver.reload().await;
        self.skills.invalidate().await;
        tracing::debug!(project = %self.paths().project_root().display(), "Session reloaded");
    }
}
