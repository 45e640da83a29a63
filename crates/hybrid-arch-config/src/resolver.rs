//! Layered configuration resolution.
//!
//! Precedence: Project > Skill > Global. The merged state is computed on
//! first request, memoized, and dropped by [`ConfigResolver::reload`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::RwLock;

use hybrid_arch_types::{
    ArchitectureState, GlobalLayer, GlobalLayerConfig, LayerSource, MergedConfig, ProjectLayer,
    ProjectLayerConfig, SkillLayer, SkillLockFile, SourceKind,
};

use crate::loader::{load_json_or_default, path_exists};
use crate::paths::{
    AGENTS_FILE, ArchPaths, CLAUDE_FILE, CURSOR_RULES_FILE, LAYER_CONFIG_FILE, LOCK_FILE,
    PROJECT_DOC_CANDIDATES, PROJECT_RULE_CANDIDATES, TOOL_DIR,
};

/// Resolves and memoizes the [`ArchitectureState`] of one project.
pub struct ConfigResolver {
    paths: ArchPaths,
    cached: RwLock<Option<Arc<ArchitectureState>>>,
}

impl ConfigResolver {
    pub fn new(paths: ArchPaths) -> Self {
        Self {
            paths,
            cached: RwLock::new(None),
        }
    }

    pub fn paths(&self) -> &ArchPaths {
        &self.paths
    }

    /// Drop the memoized state; the next [`load_merged_state`] recomputes it.
    ///
    /// [`load_merged_state`]: ConfigResolver::load_merged_state
    pub async fn reload(&self) {
        *self.cached.write().await = None;
        tracing::debug!("Architecture state invalidated");
    }

    pub fn is_architecture_file(&self, path: &str) -> bool {
        is_architecture_file(path)
    }

    /// Scoped global config if present, otherwise the legacy flat path.
    pub async fn effective_global_config_path(&self) -> PathBuf {
        first_existing(
            self.paths.global_config_path(),
            self.paths.legacy_global_config_path(),
        )
        .await
    }

    /// Return the merged state, computing it at most once between reloads.
    pub async fn load_merged_state(&self) -> Arc<ArchitectureState> {
        if let Some(state) = self.cached.read().await.as_ref() {
            return state.clone();
        }

        let mut guard = self.cached.write().await;
        // Another caller may have filled the cache while we waited.
        if let Some(state) = guard.as_ref() {
            return state.clone();
        }

        let state = Arc::new(self.compute_state().await);
        tracing::info!(
            project = %self.paths.project_root().display(),
            rules = state.merged.rules.len(),
            docs = state.merged.docs.len(),
            requested = state.skill.requested.len(),
            "Architecture state resolved"
        );
        *guard = Some(state.clone());
        state
    }

    async fn compute_state(&self) -> ArchitectureState {
        let paths = &self.paths;

        let scoped_config = paths.global_config_path();
        let legacy_config = paths.legacy_global_config_path();
        let scoped_agents = paths.global_agents_path();
        let legacy_agents = paths.legacy_global_agents_path();

        let has_scoped_config = path_exists(&scoped_config).await;
        let has_legacy_config = path_exists(&legacy_config).await;
        let has_scoped_agents = path_exists(&scoped_agents).await;
        let has_legacy_agents = path_exists(&legacy_agents).await;

        let config_path = if has_scoped_config {
            scoped_config.clone()
        } else {
            legacy_config.clone()
        };
        let agents_path = if has_scoped_agents {
            scoped_agents.clone()
        } else {
            legacy_agents.clone()
        };

        let global_config: GlobalLayerConfig = load_json_or_default(&config_path).await;
        let project_config: ProjectLayerConfig =
            load_json_or_default(&paths.project_config_path()).await;
        let lock: SkillLockFile = load_json_or_default(&paths.lock_path()).await;

        let discovered_rules = self.discover_project_rule_files().await;
        let discovered_docs = self.discover_project_doc_dirs().await;

        let global_sources = vec![
            LayerSource::new(scoped_config, has_scoped_config, SourceKind::Config),
            LayerSource::new(legacy_config, has_legacy_config, SourceKind::Config),
            LayerSource::new(scoped_agents, has_scoped_agents, SourceKind::Rules),
            LayerSource::new(legacy_agents, has_legacy_agents, SourceKind::Rules),
        ];

        let project_config_path = paths.project_config_path();
        let mut project_sources = vec![LayerSource::new(
            project_config_path.clone(),
            path_exists(&project_config_path).await,
            SourceKind::Config,
        )];
        project_sources.extend(discovered_rules.iter().map(|r| {
            LayerSource::new(paths.project_root().join(r), true, SourceKind::Rules)
        }));
        project_sources.extend(discovered_docs.iter().map(|d| {
            LayerSource::new(paths.project_root().join(d), true, SourceKind::Docs)
        }));

        let mut skill_sources = vec![LayerSource::new(
            paths.lock_path(),
            path_exists(&paths.lock_path()).await,
            SourceKind::SkillsLock,
        )];
        for dir in [
            paths.project_skills_dir(),
            paths.user_skills_dir(),
            paths.xdg_skills_dir(),
        ] {
            let exists = path_exists(&dir).await;
            skill_sources.push(LayerSource::new(dir, exists, SourceKind::SkillsDir));
        }

        let effective_project = ProjectLayerConfig {
            rules: merge_unique([&project_config.rules, &discovered_rules]),
            docs: merge_unique([&project_config.docs, &discovered_docs]),
            agents: project_config.agents.clone(),
        };
        let merged = merge_layers(&global_config, &effective_project);
        let requested = lock.requested();

        ArchitectureState {
            global: GlobalLayer {
                config_path,
                agents_path,
                config: global_config,
                sources: global_sources,
            },
            skill: SkillLayer {
                lock_path: paths.lock_path(),
                lock,
                requested,
                sources: skill_sources,
            },
            project: ProjectLayer {
                project_path: paths.project_root().to_path_buf(),
                config_path: project_config_path,
                config: project_config,
                sources: project_sources,
            },
            merged,
        }
    }

    /// Rule files present at the project root, as root-relative names.
    async fn discover_project_rule_files(&self) -> Vec<String> {
        existing_candidates(self.paths.project_root(), PROJECT_RULE_CANDIDATES).await
    }

    /// Documentation directories present at the project root.
    async fn discover_project_doc_dirs(&self) -> Vec<String> {
        existing_candidates(self.paths.project_root(), PROJECT_DOC_CANDIDATES).await
    }
}

async fn existing_candidates(root: &Path, candidates: &[&str]) -> Vec<String> {
    let mut found = Vec::new();
    for name in candidates {
        if path_exists(&root.join(name)).await {
            found.push(name.to_string());
        }
    }
    found
}

async fn first_existing(preferred: PathBuf, fallback: PathBuf) -> PathBuf {
    if path_exists(&preferred).await {
        preferred
    } else {
        fallback
    }
}

/// Concatenate lists, keeping the first occurrence of each string.
pub fn merge_unique<'a, I>(lists: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a Vec<String>>,
{
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for list in lists {
        for item in list {
            if seen.insert(item.as_str()) {
                out.push(item.clone());
            }
        }
    }
    out
}

/// Apply layer precedence to produce the merged view.
///
/// Rules: global first, then project. Docs: project only. Agents: global
/// overlaid by project, key by key. MCP servers: global only.
pub fn merge_layers(global: &GlobalLayerConfig, project: &ProjectLayerConfig) -> MergedConfig {
    let mut agents = global.agents.clone();
    for (key, value) in &project.agents {
        agents.insert(key.clone(), value.clone());
    }

    MergedConfig {
        rules: merge_unique([&global.rules, &project.rules]),
        docs: merge_unique([&project.docs]),
        agents,
        mcp_servers: merge_unique([&global.mcp_servers]),
    }
}

/// Whether a write to `path` should invalidate the merged state.
pub fn is_architecture_file(path: &str) -> bool {
    let normalized = path.replace('\\', "/");
    let base = normalized.rsplit('/').next().unwrap_or_default();

    if matches!(
        base,
        LOCK_FILE | AGENTS_FILE | CLAUDE_FILE | CURSOR_RULES_FILE | LAYER_CONFIG_FILE
    ) {
        return true;
    }

    let skills_dir = format!("{TOOL_DIR}/skills/");
    normalized.starts_with(&skills_dir) || normalized.contains(&format!("/{skills_dir}"))
}
