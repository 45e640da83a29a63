//! Project scaffold and command stubs.
//!
//! Nothing here overwrites an existing config or lock file.

use async_trait::async_trait;

use hybrid_arch_types::{ProjectLayerConfig, SkillLockFile};

use crate::ConfigError;
use crate::loader::{path_exists, write_atomic, write_json_atomic};
use crate::lock::write_lock;
use crate::paths::{ArchPaths, LAYER_CONFIG_FILE, LOCK_FILE, SKILL_MANIFEST, TOOL_DIR};

/// Built-in skills seeded into a fresh project.
pub const DEFAULT_BUILTIN_SKILLS: &[&str] = &["nextjs-docs-router", "nextjs-debug"];
const DEFAULT_BUILTIN_VERSION: &str = "1.0.0";

/// Slash-command stubs written under `.opencode/commands`.
pub const ARCH_COMMANDS: &[(&str, &str)] = &[
    (
        "arch-status.md",
        "Call the tool `arch_status` and output the result verbatim. Do not add extra commentary.",
    ),
    (
        "arch-reload.md",
        "Call the tool `arch_reload`. Then call `arch_status` and output the status verbatim.",
    ),
    (
        "arch-init.md",
        "Call the tool `arch_init` with installBuiltinSkills=true and writeCommands=true. Then call `arch_status` and output the status verbatim.",
    ),
];

/// Installs a built-in skill into the project skills directory.
#[async_trait]
pub trait BuiltinSkillInstaller: Send + Sync {
    async fn install_builtin_skill_to_project(
        &self,
        name: &str,
    ) -> Result<String, Box<dyn std::error::Error + Send + Sync>>;
}

#[derive(Debug, Clone, Copy)]
pub struct ScaffoldOptions {
    pub install_builtin_skills: bool,
    pub write_commands: bool,
}

impl Default for ScaffoldOptions {
    fn default() -> Self {
        Self {
            install_builtin_skills: true,
            write_commands: true,
        }
    }
}

/// Write the command stubs, skipping files whose content is already current.
///
/// Returns the file names that were (re)written.
pub async fn ensure_arch_commands(paths: &ArchPaths) -> Result<Vec<String>, ConfigError> {
    let dir = paths.commands_dir();
    tokio::fs::create_dir_all(&dir).await?;

    let mut written = Vec::new();
    for (file, body) in ARCH_COMMANDS {
        let path = dir.join(file);
        if let Ok(existing) = tokio::fs::read_to_string(&path).await {
            if existing == *body {
                continue;
            }
        }
        write_atomic(&path, body.as_bytes()).await?;
        written.push(file.to_string());
    }
    Ok(written)
}

/// Create the project tool directory, default config, default lock file,
/// and optionally command stubs and built-in skills.
///
/// Returns the project-relative entries that were created or ensured.
pub async fn init_project_scaffold(
    paths: &ArchPaths,
    options: ScaffoldOptions,
    installer: &dyn BuiltinSkillInstaller,
) -> Result<Vec<String>, ConfigError> {
    tokio::fs::create_dir_all(paths.project_skills_dir()).await?;
    tokio::fs::create_dir_all(paths.commands_dir()).await?;

    let mut created = Vec::new();

    let config_path = paths.project_config_path();
    if !path_exists(&config_path).await {
        let config = ProjectLayerConfig {
            rules: vec!["AGENTS.md".into(), "CLAUDE.md".into()],
            docs: vec![".next-docs".into(), "docs".into()],
            agents: Default::default(),
        };
        write_json_atomic(&config_path, &config).await?;
        tracing::info!(path = %config_path.display(), "Wrote default project config");
        created.push(format!("{TOOL_DIR}/{LAYER_CONFIG_FILE}"));
    }

    let lock_path = paths.lock_path();
    if !path_exists(&lock_path).await {
        let lock = SkillLockFile::new(
            DEFAULT_BUILTIN_SKILLS
                .iter()
                .map(|name| (*name, DEFAULT_BUILTIN_VERSION)),
            chrono::Utc::now().to_rfc3339(),
        );
        write_lock(&lock_path, &lock).await?;
        tracing::info!(path = %lock_path.display(), "Wrote default lock file");
        created.push(LOCK_FILE.to_string());
    }

    if options.write_commands {
        ensure_arch_commands(paths).await?;
        let names: Vec<_> = ARCH_COMMANDS
            .iter()
            .map(|(f, _)| f.trim_end_matches(".md"))
            .collect();
        created.push(format!("{TOOL_DIR}/commands/{{{}}}.md", names.join(",")));
    }

    if options.install_builtin_skills {
        let mut installed = Vec::new();
        for name in DEFAULT_BUILTIN_SKILLS {
            let manifest = paths.project_skills_dir().join(name).join(SKILL_MANIFEST);
            if path_exists(&manifest).await {
                tracing::debug!(skill = name, "Built-in skill already present, skipping");
                continue;
            }
            installer
                .install_builtin_skill_to_project(name)
                .await
                .map_err(ConfigError::Install)?;
            installed.push(*name);
        }
        if !installed.is_empty() {
            created.push(format!(
                "{TOOL_DIR}/skills/{{{}}}/{SKILL_MANIFEST}",
                installed.join(",")
            ));
        }
    }

    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// Writes a stub manifest and records the call.
    struct RecordingInstaller {
        paths: ArchPaths,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl BuiltinSkillInstaller for RecordingInstaller {
        async fn install_builtin_skill_to_project(
            &self,
            name: &str,
        ) -> Result<String, Box<dyn std::error::Error + Send + Sync>> {
            let dir = self.paths.project_skills_dir().join(name);
            tokio::fs::create_dir_all(&dir).await?;
            tokio::fs::write(dir.join(SKILL_MANIFEST), format!("---\nname: {name}\n---\n"))
                .await?;
            self.calls.lock().unwrap().push(name.to_string());
            Ok(format!("installed {name}"))
        }
    }

    fn snapshot(root: &Path) -> HashMap<PathBuf, Vec<u8>> {
        let mut files = HashMap::new();
        let mut stack = vec![root.to_path_buf()];
        while let Some(dir) = stack.pop() {
            for entry in std::fs::read_dir(&dir).unwrap() {
                let path = entry.unwrap().path();
                if path.is_dir() {
                    stack.push(path);
                } else {
                    files.insert(path.clone(), std::fs::read(&path).unwrap());
                }
            }
        }
        files
    }

    #[tokio::test]
    async fn test_scaffold_is_idempotent() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        let paths = ArchPaths::new(project.path(), home.path());
        let installer = RecordingInstaller {
            paths: paths.clone(),
            calls: Mutex::new(Vec::new()),
        };

        let created = init_project_scaffold(&paths, ScaffoldOptions::default(), &installer)
            .await
            .unwrap();
        assert!(created.contains(&".opencode/hybrid-arch.json".to_string()));
        assert!(created.contains(&"skills.lock.json".to_string()));
        assert_eq!(installer.calls.lock().unwrap().len(), 2);
        let first = snapshot(project.path());

        init_project_scaffold(&paths, ScaffoldOptions::default(), &installer)
            .await
            .unwrap();
        assert_eq!(snapshot(project.path()), first);
        assert_eq!(installer.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_scaffold_never_overwrites_existing_config_or_lock() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        let paths = ArchPaths::new(project.path(), home.path());
        std::fs::create_dir_all(paths.tool_dir()).unwrap();
        std::fs::write(paths.project_config_path(), r#"{"rules": ["mine.md"]}"#).unwrap();
        std::fs::write(paths.lock_path(), r#"{"skills": {"custom": "0.1.0"}}"#).unwrap();

        let installer = RecordingInstaller {
            paths: paths.clone(),
            calls: Mutex::new(Vec::new()),
        };
        let options = ScaffoldOptions {
            install_builtin_skills: false,
            write_commands: false,
        };
        let created = init_project_scaffold(&paths, options, &installer)
            .await
            .unwrap();

        assert!(created.is_empty());
        assert_eq!(
            std::fs::read_to_string(paths.project_config_path()).unwrap(),
            r#"{"rules": ["mine.md"]}"#
        );
        assert_eq!(
            std::fs::read_to_string(paths.lock_path()).unwrap(),
            r#"{"skills": {"custom": "0.1.0"}}"#
        );
        assert!(!paths.commands_dir().join("arch-status.md").exists());
        assert!(installer.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_ensure_arch_commands_only_writes_stale_files() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        let paths = ArchPaths::new(project.path(), home.path());

        assert_eq!(ensure_arch_commands(&paths).await.unwrap().len(), 3);
        assert!(ensure_arch_commands(&paths).await.unwrap().is_empty());

        std::fs::write(paths.commands_dir().join("arch-reload.md"), "edited").unwrap();
        assert_eq!(
            ensure_arch_commands(&paths).await.unwrap(),
            vec!["arch-reload.md".to_string()]
        );
    }
}
