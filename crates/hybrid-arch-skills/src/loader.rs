//! Skill discovery across the project, user and XDG skill directories.
//!
//! Directories are scanned in the order given, highest priority first. A
//! skill's identity is its tool name, derived from the manifest's directory
//! relative to the base directory, so the same relative path in a lower
//! priority directory is shadowed while equal `name`s at different paths
//! coexist.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;
use walkdir::WalkDir;

use hybrid_arch_config::ArchPaths;
use hybrid_arch_config::paths::SKILL_MANIFEST;
use hybrid_arch_types::{DiscoveredSkill, SkillScope};

use crate::builtin::builtin_skills;
use crate::frontmatter::parse_skill_file;

/// Namespace prefix of every derived tool name.
pub const TOOL_NAME_PREFIX: &str = "skills_";
/// Version reported when a manifest declares none.
pub const LOCAL_VERSION: &str = "local";
const MIN_DESCRIPTION_LEN: usize = 10;

static SKILL_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-z0-9-]+$").unwrap());

/// A base directory to scan, tagged with the scope it contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillRoot {
    pub dir: PathBuf,
    pub scope: SkillScope,
}

impl SkillRoot {
    pub fn new(dir: impl Into<PathBuf>, scope: SkillScope) -> Self {
        Self {
            dir: dir.into(),
            scope,
        }
    }
}

/// The three scanned directories for a project, in priority order.
pub fn skill_roots(paths: &ArchPaths) -> Vec<SkillRoot> {
    vec![
        SkillRoot::new(paths.project_skills_dir(), SkillScope::Project),
        SkillRoot::new(paths.user_skills_dir(), SkillScope::User),
        SkillRoot::new(paths.xdg_skills_dir(), SkillScope::Xdg),
    ]
}

/// Whether `name` is usable as a skill name and directory name.
pub fn is_valid_skill_name(name: &str) -> bool {
    SKILL_NAME.is_match(name)
}

/// Scan `roots` and append every unclaimed built-in.
///
/// Invalid manifests are skipped. The result is sorted by tool name.
/// Blocking; run it off the async runtime.
pub fn discover_skills(roots: &[SkillRoot]) -> Vec<DiscoveredSkill> {
    let mut claimed = HashSet::new();
    let mut skills = Vec::new();

    for root in roots {
        if !root.dir.is_dir() {
            tracing::debug!(dir = %root.dir.display(), "Skill directory absent");
            continue;
        }

        for manifest in find_manifests(&root.dir) {
            let Some(skill) = load_skill(&manifest, root) else {
                continue;
            };
            if !claimed.insert(skill.tool_name.clone()) {
                tracing::debug!(
                    tool = %skill.tool_name,
                    scope = %root.scope,
                    "Skill shadowed by a higher priority scope"
                );
                continue;
            }
            skills.push(skill);
        }
    }

    for builtin in builtin_skills() {
        let tool_name = builtin_tool_name(builtin.name);
        if !claimed.insert(tool_name.clone()) {
            continue;
        }
        let (fm, body) = parse_skill_file(builtin.manifest);
        skills.push(DiscoveredSkill {
            name: builtin.name.to_string(),
            version: builtin.version.to_string(),
            description: fm.description.unwrap_or_default(),
            scope: SkillScope::Builtin,
            full_path: None,
            skill_md_path: None,
            tool_name,
            content: body.trim().to_string(),
            tags: fm.tags,
            allowed_tools: fm.allowed_tools,
        });
    }

    skills.sort_by(|a, b| a.tool_name.cmp(&b.tool_name));
    skills
}

/// Every file under `dir` whose name is `SKILL.md`, ignoring case.
fn find_manifests(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|n| n.eq_ignore_ascii_case(SKILL_MANIFEST))
        })
        .map(|entry| entry.into_path())
        .collect()
}

/// Read and validate one manifest. `None` means the skill is excluded.
fn load_skill(manifest: &Path, root: &SkillRoot) -> Option<DiscoveredSkill> {
    let raw = match std::fs::read_to_string(manifest) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!(path = %manifest.display(), "Failed to read skill: {e}");
            return None;
        }
    };
    let (fm, body) = parse_skill_file(&raw);

    let reject = |reason: &str| {
        tracing::debug!(path = %manifest.display(), "Skipping skill: {reason}");
        None
    };

    let (Some(name), Some(description)) = (fm.name, fm.description) else {
        return reject("name or description missing");
    };
    if !is_valid_skill_name(&name) {
        return reject("name must match ^[a-z0-9-]+$");
    }
    if description.chars().count() < MIN_DESCRIPTION_LEN {
        return reject("description too short");
    }

    let dir = manifest.parent()?;
    if dir.file_name().and_then(|n| n.to_str()) != Some(name.as_str()) {
        return reject("directory name does not match declared name");
    }

    let tool_name = tool_name_for(manifest, &root.dir)?;

    Some(DiscoveredSkill {
        name,
        version: fm.version.unwrap_or_else(|| LOCAL_VERSION.to_string()),
        description,
        scope: root.scope,
        full_path: Some(dir.to_path_buf()),
        skill_md_path: Some(manifest.to_path_buf()),
        tool_name,
        content: body.trim().to_string(),
        tags: fm.tags,
        allowed_tools: fm.allowed_tools,
    })
}

/// Derive the tool name of `manifest` relative to `base`.
///
/// `<base>/web/nextjs-debug/SKILL.md` becomes `skills_web_nextjs_debug`.
pub fn tool_name_for(manifest: &Path, base: &Path) -> Option<String> {
    let rel = manifest.parent()?.strip_prefix(base).ok()?;
    let segments: Vec<String> = rel
        .components()
        .filter_map(|c| c.as_os_str().to_str())
        .map(sanitize_segment)
        .filter(|s| !s.is_empty())
        .collect();
    Some(format!("{TOOL_NAME_PREFIX}{}", segments.join("_")))
}

fn builtin_tool_name(name: &str) -> String {
    format!("{TOOL_NAME_PREFIX}{}", sanitize_segment(name))
}

fn sanitize_segment(segment: &str) -> String {
    segment
        .chars()
        .map(|c| if c == '-' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_skill(base: &Path, rel_dir: &str, name: &str, description: &str) -> PathBuf {
        let dir = base.join(rel_dir);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("SKILL.md");
        std::fs::write(
            &path,
            format!("---\nname: {name}\ndescription: {description}\n---\n\n# {name}\n"),
        )
        .unwrap();
        path
    }

    fn local(skills: &[DiscoveredSkill]) -> Vec<&DiscoveredSkill> {
        skills
            .iter()
            .filter(|s| s.scope != SkillScope::Builtin)
            .collect()
    }

    #[test]
    fn test_tool_name_for() {
        let base = Path::new("/p/.opencode/skills");
        assert_eq!(
            tool_name_for(Path::new("/p/.opencode/skills/nextjs-debug/SKILL.md"), base).as_deref(),
            Some("skills_nextjs_debug")
        );
        assert_eq!(
            tool_name_for(Path::new("/p/.opencode/skills/web/my.tool/SKILL.md"), base).as_deref(),
            Some("skills_web_mytool")
        );
        assert!(tool_name_for(Path::new("/elsewhere/x/SKILL.md"), base).is_none());
    }

    #[test]
    fn test_project_scope_wins_at_same_relative_path() {
        let project = tempfile::tempdir().unwrap();
        let user = tempfile::tempdir().unwrap();
        write_skill(project.path(), "lint", "lint", "project copy of lint");
        write_skill(user.path(), "lint", "lint", "user copy of lint");

        let skills = discover_skills(&[
            SkillRoot::new(project.path(), SkillScope::Project),
            SkillRoot::new(user.path(), SkillScope::User),
        ]);
        let local = local(&skills);
        assert_eq!(local.len(), 1);
        assert_eq!(local[0].scope, SkillScope::Project);
        assert_eq!(local[0].description, "project copy of lint");
    }

    #[test]
    fn test_same_name_at_different_paths_are_distinct() {
        let project = tempfile::tempdir().unwrap();
        write_skill(project.path(), "lint", "lint", "top level lint skill");
        write_skill(project.path(), "rust/lint", "lint", "rust specific lint skill");

        let skills = discover_skills(&[SkillRoot::new(project.path(), SkillScope::Project)]);
        let names: Vec<_> = local(&skills).iter().map(|s| s.tool_name.as_str()).collect();
        assert_eq!(names, vec!["skills_lint", "skills_rust_lint"]);
    }

    #[test]
    fn test_description_length_boundary() {
        let project = tempfile::tempdir().unwrap();
        write_skill(project.path(), "nine", "nine", "123456789");
        write_skill(project.path(), "ten", "ten", "1234567890");

        let skills = discover_skills(&[SkillRoot::new(project.path(), SkillScope::Project)]);
        let names: Vec<_> = local(&skills).iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["ten"]);
    }

    #[test]
    fn test_invalid_manifests_are_excluded() {
        let project = tempfile::tempdir().unwrap();
        write_skill(project.path(), "other-dir", "mismatch", "directory does not match");
        write_skill(project.path(), "Upper", "Upper", "uppercase names are invalid");
        let no_desc = project.path().join("nodesc");
        std::fs::create_dir_all(&no_desc).unwrap();
        std::fs::write(no_desc.join("SKILL.md"), "---\nname: nodesc\n---\nbody").unwrap();
        let plain = project.path().join("plain");
        std::fs::create_dir_all(&plain).unwrap();
        std::fs::write(plain.join("SKILL.md"), "no front matter").unwrap();

        let skills = discover_skills(&[SkillRoot::new(project.path(), SkillScope::Project)]);
        assert!(local(&skills).is_empty());
    }

    #[test]
    fn test_manifest_name_is_case_insensitive() {
        let project = tempfile::tempdir().unwrap();
        let dir = project.path().join("deploy");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("skill.md"),
            "---\nname: deploy\ndescription: ship the current build\nversion: 0.3.0\ntags:\n  - ops\n---\n\nSteps.\n",
        )
        .unwrap();

        let skills = discover_skills(&[SkillRoot::new(project.path(), SkillScope::Project)]);
        let local = local(&skills);
        assert_eq!(local.len(), 1);
        let skill = local[0];
        assert_eq!(skill.version, "0.3.0");
        assert_eq!(skill.tags, Some(vec!["ops".to_string()]));
        assert_eq!(skill.content, "Steps.");
        assert_eq!(skill.full_path.as_deref(), Some(dir.as_path()));
        assert_eq!(skill.skill_md_path, Some(dir.join("skill.md")));
    }

    #[test]
    fn test_version_defaults_to_local() {
        let project = tempfile::tempdir().unwrap();
        write_skill(project.path(), "fmt", "fmt", "format all sources");
        let skills = discover_skills(&[SkillRoot::new(project.path(), SkillScope::Project)]);
        assert_eq!(local(&skills)[0].version, LOCAL_VERSION);
    }

    #[test]
    fn test_builtins_appended_and_shadowed() {
        let project = tempfile::tempdir().unwrap();
        write_skill(project.path(), "nextjs-debug", "nextjs-debug", "a local override of debug");

        let skills = discover_skills(&[
            SkillRoot::new(project.path(), SkillScope::Project),
            SkillRoot::new(project.path().join("missing"), SkillScope::User),
        ]);
        let tools: Vec<_> = skills.iter().map(|s| s.tool_name.as_str()).collect();
        assert_eq!(tools, vec!["skills_nextjs_debug", "skills_nextjs_docs_router"]);
        assert_eq!(skills[0].scope, SkillScope::Project);
        assert_eq!(skills[1].scope, SkillScope::Builtin);
        assert!(skills[1].full_path.is_none());
        assert!(skills[1].content.starts_with("# nextjs-docs-router"));
        assert_eq!(skills[1].version, "1.0.0");
    }

    #[test]
    fn test_result_sorted_by_tool_name() {
        let xdg = tempfile::tempdir().unwrap();
        let user = tempfile::tempdir().unwrap();
        write_skill(xdg.path(), "alpha", "alpha", "first by tool name");
        write_skill(user.path(), "zulu", "zulu", "last by tool name");

        let skills = discover_skills(&[
            SkillRoot::new(user.path(), SkillScope::User),
            SkillRoot::new(xdg.path(), SkillScope::Xdg),
        ]);
        let tools: Vec<_> = skills.iter().map(|s| s.tool_name.as_str()).collect();
        let mut sorted = tools.clone();
        sorted.sort();
        assert_eq!(tools, sorted);
        assert_eq!(tools.first(), Some(&"skills_alpha"));
        assert_eq!(tools.last(), Some(&"skills_zulu"));
    }
}
