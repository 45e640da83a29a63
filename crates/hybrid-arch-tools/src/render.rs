//! Markdown and one-line renderings of the merged state.

use std::collections::HashSet;
use std::path::Path;

use hybrid_arch_types::{
    ArchitectureState, DiscoveredSkill, InitReport, LayerSource, LockFileAction, SkillScope,
    SourceKind,
};

const NONE: &str = "- (none)";
const STATUS_SKILL_LIMIT: usize = 50;
const CONTEXT_SKILL_LIMIT: usize = 8;
const COMPACTION_LIMIT: usize = 10;

fn bullets<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: std::fmt::Display,
{
    let lines: Vec<String> = items.into_iter().map(|item| format!("- {item}")).collect();
    if lines.is_empty() {
        vec![NONE.to_string()]
    } else {
        lines
    }
}

fn requested_lines(state: &ArchitectureState, limit: usize) -> Vec<String> {
    bullets(
        state
            .skill
            .requested
            .iter()
            .take(limit)
            .map(|s| format!("{}@{}", s.name, s.version)),
    )
}

fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn existing_sources(sources: &[LayerSource]) -> impl Iterator<Item = String> + '_ {
    sources
        .iter()
        .filter(|s| s.exists)
        .map(|s| format!("- Source: {}", s.path.display()))
}

fn project_source_names(state: &ArchitectureState, kind: SourceKind) -> Vec<String> {
    bullets(
        state
            .project
            .sources
            .iter()
            .filter(|s| s.kind == kind)
            .map(|s| base_name(&s.path)),
    )
}

/// Full report of all three layers and the first discovered skills.
pub fn format_status(state: &ArchitectureState, skills: &[DiscoveredSkill]) -> String {
    let mut lines = vec![
        "# Hybrid Architecture Status".to_string(),
        String::new(),
        "## Global Layer".to_string(),
        format!("- Config: {}", state.global.config_path.display()),
    ];
    lines.extend(existing_sources(&state.global.sources));

    lines.push(String::new());
    lines.push("## Skill Layer".to_string());
    lines.push(format!("- Lock: {}", state.skill.lock_path.display()));
    lines.push("### Requested".to_string());
    lines.extend(requested_lines(state, usize::MAX));

    lines.push(String::new());
    lines.push("## Project Layer".to_string());
    lines.push(format!("- Path: {}", state.project.project_path.display()));
    lines.extend(existing_sources(&state.project.sources));

    lines.push(String::new());
    lines.push("## Effective Config (Merged)".to_string());
    lines.push("### Rules".to_string());
    lines.extend(bullets(&state.merged.rules));
    lines.push(String::new());
    lines.push("### Docs".to_string());
    lines.extend(bullets(&state.merged.docs));
    if !state.merged.mcp_servers.is_empty() {
        lines.push(String::new());
        lines.push("### MCP Servers".to_string());
        lines.extend(bullets(&state.merged.mcp_servers));
    }

    lines.push(String::new());
    lines.push(format!("## Discovered Skills (first {STATUS_SKILL_LIMIT})"));
    lines.extend(bullets(
        skills
            .iter()
            .take(STATUS_SKILL_LIMIT)
            .map(|s| format!("{} ({}) -> {}", s.name, s.scope, s.tool_name)),
    ));

    lines.join("\n")
}

/// Context block injected silently at session start.
pub fn format_injected_context(state: &ArchitectureState, skills: &[DiscoveredSkill]) -> String {
    let mut lines = vec![
        "# Hybrid Architecture Context (Project > Skill > Global)".to_string(),
        String::new(),
        "## Active Rules Sources".to_string(),
    ];
    lines.extend(project_source_names(state, SourceKind::Rules));
    lines.push(String::new());
    lines.push("## Documentation Index".to_string());
    lines.extend(project_source_names(state, SourceKind::Docs));
    lines.push(String::new());
    lines.push("## Requested Skills (skills.lock.json)".to_string());
    lines.extend(requested_lines(state, usize::MAX));
    lines.push(String::new());
    lines.push("## Project Skills (highest priority)".to_string());
    lines.extend(bullets(
        skills
            .iter()
            .filter(|s| s.scope == SkillScope::Project)
            .take(CONTEXT_SKILL_LIMIT)
            .map(|s| format!("{} (tool: {})", s.name, s.tool_name)),
    ));
    lines.push(String::new());
    lines.push("## Priority Rules".to_string());
    lines.push("- Project overrides Skill overrides Global".to_string());
    lines.push("- When in doubt, follow Project layer rules first".to_string());
    lines.join("\n")
}

/// Condensed block kept across history compaction.
pub fn format_compaction_context(state: &ArchitectureState) -> String {
    let mut lines = vec![
        "## Hybrid Architecture (Persistent Context)".to_string(),
        "- Priority: Project > Skill > Global".to_string(),
        String::new(),
        "### Rules".to_string(),
    ];
    lines.extend(bullets(state.merged.rules.iter().take(COMPACTION_LIMIT)));
    lines.push(String::new());
    lines.push("### Docs".to_string());
    lines.extend(bullets(state.merged.docs.iter().take(COMPACTION_LIMIT)));
    lines.push(String::new());
    lines.push("### Requested Skills".to_string());
    lines.extend(requested_lines(state, COMPACTION_LIMIT));
    lines.join("\n")
}

/// Requested and discovered skills; `*` marks skills named in the lock file.
pub fn format_skill_list(state: &ArchitectureState, skills: &[DiscoveredSkill]) -> String {
    let requested: HashSet<&str> = state
        .skill
        .requested
        .iter()
        .map(|s| s.name.as_str())
        .collect();

    let mut lines = vec![
        "# Skills".to_string(),
        String::new(),
        "## Requested (skills.lock.json)".to_string(),
    ];
    lines.extend(requested_lines(state, usize::MAX));
    lines.push(String::new());
    lines.push("## Discovered".to_string());
    for skill in skills {
        let mark = if requested.contains(skill.name.as_str()) {
            "*"
        } else {
            " "
        };
        lines.push(format!(
            "- {mark} {} ({}) -> {}  v{}",
            skill.name, skill.scope, skill.tool_name, skill.version
        ));
    }
    lines.push(String::new());
    lines.push("Legend: '*' = requested by skills.lock.json".to_string());
    lines.join("\n")
}

/// One-line toast text, prefixed with the auto-init outcome when known.
pub fn format_toast_message(
    state: &ArchitectureState,
    skills: &[DiscoveredSkill],
    report: Option<&InitReport>,
) -> String {
    let project_skills = skills
        .iter()
        .filter(|s| s.scope == SkillScope::Project)
        .count();
    let base = format!(
        "Loaded. rules={}, requestedSkills={}, projectSkills={project_skills}. Use /arch-status.",
        state.merged.rules.len(),
        state.skill.requested.len(),
    );

    match report {
        Some(r) if matches!(r.lock_file_action, LockFileAction::Created | LockFileAction::Filled) => {
            format!(
                "Auto-init: {} skills.lock.json with {}. {base}",
                r.lock_file_action,
                r.applied_skills.join(", ")
            )
        }
        Some(r) if r.lock_file_action == LockFileAction::Skipped && r.applied_skills.is_empty() => {
            format!("Using existing skills.lock.json. {base}")
        }
        _ => base,
    }
}

/// Reply of the scaffold tool.
pub fn format_init_manifest(created: &[String]) -> String {
    let mut lines = vec![
        "Initialized Hybrid Architecture project scaffold.".to_string(),
        String::new(),
        "Created/Ensured:".to_string(),
    ];
    if created.is_empty() {
        lines.push("- (nothing new, project already initialized)".to_string());
    } else {
        lines.extend(created.iter().map(|f| format!("- {f}")));
    }
    lines.push(String::new());
    lines.push("Next:".to_string());
    lines.push("- Run /arch-status to view status (command file)".to_string());
    lines.push("- Or call tool arch_status directly".to_string());
    lines.join("\n")
}
