//! Invocable commands compiled from discovered skills.

use std::path::PathBuf;

use hybrid_arch_types::{DiscoveredSkill, SkillScope};

/// One invocable skill, keyed by its tool name.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillCommand {
    pub tool_name: String,
    pub skill_name: String,
    pub description: String,
    /// Skill directory shown to the model as the base for relative paths.
    pub base_dir: PathBuf,
    pub content: String,
}

impl SkillCommand {
    /// First silent message: announces the skill.
    pub fn loading_message(&self) -> String {
        format!(
            "The \"{name}\" skill is loading\n{name}",
            name = self.skill_name
        )
    }

    /// Second silent message: the guidance itself.
    pub fn content_message(&self) -> String {
        format!(
            "Base directory for this skill: {}\n\n{}",
            self.base_dir.display(),
            self.content
        )
    }

    /// Text returned to the caller once both messages are sent.
    pub fn launch_reply(&self) -> String {
        format!("Launching skill: {}", self.skill_name)
    }
}

/// Build commands for skills that exist on disk.
///
/// Built-ins are skipped until installed, since they have no base directory.
pub fn build_skill_commands(skills: &[DiscoveredSkill]) -> Vec<SkillCommand> {
    skills
        .iter()
        .filter(|s| s.scope != SkillScope::Builtin)
        .filter_map(|s| {
            Some(SkillCommand {
                tool_name: s.tool_name.clone(),
                skill_name: s.name.clone(),
                description: s.description.clone(),
                base_dir: s.full_path.clone()?,
                content: s.content.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skill(name: &str, scope: SkillScope, full_path: Option<&str>) -> DiscoveredSkill {
        DiscoveredSkill {
            name: name.into(),
            version: "local".into(),
            description: format!("{name} description"),
            scope,
            full_path: full_path.map(PathBuf::from),
            skill_md_path: full_path.map(|p| PathBuf::from(p).join("SKILL.md")),
            tool_name: format!("skills_{}", name.replace('-', "_")),
            content: "Do the thing.".into(),
            tags: None,
            allowed_tools: None,
        }
    }

    #[test]
    fn test_build_skill_commands_skips_builtins() {
        let skills = vec![
            skill("review-pr", SkillScope::Project, Some("/p/.opencode/skills/review-pr")),
            skill("nextjs-debug", SkillScope::Builtin, None),
        ];

        let cmds = build_skill_commands(&skills);
        assert_eq!(cmds.len(), 1);
        assert_eq!(cmds[0].tool_name, "skills_review_pr");
    }

    #[test]
    fn test_messages() {
        let cmds = build_skill_commands(&[skill(
            "review-pr",
            SkillScope::User,
            Some("/home/u/.opencode/skills/review-pr"),
        )]);
        let cmd = &cmds[0];
        assert_eq!(cmd.loading_message(), "The \"review-pr\" skill is loading\nreview-pr");
        assert_eq!(
            cmd.content_message(),
            "Base directory for this skill: /home/u/.opencode/skills/review-pr\n\nDo the thing."
        );
        assert_eq!(cmd.launch_reply(), "Launching skill: review-pr");
    }
}
