//! Host-facing tool implementations.
//!
//! The six `arch_*` tools are fixed. Skill tools are rebuilt from each
//! discovery cycle, one per installed skill.

pub mod init;
pub mod reload;
pub mod skill;
pub mod skill_install;
pub mod skill_list;
pub mod status;

use std::collections::HashMap;
use std::sync::Arc;

use hybrid_arch_skills::build_skill_commands;

use crate::ToolError;
use crate::host::HostClient;
use crate::session::ArchSession;
use crate::tool::ArchTool;

/// Tool name to tool.
pub type ToolTable = HashMap<String, Arc<dyn ArchTool>>;

/// Create the fixed `arch_*` tools, keyed by tool name.
pub fn create_arch_tools(session: Arc<ArchSession>) -> ToolTable {
    let tools: Vec<Arc<dyn ArchTool>> = vec![
        Arc::new(status::StatusTool::new(session.clone())),
        Arc::new(reload::ReloadTool::new(session.clone())),
        Arc::new(init::InitTool::new(session.clone())),
        Arc::new(skill_list::SkillListTool::new(session.clone())),
        Arc::new(skill_install::SkillInstallTool::new(session.clone())),
        Arc::new(skill_install::SkillUninstallTool::new(session)),
    ];

    tools
        .into_iter()
        .map(|t| (t.name().to_string(), t))
        .collect()
}

/// Create one launch tool per non-builtin skill in the current discovery.
pub async fn create_skill_tools(
    session: &ArchSession,
    host: Arc<dyn HostClient>,
) -> Result<ToolTable, ToolError> {
    let snapshot = session.state().await?;
    Ok(build_skill_commands(&snapshot.skills)
        .into_iter()
        .map(|command| {
            let tool: Arc<dyn ArchTool> = Arc::new(skill::SkillTool::new(command, host.clone()));
            (tool.name().to_string(), tool)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use hybrid_arch_config::ArchPaths;

    use crate::host::{BufferedHost, HostMessage};
    use crate::tool::ToolContext;

    struct Fixture {
        _home: tempfile::TempDir,
        _project: tempfile::TempDir,
        session: Arc<ArchSession>,
    }

    fn fixture() -> Fixture {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        let session = Arc::new(ArchSession::new(ArchPaths::new(project.path(), home.path())));
        Fixture {
            _home: home,
            _project: project,
            session,
        }
    }

    async fn run(tools: &ToolTable, name: &str, params: serde_json::Value) -> String {
        tools[name]
            .execute(&ToolContext::new("ses_1"), params)
            .await
            .unwrap()
    }

    #[test]
    fn test_fixed_tool_names() {
        let f = fixture();
        let mut names: Vec<_> = create_arch_tools(f.session.clone()).into_keys().collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "arch_init",
                "arch_reload",
                "arch_skill_install",
                "arch_skill_list",
                "arch_skill_uninstall",
                "arch_status"
            ]
        );
    }

    #[tokio::test]
    async fn test_init_then_status() {
        let f = fixture();
        let tools = create_arch_tools(f.session.clone());

        let init = run(&tools, "arch_init", json!({ "installBuiltinSkills": false })).await;
        assert!(init.contains("- .opencode/hybrid-arch.json"));
        assert!(init.contains("- skills.lock.json"));
        assert!(!init.contains(".opencode/skills/{"));

        let status = run(&tools, "arch_status", serde_json::Value::Null).await;
        assert!(status.contains("- nextjs-debug@1.0.0"));
        assert!(status.contains("### Rules\n- AGENTS.md\n- CLAUDE.md"));
        assert!(status.contains("nextjs-debug (builtin) -> skills_nextjs_debug"));
    }

    #[tokio::test]
    async fn test_install_unknown_and_uninstall() {
        let f = fixture();
        let tools = create_arch_tools(f.session.clone());

        let unknown = run(&tools, "arch_skill_install", json!({ "name": "nope" })).await;
        assert!(unknown.starts_with("Unknown built-in skill: nope"));

        run(&tools, "arch_skill_install", json!({ "name": "nextjs-debug" })).await;
        let list = run(&tools, "arch_skill_list", json!({})).await;
        assert!(list.contains("- * nextjs-debug (project) -> skills_nextjs_debug  v1.0.0"));

        run(&tools, "arch_skill_uninstall", json!({ "name": "nextjs-debug" })).await;
        let list = run(&tools, "arch_skill_list", json!({})).await;
        assert!(list.contains("-   nextjs-debug (builtin)"));
    }

    #[tokio::test]
    async fn test_missing_name_is_an_error() {
        let f = fixture();
        let tools = create_arch_tools(f.session.clone());
        let err = tools["arch_skill_install"]
            .execute(&ToolContext::new("ses_1"), json!({}))
            .await;
        assert!(matches!(err, Err(ToolError::InvalidArgs(_))));
    }

    #[tokio::test]
    async fn test_skill_tools_send_two_silent_messages() {
        let f = fixture();
        let dir = f.session.paths().project_skills_dir().join("review");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("SKILL.md"),
            "---\nname: review\ndescription: review the current diff\n---\n\nCheck tests first.\n",
        )
        .unwrap();

        let host = Arc::new(BufferedHost::new());
        let tools = create_skill_tools(&f.session, host.clone()).await.unwrap();
        assert_eq!(tools.len(), 1);

        let reply = run(&tools, "skills_review", json!({})).await;
        assert_eq!(reply, "Launching skill: review");

        let messages = host.drain();
        assert_eq!(messages.len(), 2);
        assert_eq!(
            messages[0],
            HostMessage::Context {
                session_id: "ses_1".into(),
                text: "The \"review\" skill is loading\nreview".into(),
            }
        );
        assert_eq!(
            messages[1],
            HostMessage::Context {
                session_id: "ses_1".into(),
                text: format!("Base directory for this skill: {}\n\nCheck tests first.", dir.display()),
            }
        );
    }
}
