//! Wires the session, tools and lifecycle hooks together.

use std::collections::BTreeMap;
use std::sync::Arc;

use hybrid_arch_config::AutoInitializer;
use hybrid_arch_config::scaffold::ensure_arch_commands;
use hybrid_arch_hooks::{
    HookError, HookEvent, HookOutput, HookRegistry, HookResult, handler, read_guard,
};
use hybrid_arch_types::InitReport;

use crate::ToolError;
use crate::host::{HostClient, Toast};
use crate::render::{format_compaction_context, format_injected_context, format_toast_message};
use crate::session::ArchSession;
use crate::tools::{ToolTable, create_arch_tools, create_skill_tools};

pub const ENV_ENABLED: &str = "OPENCODE_HYBRID_ARCH";
pub const ENV_PROJECT: &str = "OPENCODE_HYBRID_ARCH_PROJECT";
pub const ENV_GLOBAL_CONFIG: &str = "OPENCODE_HYBRID_ARCH_GLOBAL_CONFIG";

/// One project's plugin instance: tools plus hook handlers.
pub struct HybridArchPlugin {
    session: Arc<ArchSession>,
    host: Arc<dyn HostClient>,
    hooks: HookRegistry,
}

impl HybridArchPlugin {
    /// Build the plugin and register every lifecycle handler.
    pub async fn new(session: Arc<ArchSession>, host: Arc<dyn HostClient>) -> Self {
        let hooks = HookRegistry::new();

        {
            let session = session.clone();
            let host = host.clone();
            hooks
                .on(
                    "session_created",
                    handler(move |event| {
                        let session = session.clone();
                        let host = host.clone();
                        async move { on_session_created(&session, host.as_ref(), event).await }
                    }),
                )
                .await;
        }

        hooks.on("tool_execute_before", read_guard()).await;

        {
            let session = session.clone();
            hooks
                .on(
                    "tool_execute_after",
                    handler(move |event| {
                        let session = session.clone();
                        async move { on_tool_executed(&session, event).await }
                    }),
                )
                .await;
        }

        {
            let session = session.clone();
            hooks
                .on(
                    "shell_env",
                    handler(move |_| {
                        let session = session.clone();
                        async move { shell_env(&session).await }
                    }),
                )
                .await;
        }

        {
            let session = session.clone();
            hooks
                .on(
                    "session_compacting",
                    handler(move |_| {
                        let session = session.clone();
                        async move { compaction_context(&session).await }
                    }),
                )
                .await;
        }

        Self {
            session,
            host,
            hooks,
        }
    }

    pub fn session(&self) -> &Arc<ArchSession> {
        &self.session
    }

    /// Fixed tools plus one launch tool per installed skill.
    pub async fn tools(&self) -> Result<ToolTable, ToolError> {
        let mut tools = create_arch_tools(self.session.clone());
        tools.extend(create_skill_tools(&self.session, self.host.clone()).await?);
        Ok(tools)
    }

    /// Deliver a host event. Only a denied read is returned as an error.
    pub async fn handle(&self, event: HookEvent) -> Result<Vec<HookOutput>, HookError> {
        self.hooks.emit(event).await
    }
}

async fn on_session_created(
    session: &ArchSession,
    host: &dyn HostClient,
    event: HookEvent,
) -> HookResult {
    let HookEvent::SessionCreated { session_id } = event else {
        return Ok(None);
    };

    let report: InitReport = AutoInitializer::new(session.paths().clone())
        .initialize()
        .await;
    tracing::info!(
        project = %report.project_root.display(),
        project_type = %report.project_type,
        action = %report.lock_file_action,
        "Auto-init finished"
    );
    if !report.applied_skills.is_empty() && report.auto_reload {
        session.reload().await;
    }

    if let Err(e) = ensure_arch_commands(session.paths()).await {
        tracing::warn!("Could not write command files: {e}");
    }

    let snapshot = match session.state().await {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!("Could not resolve architecture state: {e}");
            return Ok(None);
        }
    };

    let context = format_injected_context(&snapshot.state, &snapshot.skills);
    if let Err(e) = host.inject_context(&session_id, &context).await {
        tracing::warn!(session_id, "Context injection failed: {e}");
    }

    let toast = Toast::info(format_toast_message(
        &snapshot.state,
        &snapshot.skills,
        Some(&report),
    ));
    if let Err(e) = host.show_toast(&toast).await {
        tracing::debug!("Toast not shown: {e}");
    }

    Ok(None)
}

async fn on_tool_executed(session: &ArchSession, event: HookEvent) -> HookResult {
    let HookEvent::ToolExecuteAfter { tool, .. } = &event else {
        return Ok(None);
    };
    if tool != "write" && tool != "edit" {
        return Ok(None);
    }
    let Some(path) = event.file_path() else {
        return Ok(None);
    };
    if session.resolver().is_architecture_file(path) {
        tracing::info!(path, "Architecture file changed, reloading");
        session.reload().await;
    }
    Ok(None)
}

async fn shell_env(session: &ArchSession) -> HookResult {
    let global_config = session.resolver().effective_global_config_path().await;
    let vars = BTreeMap::from([
        (ENV_ENABLED.to_string(), "1".to_string()),
        (
            ENV_PROJECT.to_string(),
            session.paths().project_root().display().to_string(),
        ),
        (
            ENV_GLOBAL_CONFIG.to_string(),
            global_config.display().to_string(),
        ),
    ]);
    Ok(Some(HookOutput::Env { vars }))
}

async fn compaction_context(session: &ArchSession) -> HookResult {
    match session.state().await {
        Ok(snapshot) => Ok(Some(HookOutput::Context {
            text: format_compaction_context(&snapshot.state),
        })),
        Err(e) => {
            tracing::warn!("Could not resolve architecture state: {e}");
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use hybrid_arch_config::ArchPaths;

    use crate::host::{BufferedHost, HostMessage};

    struct Fixture {
        _home: tempfile::TempDir,
        project: tempfile::TempDir,
        host: Arc<BufferedHost>,
        plugin: HybridArchPlugin,
    }

    async fn fixture() -> Fixture {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        let session = Arc::new(ArchSession::new(ArchPaths::new(project.path(), home.path())));
        let host = Arc::new(BufferedHost::new());
        let plugin = HybridArchPlugin::new(session, host.clone()).await;
        Fixture {
            _home: home,
            project,
            host,
            plugin,
        }
    }

    #[tokio::test]
    async fn test_session_created_seeds_lock_and_injects_context() {
        let f = fixture().await;
        let outputs = f
            .plugin
            .handle(HookEvent::SessionCreated {
                session_id: "ses_1".into(),
            })
            .await
            .unwrap();
        assert!(outputs.is_empty());

        assert!(f.project.path().join("skills.lock.json").exists());
        assert!(f
            .project
            .path()
            .join(".opencode/commands/arch-status.md")
            .exists());

        let messages = f.host.drain();
        assert_eq!(messages.len(), 2);
        let HostMessage::Context { session_id, text } = &messages[0] else {
            panic!("expected context message first");
        };
        assert_eq!(session_id, "ses_1");
        assert!(text.contains("- nextjs-docs-router@*"));
        let HostMessage::Toast(toast) = &messages[1] else {
            panic!("expected toast second");
        };
        assert!(toast.message.starts_with(
            "Auto-init: created skills.lock.json with nextjs-docs-router, nextjs-debug."
        ));
    }

    #[tokio::test]
    async fn test_sensitive_read_is_denied() {
        let f = fixture().await;
        let result = f
            .plugin
            .handle(HookEvent::ToolExecuteBefore {
                tool: "read".into(),
                args: json!({ "filePath": "/p/config/secrets.yaml" }),
            })
            .await;
        assert!(matches!(result, Err(HookError::AccessDenied { .. })));
    }

    #[tokio::test]
    async fn test_write_to_architecture_file_reloads() {
        let f = fixture().await;
        let session = f.plugin.session().clone();
        let before = session.state().await.unwrap();

        std::fs::write(f.project.path().join("AGENTS.md"), "# rules").unwrap();
        f.plugin
            .handle(HookEvent::ToolExecuteAfter {
                tool: "bash".into(),
                args: json!({ "filePath": "AGENTS.md" }),
            })
            .await
            .unwrap();
        assert!(Arc::ptr_eq(&before.state, &session.state().await.unwrap().state));

        f.plugin
            .handle(HookEvent::ToolExecuteAfter {
                tool: "write".into(),
                args: json!({ "filePath": f.project.path().join("AGENTS.md") }),
            })
            .await
            .unwrap();
        let after = session.state().await.unwrap();
        assert_eq!(after.state.merged.rules, vec!["AGENTS.md"]);
    }

    #[tokio::test]
    async fn test_relative_skill_path_reloads() {
        let f = fixture().await;
        let session = f.plugin.session().clone();
        let before = session.state().await.unwrap();

        f.plugin
            .handle(HookEvent::ToolExecuteAfter {
                tool: "edit".into(),
                args: json!({ "filePath": ".opencode/skills/foo/SKILL.md" }),
            })
            .await
            .unwrap();
        let after = session.state().await.unwrap();
        assert!(!Arc::ptr_eq(&before.state, &after.state));
    }

    #[tokio::test]
    async fn test_shell_env_and_compaction() {
        let f = fixture().await;
        let outputs = f.plugin.handle(HookEvent::ShellEnv).await.unwrap();
        let [HookOutput::Env { vars }] = outputs.as_slice() else {
            panic!("expected one env output");
        };
        assert_eq!(vars[ENV_ENABLED], "1");
        assert_eq!(vars[ENV_PROJECT], f.project.path().display().to_string());
        assert!(vars[ENV_GLOBAL_CONFIG].ends_with("hybrid-arch.json"));

        let outputs = f
            .plugin
            .handle(HookEvent::SessionCompacting { session_id: None })
            .await
            .unwrap();
        let [HookOutput::Context { text }] = outputs.as_slice() else {
            panic!("expected one context output");
        };
        assert!(text.starts_with("## Hybrid Architecture (Persistent Context)"));
    }

    #[tokio::test]
    async fn test_tools_include_installed_skills() {
        let f = fixture().await;
        assert_eq!(f.plugin.tools().await.unwrap().len(), 6);

        f.plugin
            .session()
            .skills()
            .install_builtin_skill_to_project("nextjs-debug")
            .await
            .unwrap();
        f.plugin.session().reload().await;
        let tools = f.plugin.tools().await.unwrap();
        assert_eq!(tools.len(), 7);
        assert!(tools.contains_key("skills_nextjs_debug"));
    }
}
