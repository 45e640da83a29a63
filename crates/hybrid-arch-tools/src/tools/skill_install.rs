//! `arch_skill_install` and `arch_skill_uninstall` tools.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::ToolError;
use crate::session::ArchSession;
use crate::tool::{ArchTool, ToolContext, ToolDefinition, parse_args};

#[derive(Debug, Deserialize)]
struct NameArgs {
    name: String,
}

fn name_definition(name: &str, description: &str) -> ToolDefinition {
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        parameters: json!({
            "type": "object",
            "properties": {
                "name": { "type": "string", "description": "Skill name" }
            },
            "required": ["name"]
        }),
    }
}

pub struct SkillInstallTool {
    session: Arc<ArchSession>,
    definition: ToolDefinition,
}

impl SkillInstallTool {
    pub fn new(session: Arc<ArchSession>) -> Self {
        let definition = name_definition(
            "arch_skill_install",
            "Install a built-in skill into the current project (.opencode/skills/<skill>/SKILL.md) and update skills.lock.json.",
        );
        Self { session, definition }
    }
}

#[async_trait]
impl ArchTool for SkillInstallTool {
    fn name(&self) -> &str {
        "arch_skill_install"
    }

    fn label(&self) -> &str {
        "Skill Install"
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _ctx: &ToolContext, params: Value) -> Result<String, ToolError> {
        let args: NameArgs = parse_args(params)?;
        let msg = self
            .session
            .skills()
            .install_builtin_skill_to_project(&args.name)
            .await?;
        self.session.reload().await;
        Ok(msg)
    }
}

pub struct SkillUninstallTool {
    session: Arc<ArchSession>,
    definition: ToolDefinition,
}

impl SkillUninstallTool {
    pub fn new(session: Arc<ArchSession>) -> Self {
        let definition = name_definition(
            "arch_skill_uninstall",
            "Uninstall a project skill (.opencode/skills/<skill>) and update skills.lock.json.",
        );
        Self { session, definition }
    }
}

#[async_trait]
impl ArchTool for SkillUninstallTool {
    fn name(&self) -> &str {
        "arch_skill_uninstall"
    }

    fn label(&self) -> &str {
        "Skill Uninstall"
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _ctx: &ToolContext, params: Value) -> Result<String, ToolError> {
        let args: NameArgs = parse_args(params)?;
        let msg = self
            .session
            .skills()
            .uninstall_project_skill(&args.name)
            .await?;
        self.session.reload().await;
        Ok(msg)
    }
}
