//! Per-skill launch tools, one per installed skill.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use hybrid_arch_skills::SkillCommand;

use crate::ToolError;
use crate::host::HostClient;
use crate::tool::{ArchTool, ToolContext, ToolDefinition};

/// Sends a skill's guidance into the calling session.
pub struct SkillTool {
    command: SkillCommand,
    host: Arc<dyn HostClient>,
    definition: ToolDefinition,
}

impl SkillTool {
    pub fn new(command: SkillCommand, host: Arc<dyn HostClient>) -> Self {
        let definition = ToolDefinition::no_args(&command.tool_name, &command.description);
        Self {
            command,
            host,
            definition,
        }
    }
}

#[async_trait]
impl ArchTool for SkillTool {
    fn name(&self) -> &str {
        &self.command.tool_name
    }

    fn label(&self) -> &str {
        &self.command.skill_name
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, ctx: &ToolContext, _params: Value) -> Result<String, ToolError> {
        self.host
            .inject_context(&ctx.session_id, &self.command.loading_message())
            .await?;
        self.host
            .inject_context(&ctx.session_id, &self.command.content_message())
            .await?;
        tracing::info!(skill = %self.command.skill_name, "Skill launched");
        Ok(self.command.launch_reply())
    }
}
