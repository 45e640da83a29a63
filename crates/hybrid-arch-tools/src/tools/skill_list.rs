//! `arch_skill_list` tool.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::ToolError;
use crate::render::format_skill_list;
use crate::session::ArchSession;
use crate::tool::{ArchTool, ToolContext, ToolDefinition};

pub struct SkillListTool {
    session: Arc<ArchSession>,
    definition: ToolDefinition,
}

impl SkillListTool {
    pub fn new(session: Arc<ArchSession>) -> Self {
        let definition = ToolDefinition::no_args(
            "arch_skill_list",
            "List discovered skills and which ones are requested by skills.lock.json.",
        );
        Self { session, definition }
    }
}

#[async_trait]
impl ArchTool for SkillListTool {
    fn name(&self) -> &str {
        "arch_skill_list"
    }

    fn label(&self) -> &str {
        "Skill List"
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _ctx: &ToolContext, _params: Value) -> Result<String, ToolError> {
        let snapshot = self.session.state().await?;
        Ok(format_skill_list(&snapshot.state, &snapshot.skills))
    }
}
