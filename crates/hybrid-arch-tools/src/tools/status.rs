//! `arch_status` tool: full report of every layer.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::ToolError;
use crate::render::format_status;
use crate::session::ArchSession;
use crate::tool::{ArchTool, ToolContext, ToolDefinition};

pub struct StatusTool {
    session: Arc<ArchSession>,
    definition: ToolDefinition,
}

impl StatusTool {
    pub fn new(session: Arc<ArchSession>) -> Self {
        let definition = ToolDefinition::no_args(
            "arch_status",
            "Show current Hybrid Architecture status (Global + Skill + Project) with discovered sources and skills.",
        );
        Self { session, definition }
    }
}

#[async_trait]
impl ArchTool for StatusTool {
    fn name(&self) -> &str {
        "arch_status"
    }

    fn label(&self) -> &str {
        "Architecture Status"
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _ctx: &ToolContext, _params: Value) -> Result<String, ToolError> {
        let snapshot = self.session.state().await?;
        Ok(format_status(&snapshot.state, &snapshot.skills))
    }
}
