//! `arch_reload` tool: drop caches and resolve again.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::ToolError;
use crate::session::ArchSession;
use crate::tool::{ArchTool, ToolContext, ToolDefinition};

pub struct ReloadTool {
    session: Arc<ArchSession>,
    definition: ToolDefinition,
}

impl ReloadTool {
    pub fn new(session: Arc<ArchSession>) -> Self {
        let definition = ToolDefinition::no_args(
            "arch_reload",
            "Reload Hybrid Architecture configuration from disk (Global/Skill/Project) and re-discover skills.",
        );
        Self { session, definition }
    }
}

#[async_trait]
impl ArchTool for ReloadTool {
    fn name(&self) -> &str {
        "arch_reload"
    }

    fn label(&self) -> &str {
        "Architecture Reload"
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _ctx: &ToolContext, _params: Value) -> Result<String, ToolError> {
        self.session.reload().await;
        self.session.state().await?;
        Ok("Reloaded hybrid-arch configuration and skills.".to_string())
    }
}
