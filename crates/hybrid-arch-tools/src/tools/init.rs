//! `arch_init` tool: project scaffold.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Value, json};

use hybrid_arch_config::scaffold::{ScaffoldOptions, init_project_scaffold};

use crate::ToolError;
use crate::render::format_init_manifest;
use crate::session::ArchSession;
use crate::tool::{ArchTool, ToolContext, ToolDefinition, parse_args};

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InitArgs {
    #[serde(default = "default_true")]
    install_builtin_skills: bool,
    #[serde(default = "default_true")]
    write_commands: bool,
}

pub struct InitTool {
    session: Arc<ArchSession>,
    definition: ToolDefinition,
}

impl InitTool {
    pub fn new(session: Arc<ArchSession>) -> Self {
        let definition = ToolDefinition {
            name: "arch_init".to_string(),
            description: "Initialize Hybrid Architecture project files (.opencode/hybrid-arch.json, skills.lock.json, commands, and optional built-in skills).".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "installBuiltinSkills": {
                        "type": "boolean",
                        "description": "Install the built-in skills into .opencode/skills (default true)"
                    },
                    "writeCommands": {
                        "type": "boolean",
                        "description": "Write the /arch-* command files (default true)"
                    }
                },
                "required": []
            }),
        };
        Self { session, definition }
    }
}

#[async_trait]
impl ArchTool for InitTool {
    fn name(&self) -> &str {
        "arch_init"
    }

    fn label(&self) -> &str {
        "Architecture Init"
    }

    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, _ctx: &ToolContext, params: Value) -> Result<String, ToolError> {
        let args: InitArgs = parse_args(params)?;
        let options = ScaffoldOptions {
            install_builtin_skills: args.install_builtin_skills,
            write_commands: args.write_commands,
        };

        let created =
            init_project_scaffold(self.session.paths(), options, self.session.skills()).await?;
        self.session.reload().await;
        Ok(format_init_manifest(&created))
    }
}
