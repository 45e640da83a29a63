//! The tool interface exposed to the host.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::ToolError;

/// Name, description and JSON-schema parameters advertised to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub parameters: Value,
}

impl ToolDefinition {
    /// A definition taking no arguments.
    pub fn no_args(name: &str, description: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            parameters: json!({
                "type": "object",
                "properties": {},
                "required": []
            }),
        }
    }
}

/// Per-call information from the host.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolContext {
    pub session_id: String,
}

impl ToolContext {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

#[async_trait]
pub trait ArchTool: Send + Sync {
    fn name(&self) -> &str;

    fn label(&self) -> &str;

    fn definition(&self) -> &ToolDefinition;

    /// Run the tool. User-facing failures are returned as text, not errors.
    async fn execute(&self, ctx: &ToolContext, params: Value) -> Result<String, ToolError>;
}

/// Deserialize tool arguments, treating `null` as an empty object.
pub(crate) fn parse_args<T: serde::de::DeserializeOwned>(params: Value) -> Result<T, ToolError> {
    let params = if params.is_null() { json!({}) } else { params };
    Ok(serde_json::from_value(params)?)
}
