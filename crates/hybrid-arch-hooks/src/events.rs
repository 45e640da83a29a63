//! Hook event and output types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle events delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HookEvent {
    /// A new chat session was created.
    SessionCreated { session_id: String },
    /// A host tool is about to run.
    ToolExecuteBefore {
        tool: String,
        #[serde(default)]
        args: Value,
    },
    /// A host tool has finished.
    ToolExecuteAfter {
        tool: String,
        #[serde(default)]
        args: Value,
    },
    /// The host is preparing a shell environment.
    ShellEnv,
    /// The session history is about to be compacted.
    SessionCompacting {
        #[serde(default)]
        session_id: Option<String>,
    },
}

impl HookEvent {
    /// Routing key used by the registry.
    pub fn name(&self) -> &'static str {
        match self {
            HookEvent::SessionCreated { .. } => "session_created",
            HookEvent::ToolExecuteBefore { .. } => "tool_execute_before",
            HookEvent::ToolExecuteAfter { .. } => "tool_execute_after",
            HookEvent::ShellEnv => "shell_env",
            HookEvent::SessionCompacting { .. } => "session_compacting",
        }
    }

    /// `args.filePath` of a tool event, if present.
    pub fn file_path(&self) -> Option<&str> {
        match self {
            HookEvent::ToolExecuteBefore { args, .. } | HookEvent::ToolExecuteAfter { args, .. } => {
                args.get("filePath").and_then(Value::as_str)
            }
            _ => None,
        }
    }
}

/// What a handler contributes back to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HookOutput {
    /// Environment variables to add to the shell.
    Env { vars: BTreeMap<String, String> },
    /// A context block to keep across compaction.
    Context { text: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_tool_event() {
        let event: HookEvent = serde_json::from_value(json!({
            "type": "tool_execute_before",
            "tool": "read",
            "args": { "filePath": "/p/.env" }
        }))
        .unwrap();
        assert_eq!(event.name(), "tool_execute_before");
        assert_eq!(event.file_path(), Some("/p/.env"));
    }

    #[test]
    fn test_parse_unit_and_optional_events() {
        let env: HookEvent = serde_json::from_value(json!({ "type": "shell_env" })).unwrap();
        assert_eq!(env, HookEvent::ShellEnv);
        assert_eq!(env.file_path(), None);

        let compact: HookEvent =
            serde_json::from_value(json!({ "type": "session_compacting" })).unwrap();
        assert_eq!(compact, HookEvent::SessionCompacting { session_id: None });

        let after: HookEvent =
            serde_json::from_value(json!({ "type": "tool_execute_after", "tool": "bash" })).unwrap();
        assert_eq!(after.file_path(), None);
    }

    #[test]
    fn test_output_wire_shape() {
        let out = HookOutput::Context { text: "x".into() };
        assert_eq!(
            serde_json::to_value(&out).unwrap(),
            json!({ "type": "context", "text": "x" })
        );
    }
}
