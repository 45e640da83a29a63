//! Sensitive file read guard.
//!
//! This is a fixed deny list. It is not part of the layered configuration
//! and cannot be relaxed by any layer.

use crate::HookError;
use crate::events::HookEvent;
use crate::registry::{HookHandler, HookResult, handler};

/// Substrings that mark a path as sensitive, compared case-insensitively.
pub const SENSITIVE_PATTERNS: &[&str] = &[".env", "credentials", "secrets"];

/// Reject `path` if it looks like a secrets file.
pub fn check_read_access(path: &str) -> Result<(), HookError> {
    let lower = path.to_lowercase();
    if SENSITIVE_PATTERNS.iter().any(|p| lower.contains(p)) {
        tracing::warn!(path, "Blocked read of sensitive file");
        return Err(HookError::AccessDenied {
            path: path.to_string(),
        });
    }
    Ok(())
}

/// `tool_execute_before` handler guarding the host's `read` tool.
pub fn read_guard() -> HookHandler {
    handler(guard_read)
}

async fn guard_read(event: HookEvent) -> HookResult {
    if let HookEvent::ToolExecuteBefore { tool, .. } = &event {
        if tool == "read" {
            check_read_access(event.file_path().unwrap_or_default())?;
        }
    }
    Ok(None)
}
