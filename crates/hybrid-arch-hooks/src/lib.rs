//! hybrid-arch-hooks: host lifecycle events and the read guard.
//!
//! The host delivers session, tool and shell events; handlers registered on
//! a [`HookRegistry`] run in order and may contribute environment variables
//! or context blocks. The read guard is the only handler that fails.

pub mod events;
pub mod guard;
pub mod registry;

use thiserror::Error;

pub use events::{HookEvent, HookOutput};
pub use guard::{check_read_access, read_guard};
pub use registry::{HookHandler, HookRegistry, HookResult, handler};

#[derive(Debug, Error)]
pub enum HookError {
    #[error("Access denied: Cannot read sensitive file {path}")]
    AccessDenied { path: String },
}
