//! hybrid-arch-tools: the surface the host plugin runtime talks to.
//!
//! Provides:
//! - [`ArchSession`], owning the memoized state of one project
//! - The fixed `arch_*` tools and one launch tool per installed skill
//! - Markdown renderings of the merged state
//! - [`HybridArchPlugin`], which registers every lifecycle hook

pub mod host;
pub mod plugin;
pub mod render;
pub mod session;
pub mod tool;
pub mod tools;

use thiserror::Error;

pub use host::{BufferedHost, HostClient, HostMessage, Toast};
pub use plugin::HybridArchPlugin;
pub use session::{ArchSession, Snapshot};
pub use tool::{ArchTool, ToolContext, ToolDefinition};
pub use tools::{ToolTable, create_arch_tools, create_skill_tools};

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Invalid tool arguments: {0}")]
    InvalidArgs(#[from] serde_json::Error),
    #[error(transparent)]
    Config(#[from] hybrid_arch_config::ConfigError),
    #[error(transparent)]
    Skill(#[from] hybrid_arch_skills::SkillError),
    #[error(transparent)]
    Host(#[from] anyhow::Error),
}
