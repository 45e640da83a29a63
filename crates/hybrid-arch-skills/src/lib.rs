//! hybrid-arch-skills: skill manifests, discovery and installation.
//!
//! A skill is a directory holding a `SKILL.md` whose front matter names it:
//!
//! ```markdown
//! ---
//! name: review-pr
//! version: 1.0.0
//! description: Review a pull request before merge
//! tags:
//!   - review
//! allowed-tools:
//!   - read
//!   - bash
//! ---
//!
//! # review-pr
//!
//! [Guidance injected when the skill is launched]
//! ```
//!
//! The directory name must equal `name`.

pub mod builtin;
pub mod commands;
pub mod frontmatter;
pub mod loader;
pub mod manager;

use thiserror::Error;

pub use commands::{SkillCommand, build_skill_commands};
pub use frontmatter::{SkillFrontmatter, parse_skill_file};
pub use loader::{SkillRoot, discover_skills, skill_roots, tool_name_for};
pub use manager::SkillManager;

#[derive(Debug, Error)]
pub enum SkillError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] hybrid_arch_config::ConfigError),
    #[error("Skill discovery task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
