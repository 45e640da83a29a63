//! Skills shipped inside the binary.

/// An embedded skill manifest.
#[derive(Debug, Clone, Copy)]
pub struct BuiltinSkill {
    pub name: &'static str,
    pub version: &'static str,
    /// Full `SKILL.md` text, front matter included.
    pub manifest: &'static str,
}

// Kept in name order.
const BUILTIN_SKILLS: &[BuiltinSkill] = &[
    BuiltinSkill {
        name: "nextjs-debug",
        version: "1.0.0",
        manifest: include_str!("../builtin/nextjs-debug/SKILL.md"),
    },
    BuiltinSkill {
        name: "nextjs-docs-router",
        version: "1.0.0",
        manifest: include_str!("../builtin/nextjs-docs-router/SKILL.md"),
    },
];

/// Look up a built-in skill by name.
pub fn builtin_skill(name: &str) -> Option<&'static BuiltinSkill> {
    BUILTIN_SKILLS.iter().find(|s| s.name == name)
}

/// All built-in skills, in name order.
pub fn builtin_skills() -> &'static [BuiltinSkill] {
    BUILTIN_SKILLS
}

/// Sorted built-in skill names.
pub fn builtin_skill_names() -> Vec<&'static str> {
    let mut names: Vec<_> = BUILTIN_SKILLS.iter().map(|s| s.name).collect();
    names.sort_unstable();
    names
}
