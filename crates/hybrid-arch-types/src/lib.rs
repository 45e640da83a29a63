use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ──────────────────── Layer Types ────────────────────

/// What a physical file or directory contributes to a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    Config,
    Rules,
    Docs,
    SkillsLock,
    SkillsDir,
    Other,
}

/// One file or directory that may contribute to a layer.
///
/// Entries with `exists == false` are kept so status reports can show
/// where a layer would have been read from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerSource {
    pub path: PathBuf,
    pub exists: bool,
    pub kind: SourceKind,
}

impl LayerSource {
    pub fn new(path: impl Into<PathBuf>, exists: bool, kind: SourceKind) -> Self {
        Self {
            path: path.into(),
            exists,
            kind,
        }
    }
}

/// User-wide layer document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalLayerConfig {
    /// Agent name → arbitrary settings.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub agents: Map<String, Value>,
    /// MCP server identifiers.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub mcp_servers: Vec<String>,
    /// Rule file references.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rules: Vec<String>,
}

/// Project-local layer document (`<project>/.opencode/hybrid-arch.json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectLayerConfig {
    /// Rule files, relative to the project root.
    #[serde(default)]
    pub rules: Vec<String>,
    /// Documentation paths, relative to the project root.
    #[serde(default)]
    pub docs: Vec<String>,
    /// Agent overrides; a key here wins over the same key globally.
    #[serde(default)]
    pub agents: Map<String, Value>,
}

// ──────────────────── Lock File Types ────────────────────

/// Version wildcard used when a lock entry does not pin a version.
pub const ANY_VERSION: &str = "*";

fn any_version() -> String {
    ANY_VERSION.to_string()
}

/// A single skill value in `skills.lock.json`.
///
/// Both `"name": "1.0.0"` and `"name": { "version": "1.0.0" }` are accepted
/// on read; only the flat string form is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LockedVersion {
    Version(String),
    Detailed {
        #[serde(default = "any_version")]
        version: String,
    },
}

impl LockedVersion {
    /// Parse one entry, or `None` for a value of neither shape.
    pub fn from_value(value: &Value) -> Option<Self> {
        serde_json::from_value(value.clone()).ok()
    }

    pub fn version(&self) -> &str {
        match self {
            LockedVersion::Version(v) => v,
            LockedVersion::Detailed { version } => version,
        }
    }
}

const SKILLS_KEY: &str = "skills";
const UPDATED_AT_KEY: &str = "updatedAt";

/// The declared set of skills for a project.
///
/// Held as the raw JSON document: entries and top-level fields that do not
/// fit the known shapes are carried through every rewrite untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SkillLockFile(pub Map<String, Value>);

impl SkillLockFile {
    /// A lock file requesting `skills`, stamped with `updated_at`.
    pub fn new<I, N, V>(skills: I, updated_at: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = (N, V)>,
        N: Into<String>,
        V: Into<String>,
    {
        let skills: Map<String, Value> = skills
            .into_iter()
            .map(|(name, version)| (name.into(), Value::String(version.into())))
            .collect();
        let mut doc = Map::new();
        doc.insert(SKILLS_KEY.into(), Value::Object(skills));
        doc.insert(UPDATED_AT_KEY.into(), Value::String(updated_at.into()));
        Self(doc)
    }

    /// The raw `skills` object, if it is one.
    pub fn skills(&self) -> Option<&Map<String, Value>> {
        self.0.get(SKILLS_KEY).and_then(Value::as_object)
    }

    /// Whether the file declares anything under `skills`.
    ///
    /// Only a missing, `null` or empty-object `skills` counts as empty; a
    /// value of any other shape is treated as user data.
    pub fn has_skills(&self) -> bool {
        match self.0.get(SKILLS_KEY) {
            None | Some(Value::Null) => false,
            Some(Value::Object(skills)) => !skills.is_empty(),
            Some(_) => true,
        }
    }

    /// The `skills` object for editing, created when missing or `null`.
    ///
    /// `None` when `skills` holds some other kind of value.
    pub fn skills_mut(&mut self) -> Option<&mut Map<String, Value>> {
        let slot = self
            .0
            .entry(SKILLS_KEY)
            .or_insert_with(|| Value::Object(Map::new()));
        if slot.is_null() {
            *slot = Value::Object(Map::new());
        }
        slot.as_object_mut()
    }

    pub fn version_of(&self, name: &str) -> Option<String> {
        let value = self.skills()?.get(name)?;
        LockedVersion::from_value(value).map(|v| v.version().to_string())
    }

    pub fn updated_at(&self) -> Option<&str> {
        self.0.get(UPDATED_AT_KEY).and_then(Value::as_str)
    }

    pub fn set_updated_at(&mut self, timestamp: impl Into<String>) {
        self.0
            .insert(UPDATED_AT_KEY.into(), Value::String(timestamp.into()));
    }

    /// Requested skills as `{name, version}` pairs, sorted by name.
    ///
    /// Entries of an unknown shape are skipped.
    pub fn requested(&self) -> Vec<SkillLockEntry> {
        let Some(skills) = self.skills() else {
            return Vec::new();
        };
        // Map iteration is ordered by key.
        skills
            .iter()
            .filter_map(|(name, value)| {
                let version = LockedVersion::from_value(value)?;
                Some(SkillLockEntry {
                    name: name.clone(),
                    version: version.version().to_string(),
                })
            })
            .collect()
    }

    /// Flatten `{ "version": v }` entries into `v`.
    ///
    /// Objects carrying other keys, and values of unknown shape, are left as
    /// they are.
    pub fn canonicalize(&mut self) {
        let Some(skills) = self.0.get_mut(SKILLS_KEY).and_then(Value::as_object_mut) else {
            return;
        };
        for value in skills.values_mut() {
            let only_version = value
                .as_object()
                .is_some_and(|entry| entry.keys().all(|k| k == "version"));
            if !only_version {
                continue;
            }
            if let Some(LockedVersion::Detailed { version }) = LockedVersion::from_value(value) {
                *value = Value::String(version);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillLockEntry {
    pub name: String,
    pub version: String,
}

// ──────────────────── Skill Types ────────────────────

/// Which base directory tier a skill was found in, highest precedence first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillScope {
    Project,
    User,
    Xdg,
    Builtin,
}

impl SkillScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillScope::Project => "project",
            SkillScope::User => "user",
            SkillScope::Xdg => "xdg",
            SkillScope::Builtin => "builtin",
        }
    }
}

impl fmt::Display for SkillScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A skill that passed validation, or a built-in catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredSkill {
    pub name: String,
    pub version: String,
    pub description: String,
    pub scope: SkillScope,
    /// Skill directory. `None` for built-ins, which have no backing files.
    pub full_path: Option<PathBuf>,
    pub skill_md_path: Option<PathBuf>,
    /// Identity used for de-duplication across scopes.
    pub tool_name: String,
    /// Manifest body with the front matter removed.
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_tools: Option<Vec<String>>,
}

// ──────────────────── State Types ────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalLayer {
    /// The config path actually read (scoped if present, otherwise legacy).
    pub config_path: PathBuf,
    /// The narrative rules document selected the same way.
    pub agents_path: PathBuf,
    pub config: GlobalLayerConfig,
    pub sources: Vec<LayerSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillLayer {
    pub lock_path: PathBuf,
    pub lock: SkillLockFile,
    pub requested: Vec<SkillLockEntry>,
    pub sources: Vec<LayerSource>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectLayer {
    pub project_path: PathBuf,
    pub config_path: PathBuf,
    pub config: ProjectLayerConfig,
    pub sources: Vec<LayerSource>,
}

/// The precedence-applied view of all layers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MergedConfig {
    /// Ordered, string-unique.
    pub rules: Vec<String>,
    /// Ordered, string-unique. Project layer only.
    pub docs: Vec<String>,
    /// Global agents overlaid by project agents.
    pub agents: Map<String, Value>,
    pub mcp_servers: Vec<String>,
}

/// Read-only snapshot of every layer plus the merged view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchitectureState {
    pub global: GlobalLayer,
    pub skill: SkillLayer,
    pub project: ProjectLayer,
    pub merged: MergedConfig,
}

// ──────────────────── Auto-Init Types ────────────────────

/// Apparent project flavor, for reporting only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectType {
    Nextjs,
    Nodejs,
    Python,
    Rust,
    Go,
    #[default]
    Generic,
}

impl fmt::Display for ProjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ProjectType::Nextjs => "nextjs",
            ProjectType::Nodejs => "nodejs",
            ProjectType::Python => "python",
            ProjectType::Rust => "rust",
            ProjectType::Go => "go",
            ProjectType::Generic => "generic",
        };
        f.write_str(s)
    }
}

/// What the auto-initializer did to the lock file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockFileAction {
    Created,
    Filled,
    Skipped,
    Disabled,
}

impl fmt::Display for LockFileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LockFileAction::Created => "created",
            LockFileAction::Filled => "filled",
            LockFileAction::Skipped => "skipped",
            LockFileAction::Disabled => "disabled",
        };
        f.write_str(s)
    }
}

/// One-line status surfaced after auto-initialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitReport {
    pub project_root: PathBuf,
    pub project_type: ProjectType,
    pub lock_file_action: LockFileAction,
    pub applied_skills: Vec<String>,
    pub auto_reload: bool,
}
