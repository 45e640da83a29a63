//! Editing the host's `opencode.json` plugin list.

use std::path::Path;

use anyhow::Context;
use serde_json::{Map, Value, json};

use hybrid_arch_config::loader::{path_exists, write_json_atomic};

pub const PLUGIN_ID: &str = "@opencode-ai/hybrid-arch";
const HOST_SCHEMA: &str = "https://opencode.ai/config.json";

async fn read_host_config(path: &Path) -> anyhow::Result<Map<String, Value>> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;
    json5::from_str(&content).with_context(|| format!("parsing {}", path.display()))
}

fn plugin_list(config: &Map<String, Value>) -> Vec<Value> {
    match config.get("plugin") {
        Some(Value::Array(items)) => items.clone(),
        _ => Vec::new(),
    }
}

/// Add the plugin to `path`, creating the file if needed.
///
/// Returns `false` when it was already listed.
pub async fn add_plugin(path: &Path) -> anyhow::Result<bool> {
    let mut config = if path_exists(path).await {
        read_host_config(path).await?
    } else {
        let mut fresh = Map::new();
        fresh.insert("$schema".into(), json!(HOST_SCHEMA));
        fresh
    };

    let mut plugins = plugin_list(&config);
    let already = plugins.iter().any(|p| p == PLUGIN_ID);
    if !already {
        plugins.push(json!(PLUGIN_ID));
    }
    config.insert("plugin".into(), Value::Array(plugins));
    write_json_atomic(path, &config).await?;
    Ok(!already)
}

/// Remove the plugin from `path`.
///
/// Returns `None` when there is no host config at all.
pub async fn remove_plugin(path: &Path) -> anyhow::Result<Option<bool>> {
    if !path_exists(path).await {
        return Ok(None);
    }
    let mut config = read_host_config(path).await?;
    let before = plugin_list(&config);
    let after: Vec<Value> = before.iter().filter(|p| *p != PLUGIN_ID).cloned().collect();
    let removed = after.len() != before.len();
    config.insert("plugin".into(), Value::Array(after));
    write_json_atomic(path, &config).await?;
    Ok(Some(removed))
}
