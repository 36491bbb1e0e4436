pub mod dispatch;
pub mod show;

use cfgdispatch_core::diff::DiffTree;
use std::path::Path;

/// Diff tree element as captured on disk: any JSON value
pub type JsonElement = serde_json::Value;

/// Read a diff tree captured as JSON
pub fn load_tree(path: &Path) -> Result<DiffTree<JsonElement>, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;
    let tree = serde_json::from_str(&text)?;
    Ok(tree)
}
