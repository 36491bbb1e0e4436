//! Human-readable outline renderer for diff trees.

use crate::diff::model::{DiffNode, DiffTree};

/// Render a human-readable outline of a [`DiffTree`].
///
/// One line per node, indented by depth:
///
/// ```text
/// ## Diff Tree (3 nodes, 1 applied, 1 pending)
///
/// ~ /interfaces [prio 1] applied
///   + /interfaces/interface [prio 2] pending
///   - /interfaces/stale
/// ```
///
/// Informational only; it never affects dispatch.
pub fn render_tree_summary<E>(tree: &DiffTree<E>) -> String {
    let mut out = String::new();

    let applied = tree.applied_paths().len();
    let pending = tree.pending_paths().len();
    out.push_str(&format!(
        "## Diff Tree ({} nodes, {} applied, {} pending)\n\n",
        tree.node_count(),
        applied,
        pending
    ));

    if tree.is_empty() {
        out.push_str("_Nothing changed._\n");
        return out;
    }

    for entry in &tree.entries {
        render_node(entry, 0, &mut out);
    }
    out
}

fn render_node<E>(node: &DiffNode<E>, depth: usize, out: &mut String) {
    out.push_str(&"  ".repeat(depth));
    out.push(node.operation.marker());
    out.push(' ');
    out.push_str(&node.path);
    if let Some(priority) = node.priority() {
        out.push_str(&format!(" [prio {}]", priority));
    }
    if node.is_applied() {
        out.push_str(" applied");
    } else if node.is_pending() {
        out.push_str(" pending");
    }
    out.push('\n');

    for child in node.children() {
        render_node(child, depth + 1, out);
    }
}
