//! Individual invariant checks over a diff tree.
//!
//! Each check returns every violation it finds, in pre-order, so callers can
//! report exhaustively. [`validate_tree`](super::validation::validate_tree)
//! stops at the first one.

use crate::diff::DiffTree;

/// Pre-order positions (0-based) of nodes whose path is empty or blank
pub fn find_blank_paths<E>(tree: &DiffTree<E>) -> Vec<usize> {
    let mut position = 0usize;
    let mut out = Vec::new();
    tree.visit(&mut |node| {
        if node.path.trim().is_empty() {
            out.push(position);
        }
        position += 1;
    });
    out
}

/// Paths of nodes already marked applied
///
/// A tree handed to the dispatcher for a new event must be untouched.
pub fn find_preapplied_nodes<E>(tree: &DiffTree<E>) -> Vec<String> {
    let mut out = Vec::new();
    tree.visit(&mut |node| {
        if node.is_applied() {
            out.push(node.path.clone());
        }
    });
    out
}
