use crate::diff::DiffTree;
use crate::errors::{DispatchError, Result};

use super::invariants;

/// Validate a diff tree before it is dispatched
///
/// Checks, in order:
///
/// 1. Every node has a non-blank path (paths drive callback lookup and
///    failure reports)
/// 2. No node is already applied
///
/// # Errors
/// Returns `InvalidTree` describing the first violation found. For
/// exhaustive reporting, call the individual invariant functions directly.
pub fn validate_tree<E>(tree: &DiffTree<E>) -> Result<()> {
    if let Some(position) = invariants::find_blank_paths(tree).first() {
        return Err(DispatchError::InvalidTree {
            reason: format!("node #{} (pre-order) has a blank path", position),
        });
    }

    if let Some(path) = invariants::find_preapplied_nodes(tree).first() {
        return Err(DispatchError::InvalidTree {
            reason: format!("node {} is already applied", path),
        });
    }

    Ok(())
}
