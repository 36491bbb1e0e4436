//! Priority-ordered recursive callback dispatch
//!
//! ## Walk
//!
//! At every node:
//!
//! 1. Among the children that are not applied and carry a priority > 0,
//!    find the minimum priority.
//! 2. Recurse into the first such child (in diff order) with that priority.
//!    Only that one child is visited in this step.
//! 3. Call the node's own callback, `table[priority - 1]`, if its priority
//!    is > 0.
//! 4. Mark the node applied.
//!
//! The first failing callback aborts the whole walk. Nothing is rolled back:
//! nodes applied before the failure stay applied.
//!
//! ## Single pick per level
//!
//! A step resolves at most one child before the parent's own callback fires.
//! Siblings with a higher priority, and later siblings sharing the minimum,
//! are left pending by that walk. A second walk from the root picks up the
//! next pending top-level entry, but children of an entry that is already
//! applied are never selected again. [`PassPolicy::UntilSettled`] repeats
//! the root walk; it does not change the per-level rule.
//!
//! A node is dispatched at most once: its callback only runs while its
//! applied flag is still clear, and the flag is set right after.

use crate::callbacks::CallbackTable;
use crate::config::PassPolicy;
use crate::diff::{DiffNode, DiffTree};
use crate::errors::{DispatchError, Result};
use crate::{log_op_end, log_op_error, log_op_start};

/// Counters for one dispatch of a diff tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DispatchReport {
    /// Number of walks started from the root
    pub passes: usize,
    /// Number of callbacks that ran and succeeded
    pub callbacks: usize,
}

/// Dispatch `node` and at most one pending child per level below it
///
/// # Errors
///
/// - `CallbackFailed` - a callback returned failure; the walk stopped there
/// - `CallbackNotRegistered` - a node priority has no slot in `table`
pub fn apply<E, C>(node: &mut DiffNode<E>, table: &CallbackTable<E, C>, ctx: &mut C) -> Result<()> {
    let mut calls = 0;
    apply_node(node, table, ctx, &mut calls)
}

/// One walk from the implicit root of `tree`
///
/// The root has no callback of its own, so this only resolves the lowest
/// priority pending top-level entry. Returns the number of callbacks run.
///
/// # Errors
///
/// See [`apply`].
pub fn apply_root<E, C>(
    tree: &mut DiffTree<E>,
    table: &CallbackTable<E, C>,
    ctx: &mut C,
) -> Result<usize> {
    let mut calls = 0;
    apply_lowest_child(&mut tree.entries, table, ctx, &mut calls)?;
    Ok(calls)
}

/// Dispatch a whole diff tree according to `passes`
///
/// Owns the `dispatch` start/end log boundary.
///
/// # Errors
///
/// See [`apply`]. Callbacks that ran before the failure are not undone.
pub fn dispatch<E, C>(
    tree: &mut DiffTree<E>,
    table: &CallbackTable<E, C>,
    ctx: &mut C,
    passes: PassPolicy,
) -> Result<DispatchReport> {
    log_op_start!("dispatch", node_count = tree.node_count(), passes = ?passes);
    let start = std::time::Instant::now();

    let mut report = DispatchReport::default();
    loop {
        report.passes += 1;
        match apply_root(tree, table, ctx) {
            Ok(calls) => report.callbacks += calls,
            Err(e) => {
                log_op_error!(
                    "dispatch",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64
                );
                return Err(e);
            }
        }
        if passes == PassPolicy::Single || !tree.has_pending_entry() {
            break;
        }
    }

    log_op_end!(
        "dispatch",
        duration_ms = start.elapsed().as_millis() as u64,
        passes = report.passes,
        callbacks = report.callbacks
    );
    Ok(report)
}

fn apply_node<E, C>(
    node: &mut DiffNode<E>,
    table: &CallbackTable<E, C>,
    ctx: &mut C,
    calls: &mut usize,
) -> Result<()> {
    apply_lowest_child(node.children_mut(), table, ctx, calls)?;

    if node.is_applied() {
        return Ok(());
    }

    if let Some(priority) = node.dispatch_priority() {
        let entry = table
            .get(priority)
            .ok_or_else(|| DispatchError::CallbackNotRegistered {
                path: node.path.clone(),
                priority,
            })?;

        tracing::debug!(
            path = %node.path,
            change_op = node.operation.as_str(),
            priority,
            "calling callback"
        );
        entry
            .call(node.operation, &node.element, ctx)
            .map_err(|failure| {
                tracing::error!(
                    path = %node.path,
                    callback_code = failure.code,
                    detail = %failure.message,
                    "callback failed"
                );
                DispatchError::CallbackFailed {
                    path: node.path.clone(),
                    code: failure.code,
                }
            })?;
        *calls += 1;
    }

    node.mark_applied();
    Ok(())
}

fn apply_lowest_child<E, C>(
    children: &mut [DiffNode<E>],
    table: &CallbackTable<E, C>,
    ctx: &mut C,
    calls: &mut usize,
) -> Result<()> {
    let min_priority = children
        .iter()
        .filter(|child| !child.is_applied())
        .filter_map(DiffNode::dispatch_priority)
        .min();

    let Some(min_priority) = min_priority else {
        return Ok(());
    };

    if let Some(child) = children
        .iter_mut()
        .find(|child| !child.is_applied() && child.dispatch_priority() == Some(min_priority))
    {
        apply_node(child, table, ctx, calls)?;
    }
    Ok(())
}
