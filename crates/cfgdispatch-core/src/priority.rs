//! Priority assignment
//!
//! Before dispatch, every diff node whose path has a registered callback is
//! annotated with that callback's 1-based priority. Nodes left without a
//! priority are structural only: the dispatcher never calls anything for
//! them.
//!
//! How priorities are derived from a schema is up to the application; this
//! module defines the seam ([`PriorityAssigner`]) and ships the exact-path
//! matcher most registrations need.

use crate::callbacks::CallbackTable;
use crate::diff::DiffTree;
use crate::errors::{DispatchError, Result};

/// Attaches dispatch priorities to a diff tree in place.
pub trait PriorityAssigner<E, C> {
    /// Annotate `tree` using the registrations in `table`
    ///
    /// Returns the number of nodes that received a priority.
    ///
    /// # Errors
    ///
    /// Returns `NoCallbackFound` when not a single node matched. Callers
    /// treat that outcome as a non-fatal notice.
    fn assign(&self, tree: &mut DiffTree<E>, table: &CallbackTable<E, C>) -> Result<usize>;
}

/// Matches each node path against registered callback paths verbatim.
///
/// When the same path is registered twice, the first (lowest priority)
/// registration wins. Priorities already attached to a node by an earlier
/// stage are left untouched.
///
/// # Example
/// ```
/// use cfgdispatch_core::callbacks::{CallbackResult, CallbackTable};
/// use cfgdispatch_core::diff::{DiffNode, DiffTree, Operation};
/// use cfgdispatch_core::priority::{PathPriorityAssigner, PriorityAssigner};
///
/// fn noop(_: Operation, _: &(), _: &mut ()) -> CallbackResult { Ok(()) }
///
/// let table = CallbackTable::new().with("/system/hostname", noop);
/// let mut tree = DiffTree::from_entries(vec![
///     DiffNode::new("/system/hostname", Operation::Modify, ()),
/// ]);
///
/// let assigned = PathPriorityAssigner.assign(&mut tree, &table).unwrap();
/// assert_eq!(assigned, 1);
/// assert_eq!(tree.entries[0].priority(), Some(1));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct PathPriorityAssigner;

impl<E, C> PriorityAssigner<E, C> for PathPriorityAssigner {
    fn assign(&self, tree: &mut DiffTree<E>, table: &CallbackTable<E, C>) -> Result<usize> {
        let mut assigned = 0usize;

        tree.visit_mut(&mut |node| {
            if node.dispatch_priority().is_some() {
                assigned += 1;
                return;
            }
            if let Some((priority, _)) = table.iter().find(|(_, entry)| entry.path == node.path) {
                node.set_priority(priority);
                assigned += 1;
            }
        });

        tracing::debug!(assigned, callbacks = table.len(), "priorities assigned");

        if assigned == 0 {
            return Err(DispatchError::NoCallbackFound);
        }
        Ok(assigned)
    }
}
