//! Diff tree model and the diff collaborator boundary.
//!
//! ```ignore
//! use cfgdispatch_core::diff::{DiffNode, DiffTree, Operation};
//!
//! let tree = DiffTree::from_entries(vec![
//!     DiffNode::new("/interfaces", Operation::Modify, elem).with_priority(1),
//! ]);
//! println!("{}", cfgdispatch_core::diff::render_tree_summary(&tree));
//! ```
//!
//! Computing the tree is not this crate's job: any [`DiffSource`] can feed
//! the event handler. This module only fixes the shape of its output.

pub mod model;
pub mod source;
pub mod summary;

pub use model::{DiffNode, DiffTree, Operation};
pub use source::{DiffSource, NamespaceMap};
pub use summary::render_tree_summary;
