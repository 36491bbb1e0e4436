//! cfgdispatch core - tells an application, node by node, what changed in
//! its configuration
//!
//! This crate provides:
//! - The diff tree model handed over by an external diff collaborator
//! - The callback table and the priority-assignment seam
//! - The priority-ordered recursive dispatcher (fail-fast, at most one
//!   dispatch per node)
//! - The configuration-change event handler that composes diff, priority
//!   assignment and dispatch
//! - Structured error and logging facilities
//!
//! ```
//! use cfgdispatch_core::callbacks::{CallbackResult, CallbackTable};
//! use cfgdispatch_core::diff::{DiffNode, DiffTree, Operation};
//!
//! fn log(op: Operation, elem: &&'static str, seen: &mut Vec<String>) -> CallbackResult {
//!     seen.push(format!("{} {}", op, elem));
//!     Ok(())
//! }
//!
//! let table = CallbackTable::new().with("/ifs", log).with("/ifs/eth0", log);
//! let mut tree = DiffTree::from_entries(vec![
//!     DiffNode::new("/ifs", Operation::Modify, "ifs")
//!         .with_priority(2)
//!         .with_child(DiffNode::new("/ifs/eth0", Operation::Add, "eth0").with_priority(1)),
//! ]);
//!
//! let mut seen = Vec::new();
//! cfgdispatch_core::apply_root(&mut tree, &table, &mut seen).unwrap();
//! assert_eq!(seen, vec!["add eth0", "modify ifs"]);
//! ```

pub use cfgdispatch_core_types as core_types;

pub mod callbacks;
pub mod config;
pub mod diff;
pub mod dispatch;
pub mod errors;
pub mod event;
pub mod logging_facility;
pub mod priority;
pub mod rules;

// Re-export commonly used types
pub use callbacks::{CallbackFailure, CallbackResult, CallbackTable, ChangeCallback};
pub use config::{DispatchConfig, PassPolicy};
pub use diff::{DiffNode, DiffSource, DiffTree, Operation};
pub use dispatch::{apply, apply_root, dispatch, DispatchReport};
pub use errors::{DispatchError, ExError, ExErrorKind, Result};
pub use event::{ChangeHandler, ChangeOutcome};
pub use priority::{PathPriorityAssigner, PriorityAssigner};
