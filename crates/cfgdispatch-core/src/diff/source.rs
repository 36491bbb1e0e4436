//! Diff collaborator interface.

use crate::diff::model::DiffTree;
use crate::errors::Result;
use std::collections::BTreeMap;

/// Namespace prefix to URI mapping handed through to the diff collaborator
pub type NamespaceMap = BTreeMap<String, String>;

/// Computes the tree of differences between two document revisions.
///
/// Implementations report failure with
/// [`DispatchError::DiffFailed`](crate::errors::DispatchError::DiffFailed)
/// and return `Ok(None)` (or an empty tree) when nothing changed.
pub trait DiffSource {
    /// Configuration document type (e.g. a parsed XML datastore)
    type Document;
    /// Schema model used to interpret the documents
    type Model;
    /// Opaque element reference carried by each diff node
    type Element;

    /// Diff `old` against `new`
    ///
    /// # Errors
    ///
    /// Returns `DiffFailed` if the difference tree cannot be built.
    fn diff(
        &self,
        old: &Self::Document,
        new: &Self::Document,
        model: &Self::Model,
        namespaces: &NamespaceMap,
    ) -> Result<Option<DiffTree<Self::Element>>>;
}
