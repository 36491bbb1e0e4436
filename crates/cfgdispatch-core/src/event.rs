//! Configuration-change event handling
//!
//! [`ChangeHandler`] ties the collaborators together for one event:
//!
//! ```text
//! old/new document -> DiffSource -> DiffTree -> PriorityAssigner -> dispatch
//! ```
//!
//! ## Logging Ownership
//!
//! `on_configuration_changed` owns the `configuration_changed` start/end
//! boundary and opens a span carrying the event id, so every line emitted by
//! the assigner, the dispatcher and the callbacks of one event correlates.
//!
//! The diff tree is owned by this function and dropped on every exit path.

use crate::callbacks::CallbackTable;
use crate::config::{DispatchConfig, PassPolicy};
use crate::core_types::schema::{EVENT_NOTHING_CHANGED, EVENT_NO_CALLBACK};
use crate::core_types::EventId;
use crate::diff::{DiffSource, NamespaceMap};
use crate::dispatch::{self, DispatchReport};
use crate::errors::{DispatchError, Result};
use crate::priority::{PathPriorityAssigner, PriorityAssigner};
use crate::rules::validation;
use crate::{log_op_end, log_op_error, log_op_start};

/// How a configuration-change event was handled. Every variant is success.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOutcome {
    /// The diff was empty; nothing was dispatched
    NothingChanged,
    /// No node matched a registered callback; nothing was dispatched
    NoCallbackFound,
    /// The tree was dispatched
    Dispatched(DispatchReport),
}

/// Handles configuration-change events for one callback table
pub struct ChangeHandler<S, P, C>
where
    S: DiffSource,
{
    source: S,
    assigner: P,
    table: CallbackTable<S::Element, C>,
    namespaces: NamespaceMap,
    passes: PassPolicy,
}

impl<S, C> ChangeHandler<S, PathPriorityAssigner, C>
where
    S: DiffSource,
{
    /// Handler using exact-path priority assignment
    pub fn new(source: S, table: CallbackTable<S::Element, C>) -> Self {
        Self::with_assigner(source, PathPriorityAssigner, table)
    }
}

impl<S, P, C> ChangeHandler<S, P, C>
where
    S: DiffSource,
    P: PriorityAssigner<S::Element, C>,
{
    /// Handler with a custom priority assigner
    pub fn with_assigner(source: S, assigner: P, table: CallbackTable<S::Element, C>) -> Self {
        Self {
            source,
            assigner,
            table,
            namespaces: NamespaceMap::new(),
            passes: PassPolicy::default(),
        }
    }

    /// Builder: namespace mapping passed to the diff source
    pub fn with_namespaces(mut self, namespaces: NamespaceMap) -> Self {
        self.namespaces = namespaces;
        self
    }

    /// Builder: take dispatch settings from configuration
    pub fn with_config(mut self, config: &DispatchConfig) -> Self {
        self.passes = config.passes;
        self
    }

    /// Registered callbacks
    pub fn table(&self) -> &CallbackTable<S::Element, C> {
        &self.table
    }

    /// Diff collaborator this handler was built with
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Tell the application what changed between `old` and `new`
    ///
    /// # Errors
    ///
    /// - `DiffFailed` - the diff source failed; nothing was dispatched
    /// - `InvalidTree` - the diff source produced a malformed tree
    /// - `CallbackFailed` / `CallbackNotRegistered` - dispatch aborted
    ///
    /// A tree that matches no callback is reported as
    /// [`ChangeOutcome::NoCallbackFound`], not as an error.
    pub fn on_configuration_changed(
        &self,
        old: &S::Document,
        new: &S::Document,
        model: &S::Model,
        ctx: &mut C,
    ) -> Result<ChangeOutcome> {
        self.on_configuration_changed_with_id(EventId::new(), old, new, model, ctx)
    }

    /// Same as [`ChangeHandler::on_configuration_changed`] with an event id
    /// chosen by the event source
    ///
    /// # Errors
    ///
    /// See [`ChangeHandler::on_configuration_changed`].
    pub fn on_configuration_changed_with_id(
        &self,
        event_id: EventId,
        old: &S::Document,
        new: &S::Document,
        model: &S::Model,
        ctx: &mut C,
    ) -> Result<ChangeOutcome> {
        let span = tracing::info_span!("configuration_changed", event_id = %event_id);
        let _guard = span.enter();

        log_op_start!("configuration_changed", event_id = %event_id);
        let start = std::time::Instant::now();

        match self.handle(old, new, model, ctx) {
            Ok(outcome) => {
                log_op_end!(
                    "configuration_changed",
                    duration_ms = start.elapsed().as_millis() as u64,
                    event_id = %event_id,
                    outcome = ?outcome
                );
                Ok(outcome)
            }
            Err(e) => {
                log_op_error!(
                    "configuration_changed",
                    e.clone(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    event_id = %event_id,
                    error = %e
                );
                Err(e)
            }
        }
    }

    fn handle(
        &self,
        old: &S::Document,
        new: &S::Document,
        model: &S::Model,
        ctx: &mut C,
    ) -> Result<ChangeOutcome> {
        let diff = self.source.diff(old, new, model, &self.namespaces)?;

        let mut tree = match diff {
            Some(tree) if !tree.is_empty() => tree,
            _ => {
                tracing::info!(event = EVENT_NOTHING_CHANGED, "nothing changed");
                return Ok(ChangeOutcome::NothingChanged);
            }
        };

        validation::validate_tree(&tree)?;

        match self.assigner.assign(&mut tree, &self.table) {
            Ok(assigned) => tracing::debug!(assigned, "priorities attached"),
            Err(DispatchError::NoCallbackFound) => {
                tracing::info!(
                    event = EVENT_NO_CALLBACK,
                    "no callback found for this configuration change"
                );
                return Ok(ChangeOutcome::NoCallbackFound);
            }
            Err(e) => return Err(e),
        }

        let report = dispatch::dispatch(&mut tree, &self.table, ctx, self.passes)?;
        Ok(ChangeOutcome::Dispatched(report))
    }
}
