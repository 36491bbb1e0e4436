//! Callback table
//!
//! The table is an ordered registry built once at application startup. The
//! position of an entry defines its priority: the first registered entry has
//! priority 1, the second priority 2, and so on. Diff nodes carry that
//! 1-based priority and the dispatcher resolves it with `table[priority - 1]`.
//!
//! The table is read-only while a traversal runs. State shared between
//! callbacks lives in the context value `C`, which the dispatcher threads
//! through every call by exclusive reference.

use crate::diff::Operation;
use std::fmt;

/// Failure reported by an application callback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackFailure {
    /// Application-defined return code
    pub code: i32,
    /// Optional human-readable detail
    pub message: String,
}

impl CallbackFailure {
    /// Failure with a return code and no message
    pub fn code(code: i32) -> Self {
        Self {
            code,
            message: String::new(),
        }
    }

    /// Attach a message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl fmt::Display for CallbackFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            write!(f, "callback failed ({})", self.code)
        } else {
            write!(f, "callback failed ({}): {}", self.code, self.message)
        }
    }
}

/// Result returned by every callback
pub type CallbackResult = std::result::Result<(), CallbackFailure>;

/// Application handler told about one changed element.
///
/// Implemented for every `Fn(Operation, &E, &mut C) -> CallbackResult`
/// closure, so most registrations are plain closures.
pub trait ChangeCallback<E, C> {
    /// React to `operation` on `element`
    ///
    /// # Errors
    ///
    /// Returns a `CallbackFailure` to abort the whole dispatch.
    fn on_change(&self, operation: Operation, element: &E, ctx: &mut C) -> CallbackResult;
}

impl<E, C, F> ChangeCallback<E, C> for F
where
    F: Fn(Operation, &E, &mut C) -> CallbackResult,
{
    fn on_change(&self, operation: Operation, element: &E, ctx: &mut C) -> CallbackResult {
        self(operation, element, ctx)
    }
}

/// One registered `(path, callback)` pair
pub struct CallbackEntry<E, C> {
    /// Path of the configuration subtree this callback handles
    pub path: String,
    callback: Box<dyn ChangeCallback<E, C>>,
}

impl<E, C> CallbackEntry<E, C> {
    /// Invoke the callback
    ///
    /// # Errors
    ///
    /// Propagates the callback's own failure.
    pub fn call(&self, operation: Operation, element: &E, ctx: &mut C) -> CallbackResult {
        self.callback.on_change(operation, element, ctx)
    }
}

impl<E, C> fmt::Debug for CallbackEntry<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackEntry")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Ordered registry mapping priority to callback
pub struct CallbackTable<E, C> {
    entries: Vec<CallbackEntry<E, C>>,
}

impl<E, C> CallbackTable<E, C> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Register a callback for `path` and return its 1-based priority
    ///
    /// Priorities are `u32`, so a table holds at most `u32::MAX` callbacks.
    /// Registrations past that limit are ignored and return `None`.
    pub fn register(
        &mut self,
        path: impl Into<String>,
        callback: impl ChangeCallback<E, C> + 'static,
    ) -> Option<u32> {
        let priority = u32::try_from(self.entries.len() + 1).ok()?;
        self.entries.push(CallbackEntry {
            path: path.into(),
            callback: Box::new(callback),
        });
        Some(priority)
    }

    /// Builder form of [`CallbackTable::register`]
    pub fn with(
        mut self,
        path: impl Into<String>,
        callback: impl ChangeCallback<E, C> + 'static,
    ) -> Self {
        self.register(path, callback);
        self
    }

    /// Look up the entry for a 1-based priority
    ///
    /// Returns `None` for priority 0 and for priorities past the end.
    pub fn get(&self, priority: u32) -> Option<&CallbackEntry<E, C>> {
        let index = priority.checked_sub(1)?;
        self.entries.get(index as usize)
    }

    /// Iterate `(priority, entry)` pairs in registration order
    pub fn iter(&self) -> impl Iterator<Item = (u32, &CallbackEntry<E, C>)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i as u32 + 1, entry))
    }

    /// Number of registered callbacks
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no callback is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E, C> Default for CallbackTable<E, C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E, C> fmt::Debug for CallbackTable<E, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.entries.iter()).finish()
    }
}
