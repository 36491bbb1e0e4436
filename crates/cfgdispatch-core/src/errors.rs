use cfgdispatch_core_types::EventId;
use thiserror::Error;

/// Result type alias using DispatchError
pub type Result<T> = std::result::Result<T, DispatchError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and reporting back to the event source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Collaborators
    DiffFailed,
    NoCallbackFound,

    // Dispatch
    CallbackFailed,
    CallbackNotRegistered,

    // Structural/Validation
    InvalidTree,
    InvalidInput,

    // Integration/IO
    Serialization,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::DiffFailed => "ERR_DIFF_FAILED",
            ExErrorKind::NoCallbackFound => "ERR_NO_CALLBACK_FOUND",
            ExErrorKind::CallbackFailed => "ERR_CALLBACK_FAILED",
            ExErrorKind::CallbackNotRegistered => "ERR_CALLBACK_NOT_REGISTERED",
            ExErrorKind::InvalidTree => "ERR_INVALID_TREE",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// Whether an error of this kind means the change event was not handled
    ///
    /// `NoCallbackFound` is a notice: the event is treated as a successful no-op.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ExErrorKind::NoCallbackFound)
    }
}

/// Canonical structured error type
///
/// Carries classification fields for programmatic handling plus the diff
/// node context (path, priority, callback return code) needed to report a
/// failed dispatch.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<String>,
    priority: Option<u32>,
    callback_code: Option<i32>,
    event_id: Option<EventId>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            priority: None,
            callback_code: None,
            event_id: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add diff node path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add dispatch priority context
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Add the return code reported by a failing callback
    pub fn with_callback_code(mut self, code: i32) -> Self {
        self.callback_code = Some(code);
        self
    }

    /// Add change-event correlation context
    pub fn with_event_id(mut self, event_id: EventId) -> Self {
        self.event_id = Some(event_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the diff node path, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the dispatch priority, if any
    pub fn priority(&self) -> Option<u32> {
        self.priority
    }

    /// Get the callback return code, if any
    pub fn callback_code(&self) -> Option<i32> {
        self.callback_code
    }

    /// Get the change-event id, if any
    pub fn event_id(&self) -> Option<&EventId> {
        self.event_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// See [`ExErrorKind::is_fatal`]
    pub fn is_fatal(&self) -> bool {
        self.kind.is_fatal()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(priority) = self.priority {
            write!(f, " (priority: {})", priority)?;
        }
        if let Some(code) = self.callback_code {
            write!(f, " (callback_code: {})", code)?;
        }
        if let Some(event_id) = &self.event_id {
            write!(f, " (event_id: {})", event_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for diff dispatch
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    // ===== Collaborator Errors =====
    /// The diff collaborator could not compute the tree of differences
    #[error("Failed to create the tree of differences: {message}")]
    DiffFailed { message: String },

    /// No node in the diff tree matched a registered callback
    #[error("No callback found for this configuration change")]
    NoCallbackFound,

    // ===== Dispatch Errors =====
    /// A callback reported failure; the traversal was aborted
    #[error("Callback for path {path} failed ({code})")]
    CallbackFailed { path: String, code: i32 },

    /// A node carries a priority with no slot in the callback table
    #[error("No callback registered at priority {priority} for path {path}")]
    CallbackNotRegistered { path: String, priority: u32 },

    // ===== Validation Errors =====
    /// Diff tree or registration data is structurally invalid
    #[error("Invalid diff tree: {reason}")]
    InvalidTree { reason: String },

    // ===== Generic Errors =====
    /// Serialization error (JSON/TOML encoding or decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl DispatchError {
    /// See [`ExErrorKind::is_fatal`]
    pub fn is_fatal(&self) -> bool {
        !matches!(self, DispatchError::NoCallbackFound)
    }
}

impl From<serde_json::Error> for DispatchError {
    fn from(err: serde_json::Error) -> Self {
        DispatchError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DispatchError {
    fn from(err: toml::de::Error) -> Self {
        DispatchError::Serialization {
            message: err.to_string(),
        }
    }
}

/// Conversion from DispatchError to ExError
impl From<DispatchError> for ExError {
    fn from(err: DispatchError) -> Self {
        match err {
            DispatchError::DiffFailed { message } => ExError::new(ExErrorKind::DiffFailed)
                .with_op("diff")
                .with_message(message),
            DispatchError::NoCallbackFound => ExError::new(ExErrorKind::NoCallbackFound)
                .with_op("assign_priorities")
                .with_message("No callback found for this configuration change"),
            DispatchError::CallbackFailed { path, code } => {
                ExError::new(ExErrorKind::CallbackFailed)
                    .with_op("dispatch")
                    .with_path(path)
                    .with_callback_code(code)
                    .with_message("Callback reported failure")
            }
            DispatchError::CallbackNotRegistered { path, priority } => {
                ExError::new(ExErrorKind::CallbackNotRegistered)
                    .with_op("dispatch")
                    .with_path(path)
                    .with_priority(priority)
                    .with_message("Priority has no slot in the callback table")
            }
            DispatchError::InvalidTree { reason } => {
                ExError::new(ExErrorKind::InvalidTree).with_message(reason)
            }
            DispatchError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}
