//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_EVENT_ID: &str = "event_id";

// Diff node identifiers
pub const FIELD_PATH: &str = "path";
pub const FIELD_PRIORITY: &str = "priority";
pub const FIELD_CHANGE_OP: &str = "change_op";

// Counters
pub const FIELD_NODE_COUNT: &str = "node_count";
pub const FIELD_ASSIGNED: &str = "assigned";
pub const FIELD_CALLBACKS: &str = "callbacks";
pub const FIELD_PASSES: &str = "passes";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";
pub const FIELD_CALLBACK_CODE: &str = "callback_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Outcome notices
pub const EVENT_NOTHING_CHANGED: &str = "nothing_changed";
pub const EVENT_NO_CALLBACK: &str = "no_callback_found";
