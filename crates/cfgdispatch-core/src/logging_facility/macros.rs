//! Operation boundary macros
//!
//! Every boundary event carries `component` (the calling module), `op` and
//! `event` from [`crate::core_types::schema`]. Extra `tracing` fields may
//! follow the fixed arguments.
//!
//! Only the owner of an operation emits its boundary: `configuration_changed`
//! in the event handler, `dispatch` in the dispatcher entry point. The
//! recursive walk logs per-callback lines without boundaries.

#[doc(hidden)]
#[macro_export]
macro_rules! __op_boundary {
    ($level:ident, $op:expr, $event:ident $(, $($field:tt)*)?) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $crate::core_types::schema::$event,
            $($($field)*)?
        )
    };
}

/// Log the start of an operation
///
/// ```
/// # use cfgdispatch_core::log_op_start;
/// log_op_start!("dispatch");
/// log_op_start!("dispatch", node_count = 4);
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__op_boundary!(info, $op, EVENT_START $(, $($field)*)?)
    };
}

/// Log the successful end of an operation; `duration_ms` is mandatory
///
/// ```
/// # use cfgdispatch_core::log_op_end;
/// log_op_end!("dispatch", duration_ms = 42);
/// log_op_end!("dispatch", duration_ms = 42, passes = 2, callbacks = 5);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__op_boundary!(info, $op, EVENT_END, duration_ms = $duration $(, $($field)*)?)
    };
}

/// Log the failed end of an operation
///
/// The error is converted into an [`ExError`](crate::errors::ExError); its
/// code and kind are always recorded, and the failing node's path and
/// callback return code when the error carries them.
///
/// ```
/// # use cfgdispatch_core::{log_op_error, errors::DispatchError};
/// let err = DispatchError::CallbackFailed { path: "/a".to_string(), code: 1 };
/// log_op_error!("dispatch", err, duration_ms = 10);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__op_boundary!(
            error,
            $op,
            EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            err.path = ex_err.path(),
            err.callback_code = ex_err.callback_code()
            $(, $($field)*)?
        );
    }};
}
