//! Structured logging facility for cfgdispatch
//!
//! This module provides a canonical logging facility with:
//! - Single initialization point via `init(profile)`
//! - Structured logging macros (`log_op_start!`, `log_op_end!`, `log_op_error!`)
//! - Boundary ownership: the event handler and the dispatcher entry point own
//!   start/end events, the recursive walk only emits `debug!`/`error!` lines
//! - Correlation propagation via a per-event span carrying `event_id`
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use cfgdispatch_core::logging_facility::{init, Profile};
//!
//! // Initialize once at application startup
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
