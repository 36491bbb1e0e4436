#![allow(clippy::unwrap_used, clippy::expect_used)]

use cfgdispatch_core::core_types::schema::{EVENT_END, EVENT_END_ERROR, EVENT_START};
use cfgdispatch_core::errors::DispatchError;
use cfgdispatch_core::logging_facility::test_capture::init_test_capture;
use cfgdispatch_core::{log_op_end, log_op_error, log_op_start};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name);

    let start_events = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    assert_eq!(start_events, 1);
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let end_events: Vec<_> = capture
        .events()
        .into_iter()
        .filter(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END))
        .collect();

    assert_eq!(end_events.len(), 1, "Should have exactly one end event");
    assert_eq!(
        end_events[0].fields.get("duration_ms"),
        Some(&"42".to_string())
    );
}

#[test]
fn test_log_op_error_includes_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = DispatchError::CallbackFailed {
        path: "/a".to_string(),
        code: 5,
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let error_event = capture
        .events()
        .into_iter()
        .find(|e| e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END_ERROR))
        .expect("Should have error event");

    assert_eq!(
        error_event.fields.get("err.code"),
        Some(&"ERR_CALLBACK_FAILED".to_string())
    );
    assert_eq!(
        error_event.fields.get("err.kind"),
        Some(&"CallbackFailed".to_string())
    );
    assert_eq!(error_event.fields.get("err.path"), Some(&"/a".to_string()));
    assert_eq!(
        error_event.fields.get("err.callback_code"),
        Some(&"5".to_string())
    );
}

#[test]
fn test_boundary_ownership_single_start_end() {
    let capture = init_test_capture();
    let op_name = "test_boundary_ownership_unique_4";

    log_op_start!(op_name, node_count = 3);
    log_op_end!(op_name, duration_ms = 1, callbacks = 2);

    let starts = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_START)
    });
    let ends = capture.count_events(|e| {
        e.op.as_deref() == Some(op_name) && e.event.as_deref() == Some(EVENT_END)
    });

    assert_eq!(starts, 1, "Should have exactly one start event");
    assert_eq!(ends, 1, "Should have exactly one end event");
}

#[test]
fn test_log_macros_with_multiple_fields() {
    let capture = init_test_capture();
    let op_name = "test_log_macros_fields_unique_5";

    log_op_start!(op_name, path = "/system/hostname", priority = 4u32);

    let start_event = capture
        .events()
        .into_iter()
        .find(|e| e.op.as_deref() == Some(op_name))
        .expect("Should have start event");

    assert_eq!(
        start_event.fields.get("path"),
        Some(&"/system/hostname".to_string())
    );
    assert_eq!(start_event.path.as_deref(), Some("/system/hostname"));
    assert_eq!(start_event.priority, Some(4));
}

#[test]
#[should_panic(expected = "Expected event")]
fn test_capture_assert_event_exists_fails() {
    let capture = init_test_capture();

    capture.assert_event_exists("nonexistent_op_truly_unique_999", EVENT_START);
}

#[test]
fn test_dispatch_owns_its_boundary() {
    use cfgdispatch_core::callbacks::{CallbackResult, CallbackTable};
    use cfgdispatch_core::diff::{DiffNode, DiffTree, Operation};
    use cfgdispatch_core::{dispatch, PassPolicy};

    fn noop(_: Operation, _: &u8, _: &mut ()) -> CallbackResult {
        Ok(())
    }

    let capture = init_test_capture();
    let table = CallbackTable::new().with("/boundary/unique", noop);
    let mut tree = DiffTree::from_entries(vec![
        DiffNode::new("/boundary/unique", Operation::Add, 0u8).with_priority(1)
    ]);

    dispatch(&mut tree, &table, &mut (), PassPolicy::Single).unwrap();

    let calling = capture.events_with("path", "/boundary/unique");
    assert_eq!(calling.len(), 1);
    assert_eq!(
        calling[0].fields.get("change_op").map(String::as_str),
        Some("add")
    );
    capture.assert_event_exists("dispatch", EVENT_START);
    capture.assert_event_exists("dispatch", EVENT_END);
}
