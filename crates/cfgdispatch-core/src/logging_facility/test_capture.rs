//! In-memory log capture for tests
//!
//! Every event is flattened into a [`CapturedEvent`]. The fields the
//! dispatcher emits (`path`, `priority`, `callback_code`) are parsed into
//! typed fields, and `event_id` is resolved from the event itself or from the
//! nearest enclosing span that carries one, so notices logged inside
//! `configuration_changed` can be matched to their change event.
//!
//! The capture is process-global: tests filter on values unique to them
//! (an event id, a node path, an op name) instead of clearing it.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Layer;

use crate::core_types::schema;

/// One log event as seen by the capture layer
#[derive(Clone, Debug)]
pub struct CapturedEvent {
    pub level: Level,
    pub op: Option<String>,
    pub event: Option<String>,
    /// Own `event_id` field, or the one of the closest enclosing span
    pub event_id: Option<String>,
    pub path: Option<String>,
    pub priority: Option<u32>,
    pub callback_code: Option<i32>,
    /// Every recorded field, rendered as text
    pub fields: BTreeMap<String, String>,
}

impl CapturedEvent {
    fn from_fields(
        level: Level,
        fields: BTreeMap<String, String>,
        span_event_id: Option<String>,
    ) -> Self {
        let text = |key: &str| fields.get(key).cloned();
        Self {
            level,
            op: text(schema::FIELD_OP),
            event: text(schema::FIELD_EVENT),
            event_id: text(schema::FIELD_EVENT_ID).or(span_event_id),
            path: text(schema::FIELD_PATH),
            priority: fields.get(schema::FIELD_PRIORITY).and_then(|v| v.parse().ok()),
            callback_code: fields
                .get(schema::FIELD_CALLBACK_CODE)
                .and_then(|v| v.parse().ok()),
            fields,
        }
    }

    /// Whether this is the `event` boundary/notice of `op`
    pub fn is(&self, op: &str, event: &str) -> bool {
        self.op.as_deref() == Some(op) && self.event.as_deref() == Some(event)
    }
}

#[derive(Default)]
struct FieldRecorder(BTreeMap<String, String>);

impl Visit for FieldRecorder {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }

    // Integers and bools route through here; their Debug form is the plain value
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }
}

/// Span extension holding the `event_id` a span was opened with
struct SpanEventId(String);

struct CaptureLayer {
    sink: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let mut recorder = FieldRecorder::default();
        attrs.record(&mut recorder);

        let event_id = recorder.0.remove(schema::FIELD_EVENT_ID);
        if let (Some(event_id), Some(span)) = (event_id, ctx.span(id)) {
            span.extensions_mut().insert(SpanEventId(event_id));
        }
    }

    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let mut recorder = FieldRecorder::default();
        event.record(&mut recorder);

        let mut span_event_id = None;
        if let Some(scope) = ctx.event_scope(event) {
            for span in scope {
                let extensions = span.extensions();
                if let Some(id) = extensions.get::<SpanEventId>() {
                    span_event_id = Some(id.0.clone());
                    break;
                }
            }
        }

        let level = *event.metadata().level();
        let captured = CapturedEvent::from_fields(level, recorder.0, span_event_id);
        if let Ok(mut events) = self.sink.lock() {
            events.push(captured);
        }
    }
}

/// Read handle over the captured events
#[derive(Clone)]
pub struct TestCapture {
    sink: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl TestCapture {
    /// Snapshot of everything captured so far, in emission order
    pub fn events(&self) -> Vec<CapturedEvent> {
        self.sink.lock().map(|e| e.clone()).unwrap_or_default()
    }

    /// Events carrying `field == value`
    pub fn events_with(&self, field: &str, value: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.fields.get(field).map(String::as_str) == Some(value))
            .collect()
    }

    /// Events logged for one configuration-change event, directly or from
    /// inside its span
    pub fn for_event_id(&self, event_id: &str) -> Vec<CapturedEvent> {
        self.events()
            .into_iter()
            .filter(|e| e.event_id.as_deref() == Some(event_id))
            .collect()
    }

    pub fn count_events<F>(&self, predicate: F) -> usize
    where
        F: Fn(&CapturedEvent) -> bool,
    {
        self.events().iter().filter(|e| predicate(e)).count()
    }

    /// # Panics
    ///
    /// Panics if no event for `op` with `event` was captured
    pub fn assert_event_exists(&self, op: &str, event: &str) {
        let events = self.events();
        assert!(
            events.iter().any(|e| e.is(op, event)),
            "Expected event op={} event={} not found in {} captured events",
            op,
            event,
            events.len()
        );
    }
}

static GLOBAL_CAPTURE: OnceLock<TestCapture> = OnceLock::new();

/// Install the capture layer as the global subscriber (once per process)
/// and return a handle to it
///
/// ```
/// use cfgdispatch_core::logging_facility::test_capture::init_test_capture;
/// use cfgdispatch_core::log_op_start;
///
/// let capture = init_test_capture();
/// log_op_start!("doc_capture_op");
/// capture.assert_event_exists("doc_capture_op", "start");
/// ```
pub fn init_test_capture() -> TestCapture {
    GLOBAL_CAPTURE
        .get_or_init(|| {
            let sink = Arc::new(Mutex::new(Vec::new()));
            let layer = CaptureLayer { sink: sink.clone() };
            // Another subscriber may already own the process; the handle then stays empty
            let _ = tracing_subscriber::registry().with(layer).try_init();
            TestCapture { sink }
        })
        .clone()
}
