//! Tracing capture layer for asserting instrumentation in tests.
//!
//! [`RecordingLayer`] is installed alongside a registry subscriber and keeps
//! snapshots of closed spans and emitted events, letting behavioural tests
//! verify span names, recorded fields, and structured diagnostics without
//! parsing formatted output.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Layer that records closed spans and emitted events for later assertions.
///
/// Clones share the same backing log, so a test can keep one handle while
/// handing another to the subscriber.
#[derive(Clone, Default)]
pub struct RecordingLayer {
    log: Arc<Mutex<RecordedLog>>,
}

#[derive(Default)]
struct RecordedLog {
    spans: Vec<SpanRecord>,
    events: Vec<EventRecord>,
}

/// Snapshot of a closed span with the fields recorded against it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanRecord {
    /// Span name captured from the tracing metadata.
    pub name: String,
    /// Structured fields recorded against the span.
    pub fields: HashMap<String, String>,
}

/// Snapshot of an emitted tracing event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Log level associated with the recorded event.
    pub level: Level,
    /// Event target string extracted from the metadata.
    pub target: String,
    /// Structured fields attached to the event.
    pub fields: HashMap<String, String>,
}

impl RecordingLayer {
    /// Returns the closed spans recorded so far, in completion order.
    ///
    /// # Examples
    /// ```
    /// use meshsim_test_support::tracing::RecordingLayer;
    ///
    /// let layer = RecordingLayer::default();
    /// assert!(layer.spans().is_empty());
    /// ```
    #[must_use]
    pub fn spans(&self) -> Vec<SpanRecord> {
        self.log.lock().expect("lock poisoned").spans.clone()
    }

    /// Returns the events recorded so far, in emission order.
    ///
    /// # Examples
    /// ```
    /// use meshsim_test_support::tracing::RecordingLayer;
    ///
    /// let layer = RecordingLayer::default();
    /// assert!(layer.events().is_empty());
    /// ```
    #[must_use]
    pub fn events(&self) -> Vec<EventRecord> {
        self.log.lock().expect("lock poisoned").events.clone()
    }

    /// Returns the first closed span named `name`, if any was recorded.
    ///
    /// # Examples
    /// ```
    /// use meshsim_test_support::tracing::RecordingLayer;
    ///
    /// let layer = RecordingLayer::default();
    /// assert!(layer.find_span("sim.cycle").is_none());
    /// ```
    #[must_use]
    pub fn find_span(&self, name: &str) -> Option<SpanRecord> {
        self.log
            .lock()
            .expect("lock poisoned")
            .spans
            .iter()
            .find(|span| span.name == name)
            .cloned()
    }
}

impl<S> Layer<S> for RecordingLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_new_span(
        &self,
        attrs: &tracing::span::Attributes<'_>,
        id: &tracing::span::Id,
        ctx: Context<'_, S>,
    ) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut record = SpanRecord {
            name: attrs.metadata().name().to_owned(),
            fields: HashMap::new(),
        };
        attrs.record(&mut FieldVisitor::over(&mut record.fields));
        span.extensions_mut().insert(record);
    }

    fn on_record(
        &self,
        id: &tracing::span::Id,
        values: &tracing::span::Record<'_>,
        ctx: Context<'_, S>,
    ) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        let Some(record) = extensions.get_mut::<SpanRecord>() else {
            return;
        };
        values.record(&mut FieldVisitor::over(&mut record.fields));
    }

    fn on_close(&self, id: tracing::span::Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(&id) else {
            return;
        };
        let Some(record) = span.extensions_mut().remove::<SpanRecord>() else {
            return;
        };
        self.log.lock().expect("lock poisoned").spans.push(record);
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut FieldVisitor::over(&mut fields));
        self.log
            .lock()
            .expect("lock poisoned")
            .events
            .push(EventRecord {
                level: *event.metadata().level(),
                target: event.metadata().target().to_owned(),
                fields,
            });
    }
}

struct FieldVisitor<'map> {
    fields: &'map mut HashMap<String, String>,
}

impl<'map> FieldVisitor<'map> {
    fn over(fields: &'map mut HashMap<String, String>) -> Self {
        Self { fields }
    }

    fn put(&mut self, field: &Field, value: String) {
        self.fields.insert(field.name().to_owned(), value);
    }
}

impl Visit for FieldVisitor<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.put(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.put(field, value.to_owned());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.put(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.put(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.put(field, value.to_string());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.put(field, value.to_string());
    }
}
