//! Recording layer for asserting on spans and events in tests.

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use tracing::{
    Event, Level, Subscriber,
    field::{Field, Visit},
    span::{Attributes, Id, Record},
};
use tracing_subscriber::{
    Layer,
    layer::{Context, SubscriberExt},
    registry::{LookupSpan, Registry},
};

/// Layer that stores closed spans and emitted events so tests can inspect
/// instrumentation after the fact.
///
/// # Examples
/// ```
/// use grafsim_test_support::tracing::RecordingLayer;
///
/// let (answer, layer) = RecordingLayer::capture(|| {
///     tracing::warn!(metric = "densidade", "metric undefined");
///     42
/// });
/// assert_eq!(answer, 42);
/// assert_eq!(layer.warnings().len(), 1);
/// assert_eq!(layer.warnings()[0].field("metric"), Some("densidade"));
/// ```
#[derive(Clone, Default)]
pub struct RecordingLayer {
    spans: Arc<Mutex<Vec<SpanRecord>>>,
    events: Arc<Mutex<Vec<EventRecord>>>,
}

impl RecordingLayer {
    /// Runs `body` with a fresh recording subscriber as the thread default
    /// and returns its result together with the layer.
    ///
    /// Only events emitted on the calling thread are captured.
    pub fn capture<R>(body: impl FnOnce() -> R) -> (R, Self) {
        let layer = Self::default();
        let subscriber = Registry::default().with(layer.clone());
        let result = tracing::subscriber::with_default(subscriber, body);
        (result, layer)
    }

    /// Closed spans in completion order.
    #[must_use]
    pub fn spans(&self) -> Vec<SpanRecord> {
        lock(&self.spans).clone()
    }

    /// Events in emission order.
    #[must_use]
    pub fn events(&self) -> Vec<EventRecord> {
        lock(&self.events).clone()
    }

    /// Events emitted at `WARN`.
    #[must_use]
    pub fn warnings(&self) -> Vec<EventRecord> {
        self.events_at(Level::WARN)
    }

    /// Events emitted at exactly `level`.
    #[must_use]
    pub fn events_at(&self, level: Level) -> Vec<EventRecord> {
        lock(&self.events)
            .iter()
            .filter(|event| event.level == level)
            .cloned()
            .collect()
    }

    /// First closed span named `name`.
    #[must_use]
    pub fn span(&self, name: &str) -> Option<SpanRecord> {
        lock(&self.spans)
            .iter()
            .find(|span| span.name == name)
            .cloned()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A closed span with its recorded fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanRecord {
    /// Span name.
    pub name: String,
    /// Fields recorded at creation or later through `Span::record`.
    pub fields: HashMap<String, String>,
}

impl SpanRecord {
    /// Value of `name`, if recorded.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }
}

/// An emitted event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRecord {
    /// Event level.
    pub level: Level,
    /// Event target.
    pub target: String,
    /// Structured fields, including `message`.
    pub fields: HashMap<String, String>,
}

impl EventRecord {
    /// Value of `name`, if present.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// The event's message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.field("message")
    }
}

#[derive(Default)]
struct PendingSpan {
    name: String,
    fields: HashMap<String, String>,
}

impl<S> Layer<S> for RecordingLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut pending = PendingSpan {
            name: attrs.metadata().name().to_owned(),
            fields: HashMap::new(),
        };
        attrs.record(&mut FieldRecorder(&mut pending.fields));
        span.extensions_mut().insert(pending);
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut extensions = span.extensions_mut();
        if let Some(pending) = extensions.get_mut::<PendingSpan>() {
            values.record(&mut FieldRecorder(&mut pending.fields));
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(&id) else {
            return;
        };
        let Some(pending) = span.extensions_mut().remove::<PendingSpan>() else {
            return;
        };
        lock(&self.spans).push(SpanRecord {
            name: pending.name,
            fields: pending.fields,
        });
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut FieldRecorder(&mut fields));
        lock(&self.events).push(EventRecord {
            level: *event.metadata().level(),
            target: event.metadata().target().to_owned(),
            fields,
        });
    }
}

struct FieldRecorder<'a>(&'a mut HashMap<String, String>);

impl FieldRecorder<'_> {
    fn insert(&mut self, field: &Field, value: String) {
        self.0.insert(field.name().to_owned(), value);
    }
}

impl Visit for FieldRecorder<'_> {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.insert(field, format!("{value:?}"));
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.insert(field, value.to_owned());
    }

    fn record_error(&mut self, field: &Field, value: &(dyn std::error::Error + 'static)) {
        self.insert(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.insert(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.insert(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.insert(field, value.to_string());
    }

    fn record_f64(&mut self, field: &Field, value: f64) {
        self.insert(field, value.to_string());
    }
}
