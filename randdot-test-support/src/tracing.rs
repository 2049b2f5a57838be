//! Captures closed spans and events so tests can assert on the fields the
//! sampler, writer, and CLI record.
//!
//! Every value is stored in its display form. Counters such as `draws` and
//! `rejections` are read back through [`SpanRecord::count`].

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::field::{Field, Visit};
use tracing::span::{Attributes, Id, Record};
use tracing::{Event, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;
use tracing_subscriber::registry::LookupSpan;

/// Layer that keeps every span once it closes and every event as it fires.
///
/// # Examples
/// ```
/// use randdot_test_support::tracing::RecordingLayer;
/// use tracing_subscriber::layer::SubscriberExt;
///
/// let layer = RecordingLayer::default();
/// let subscriber = tracing_subscriber::registry().with(layer.clone());
/// tracing::subscriber::with_default(subscriber, || {
///     let span = tracing::info_span!("sampler.sample", draws = tracing::field::Empty);
///     span.record("draws", 12_u64);
/// });
/// let span = layer.span_named("sampler.sample").expect("span closed");
/// assert_eq!(span.count("draws"), Some(12));
/// ```
#[derive(Clone, Default)]
pub struct RecordingLayer {
    capture: Arc<Mutex<Capture>>,
}

#[derive(Default)]
struct Capture {
    spans: Vec<SpanRecord>,
    events: Vec<SpanRecord>,
}

/// Name and fields of a closed span or an emitted event.
///
/// Events are named by their `message` field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanRecord {
    /// Span name, or the event message.
    pub name: String,
    /// Recorded fields in display form.
    pub fields: HashMap<String, String>,
}

impl SpanRecord {
    /// Display form of `field`, if it was recorded.
    #[must_use]
    pub fn field(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Parses `field` as an unsigned counter.
    #[must_use]
    pub fn count(&self, field: &str) -> Option<u64> {
        self.field(field)?.parse().ok()
    }
}

impl RecordingLayer {
    /// The first closed span called `name`.
    #[must_use]
    pub fn span_named(&self, name: &str) -> Option<SpanRecord> {
        self.lock().spans.iter().find(|span| span.name == name).cloned()
    }

    /// Events whose message equals `message`, in emission order.
    #[must_use]
    pub fn events_with_message(&self, message: &str) -> Vec<SpanRecord> {
        self.lock()
            .events
            .iter()
            .filter(|event| event.name == message)
            .cloned()
            .collect()
    }

    fn lock(&self) -> MutexGuard<'_, Capture> {
        self.capture.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S> Layer<S> for RecordingLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        let mut record = SpanRecord {
            name: attrs.metadata().name().to_owned(),
            fields: HashMap::new(),
        };
        attrs.record(&mut Fields(&mut record.fields));
        span.extensions_mut().insert(record);
    }

    fn on_record(&self, id: &Id, values: &Record<'_>, ctx: Context<'_, S>) {
        let Some(span) = ctx.span(id) else {
            return;
        };
        if let Some(record) = span.extensions_mut().get_mut::<SpanRecord>() {
            values.record(&mut Fields(&mut record.fields));
        }
    }

    fn on_close(&self, id: Id, ctx: Context<'_, S>) {
        let closed = ctx
            .span(&id)
            .and_then(|span| span.extensions_mut().remove::<SpanRecord>());
        if let Some(record) = closed {
            self.lock().spans.push(record);
        }
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = HashMap::new();
        event.record(&mut Fields(&mut fields));
        let name = fields.remove("message").unwrap_or_default();
        self.lock().events.push(SpanRecord { name, fields });
    }
}

/// Stores each field in display form; unsigned integers and booleans reach
/// `record_debug`, whose output matches their display form.
struct Fields<'a>(&'a mut HashMap<String, String>);

impl Visit for Fields<'_> {
    fn record_str(&mut self, field: &Field, value: &str) {
        self.0.insert(field.name().to_owned(), value.to_owned());
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        self.0.insert(field.name().to_owned(), format!("{value:?}"));
    }
}
