//! Console Logging
//!
//! `tracing` subscriber for the browser: events are formatted on one line and
//! sent to the matching `console.*` method.

use std::fmt::{self, Write};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use wasm_bindgen::JsValue;

/// Debug builds log at `DEBUG`, release builds at `INFO`
pub fn default_level() -> Level {
    if cfg!(debug_assertions) {
        Level::DEBUG
    } else {
        Level::INFO
    }
}

/// Install the console subscriber. A second call is ignored.
pub fn init(max_level: Level) {
    let _ = tracing_subscriber::registry()
        .with(ConsoleLayer { max_level })
        .try_init();
}

struct ConsoleLayer {
    max_level: Level,
}

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let level = *event.metadata().level();
        // more verbose levels compare greater
        if level > self.max_level {
            return;
        }
        let line = JsValue::from_str(&format_event(event));
        match level {
            Level::ERROR => web_sys::console::error_1(&line),
            Level::WARN => web_sys::console::warn_1(&line),
            Level::INFO => web_sys::console::info_1(&line),
            _ => web_sys::console::log_1(&line),
        }
    }
}

/// `[LEVEL target] message key=value ...`
fn format_event(event: &Event<'_>) -> String {
    let meta = event.metadata();
    let mut fields = FieldWriter::default();
    event.record(&mut fields);
    format!(
        "[{} {}] {}{}",
        meta.level(),
        meta.target(),
        fields.message,
        fields.rest
    )
}

#[derive(Default)]
struct FieldWriter {
    message: String,
    rest: String,
}

impl Visit for FieldWriter {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message.push_str(value);
        } else {
            let _ = write!(self.rest, " {}={}", field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            let _ = write!(self.message, "{:?}", value);
        } else {
            let _ = write!(self.rest, " {}={:?}", field.name(), value);
        }
    }
}
