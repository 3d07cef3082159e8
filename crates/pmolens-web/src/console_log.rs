#![forbid(unsafe_code)]

//! Tracing layer that formats events as single lines for the browser console.
//!
//! The layer itself is host-neutral: formatted lines go to a [`LogSink`]. The
//! wasm build plugs in a sink that calls the matching `console.*` method.

use std::fmt::{self, Write as _};

use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::layer::Context;

/// Destination of formatted log lines.
pub trait LogSink: Send + Sync + 'static {
    fn write_line(&self, level: Level, line: &str);
}

/// Parse a level name (`"warn"`, `"DEBUG"`, `"off"`); unknown names fall back to info.
pub fn parse_level(name: Option<&str>) -> LevelFilter {
    name.and_then(|n| n.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::INFO)
}

/// Fixed-width level tag.
fn level_str(level: Level) -> &'static str {
    match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARN ",
        Level::INFO => "INFO ",
        Level::DEBUG => "DEBUG",
        Level::TRACE => "TRACE",
    }
}

/// Extracts message and structured fields from a tracing event.
#[derive(Default)]
struct EventVisitor {
    message: Option<String>,
    fields: Vec<(String, String)>,
}

impl EventVisitor {
    fn push(&mut self, field: &Field, value: String) {
        if field.name() == "message" {
            self.message = Some(value);
        } else {
            self.fields.push((field.name().to_string(), value));
        }
    }
}

impl Visit for EventVisitor {
    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        let rendered = format!("{value:?}");
        let rendered = rendered
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .map(str::to_string)
            .unwrap_or(rendered);
        self.push(field, rendered);
    }

    fn record_str(&mut self, field: &Field, value: &str) {
        self.push(field, value.to_string());
    }

    fn record_i64(&mut self, field: &Field, value: i64) {
        self.push(field, value.to_string());
    }

    fn record_u64(&mut self, field: &Field, value: u64) {
        self.push(field, value.to_string());
    }

    fn record_bool(&mut self, field: &Field, value: bool) {
        self.push(field, value.to_string());
    }
}

/// A `tracing_subscriber::Layer` writing one line per event to a [`LogSink`].
pub struct ConsoleLayer<S> {
    sink: S,
}

impl<S: LogSink> ConsoleLayer<S> {
    pub fn new(sink: S) -> Self {
        Self { sink }
    }

    /// `LEVEL target: message k=v k=v`
    fn format(event: &Event<'_>) -> String {
        let metadata = event.metadata();
        let mut visitor = EventVisitor::default();
        event.record(&mut visitor);

        let mut line = format!("{} {}: ", level_str(*metadata.level()), metadata.target());
        line.push_str(visitor.message.as_deref().unwrap_or_default());
        for (key, value) in &visitor.fields {
            let _ = write!(line, " {key}={value}");
        }
        line
    }
}

impl<S: LogSink, Sub: Subscriber> Layer<Sub> for ConsoleLayer<S> {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, Sub>) {
        self.sink
            .write_line(*event.metadata().level(), &Self::format(event));
    }
}

/// Sink forwarding to `console.error` / `warn` / `info` / `debug` / `log`.
#[cfg(target_arch = "wasm32")]
pub struct BrowserConsole;

#[cfg(target_arch = "wasm32")]
impl LogSink for BrowserConsole {
    fn write_line(&self, level: Level, line: &str) {
        let value = wasm_bindgen::JsValue::from_str(line);
        match level {
            Level::ERROR => web_sys::console::error_1(&value),
            Level::WARN => web_sys::console::warn_1(&value),
            Level::INFO => web_sys::console::info_1(&value),
            Level::DEBUG => web_sys::console::debug_1(&value),
            Level::TRACE => web_sys::console::log_1(&value),
        }
    }
}

/// Install the console layer as the global subscriber. Later calls are no-ops.
#[cfg(target_arch = "wasm32")]
pub fn init(level: LevelFilter) {
    use tracing_subscriber::prelude::*;

    let subscriber = tracing_subscriber::registry()
        .with(ConsoleLayer::new(BrowserConsole))
        .with(level);
    // A second inspector on the same page keeps the first subscriber.
    let _ = tracing::subscriber::set_global_default(subscriber);
}
