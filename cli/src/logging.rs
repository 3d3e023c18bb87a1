use std::fmt::Write as _;
use tracing::{Event, Subscriber};
use tracing_subscriber::{layer::Context, Layer, EnvFilter, Registry};
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;

const DEFAULT_FILTER: &str = "warn,pickwheel=info,shared=info";

#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl tracing::field::Visit for MessageVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        match field.name() {
            "message" => {
                let _ = write!(self.message, "{:?}", value);
            }
            // bridged `log` records carry their origin in log.* fields
            name if name.starts_with("log.") => {}
            name => {
                let _ = write!(self.fields, " {}={:?}", name, value);
            }
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        match field.name() {
            "message" => self.message.push_str(value),
            name if name.starts_with("log.") => {}
            name => {
                let _ = write!(self.fields, " {}={}", name, value);
            }
        }
    }
}

/// Writes one timestamped line per event to stderr so it never mixes with
/// the wheel output on stdout.
struct ConsoleLayer;

impl<S: Subscriber> Layer<S> for ConsoleLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);

        if visitor.message.is_empty() {
            return;
        }

        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let target = metadata.target();
        let line = format!("{}{}", visitor.message, visitor.fields);

        match metadata.level().as_str() {
            "ERROR" => eprintln!("[{}] ❌ Error: {} - {}", timestamp, target, line),
            "WARN" => eprintln!("[{}] ⚠️ Warning: {} - {}", timestamp, target, line),
            "INFO" => eprintln!("[{}] ℹ️ {} - {}", timestamp, target, line),
            "DEBUG" => eprintln!("[{}] 🔄 {} - {}", timestamp, target, line),
            _ => eprintln!("[{}] {} - {}", timestamp, target, line),
        }
    }
}

/// Installs the global subscriber. `log` records from the shared crate are
/// forwarded through tracing-subscriber's log bridge.
pub fn setup() -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    Registry::default()
        .with(env_filter)
        .with(ConsoleLayer)
        .try_init()
}
