//! Diagnostics go to stderr, as text or JSON lines. stdout is reserved for the
//! latency line, so a caller can pipe the benchmark result without filtering logs.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

pub struct StructuredLogger;

impl StructuredLogger {
    /// Install the process-wide subscriber. `RUST_LOG` overrides `default_level`.
    /// Returns false when a subscriber was already installed; the existing one stays.
    pub fn init(json: bool, default_level: &str) -> bool {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
        let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
        let registry = tracing_subscriber::registry().with(filter);
        let installed = if json {
            registry
                .with(stderr_layer.json().with_span_events(FmtSpan::NONE))
                .try_init()
        } else {
            registry.with(stderr_layer).try_init()
        };
        installed.is_ok()
    }
}
