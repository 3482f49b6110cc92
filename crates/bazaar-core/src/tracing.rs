use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_DIRECTIVES: &str = "info,tower_http=debug";

/// Install the JSON stdout subscriber, filtered by `RUST_LOG`.
///
/// Later calls are no-ops, so tests may call it freely.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let json = fmt::layer()
        .json()
        .flatten_event(true)
        .with_current_span(false);
    let _ = tracing_subscriber::registry().with(filter).with(json).try_init();
}
