use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize stdout tracing. Call once at service startup.
///
/// The filter comes from `RUST_LOG`, falling back to `default_filter`.
/// `json` selects JSON lines instead of the human-readable format.
/// Safe to call multiple times; subsequent calls are ignored.
pub fn init_tracing(default_filter: &str, json: bool) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry().with(filter);
    let _ = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    };
}
