use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize tracing for a hydra binary.
///
/// - `service_name`: identifies the binary in the startup event
/// - `default_directive`: filter used when `RUST_LOG` is unset (e.g. "info")
///
/// Logs go to stderr so commands that print documents keep stdout clean.
pub fn init_tracing(service_name: &str, default_directive: &str) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let registered = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();

    match registered {
        Ok(()) => tracing::debug!(service_name, "tracing initialized"),
        Err(err) => eprintln!("tracing already initialized: {err}"),
    }
}
