use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging to stderr.
///
/// The level comes from the `--log-level` flag unless the `RUST_LOG`
/// environment variable overrides it. Everything goes to stderr so stdout
/// stays clean for piped report data.
pub fn init_logging(level: &str) {
    let default_filter = format!("vaxpipe={level}");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(false),
        )
        .init();
}
