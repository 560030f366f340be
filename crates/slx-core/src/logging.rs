/// Initialize logging for the exporter.
///
/// `RUST_LOG` overrides the computed default; the verbosity flag only affects
/// the default filter.
pub fn init(service_name: &str, verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},{service_name}={level}")));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(true)
        .init();
}
