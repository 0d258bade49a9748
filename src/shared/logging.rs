use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// The default level is `info`; `--verbose` lowers it to `debug`.
/// `RUST_LOG` takes precedence over both when set, so operators can
/// still target individual modules.
pub fn setup_logging(verbose: bool) {
    let default_directive = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
