use tracing_subscriber::EnvFilter;

/// Install the global JSON subscriber on stderr.
///
/// `RUST_LOG` wins when set. Otherwise quiet mode only shows warnings and
/// errors, and the default shows `info` and above. Calling this twice is a no-op.
pub fn init_logging(quiet: bool) {
    let default_directive = if quiet { "warn" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));

    let _ = tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
