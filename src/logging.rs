use tracing_subscriber::EnvFilter;

/// Installs a global tracing subscriber for embedders and test binaries.
///
/// `RUST_LOG` takes precedence over the supplied default directive.
/// Calling this more than once is harmless; later calls are no-ops.
pub fn init(default_directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive.to_string()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}
