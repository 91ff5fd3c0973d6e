//! Tracing subscriber setup.

/// Initialize structured logging for the binary.
///
/// Honors `RUST_LOG`; defaults the crate to `info`.
pub fn init() {
    // Static directive strings are guaranteed to parse successfully
    #[allow(clippy::unwrap_used)]
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("fix_acceptor=info".parse().unwrap()),
        )
        .init();
}
