//! Tracing initialization for the CLI binary.
//!
//! Logs go to stderr so generated content on stdout stays pipeable.
//! `RUST_LOG` overrides the level; `--verbose` bumps the default to debug.

/// Initialize the global subscriber. Call once, before any command runs.
pub fn init(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_ansi(false)
        .init();
}
