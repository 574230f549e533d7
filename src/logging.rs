//! Diagnostics go to stderr so command reports on stdout stay parseable.

use tracing_subscriber::{EnvFilter, fmt};

/// Verbosity count from `-v` flags: 0 = warn, 1 = debug, 2+ = trace.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber. `RUST_LOG`, when set, wins over `verbosity`.
pub fn init_logging(verbosity: u8) {
    let env_filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(level_for_verbosity(verbosity))
    };

    let _ = fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
