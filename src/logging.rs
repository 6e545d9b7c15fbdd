use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter, e.g. `LYSTA_LOG=debug`
pub const LOG_ENV: &str = "LYSTA_LOG";

/// Install the stderr subscriber. Defaults to `warn` so failed writes show
/// up without cluttering command output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second call (e.g. from tests) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true)
        .without_time()
        .with_writer(std::io::stderr)
        .try_init();
}
