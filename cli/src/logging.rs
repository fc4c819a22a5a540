use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "DIETLOG_LOG";

/// Install the stderr diagnostics subscriber. `--verbose` forces debug
/// output; otherwise `DIETLOG_LOG` is honoured, falling back to warnings only.
pub fn init(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("dietlog=debug,dietlog_core=debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
