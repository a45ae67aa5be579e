//! Tracing subscriber setup for the binary.

use tracing_subscriber::EnvFilter;

use crate::OutputFormat;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "BLUEPRINT_LOG";

fn default_directive(quiet: bool) -> &'static str {
    if quiet {
        "warn"
    } else {
        "info"
    }
}

/// Install the global subscriber, writing to stderr. JSON lines when the
/// CLI output format is JSON. A second call is a no-op.
pub fn init(output: OutputFormat, quiet: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_directive(quiet)));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    let _ = match output {
        OutputFormat::Json => builder.json().try_init(),
        OutputFormat::Text => builder.try_init(),
    };
}
