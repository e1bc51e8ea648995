use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::error::{Result, SweepError};

fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn build_filter(verbosity: u8) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }
    let filter = format!(
        "{}={},hyper=warn,reqwest=warn,yup_oauth2=warn",
        env!("CARGO_CRATE_NAME"),
        level_for(verbosity)
    );
    EnvFilter::try_new(filter).map_err(|e| SweepError::Config(format!("Invalid log filter: {}", e)))
}

/// Install the stderr subscriber. `RUST_LOG` wins over `verbosity`.
/// Stdout is left for the per-file report lines.
pub fn init_logging(verbosity: u8) -> Result<()> {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_target(verbosity > 1)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(build_filter(verbosity)?)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| SweepError::Config(format!("Failed to initialize logging: {}", e)))
}
