//! Structured logging initialisation
//!
//! The filter comes from `RUST_LOG` when set, else from the configured level.
//! Output is pretty, compact or newline-delimited JSON per `LOG_FORMAT`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use otp_shared::{LogFormat, LoggingConfig};

/// Install the global tracing subscriber; fails if one is already set
pub fn init_tracing(config: &LoggingConfig) -> anyhow::Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);
    let source = config.source_location;

    match config.format {
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_file(source)
                    .with_line_number(source),
            )
            .try_init()?,
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_target(true))
            .try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_current_span(true)
                    .with_file(source)
                    .with_line_number(source),
            )
            .try_init()?,
    }
    Ok(())
}
