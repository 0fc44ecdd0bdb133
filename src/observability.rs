//! Logging subscriber initialisation.

use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingConfig};

/// Errors raised while initialising observability.
#[derive(Debug, Error)]
pub enum ObservabilityError {
    /// Failed to initialise tracing subscriber.
    #[error("failed to initialise tracing subscriber: {0}")]
    TracingSubscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Install the global subscriber. Logs go to stderr so command output on
/// stdout stays clean.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init(config: &LoggingConfig) -> Result<(), ObservabilityError> {
    match config.log_format {
        LogFormat::Compact => init_with_layer(
            config,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr)
                .with_target(true),
        ),
        LogFormat::Json => init_with_layer(
            config,
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true),
        ),
    }
}

fn build_env_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

fn init_with_layer<L>(config: &LoggingConfig, fmt_layer: L) -> Result<(), ObservabilityError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(build_env_filter(config))
        .try_init()?;

    Ok(())
}
