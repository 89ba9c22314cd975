//! Tracing and logging setup
//!
//! Configures the `tracing` subscriber with `RUST_LOG`-style filtering and a
//! pretty or JSON formatter.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::{AppSettings, LogFormat};

const DEFAULT_FILTER: &str = "info,club_api=debug,club_service=debug,club_db=debug,sqlx=warn,tower_http=info";

/// Tracing configuration options
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Filter used when `RUST_LOG` is not set
    pub default_filter: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    /// Log span close events with their timings
    pub span_events: bool,
    /// Include file and line numbers
    pub file_line: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            default_filter: DEFAULT_FILTER.to_string(),
            json: false,
            span_events: false,
            file_line: true,
        }
    }
}

impl TracingConfig {
    /// Structured output for production log shipping
    #[must_use]
    pub fn production() -> Self {
        Self {
            default_filter: "info,sqlx=warn".to_string(),
            json: true,
            span_events: false,
            file_line: false,
        }
    }

    #[must_use]
    pub fn from_settings(settings: &AppSettings) -> Self {
        let base = if settings.env.is_production() {
            Self::production()
        } else {
            Self::default()
        };
        Self {
            json: settings.log_format == LogFormat::Json,
            ..base
        }
    }
}

/// Initialize tracing with the default configuration
///
/// # Errors
/// Returns `AlreadyInitialized` if a global subscriber is already set
pub fn try_init_tracing() -> Result<(), TracingError> {
    try_init_tracing_with_config(&TracingConfig::default())
}

/// Initialize tracing with a custom configuration
///
/// # Errors
/// Returns `AlreadyInitialized` if a global subscriber is already set
pub fn try_init_tracing_with_config(config: &TracingConfig) -> Result<(), TracingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.default_filter));
    let span_events = if config.span_events {
        FmtSpan::CLOSE
    } else {
        FmtSpan::NONE
    };

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_file(config.file_line)
                    .with_line_number(config.file_line)
                    .with_span_events(span_events),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_file(config.file_line)
                    .with_line_number(config.file_line)
                    .with_span_events(span_events),
            )
            .try_init()
    };

    result.map_err(|_| TracingError::AlreadyInitialized)
}

/// Tracing initialization errors
#[derive(Debug, thiserror::Error)]
pub enum TracingError {
    #[error("Tracing subscriber already initialized")]
    AlreadyInitialized,
}
