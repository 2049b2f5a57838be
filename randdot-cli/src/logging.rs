//! Structured diagnostics for the `randdot` binary.
//!
//! Diagnostics always go to `stderr` because `--output -` puts the DOT
//! document on `stdout`. `RUST_LOG` selects the level (default `info`) and
//! `RANDDOT_LOG_FORMAT` selects `human` or `json` lines.

use std::{env, str::FromStr};

use thiserror::Error;
use tracing::Subscriber;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, registry::LookupSpan,
    util::SubscriberInitExt,
};

/// Environment variable selecting the diagnostic format.
pub const LOG_FORMAT_ENV: &str = "RANDDOT_LOG_FORMAT";

const DEFAULT_LEVEL: &str = "info";

/// Shape of each diagnostic line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Compact text without targets.
    #[default]
    Human,
    /// One flattened JSON object per event, carrying the current span.
    Json,
}

/// Errors raised while reading the logging configuration.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// `RANDDOT_LOG_FORMAT` was not valid UTF-8.
    #[error("`RANDDOT_LOG_FORMAT` is not valid UTF-8: {source}")]
    InvalidUnicode {
        /// Lookup failure reported by the environment.
        #[source]
        source: env::VarError,
    },
    /// `RANDDOT_LOG_FORMAT` named a format other than `human` or `json`.
    #[error("`RANDDOT_LOG_FORMAT={provided}` is not a log format; use `human` or `json`")]
    UnsupportedFormat {
        /// Normalised value that failed to parse.
        provided: String,
    },
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let normalised = raw.trim().to_ascii_lowercase();
        match normalised.as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(LoggingError::UnsupportedFormat {
                provided: normalised,
            }),
        }
    }
}

impl LogFormat {
    /// Reads `RANDDOT_LOG_FORMAT`, falling back to [`LogFormat::Human`] when
    /// it is unset.
    ///
    /// # Errors
    /// Returns [`LoggingError`] when the variable is not UTF-8 or names an
    /// unknown format.
    pub fn from_env() -> Result<Self, LoggingError> {
        match env::var(LOG_FORMAT_ENV) {
            Ok(raw) => raw.parse(),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(source @ env::VarError::NotUnicode(_)) => {
                Err(LoggingError::InvalidUnicode { source })
            }
        }
    }

    fn layer<S>(self) -> Box<dyn Layer<S> + Send + Sync>
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_span_events(FmtSpan::CLOSE);
        match self {
            Self::Human => layer.compact().with_target(false).boxed(),
            Self::Json => layer
                .json()
                .flatten_event(true)
                .with_current_span(true)
                .with_span_list(false)
                .boxed(),
        }
    }
}

/// Installs the global subscriber and bridges the `log` facade.
///
/// Calling this again, or after another subscriber was installed, keeps the
/// existing subscriber.
///
/// # Errors
/// Returns [`LoggingError`] when `RANDDOT_LOG_FORMAT` cannot be used.
pub fn init_logging() -> Result<(), LoggingError> {
    let format = LogFormat::from_env()?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL));

    if let Err(error) = tracing_subscriber::registry()
        .with(filter)
        .with(format.layer())
        .try_init()
    {
        tracing::debug!(%error, "keeping the installed subscriber");
        return Ok(());
    }
    if let Err(error) = LogTracer::init() {
        tracing::debug!(%error, "log records are already routed to tracing");
    }
    Ok(())
}
