//! Logging initialisation for the meshsim CLI.
//!
//! Installs a global `tracing` subscriber with optional JSON formatting and
//! bridges the `log` facade so crates using either API emit structured events.

use std::str::FromStr;
use std::sync::OnceLock;
use std::{env, io};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{
    EnvFilter, Layer, fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt,
};

const LOG_FORMAT_ENV: &str = "MESHSIM_LOG_FORMAT";

static INITIALISED: OnceLock<()> = OnceLock::new();

/// Diagnostic output encodings selectable via `MESHSIM_LOG_FORMAT`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum LogFormat {
    /// Human-readable line output.
    #[default]
    Human,
    /// Newline-delimited JSON carrying span context.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            other => Err(LoggingError::UnsupportedFormat {
                provided: other.to_owned(),
            }),
        }
    }
}

impl LogFormat {
    fn from_env() -> Result<Self, LoggingError> {
        match env::var(LOG_FORMAT_ENV) {
            Ok(raw) => raw.parse(),
            Err(env::VarError::NotPresent) => Ok(Self::default()),
            Err(err @ env::VarError::NotUnicode(_)) => Err(LoggingError::InvalidUnicode {
                name: LOG_FORMAT_ENV,
                source: err,
            }),
        }
    }
}

/// Errors raised while initialising structured logging.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// The format override was present but not valid UTF-8.
    #[error("`{name}` holds a non-UTF-8 value")]
    InvalidUnicode {
        /// Name of the offending environment variable.
        name: &'static str,
        /// Underlying decoding failure.
        #[source]
        source: env::VarError,
    },
    /// The format override named an unknown encoding.
    #[error("unrecognised log format `{provided}`; use `human` or `json`")]
    UnsupportedFormat {
        /// Raw value supplied by the user.
        provided: String,
    },
    /// The global tracing subscriber slot was already claimed.
    #[error("could not install the global tracing subscriber: {source}")]
    InstallFailed {
        /// Error raised by `tracing_subscriber`.
        #[source]
        source: tracing_subscriber::util::TryInitError,
    },
}

/// Install global structured logging if it has not already been configured.
///
/// The format defaults to human-readable output and switches to JSON when
/// `MESHSIM_LOG_FORMAT=json`. Diagnostics go to `stderr` so the per-cycle
/// reports on `stdout` stay clean; verbosity follows `RUST_LOG` with an
/// `info` default.
///
/// # Errors
/// Returns [`LoggingError`] if the format override is invalid. A subscriber
/// installed elsewhere in the process is tolerated and left in place.
pub fn init_logging() -> Result<(), LoggingError> {
    if INITIALISED.get().is_some() {
        return Ok(());
    }

    let format = LogFormat::from_env()?;
    match install_subscriber(format) {
        Ok(()) => {}
        Err(LoggingError::InstallFailed { source }) => {
            eprintln!("structured logging already configured elsewhere: {source}");
        }
        Err(err) => return Err(err),
    }
    let _ = INITIALISED.set(());
    Ok(())
}

fn install_subscriber(format: LogFormat) -> Result<(), LoggingError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let base = tracing_subscriber::fmt::layer()
        .with_span_events(FmtSpan::FULL)
        .with_writer(io::stderr);
    let fmt_layer = match format {
        LogFormat::Human => base.boxed(),
        LogFormat::Json => base
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .boxed(),
    };

    // Bridging the log facade is best-effort; an existing logger keeps the
    // global slot.
    let _ = LogTracer::init();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|source| LoggingError::InstallFailed { source })
}
