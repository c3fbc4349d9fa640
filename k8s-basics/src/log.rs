//! Configures the global default tracing subscriber

use thiserror::Error;

pub use tracing_subscriber::{util::TryInitError as LogInitError, EnvFilter as LogFilter};

/// Configures logging settings.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct LogArgs {
    /// The filter that determines what tracing spans and events are enabled.
    #[cfg_attr(
        feature = "clap",
        arg(long, env = "K8S_BASICS_LOG", default_value = LogLevel::DEFAULT)
    )]
    pub log_level: LogLevel,

    /// The log format to use.
    #[cfg_attr(feature = "clap", arg(long, default_value = "plain"))]
    pub log_format: LogFormat,
}

/// A validated tracing filter directive, e.g. `k8s_basics=debug,warn`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LogLevel(String);

/// Configures whether logs should be emitted in plaintext (the default) or as JSON-encoded
/// messages
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// The default plaintext format
    #[default]
    Plain,

    /// The JSON-encoded format
    Json,
}

/// Indicates that an invalid log format was specified
#[derive(Debug, Error)]
#[error("invalid log format: {0} must be 'plain' or 'json'")]
pub struct InvalidLogFormat(String);

/// Indicates that an invalid log filter was specified
#[derive(Debug, Error)]
#[error("invalid log level: {0}")]
pub struct InvalidLogLevel(#[from] tracing_subscriber::filter::ParseError);

// === impl LogLevel ===

impl LogLevel {
    /// The filter used when none is configured.
    pub const DEFAULT: &'static str = "k8s_basics=info,warn";

    /// Builds the filter described by this directive.
    pub fn filter(&self) -> LogFilter {
        // Validated on construction.
        LogFilter::try_new(&self.0).unwrap_or_else(|_| LogFilter::new(Self::DEFAULT))
    }
}

impl Default for LogLevel {
    fn default() -> Self {
        Self(Self::DEFAULT.to_string())
    }
}

impl std::str::FromStr for LogLevel {
    type Err = InvalidLogLevel;

    fn from_str(s: &str) -> Result<Self, InvalidLogLevel> {
        LogFilter::try_new(s)?;
        Ok(Self(s.to_string()))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// === impl LogFormat ===

impl std::str::FromStr for LogFormat {
    type Err = InvalidLogFormat;

    fn from_str(s: &str) -> Result<Self, InvalidLogFormat> {
        match s {
            "json" => Ok(LogFormat::Json),
            "plain" => Ok(LogFormat::Plain),
            s => Err(InvalidLogFormat(s.to_string())),
        }
    }
}

impl LogFormat {
    /// Attempts to configure the global default tracing subscriber in the current scope, returning
    /// an error if one is already set
    ///
    /// This method returns an error if a global default subscriber has already been set, or if a
    /// `log` logger has already been set.
    pub fn try_init(self, filter: LogFilter) -> Result<(), LogInitError> {
        use tracing_subscriber::prelude::*;

        let registry = tracing_subscriber::registry().with(filter);

        match self {
            LogFormat::Plain => registry.with(tracing_subscriber::fmt::layer()).try_init()?,

            LogFormat::Json => {
                let event_fmt = tracing_subscriber::fmt::format()
                    // Configure the formatter to output JSON logs.
                    .json()
                    // Output the current span context as a JSON list.
                    .with_span_list(true)
                    // Don't output a field for the current span, since this
                    // would duplicate information already in the span list.
                    .with_current_span(false);

                // Use the JSON event formatter and the JSON field formatter.
                let fmt = tracing_subscriber::fmt::layer()
                    .event_format(event_fmt)
                    .fmt_fields(tracing_subscriber::fmt::format::JsonFields::default());

                registry.with(fmt).try_init()?
            }
        };

        Ok(())
    }
}
