use crate::config::{AppEnvironment, TelemetryConfig};
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug)]
pub enum TelemetryError {
    InvalidDirective { value: String, source: ParseError },
    Init(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::InvalidDirective { value, .. } => {
                write!(
                    f,
                    "APP_LOG_LEVEL '{value}' is not a valid tracing filter directive"
                )
            }
            TelemetryError::Init(err) => write!(f, "failed to install subscriber: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::InvalidDirective { source, .. } => Some(source),
            TelemetryError::Init(err) => Some(&**err),
        }
    }
}

/// The configured level applies to this crate and the API crate while the
/// HTTP stack stays at `warn`.
fn build_filter(config: &TelemetryConfig) -> Result<EnvFilter, TelemetryError> {
    let level = config.log_level.trim();
    let directives = format!("warn,vioscore={level},vioscore_api={level}");
    EnvFilter::try_new(directives).map_err(|source| TelemetryError::InvalidDirective {
        value: config.log_level.clone(),
        source,
    })
}

/// Install the global subscriber. Development keeps targets and ANSI color
/// for local reading; test and production emit compact plain lines for log
/// shippers.
pub fn init(environment: AppEnvironment, config: &TelemetryConfig) -> Result<(), TelemetryError> {
    // RUST_LOG wins when set.
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => build_filter(config)?,
    };
    let builder = tracing_subscriber::fmt().with_env_filter(filter).compact();

    match environment {
        AppEnvironment::Development => builder
            .with_target(true)
            .with_ansi(true)
            .try_init()
            .map_err(TelemetryError::Init),
        AppEnvironment::Test | AppEnvironment::Production => builder
            .with_target(false)
            .with_ansi(false)
            .try_init()
            .map_err(TelemetryError::Init),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(level: &str) -> TelemetryConfig {
        TelemetryConfig {
            log_level: level.to_string(),
        }
    }

    #[test]
    fn filter_accepts_plain_levels() {
        for level in ["trace", "debug", "info", "warn", "error"] {
            assert!(
                build_filter(&config(level)).is_ok(),
                "level '{level}' should build a filter"
            );
        }
    }

    #[test]
    fn filter_rejects_garbage_directives() {
        let err = build_filter(&config("loud[[")).expect_err("directive must fail to parse");
        match err {
            TelemetryError::InvalidDirective { value, .. } => assert_eq!(value, "loud[["),
            other => panic!("unexpected error: {other}"),
        }
    }
}
