use crate::config::TelemetryConfig;
use axum_prometheus::PrometheusMetricLayer;
use metrics_exporter_prometheus::PrometheusHandle;
use std::fmt;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Target prefix for this service's own spans and events.
const SERVICE_TARGET: &str = "globalpath";

#[derive(Debug)]
pub enum TelemetryError {
    EnvFilter { value: String, source: ParseError },
    Subscriber(Box<dyn std::error::Error + Send + Sync>),
}

impl fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TelemetryError::EnvFilter { value, .. } => {
                write!(
                    f,
                    "invalid log level/filter '{}': unable to build EnvFilter",
                    value
                )
            }
            TelemetryError::Subscriber(err) => write!(f, "telemetry error: {err}"),
        }
    }
}

impl std::error::Error for TelemetryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TelemetryError::EnvFilter { source, .. } => Some(source),
            TelemetryError::Subscriber(err) => Some(&**err),
        }
    }
}

/// Expands a bare level like "debug" into directives that run this service's
/// own events at that level while holding the HTTP stack and other
/// dependencies at warn. Values that already contain filter directives pass
/// through untouched.
fn filter_directives(log_level: &str) -> String {
    let log_level = log_level.trim();
    if log_level.contains('=') || log_level.contains(',') {
        log_level.to_string()
    } else {
        format!("warn,{SERVICE_TARGET}={log_level}")
    }
}

pub fn init(config: &TelemetryConfig) -> Result<(), TelemetryError> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => {
            let directives = filter_directives(&config.log_level);
            EnvFilter::try_new(&directives).map_err(|source| TelemetryError::EnvFilter {
                value: directives,
                source,
            })?
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Subscriber)
}

/// Builds the Prometheus layer/handle pair the HTTP server mounts; the layer
/// wraps the router, the handle backs the /metrics endpoint.
pub fn metrics() -> (PrometheusMetricLayer<'static>, PrometheusHandle) {
    PrometheusMetricLayer::pair()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_levels_scope_to_the_service_target() {
        let directives = filter_directives("debug");
        assert_eq!(directives, "warn,globalpath=debug");
        EnvFilter::try_new(&directives).expect("directives parse");
    }

    #[test]
    fn explicit_directives_pass_through() {
        let raw = "info,tower_http=debug";
        assert_eq!(filter_directives(raw), raw);
        assert_eq!(filter_directives("globalpath=trace"), "globalpath=trace");
    }
}
