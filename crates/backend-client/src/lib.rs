mod http;
mod log_sink;

pub use http::HttpBackendSink;
pub use log_sink::LogSink;

use serde::{Deserialize, Serialize};
use station_core::{ReportSink, SinkError, SourceMode, StationReport};

pub const DEFAULT_SENSOR_ID: &str = "ARDUINO_TROPICAL_01";
pub const DEFAULT_ENDPOINT: &str = "/api/datos-climaticos";

/// JSON body posted to the backend for every report tick.
///
/// Field names follow the backend's schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendPayload {
    pub sensor_id: String,
    /// Station clock in milliseconds
    pub timestamp: u64,
    #[serde(rename = "temperatura")]
    pub temperature: f64,
    #[serde(rename = "humedad")]
    pub humidity: f64,
    #[serde(rename = "presion")]
    pub pressure: f64,
    /// Alert code: 0 normal, 1 warning, 2 critical
    #[serde(rename = "alerta")]
    pub alert: u8,
    #[serde(rename = "modo")]
    pub mode: SourceMode,
}

impl BackendPayload {
    /// Build the payload for a report, rounding channels to two decimals
    pub fn from_report(sensor_id: &str, report: &StationReport) -> Self {
        Self {
            sensor_id: sensor_id.to_string(),
            timestamp: report.timestamp_ms,
            temperature: round2(report.filtered.temperature),
            humidity: round2(report.filtered.humidity),
            pressure: round2(report.filtered.pressure),
            alert: report.prediction.level.code(),
            mode: report.mode,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Configuration for the reporting backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub endpoint: String,
    pub sensor_id: String,
    pub timeout_secs: u64,
    /// Log payloads instead of posting them
    pub dry_run: bool,
}

impl BackendConfig {
    /// Build from a key lookup (env, test map). `default_dry_run` applies
    /// when `BACKEND_DRY_RUN` is unset; malformed values are errors.
    pub fn from_lookup<F>(lookup: F, default_dry_run: bool) -> Result<Self, SinkError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &str| lookup(var).filter(|s| !s.trim().is_empty());

        let timeout_secs: u64 = match non_empty("BACKEND_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                SinkError::Config(format!("BACKEND_TIMEOUT_SECS is not a number: {:?}", raw))
            })?,
            None => 10,
        };
        let dry_run: bool = match non_empty("BACKEND_DRY_RUN") {
            Some(raw) => raw.trim().parse().map_err(|_| {
                SinkError::Config(format!(
                    "BACKEND_DRY_RUN must be 'true' or 'false', got {:?}",
                    raw
                ))
            })?,
            None => default_dry_run,
        };

        let config = Self {
            base_url: non_empty("BACKEND_URL")
                .unwrap_or_else(|| "http://localhost:8080".to_string()),
            endpoint: non_empty("BACKEND_ENDPOINT")
                .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            sensor_id: non_empty("STATION_SENSOR_ID")
                .unwrap_or_else(|| DEFAULT_SENSOR_ID.to_string()),
            timeout_secs,
            dry_run,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SinkError> {
        if self.timeout_secs == 0 {
            return Err(SinkError::Config(
                "BACKEND_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Full report URL: base URL joined with the endpoint path
    pub fn report_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.endpoint.trim_start_matches('/')
        )
    }
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            sensor_id: DEFAULT_SENSOR_ID.to_string(),
            timeout_secs: 10,
            dry_run: true,
        }
    }
}

/// Pick the sink the configuration asks for
pub fn build_sink(config: &BackendConfig) -> Result<Box<dyn ReportSink>, SinkError> {
    if config.dry_run {
        tracing::info!("Backend dry-run: reports are logged, not sent");
        return Ok(Box::new(LogSink::new(config.sensor_id.clone())));
    }

    let sink = HttpBackendSink::new(config)?;
    tracing::info!("Reporting to {}", sink.url());
    Ok(Box::new(sink))
}
