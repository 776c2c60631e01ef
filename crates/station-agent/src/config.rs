use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use backend_client::BackendConfig;
use rain_predictor::PredictionThresholds;
use station_core::SourceMode;

#[derive(Debug, Clone)]
pub struct StationConfig {
    // Source selection
    pub mode: SourceMode,                  // simulation | hardware
    pub iio_device: PathBuf,               // DHT22 sysfs directory (hardware)
    pub simulation_seed: Option<u64>,      // reproducible simulator runs

    // Control loop cadence
    pub ingest_interval_ms: u64,           // 5000
    pub trend_interval_ms: u64,            // 30000
    pub report_interval_ms: u64,           // 60000
    pub idle_delay_ms: u64,                // 1000

    // Trend window
    pub window_capacity: usize,            // 20

    // Telemetry
    pub metrics_log_interval: u64,         // every N report ticks

    pub thresholds: PredictionThresholds,
    pub backend: BackendConfig,
}

impl StationConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let mode = match var("STATION_MODE", "simulation").trim().to_lowercase().as_str() {
            "simulation" | "simulacion" | "sim" => SourceMode::Simulation,
            "hardware" | "real" => SourceMode::Hardware,
            other => bail!("STATION_MODE must be 'simulation' or 'hardware', got '{}'", other),
        };

        let simulation_seed = match lookup("SIMULATION_SEED").filter(|v| !v.trim().is_empty()) {
            Some(raw) => Some(
                raw.trim()
                    .parse()
                    .with_context(|| format!("SIMULATION_SEED is not a u64: {}", raw))?,
            ),
            None => None,
        };

        let config = Self {
            mode,
            iio_device: PathBuf::from(var("DHT22_IIO_DEVICE", sensor_sources::DEFAULT_IIO_DEVICE)),
            simulation_seed,

            ingest_interval_ms: var("INGEST_INTERVAL_MS", "5000")
                .trim()
                .parse()
                .context("INGEST_INTERVAL_MS")?,
            trend_interval_ms: var("TREND_INTERVAL_MS", "30000")
                .trim()
                .parse()
                .context("TREND_INTERVAL_MS")?,
            report_interval_ms: var("REPORT_INTERVAL_MS", "60000")
                .trim()
                .parse()
                .context("REPORT_INTERVAL_MS")?,
            idle_delay_ms: var("IDLE_DELAY_MS", "1000")
                .trim()
                .parse()
                .context("IDLE_DELAY_MS")?,

            window_capacity: var("WINDOW_CAPACITY", "20")
                .trim()
                .parse()
                .context("WINDOW_CAPACITY")?,

            metrics_log_interval: var("METRICS_LOG_INTERVAL", "10")
                .trim()
                .parse()
                .context("METRICS_LOG_INTERVAL")?,

            thresholds: PredictionThresholds::from_lookup(&lookup)
                .context("Invalid prediction thresholds")?,
            // Simulated stations log reports unless told otherwise
            backend: BackendConfig::from_lookup(&lookup, mode == SourceMode::Simulation)
                .context("Invalid backend configuration")?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("INGEST_INTERVAL_MS", self.ingest_interval_ms),
            ("TREND_INTERVAL_MS", self.trend_interval_ms),
            ("REPORT_INTERVAL_MS", self.report_interval_ms),
            ("IDLE_DELAY_MS", self.idle_delay_ms),
        ] {
            if value == 0 {
                bail!("{} must be greater than zero", name);
            }
        }

        if self.window_capacity < 2 {
            bail!(
                "WINDOW_CAPACITY must be at least 2 to estimate trends (got {})",
                self.window_capacity
            );
        }

        self.thresholds
            .validate()
            .context("Invalid prediction thresholds")?;

        self.backend
            .validate()
            .context("Invalid backend configuration")?;

        Ok(())
    }

    pub fn idle_delay(&self) -> Duration {
        Duration::from_millis(self.idle_delay_ms)
    }
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            mode: SourceMode::Simulation,
            iio_device: PathBuf::from(sensor_sources::DEFAULT_IIO_DEVICE),
            simulation_seed: None,
            ingest_interval_ms: 5_000,
            trend_interval_ms: 30_000,
            report_interval_ms: 60_000,
            idle_delay_ms: 1_000,
            window_capacity: trend_analysis::DEFAULT_CAPACITY,
            metrics_log_interval: 10,
            thresholds: PredictionThresholds::default(),
            backend: BackendConfig::default(),
        }
    }
}
