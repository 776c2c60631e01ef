use anyhow::{Context, Result};
use tokio::signal::unix::SignalKind;

use station_agent::{build_source, run, MonotonicClock, Station, StationConfig};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Load .env, init tracing
    dotenvy::dotenv().ok();

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);
    if json_logging {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .init();
    }

    // Panic hook: log panic info before crashing
    std::panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
        tracing::error!("PANIC: {info}");
    }));

    tracing::info!("Starting weather station");

    // 2. Load configuration
    let config = StationConfig::from_env()?;
    tracing::info!("Configuration loaded and validated");
    tracing::info!("  Mode: {}", config.mode.name());
    tracing::info!(
        "  Cadence: ingest {}ms, trend {}ms, report {}ms (idle {}ms)",
        config.ingest_interval_ms,
        config.trend_interval_ms,
        config.report_interval_ms,
        config.idle_delay_ms
    );
    tracing::info!("  Window: {} samples", config.window_capacity);
    tracing::info!(
        "  Alert scores: warning >= {}, critical >= {}",
        config.thresholds.score_warning,
        config.thresholds.score_critical
    );
    tracing::info!("  Sensor id: {}", config.backend.sensor_id);

    // 3. Collaborators
    let source = build_source(&config);
    tracing::info!("Reading source: {}", source.name());

    let sink = backend_client::build_sink(&config.backend)
        .context("Failed to initialize report sink")?;

    let mut station = Station::new(&config, source, sink);
    let clock = MonotonicClock::new();

    // 4. Main loop with graceful shutdown (SIGINT + SIGTERM)
    let mut sigterm = tokio::signal::unix::signal(SignalKind::terminate())?;
    let shutdown = async {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received SIGINT");
            }
            _ = sigterm.recv() => {
                tracing::info!("Received SIGTERM");
            }
        }
    };

    run(&mut station, &clock, config.idle_delay(), shutdown).await;

    station.metrics().log_metrics();
    tracing::info!("Weather station stopped");

    Ok(())
}
