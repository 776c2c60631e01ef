use std::future::Future;
use std::time::Duration;

use rain_predictor::AlertClassifier;
use sensor_sources::{HardwareSource, IioDht22, SimulatedSource};
use station_core::{
    FilteredReading, RainPrediction, ReadingSource, ReportSink, SourceMode, StationReport,
};
use tokio::time::{self, MissedTickBehavior};
use trend_analysis::{ChannelTrends, SampleBuffer, TrendEstimator};

use crate::clock::{Clock, PeriodicTask};
use crate::config::StationConfig;
use crate::metrics::StationMetrics;

/// Means, trends and rain prediction over one window snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Assessment {
    pub filtered: FilteredReading,
    pub trends: ChannelTrends,
    pub prediction: RainPrediction,
}

/// Which periodic tasks fired during a poll
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickSummary {
    pub ingest: bool,
    pub trend: bool,
    pub report: bool,
}

/// Owning context for the station loop: sample window, analysis,
/// collaborators and schedule all live here.
pub struct Station {
    buffer: SampleBuffer,
    estimator: TrendEstimator,
    classifier: AlertClassifier,
    source: Box<dyn ReadingSource>,
    sink: Box<dyn ReportSink>,
    ingest_task: PeriodicTask,
    trend_task: PeriodicTask,
    report_task: PeriodicTask,
    latest: Option<Assessment>,
    metrics: StationMetrics,
}

impl Station {
    pub fn new(
        config: &StationConfig,
        source: Box<dyn ReadingSource>,
        sink: Box<dyn ReportSink>,
    ) -> Self {
        Self {
            buffer: SampleBuffer::with_capacity(config.window_capacity),
            estimator: TrendEstimator::new(),
            classifier: AlertClassifier::with_thresholds(config.thresholds.clone()),
            source,
            sink,
            ingest_task: PeriodicTask::new("ingest", config.ingest_interval_ms),
            trend_task: PeriodicTask::new("trend", config.trend_interval_ms),
            report_task: PeriodicTask::new("report", config.report_interval_ms),
            latest: None,
            metrics: StationMetrics::new(config.metrics_log_interval),
        }
    }

    pub fn buffer(&self) -> &SampleBuffer {
        &self.buffer
    }

    pub fn latest(&self) -> Option<&Assessment> {
        self.latest.as_ref()
    }

    pub fn metrics(&self) -> &StationMetrics {
        &self.metrics
    }

    pub fn mode(&self) -> SourceMode {
        self.source.mode()
    }

    /// Run whichever tasks are due at `now_ms`, in ingest → trend → report order
    pub async fn poll(&mut self, now_ms: u64) -> TickSummary {
        self.metrics.polls += 1;
        let mut summary = TickSummary::default();

        if self.ingest_task.try_fire(now_ms) {
            summary.ingest = true;
            self.ingest(now_ms).await;
        }

        if self.trend_task.try_fire(now_ms) {
            summary.trend = true;
            self.assess();
        }

        if self.report_task.try_fire(now_ms) {
            summary.report = true;
            self.report(now_ms).await;
        }

        summary
    }

    /// Take one reading from the source into the window.
    ///
    /// Readings with non-positive temperature or humidity are dropped; the
    /// window itself accepts anything.
    pub async fn ingest(&mut self, now_ms: u64) {
        let reading = match self.source.read(now_ms).await {
            Ok(reading) => reading,
            Err(e) => {
                self.metrics.source_errors += 1;
                tracing::warn!("Failed to read {}: {}", self.source.name(), e);
                return;
            }
        };

        if reading.temperature > 0.0 && reading.humidity > 0.0 {
            self.buffer.push(reading);
            self.metrics.readings_ingested += 1;
            tracing::debug!(
                "Ingested T:{:.1}C H:{:.1}% P:{:.1}hPa ({} in window)",
                reading.temperature,
                reading.humidity,
                reading.pressure,
                self.buffer.len()
            );
        } else {
            self.metrics.readings_rejected += 1;
            tracing::debug!(
                "Dropped reading T:{:.1}C H:{:.1}%",
                reading.temperature,
                reading.humidity
            );
        }
    }

    /// Means, trends and prediction over the window as it is now
    fn evaluate(&self) -> Option<Assessment> {
        let (filtered, trends) = self.estimator.analyze(&self.buffer);
        if !filtered.has_data() {
            return None;
        }

        let prediction = self
            .classifier
            .classify_reading(&filtered, trends.humidity, trends.pressure);
        Some(Assessment {
            filtered,
            trends,
            prediction,
        })
    }

    /// Trend tick: evaluate the current window and log the outcome
    pub fn assess(&mut self) -> Option<&Assessment> {
        let Some(assessment) = self.evaluate() else {
            tracing::debug!("No readings yet, skipping assessment");
            self.latest = None;
            return None;
        };

        let Assessment {
            filtered,
            trends,
            prediction,
        } = &assessment;
        tracing::info!(
            "Filtered - T:{:.2}C H:{:.2}% P:{:.2}hPa over {} samples",
            filtered.temperature,
            filtered.humidity,
            filtered.pressure,
            filtered.sample_count
        );
        tracing::info!(
            "Prediction: {} (score {}, humidity trend {:.3}, pressure trend {:.3})",
            prediction.level.to_label(),
            prediction.score,
            trends.humidity,
            trends.pressure
        );

        self.metrics
            .record_assessment(prediction.level, prediction.score);
        self.latest = Some(assessment);
        self.latest.as_ref()
    }

    /// Report tick: re-evaluate the window and hand the result to the sink
    pub async fn report(&mut self, now_ms: u64) {
        let Some(assessment) = self.evaluate() else {
            tracing::debug!("No readings yet, skipping report");
            return;
        };

        let report = StationReport {
            timestamp_ms: now_ms,
            mode: self.source.mode(),
            filtered: assessment.filtered,
            prediction: assessment.prediction.clone(),
            generated_at: chrono::Utc::now(),
        };
        self.latest = Some(assessment);

        match self.sink.send(&report).await {
            Ok(()) => {
                tracing::info!("Report delivered via {}", self.sink.name());
                self.metrics.record_report(true);
            }
            Err(e) => {
                tracing::warn!("Failed to deliver report via {}: {}", self.sink.name(), e);
                self.metrics.record_report(false);
            }
        }
    }
}

/// Build the reading source the configuration selects
pub fn build_source(config: &StationConfig) -> Box<dyn ReadingSource> {
    match config.mode {
        SourceMode::Simulation => match config.simulation_seed {
            Some(seed) => Box::new(SimulatedSource::with_seed(seed)),
            None => Box::new(SimulatedSource::new()),
        },
        SourceMode::Hardware => Box::new(HardwareSource::new(IioDht22::new(
            config.iio_device.clone(),
        ))),
    }
}

/// Poll the station every `idle_delay` until `shutdown` resolves
pub async fn run<C, F>(station: &mut Station, clock: &C, idle_delay: Duration, shutdown: F)
where
    C: Clock,
    F: Future<Output = ()>,
{
    let mut interval = time::interval(idle_delay);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                station.poll(clock.now_ms()).await;
            }
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received, stopping station loop");
                break;
            }
        }
    }
}
