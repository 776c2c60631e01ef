use async_trait::async_trait;
use crate::{RawReading, SinkError, SourceError, SourceMode, StationReport};

/// Anything that can produce raw weather readings (simulator, DHT22, ...).
#[async_trait]
pub trait ReadingSource: Send {
    /// Take one reading, stamped with `timestamp_ms` from the station clock.
    async fn read(&mut self, timestamp_ms: u64) -> Result<RawReading, SourceError>;

    /// Whether readings are simulated or come from real hardware
    fn mode(&self) -> SourceMode;

    /// Source name for logging
    fn name(&self) -> &str;
}

/// Destination for periodic station reports.
#[async_trait]
pub trait ReportSink: Send + Sync {
    /// Deliver one report. `Ok(())` means the receiver acknowledged it.
    async fn send(&self, report: &StationReport) -> Result<(), SinkError>;

    /// Sink name for logging
    fn name(&self) -> &str;
}
