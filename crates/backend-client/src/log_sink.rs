use async_trait::async_trait;
use station_core::{ReportSink, SinkError, StationReport};

use crate::BackendPayload;

/// Dry-run sink: logs the payload that would have been posted and succeeds.
pub struct LogSink {
    sensor_id: String,
}

impl LogSink {
    pub fn new(sensor_id: impl Into<String>) -> Self {
        Self {
            sensor_id: sensor_id.into(),
        }
    }
}

#[async_trait]
impl ReportSink for LogSink {
    async fn send(&self, report: &StationReport) -> Result<(), SinkError> {
        let payload = BackendPayload::from_report(&self.sensor_id, report);
        let json = serde_json::to_string(&payload)?;
        tracing::info!(payload = %json, "Report (dry run, not sent)");
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::sample_report;
    use station_core::AlertLevel;

    #[tokio::test]
    async fn test_log_sink_always_succeeds() {
        let sink = LogSink::new("DRY_RUN");
        assert!(sink.send(&sample_report(AlertLevel::Critical)).await.is_ok());
        assert_eq!(sink.name(), "log");
    }
}
