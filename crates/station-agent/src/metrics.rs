use std::collections::VecDeque;

use station_core::AlertLevel;

const RECENT_WINDOW: usize = 20;

/// In-process counters for the station loop.
/// Emitted periodically as a structured tracing event.
pub struct StationMetrics {
    pub polls: u64,
    pub readings_ingested: u64,
    pub readings_rejected: u64,
    pub source_errors: u64,
    pub assessments: u64,
    pub reports_sent: u64,
    pub reports_failed: u64,
    pub last_level: Option<AlertLevel>,
    pub last_score: Option<u32>,

    // Rolling window of recent risk scores
    recent_scores: VecDeque<u32>,
    log_interval_reports: u64,
}

impl StationMetrics {
    pub fn new(log_interval_reports: u64) -> Self {
        Self {
            polls: 0,
            readings_ingested: 0,
            readings_rejected: 0,
            source_errors: 0,
            assessments: 0,
            reports_sent: 0,
            reports_failed: 0,
            last_level: None,
            last_score: None,
            recent_scores: VecDeque::with_capacity(RECENT_WINDOW),
            log_interval_reports,
        }
    }

    pub fn record_assessment(&mut self, level: AlertLevel, score: u32) {
        self.assessments += 1;
        self.last_level = Some(level);
        self.last_score = Some(score);

        self.recent_scores.push_back(score);
        if self.recent_scores.len() > RECENT_WINDOW {
            self.recent_scores.pop_front();
        }
    }

    pub fn record_report(&mut self, delivered: bool) {
        if delivered {
            self.reports_sent += 1;
        } else {
            self.reports_failed += 1;
        }

        let total = self.reports_sent + self.reports_failed;
        if self.log_interval_reports > 0 && total.is_multiple_of(self.log_interval_reports) {
            self.log_metrics();
        }
    }

    /// Mean risk score over the last 20 assessments
    pub fn recent_avg_score(&self) -> f64 {
        if self.recent_scores.is_empty() {
            return 0.0;
        }
        self.recent_scores.iter().map(|&s| s as f64).sum::<f64>() / self.recent_scores.len() as f64
    }

    /// Share of report attempts the backend accepted (0-100%)
    pub fn delivery_rate(&self) -> f64 {
        let total = self.reports_sent + self.reports_failed;
        if total == 0 {
            return 0.0;
        }
        (self.reports_sent as f64 / total as f64) * 100.0
    }

    /// Emit structured telemetry via tracing
    pub fn log_metrics(&self) {
        tracing::info!(
            polls = self.polls,
            readings_ingested = self.readings_ingested,
            readings_rejected = self.readings_rejected,
            source_errors = self.source_errors,
            assessments = self.assessments,
            reports_sent = self.reports_sent,
            reports_failed = self.reports_failed,
            delivery_rate = format!("{:.1}%", self.delivery_rate()),
            last_level = ?self.last_level,
            recent_avg_score = format!("{:.2}", self.recent_avg_score()),
            "Station metrics summary"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_scores_window() {
        let mut metrics = StationMetrics::new(0);
        for score in 0..30 {
            metrics.record_assessment(AlertLevel::Normal, score);
        }

        // Last 20 scores are 10..=29
        assert_eq!(metrics.recent_avg_score(), 19.5);
        assert_eq!(metrics.assessments, 30);
        assert_eq!(metrics.last_score, Some(29));
    }

    #[test]
    fn test_delivery_rate() {
        let mut metrics = StationMetrics::new(2);
        assert_eq!(metrics.delivery_rate(), 0.0);

        metrics.record_report(true);
        metrics.record_report(true);
        metrics.record_report(false);
        metrics.record_report(true);

        assert_eq!(metrics.reports_sent, 3);
        assert_eq!(metrics.reports_failed, 1);
        assert_eq!(metrics.delivery_rate(), 75.0);
    }
}
