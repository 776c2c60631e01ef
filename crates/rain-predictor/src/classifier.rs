use station_core::{AlertLevel, FilteredReading, RainPrediction, RiskFactor, RiskFactorKind};

use crate::models::*;

/// Additive point-scoring rain classifier.
///
/// Each factor group contributes at most once; the sum decides the level,
/// with a saturation override that forces `Critical` for very humid,
/// low-pressure air.
#[derive(Debug, Clone, Default)]
pub struct AlertClassifier {
    thresholds: PredictionThresholds,
}

impl AlertClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_thresholds(thresholds: PredictionThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &PredictionThresholds {
        &self.thresholds
    }

    /// Classify current conditions and trends
    pub fn classify(
        &self,
        temperature: f64,
        humidity: f64,
        pressure: f64,
        humidity_trend: f64,
        pressure_trend: f64,
    ) -> RainPrediction {
        let t = &self.thresholds;
        let mut factors = Vec::with_capacity(5);

        // High humidity
        let humidity_points = if humidity > t.humidity_critical {
            3
        } else if humidity > t.humidity_warning {
            2
        } else if humidity > HUMIDITY_WATCH {
            1
        } else {
            0
        };
        push_factor(&mut factors, RiskFactorKind::HighHumidity, humidity_points);

        // Low pressure
        let pressure_points = if pressure < t.pressure_critical {
            3
        } else if pressure < t.pressure_warning {
            2
        } else if pressure < PRESSURE_WATCH {
            1
        } else {
            0
        };
        push_factor(&mut factors, RiskFactorKind::LowPressure, pressure_points);

        // Humidity rising
        let humidity_trend_points = if humidity_trend > t.humidity_trend_critical {
            2
        } else if humidity_trend > t.humidity_trend_warning {
            1
        } else {
            0
        };
        push_factor(&mut factors, RiskFactorKind::RisingHumidity, humidity_trend_points);

        // Pressure falling, the strongest single signal
        let pressure_trend_points = if pressure_trend < t.pressure_trend_critical {
            3
        } else if pressure_trend < t.pressure_trend_warning {
            2
        } else {
            0
        };
        push_factor(&mut factors, RiskFactorKind::FallingPressure, pressure_trend_points);

        // Cooler air condenses more readily
        let temperature_points = if temperature < t.temperature_warning { 1 } else { 0 };
        push_factor(&mut factors, RiskFactorKind::CoolTemperature, temperature_points);

        let score: u32 = factors.iter().map(|f| f.points).sum();
        let saturation_override =
            humidity > SATURATION_HUMIDITY && pressure < SATURATION_PRESSURE;

        let level = if score >= t.score_critical || saturation_override {
            AlertLevel::Critical
        } else if score >= t.score_warning {
            AlertLevel::Warning
        } else {
            AlertLevel::Normal
        };

        tracing::debug!(
            level = ?level,
            score,
            humidity_trend = format!("{:.3}", humidity_trend),
            pressure_trend = format!("{:.3}", pressure_trend),
            saturation_override,
            "Rain classification"
        );

        RainPrediction {
            level,
            score,
            factors,
            saturation_override,
        }
    }

    /// Classify a filtered reading with its trends
    pub fn classify_reading(
        &self,
        reading: &FilteredReading,
        humidity_trend: f64,
        pressure_trend: f64,
    ) -> RainPrediction {
        self.classify(
            reading.temperature,
            reading.humidity,
            reading.pressure,
            humidity_trend,
            pressure_trend,
        )
    }
}

fn push_factor(factors: &mut Vec<RiskFactor>, kind: RiskFactorKind, points: u32) {
    if points > 0 {
        factors.push(RiskFactor { kind, points });
    }
}
