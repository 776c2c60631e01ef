use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Humidity above which one point is added even below the warning tier
pub const HUMIDITY_WATCH: f64 = 65.0;
/// Pressure below which one point is added even above the warning tier
pub const PRESSURE_WATCH: f64 = 1015.0;
/// Saturated air: humidity above this with pressure below
/// [`SATURATION_PRESSURE`] is critical regardless of score
pub const SATURATION_HUMIDITY: f64 = 90.0;
pub const SATURATION_PRESSURE: f64 = 1010.0;

#[derive(Error, Debug, PartialEq)]
pub enum ThresholdError {
    #[error("Invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    #[error("score_warning ({warning}) must not exceed score_critical ({critical})")]
    ScoreOrder { warning: u32, critical: u32 },

    #[error("{field} must be a finite number")]
    NonFinite { field: &'static str },

    #[error("{warning} tier ({warning_value}) is beyond its {critical} tier ({critical_value})")]
    TierOrder {
        warning: &'static str,
        warning_value: f64,
        critical: &'static str,
        critical_value: f64,
    },
}

/// Tunable thresholds of the rain classifier.
///
/// Humidity in %, pressure in hPa, trends in channel units per sample,
/// temperature in °C, scores in risk points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PredictionThresholds {
    pub humidity_critical: f64,
    pub humidity_warning: f64,
    pub pressure_critical: f64,
    pub pressure_warning: f64,
    pub humidity_trend_critical: f64,
    pub humidity_trend_warning: f64,
    pub pressure_trend_critical: f64,
    pub pressure_trend_warning: f64,
    pub temperature_warning: f64,
    pub score_critical: u32,
    pub score_warning: u32,
}

impl Default for PredictionThresholds {
    fn default() -> Self {
        Self {
            humidity_critical: 85.0,
            humidity_warning: 75.0,
            pressure_critical: 1005.0,
            pressure_warning: 1010.0,
            humidity_trend_critical: 0.4,
            humidity_trend_warning: 0.2,
            pressure_trend_critical: -0.3,
            pressure_trend_warning: -0.1,
            temperature_warning: 25.0,
            score_critical: 8,
            score_warning: 5,
        }
    }
}

impl PredictionThresholds {
    /// Build thresholds from an arbitrary key lookup (env, file, test map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ThresholdError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let thresholds = Self {
            humidity_critical: parse_or(&lookup, "HUMIDITY_CRITICAL", defaults.humidity_critical)?,
            humidity_warning: parse_or(&lookup, "HUMIDITY_WARNING", defaults.humidity_warning)?,
            pressure_critical: parse_or(&lookup, "PRESSURE_CRITICAL", defaults.pressure_critical)?,
            pressure_warning: parse_or(&lookup, "PRESSURE_WARNING", defaults.pressure_warning)?,
            humidity_trend_critical: parse_or(
                &lookup,
                "HUMIDITY_TREND_CRITICAL",
                defaults.humidity_trend_critical,
            )?,
            humidity_trend_warning: parse_or(
                &lookup,
                "HUMIDITY_TREND_WARNING",
                defaults.humidity_trend_warning,
            )?,
            pressure_trend_critical: parse_or(
                &lookup,
                "PRESSURE_TREND_CRITICAL",
                defaults.pressure_trend_critical,
            )?,
            pressure_trend_warning: parse_or(
                &lookup,
                "PRESSURE_TREND_WARNING",
                defaults.pressure_trend_warning,
            )?,
            temperature_warning: parse_or(
                &lookup,
                "TEMPERATURE_WARNING",
                defaults.temperature_warning,
            )?,
            score_critical: parse_or(&lookup, "SCORE_CRITICAL", defaults.score_critical)?,
            score_warning: parse_or(&lookup, "SCORE_WARNING", defaults.score_warning)?,
        };

        thresholds.validate()?;
        Ok(thresholds)
    }

    pub fn validate(&self) -> Result<(), ThresholdError> {
        for (field, value) in [
            ("humidity_critical", self.humidity_critical),
            ("humidity_warning", self.humidity_warning),
            ("pressure_critical", self.pressure_critical),
            ("pressure_warning", self.pressure_warning),
            ("humidity_trend_critical", self.humidity_trend_critical),
            ("humidity_trend_warning", self.humidity_trend_warning),
            ("pressure_trend_critical", self.pressure_trend_critical),
            ("pressure_trend_warning", self.pressure_trend_warning),
            ("temperature_warning", self.temperature_warning),
        ] {
            if !value.is_finite() {
                return Err(ThresholdError::NonFinite { field });
            }
        }

        // Rising channels escalate upwards, falling channels downwards
        let tiers = [
            (
                "humidity_warning",
                self.humidity_warning,
                "humidity_critical",
                self.humidity_critical,
                true,
            ),
            (
                "pressure_warning",
                self.pressure_warning,
                "pressure_critical",
                self.pressure_critical,
                false,
            ),
            (
                "humidity_trend_warning",
                self.humidity_trend_warning,
                "humidity_trend_critical",
                self.humidity_trend_critical,
                true,
            ),
            (
                "pressure_trend_warning",
                self.pressure_trend_warning,
                "pressure_trend_critical",
                self.pressure_trend_critical,
                false,
            ),
        ];
        for (warning, warning_value, critical, critical_value, rising) in tiers {
            let inverted = if rising {
                warning_value > critical_value
            } else {
                warning_value < critical_value
            };
            if inverted {
                return Err(ThresholdError::TierOrder {
                    warning,
                    warning_value,
                    critical,
                    critical_value,
                });
            }
        }

        if self.score_warning > self.score_critical {
            return Err(ThresholdError::ScoreOrder {
                warning: self.score_warning,
                critical: self.score_critical,
            });
        }
        Ok(())
    }
}

fn parse_or<F, T>(lookup: &F, var: &'static str, default: T) -> Result<T, ThresholdError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(raw) if !raw.trim().is_empty() => {
            raw.trim()
                .parse()
                .map_err(|_| ThresholdError::InvalidValue { var, value: raw })
        }
        _ => Ok(default),
    }
}
