use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One of the three measured weather channels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Temperature,
    Humidity,
    Pressure,
}

/// A single unfiltered sample from a reading source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    /// Degrees Celsius
    pub temperature: f64,
    /// Relative humidity, percent
    pub humidity: f64,
    /// Barometric pressure, hPa
    pub pressure: f64,
    /// Milliseconds since station start
    pub timestamp_ms: u64,
}

impl RawReading {
    pub fn new(temperature: f64, humidity: f64, pressure: f64, timestamp_ms: u64) -> Self {
        Self {
            temperature,
            humidity,
            pressure,
            timestamp_ms,
        }
    }

    pub fn value(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Temperature => self.temperature,
            Channel::Humidity => self.humidity,
            Channel::Pressure => self.pressure,
        }
    }
}

/// Channel means over the current sample window.
///
/// An empty window yields the all-zero sentinel with `sample_count == 0`.
/// Check [`FilteredReading::has_data`] rather than comparing values to zero:
/// a genuine reading can land on the sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FilteredReading {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    /// Number of samples averaged
    pub sample_count: usize,
}

impl FilteredReading {
    pub const EMPTY: FilteredReading = FilteredReading {
        temperature: 0.0,
        humidity: 0.0,
        pressure: 0.0,
        sample_count: 0,
    };

    pub fn has_data(&self) -> bool {
        self.sample_count > 0
    }

    pub fn value(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Temperature => self.temperature,
            Channel::Humidity => self.humidity,
            Channel::Pressure => self.pressure,
        }
    }
}

/// Rain alert level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AlertLevel {
    Normal,
    Warning,
    Critical,
}

impl AlertLevel {
    /// Numeric code sent to the backend (0, 1, 2)
    pub fn code(&self) -> u8 {
        match self {
            AlertLevel::Normal => 0,
            AlertLevel::Warning => 1,
            AlertLevel::Critical => 2,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(AlertLevel::Normal),
            1 => Some(AlertLevel::Warning),
            2 => Some(AlertLevel::Critical),
            _ => None,
        }
    }

    /// Human-readable label for the level
    pub fn to_label(&self) -> &'static str {
        match self {
            AlertLevel::Normal => "Normal - stable conditions",
            AlertLevel::Warning => "Warning - rain possible",
            AlertLevel::Critical => "Critical - rain imminent",
        }
    }
}

/// Which scoring rule contributed risk points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactorKind {
    HighHumidity,
    LowPressure,
    RisingHumidity,
    FallingPressure,
    CoolTemperature,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiskFactor {
    pub kind: RiskFactorKind,
    pub points: u32,
}

/// Output of the rain classifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainPrediction {
    pub level: AlertLevel,
    /// Sum of all contributing factor points
    pub score: u32,
    pub factors: Vec<RiskFactor>,
    /// Set when the humidity/pressure saturation override forced `Critical`
    pub saturation_override: bool,
}

/// Whether readings come from the simulator or from real hardware.
///
/// Serialized with the backend's wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceMode {
    #[serde(rename = "simulacion")]
    Simulation,
    #[serde(rename = "real")]
    Hardware,
}

impl SourceMode {
    pub fn name(&self) -> &'static str {
        match self {
            SourceMode::Simulation => "simulation",
            SourceMode::Hardware => "hardware",
        }
    }
}

/// Everything a report sink needs for one report tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationReport {
    /// Station clock at report time, milliseconds since start
    pub timestamp_ms: u64,
    pub mode: SourceMode,
    pub filtered: FilteredReading,
    pub prediction: RainPrediction,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_level_codes_round_trip() {
        for level in [AlertLevel::Normal, AlertLevel::Warning, AlertLevel::Critical] {
            assert_eq!(AlertLevel::from_code(level.code()), Some(level));
        }
        assert_eq!(AlertLevel::from_code(3), None);
    }

    #[test]
    fn test_alert_levels_are_ordered() {
        assert!(AlertLevel::Normal < AlertLevel::Warning);
        assert!(AlertLevel::Warning < AlertLevel::Critical);
    }

    #[test]
    fn test_empty_filtered_reading_has_no_data() {
        assert!(!FilteredReading::EMPTY.has_data());
        assert!(!FilteredReading::default().has_data());

        let zero_but_real = FilteredReading {
            sample_count: 1,
            ..FilteredReading::EMPTY
        };
        assert!(zero_but_real.has_data());
    }

    #[test]
    fn test_source_mode_wire_names() {
        assert_eq!(serde_json::to_string(&SourceMode::Simulation).unwrap(), "\"simulacion\"");
        assert_eq!(serde_json::to_string(&SourceMode::Hardware).unwrap(), "\"real\"");
    }

    #[test]
    fn test_reading_channel_access() {
        let r = RawReading::new(21.5, 80.0, 1009.0, 5000);
        assert_eq!(r.value(Channel::Temperature), 21.5);
        assert_eq!(r.value(Channel::Humidity), 80.0);
        assert_eq!(r.value(Channel::Pressure), 1009.0);
    }
}
