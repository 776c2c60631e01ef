use serde::{Deserialize, Serialize};
use station_core::{Channel, FilteredReading};

use crate::SampleBuffer;

/// Least-squares slope of `values` against their index `0..n`.
///
/// slope = (n·Σ(i·y) − Σi·Σy) / (n·Σi² − (Σi)²)
///
/// Returns 0.0 for fewer than two values. The denominator is strictly
/// positive for n ≥ 2. Units are channel units per sample, not per second.
pub fn slope<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let mut n = 0usize;
    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xy = 0.0;
    let mut sum_x2 = 0.0;

    for (i, y) in values.into_iter().enumerate() {
        let x = i as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
        n += 1;
    }

    if n < 2 {
        return 0.0;
    }

    let n = n as f64;
    (n * sum_xy - sum_x * sum_y) / (n * sum_x2 - sum_x * sum_x)
}

/// Per-channel slopes over one window snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelTrends {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    /// Number of samples the slopes were fitted on
    pub sample_size: usize,
}

impl ChannelTrends {
    pub fn get(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Temperature => self.temperature,
            Channel::Humidity => self.humidity,
            Channel::Pressure => self.pressure,
        }
    }

    /// True when there were enough samples for a slope
    pub fn has_signal(&self) -> bool {
        self.sample_size >= 2
    }
}

/// Reduces a [`SampleBuffer`] snapshot to channel means and trends.
///
/// Stateless: repeated calls on an unchanged buffer return identical results.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrendEstimator;

impl TrendEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Slope of one channel over the buffer, 0.0 with fewer than two samples
    pub fn slope(&self, buffer: &SampleBuffer, channel: Channel) -> f64 {
        slope(buffer.channel(channel))
    }

    pub fn humidity_trend(&self, buffer: &SampleBuffer) -> f64 {
        self.slope(buffer, Channel::Humidity)
    }

    pub fn pressure_trend(&self, buffer: &SampleBuffer) -> f64 {
        self.slope(buffer, Channel::Pressure)
    }

    /// Slopes of every channel
    pub fn estimate(&self, buffer: &SampleBuffer) -> ChannelTrends {
        let trends = ChannelTrends {
            temperature: self.slope(buffer, Channel::Temperature),
            humidity: self.slope(buffer, Channel::Humidity),
            pressure: self.slope(buffer, Channel::Pressure),
            sample_size: buffer.len(),
        };

        tracing::debug!(
            samples = trends.sample_size,
            humidity_trend = format!("{:.3}", trends.humidity),
            pressure_trend = format!("{:.3}", trends.pressure),
            "Trends estimated"
        );

        trends
    }

    /// Means and slopes from the same snapshot
    pub fn analyze(&self, buffer: &SampleBuffer) -> (FilteredReading, ChannelTrends) {
        (buffer.mean_all(), self.estimate(buffer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn linear(a: f64, b: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| a + b * i as f64).collect()
    }

    #[test]
    fn test_slope_of_linear_sequence() {
        for n in [2, 3, 7, 20] {
            assert_relative_eq!(slope(linear(1013.0, -0.25, n)), -0.25, epsilon = 1e-9);
            assert_relative_eq!(slope(linear(60.0, 0.5, n)), 0.5, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_slope_needs_two_samples() {
        assert_eq!(slope(Vec::<f64>::new()), 0.0);
        assert_eq!(slope(vec![42.0]), 0.0);
    }

    #[test]
    fn test_flat_sequence_has_zero_slope() {
        assert_relative_eq!(slope(vec![70.0; 10]), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_two_point_slope_is_difference() {
        assert_relative_eq!(slope(vec![1010.0, 1009.2]), -0.8, epsilon = 1e-9);
    }

    #[test]
    fn test_estimate_over_buffer() {
        let mut buffer = SampleBuffer::new();
        for i in 0..10 {
            let i = i as f64;
            buffer.append(25.0 - 0.1 * i, 60.0 + 0.5 * i, 1015.0 - 0.4 * i);
        }

        let trends = TrendEstimator::new().estimate(&buffer);

        assert_eq!(trends.sample_size, 10);
        assert!(trends.has_signal());
        assert_relative_eq!(trends.temperature, -0.1, epsilon = 1e-9);
        assert_relative_eq!(trends.humidity, 0.5, epsilon = 1e-9);
        assert_relative_eq!(trends.pressure, -0.4, epsilon = 1e-9);
        assert_relative_eq!(trends.get(Channel::Pressure), -0.4, epsilon = 1e-9);
    }

    #[test]
    fn test_slope_follows_window_after_eviction() {
        let mut buffer = SampleBuffer::new();
        // Rising for 20 samples, then falling for 20: the window only sees the fall
        for i in 0..20 {
            buffer.append(20.0, 50.0 + i as f64, 1010.0);
        }
        for i in 0..20 {
            buffer.append(20.0, 70.0 - 2.0 * i as f64, 1010.0);
        }

        let estimator = TrendEstimator::new();
        assert_relative_eq!(estimator.humidity_trend(&buffer), -2.0, epsilon = 1e-9);
        assert_relative_eq!(estimator.pressure_trend(&buffer), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_single_sample_has_no_signal() {
        let mut buffer = SampleBuffer::new();
        buffer.append(20.0, 90.0, 1000.0);

        let (filtered, trends) = TrendEstimator::new().analyze(&buffer);

        assert!(filtered.has_data());
        assert!(!trends.has_signal());
        assert_eq!(trends.humidity, 0.0);
        assert_eq!(trends.pressure, 0.0);
    }

    #[test]
    fn test_estimate_is_idempotent() {
        let mut buffer = SampleBuffer::new();
        for v in [61.2, 63.8, 62.1, 66.0, 67.3] {
            buffer.append(24.0, v, 1011.0);
        }

        let estimator = TrendEstimator::new();
        assert_eq!(estimator.estimate(&buffer), estimator.estimate(&buffer));
    }
}
