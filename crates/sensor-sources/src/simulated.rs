use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use station_core::{RawReading, ReadingSource, SourceError, SourceMode};

/// Random weather generator with loosely realistic correlations:
/// humid air comes with lower pressure and cooler temperatures.
pub struct SimulatedSource<R = StdRng> {
    rng: R,
}

impl SimulatedSource<StdRng> {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic generator for reproducible runs
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for SimulatedSource<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SimulatedSource<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Draw one correlated reading
    pub fn generate(&mut self, timestamp_ms: u64) -> RawReading {
        let base_humidity: f64 = self.rng.gen_range(40.0..100.0);

        let (pressure, temperature) = if base_humidity > 80.0 {
            // Low pressure, cooler
            (
                self.rng.gen_range(1000.0..1015.0),
                self.rng.gen_range(18.0..33.0),
            )
        } else if base_humidity > 60.0 {
            (
                self.rng.gen_range(1010.0..1025.0),
                self.rng.gen_range(22.0..40.0),
            )
        } else {
            // High pressure, warmer
            (
                self.rng.gen_range(1015.0..1030.0),
                self.rng.gen_range(25.0..45.0),
            )
        };

        RawReading::new(
            temperature,
            base_humidity.clamp(30.0, 100.0),
            pressure,
            timestamp_ms,
        )
    }
}

#[async_trait]
impl<R: Rng + Send> ReadingSource for SimulatedSource<R> {
    async fn read(&mut self, timestamp_ms: u64) -> Result<RawReading, SourceError> {
        let reading = self.generate(timestamp_ms);
        tracing::debug!(
            "Simulated reading - T:{:.1}C H:{:.1}% P:{:.1}hPa",
            reading.temperature,
            reading.humidity,
            reading.pressure
        );
        Ok(reading)
    }

    fn mode(&self) -> SourceMode {
        SourceMode::Simulation
    }

    fn name(&self) -> &str {
        "simulator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_readings_stay_in_correlated_ranges() {
        let mut source = SimulatedSource::with_seed(7);

        for i in 0..500 {
            let r = source.generate(i * 5000);

            assert!((40.0..100.0).contains(&r.humidity), "humidity {}", r.humidity);
            assert!((1000.0..1030.0).contains(&r.pressure), "pressure {}", r.pressure);
            assert!((18.0..45.0).contains(&r.temperature), "temperature {}", r.temperature);

            if r.humidity > 80.0 {
                assert!(r.pressure < 1015.0);
                assert!(r.temperature < 33.0);
            } else if r.humidity <= 60.0 {
                assert!(r.pressure >= 1015.0);
                assert!(r.temperature >= 25.0);
            }
        }
    }

    #[test]
    fn test_seeded_sources_repeat() {
        let mut a = SimulatedSource::with_seed(42);
        let mut b = SimulatedSource::with_seed(42);

        for i in 0..20 {
            assert_eq!(a.generate(i), b.generate(i));
        }
    }

    #[test]
    fn test_read_stamps_timestamp_and_mode() {
        let mut source = SimulatedSource::with_seed(1);

        let reading = tokio_test::block_on(source.read(15_000)).unwrap();

        assert_eq!(reading.timestamp_ms, 15_000);
        assert_eq!(source.mode(), SourceMode::Simulation);
        // Simulated readings always pass the ingest guard
        assert!(reading.temperature > 0.0 && reading.humidity > 0.0);
    }
}
