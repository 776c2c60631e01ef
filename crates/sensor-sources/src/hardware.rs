use std::path::{Path, PathBuf};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use station_core::{RawReading, ReadingSource, SourceError, SourceMode};

/// IIO device directory the kernel `dht11` driver usually registers
pub const DEFAULT_IIO_DEVICE: &str = "/sys/bus/iio/devices/iio:device0";

/// Nominal sea-level pressure used when no barometer is fitted (hPa)
const NOMINAL_PRESSURE: f64 = 1013.0;
const PRESSURE_JITTER: f64 = 10.0;

/// One DHT22 measurement
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dht22Sample {
    pub temperature: f64,
    pub humidity: f64,
}

/// Low-level access to a DHT22 temperature/humidity sensor
#[async_trait]
pub trait Dht22Driver: Send {
    async fn sample(&mut self) -> Result<Dht22Sample, SourceError>;

    /// Driver name for logging
    fn name(&self) -> &str {
        "dht22"
    }
}

/// DHT22 exposed through the Linux industrial-I/O sysfs interface.
///
/// The kernel reports milli-degrees Celsius and milli-percent humidity.
pub struct IioDht22 {
    device_dir: PathBuf,
}

impl IioDht22 {
    pub fn new(device_dir: impl Into<PathBuf>) -> Self {
        Self {
            device_dir: device_dir.into(),
        }
    }

    pub fn device_dir(&self) -> &Path {
        &self.device_dir
    }

    async fn read_milli(&self, file: &str) -> Result<f64, SourceError> {
        let path = self.device_dir.join(file);
        let raw = tokio::fs::read_to_string(&path).await?;
        let milli: i64 = raw.trim().parse().map_err(|_| {
            SourceError::InvalidData(format!("{}: {:?}", path.display(), raw.trim()))
        })?;
        Ok(milli as f64 / 1000.0)
    }
}

impl Default for IioDht22 {
    fn default() -> Self {
        Self::new(DEFAULT_IIO_DEVICE)
    }
}

#[async_trait]
impl Dht22Driver for IioDht22 {
    async fn sample(&mut self) -> Result<Dht22Sample, SourceError> {
        let temperature = self.read_milli("in_temp_input").await?;
        let humidity = self.read_milli("in_humidityrelative_input").await?;
        Ok(Dht22Sample {
            temperature,
            humidity,
        })
    }

    fn name(&self) -> &str {
        "dht22-iio"
    }
}

/// Reading source backed by a real DHT22.
///
/// The DHT22 has no barometer, so pressure is synthesized as nominal
/// pressure ± 10 hPa of uniform noise.
pub struct HardwareSource<D, R = StdRng> {
    driver: D,
    rng: R,
}

impl<D: Dht22Driver> HardwareSource<D, StdRng> {
    pub fn new(driver: D) -> Self {
        Self {
            driver,
            rng: StdRng::from_entropy(),
        }
    }
}

impl<D: Dht22Driver, R: Rng + Send> HardwareSource<D, R> {
    pub fn with_rng(driver: D, rng: R) -> Self {
        Self { driver, rng }
    }

    fn synthetic_pressure(&mut self) -> f64 {
        NOMINAL_PRESSURE + self.rng.gen_range(-PRESSURE_JITTER..PRESSURE_JITTER)
    }
}

#[async_trait]
impl<D: Dht22Driver, R: Rng + Send> ReadingSource for HardwareSource<D, R> {
    async fn read(&mut self, timestamp_ms: u64) -> Result<RawReading, SourceError> {
        let sample = self.driver.sample().await?;

        if sample.temperature.is_nan() || sample.humidity.is_nan() {
            return Err(SourceError::ReadFailed(format!(
                "{} returned NaN",
                self.driver.name()
            )));
        }

        let reading = RawReading::new(
            sample.temperature,
            sample.humidity,
            self.synthetic_pressure(),
            timestamp_ms,
        );
        tracing::debug!(
            "Hardware reading - T:{:.1}C H:{:.1}% P:{:.1}hPa",
            reading.temperature,
            reading.humidity,
            reading.pressure
        );
        Ok(reading)
    }

    fn mode(&self) -> SourceMode {
        SourceMode::Hardware
    }

    fn name(&self) -> &str {
        self.driver.name()
    }
}
