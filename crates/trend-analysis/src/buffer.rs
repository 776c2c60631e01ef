use std::collections::VecDeque;

use station_core::{Channel, FilteredReading, RawReading};

/// Default number of readings kept in the window
pub const DEFAULT_CAPACITY: usize = 20;

/// Fixed-capacity rolling history of readings, oldest first.
///
/// All three channels live in the same entry, so they always have equal
/// length. Values are not validated: NaN or out-of-range samples are stored
/// as-is and flow into the means and slopes.
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: VecDeque<RawReading>,
    capacity: usize,
}

impl SampleBuffer {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Create a window holding at most `capacity` readings (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Append one aligned triple, evicting the oldest entry when full.
    /// The stored reading carries a zero timestamp.
    pub fn append(&mut self, temperature: f64, humidity: f64, pressure: f64) {
        self.push(RawReading::new(temperature, humidity, pressure, 0));
    }

    /// Append a reading, evicting the oldest entry when full
    pub fn push(&mut self, reading: RawReading) {
        self.samples.push_back(reading);
        if self.samples.len() > self.capacity {
            self.samples.pop_front();
        }
        tracing::trace!(len = self.samples.len(), "Sample appended");
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn is_full(&self) -> bool {
        self.samples.len() == self.capacity
    }

    /// Most recently appended reading
    pub fn latest(&self) -> Option<&RawReading> {
        self.samples.back()
    }

    /// Iterate readings oldest → newest
    pub fn iter(&self) -> impl Iterator<Item = &RawReading> {
        self.samples.iter()
    }

    /// Values of one channel, oldest → newest
    pub fn channel(&self, channel: Channel) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(move |r| r.value(channel))
    }

    /// Channel values collected into a vector, oldest → newest
    pub fn channel_values(&self, channel: Channel) -> Vec<f64> {
        self.channel(channel).collect()
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }

    /// Arithmetic mean of each channel over the current contents.
    ///
    /// Returns [`FilteredReading::EMPTY`] when the window is empty.
    pub fn mean_all(&self) -> FilteredReading {
        if self.samples.is_empty() {
            return FilteredReading::EMPTY;
        }

        let n = self.samples.len() as f64;
        let (sum_t, sum_h, sum_p) = self.samples.iter().fold((0.0, 0.0, 0.0), |acc, r| {
            (acc.0 + r.temperature, acc.1 + r.humidity, acc.2 + r.pressure)
        });

        FilteredReading {
            temperature: sum_t / n,
            humidity: sum_h / n,
            pressure: sum_p / n,
            sample_count: self.samples.len(),
        }
    }

    /// Mean of a single channel, `None` when empty
    pub fn mean(&self, channel: Channel) -> Option<f64> {
        if self.samples.is_empty() {
            return None;
        }
        Some(self.channel(channel).sum::<f64>() / self.samples.len() as f64)
    }
}

impl Default for SampleBuffer {
    fn default() -> Self {
        Self::new()
    }
}
