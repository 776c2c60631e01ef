//! Reading sources for the weather station.
//!
//! Both variants implement [`station_core::ReadingSource`]; which one runs is
//! decided from configuration at startup.

pub mod hardware;
pub mod simulated;

pub use hardware::{Dht22Driver, Dht22Sample, HardwareSource, IioDht22, DEFAULT_IIO_DEVICE};
pub use simulated::SimulatedSource;
