pub mod clock;
pub mod config;
pub mod metrics;
pub mod station;

pub use clock::{Clock, MonotonicClock, PeriodicTask};
pub use config::StationConfig;
pub use metrics::StationMetrics;
pub use station::{build_source, run, Assessment, Station, TickSummary};
