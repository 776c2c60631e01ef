//! Rolling sample window and per-channel trend estimation.
//!
//! The window keeps the most recent readings (20 by default); the estimator
//! reduces a window snapshot to channel means and least-squares slopes.

pub mod buffer;
pub mod estimator;

pub use buffer::{SampleBuffer, DEFAULT_CAPACITY};
pub use estimator::{slope, ChannelTrends, TrendEstimator};
