pub mod classifier;
pub mod models;

pub use classifier::AlertClassifier;
pub use models::*;
