use thiserror::Error;

/// Errors raised by a [`ReadingSource`](crate::ReadingSource).
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Sensor read failed: {0}")]
    ReadFailed(String),

    #[error("Invalid sensor data: {0}")]
    InvalidData(String),

    #[error("Sensor I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by a [`ReportSink`](crate::ReportSink).
#[derive(Error, Debug)]
pub enum SinkError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Backend rejected report with HTTP {0}")]
    UnexpectedStatus(u16),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
