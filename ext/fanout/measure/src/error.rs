//! Error types for fanout-measure

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, MeasureError>;

/// Errors that can abort a measurement run
#[derive(Error, Debug)]
pub enum MeasureError {
    /// Dispatcher rejected an operation
    #[error("dispatcher error: {0}")]
    Dispatcher(#[from] fanout_core::Error),

    /// Invalid run parameters
    #[error("configuration error: {0}")]
    Config(String),

    /// A subscription closed before all expected payloads arrived
    #[error("subscriber on topic {topic} closed after {received} of {expected} messages")]
    SubscriberClosed {
        topic: String,
        received: usize,
        expected: usize,
    },

    /// A publisher or subscriber task panicked or was cancelled
    #[error("task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// JSON report encoding failed
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
