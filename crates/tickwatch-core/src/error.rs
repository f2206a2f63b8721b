//! Shared error type across tickwatch crates.

use thiserror::Error;

/// Shared result type.
pub type Result<T> = std::result::Result<T, TickwatchError>;

/// Unified error type used by core and exporter.
#[derive(Debug, Error)]
pub enum TickwatchError {
    /// A metric name was re-registered with a different kind or label schema.
    #[error("duplicate metric: {0}")]
    DuplicateMetric(String),
    /// Mismatched start/end lifecycle calls from the host.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),
    /// An occurrence was recorded for a name that was never registered.
    #[error("unknown event: {0}")]
    UnknownEvent(String),
    #[error("config: {0}")]
    Config(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl TickwatchError {
    /// Whether the caller can log and carry on, or must treat this as a
    /// startup/integration defect.
    pub fn recoverable(&self) -> bool {
        matches!(
            self,
            TickwatchError::ProtocolViolation(_) | TickwatchError::UnknownEvent(_)
        )
    }
}
