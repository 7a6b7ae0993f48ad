//! Error types for intercom.

use thiserror::Error;

/// Negative outcomes of broker operations. None of these are fatal to the
/// connection or the process.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerError {
    /// Acknowledge of an unknown, already-acknowledged, or foreign message
    /// id.
    #[error("message not found")]
    NotFound,

    /// Consume or requeue with nothing available. A normal negative result,
    /// not a failure.
    #[error("nothing available")]
    Empty,
}
