use thiserror::Error;

/// Failure of a single outbound send attempt.
///
/// All sends are fire-and-forget: these errors are logged by the
/// executing task and never surfaced to the engine, which has already
/// moved on.
#[derive(Debug, Error)]
pub enum WireError {
    /// Socket-level failure (connection refused, DNS, write error).
    #[error("socket error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP transport failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The OSC message could not be encoded.
    #[error("OSC encode error: {0}")]
    OscEncode(String),
}
