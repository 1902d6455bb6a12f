use thiserror::Error;

pub type Result<T> = std::result::Result<T, CheckoutError>;

/// Everything the checkout core can report to the invoking UI.
///
/// Failures are always returned as values so the caller can render a
/// specific message; nothing in the orchestration path panics.
#[derive(Error, Debug)]
pub enum CheckoutError {
    /// Client-detectable problem; no API call was made.
    #[error("validation failed: {0}")]
    Validation(String),
    /// The backend rejected the action. The message is surfaced verbatim.
    #[error("rejected by backend: {0}")]
    RemoteRejected(String),
    /// The request did not complete. The backend never acknowledged receipt,
    /// so resubmitting the same correlation id is safe.
    #[error("network failure: {0}")]
    Network(String),
    /// The user closed the funding widget. Not reported to monitoring.
    #[error("funding cancelled by user")]
    FundingCancelled,
    #[error("funding failed: {0}")]
    FundingFailed(String),
    #[error("correlation id does not match the pending intent")]
    CorrelationMismatch,
    #[error("invalid transition: {action} is not allowed from {from}")]
    InvalidTransition {
        from: &'static str,
        action: &'static str,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
