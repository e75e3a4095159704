//! Daily record validation errors.

use thiserror::Error;

/// Validation failures for daily record input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    /// Date or work status missing from the request.
    #[error("Date and work status are required")]
    MissingFields,

    /// Date outside the allowed window.
    #[error("Date must be between account creation and today")]
    DateOutOfRange,

    /// Unrecognized work status.
    #[error("Invalid work status")]
    InvalidWorkStatus,

    /// Unrecognized day quality on a working day.
    #[error("Invalid day quality for On status")]
    InvalidDayQuality,

    /// A negative amount was supplied.
    #[error("Deliveries, tips, and expenses cannot be negative")]
    NegativeAmounts,
}
