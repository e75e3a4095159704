//! Billing engine errors.

use thiserror::Error;

use super::store::StoreError;
use super::types::EmptyIncludeSet;

/// Errors from billing engine operations.
#[derive(Debug, Error)]
pub enum BillingError {
    /// History range is inverted or outside the account's recordable days.
    #[error("Invalid date range")]
    InvalidDateRange,

    /// Include filter selected no recognized component.
    #[error(transparent)]
    EmptyIncludeSet(#[from] EmptyIncludeSet),

    /// Storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
