//! Storage seams for the billing engine.
//!
//! The engine only ever reads records and reads/writes summaries through
//! these traits, so it can be exercised against in-memory fakes without a
//! database.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::record::DailyRecord;

use super::cycle::CycleWindow;
use super::types::CycleSummary;

/// Opaque storage failure surfaced by a store implementation.
#[derive(Debug, Error)]
#[error("storage error: {0}")]
pub struct StoreError(pub String);

/// Read access to a rider's daily records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns the user's records with dates in `[start, end]`, ascending
    /// by date.
    async fn records_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyRecord>, StoreError>;
}

/// Read/write access to cached cycle summaries.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    /// Looks up the cached summary for the exact (user, window) key.
    async fn find_summary(
        &self,
        user_id: Uuid,
        window: CycleWindow,
    ) -> Result<Option<CycleSummary>, StoreError>;

    /// Atomically inserts or replaces the summary for its (user, window)
    /// key.
    async fn upsert_summary(&self, summary: &CycleSummary) -> Result<(), StoreError>;
}
