//! Monthly summary repository for database operations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use riderledger_core::billing::store::{StoreError, SummaryStore};
use riderledger_core::billing::{CycleStats, CycleSummary, CycleWindow};

use crate::entities::monthly_summaries;

/// Monthly summary repository. Summaries are a materialized view keyed on
/// (user, start, end) and maintained with an atomic upsert.
#[derive(Debug, Clone)]
pub struct MonthlySummaryRepository {
    db: DatabaseConnection,
}

impl MonthlySummaryRepository {
    /// Creates a new monthly summary repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Looks up the summary for the exact (user, window) key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_window(
        &self,
        user_id: Uuid,
        window: CycleWindow,
    ) -> Result<Option<monthly_summaries::Model>, DbErr> {
        monthly_summaries::Entity::find()
            .filter(monthly_summaries::Column::UserId.eq(user_id))
            .filter(monthly_summaries::Column::StartDate.eq(window.start))
            .filter(monthly_summaries::Column::EndDate.eq(window.end))
            .one(&self.db)
            .await
    }

    /// Inserts or replaces the summary for its (user, window) key in one
    /// statement.
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub async fn upsert(&self, summary: &CycleSummary) -> Result<(), DbErr> {
        let now = Utc::now().into();
        let active = monthly_summaries::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(summary.user_id),
            start_date: Set(summary.window.start),
            end_date: Set(summary.window.end),
            total_earnings: Set(summary.total_earnings),
            total_tips: Set(summary.total_tips),
            total_expenses: Set(summary.total_expenses),
            savings: Set(summary.savings),
            total_deliveries: Set(summary.total_deliveries),
            days_off: Set(i32::try_from(summary.days_off).unwrap_or(i32::MAX)),
            created_at: Set(now),
            updated_at: Set(now),
        };

        monthly_summaries::Entity::insert(active)
            .on_conflict(
                OnConflict::columns([
                    monthly_summaries::Column::UserId,
                    monthly_summaries::Column::StartDate,
                    monthly_summaries::Column::EndDate,
                ])
                .update_columns([
                    monthly_summaries::Column::TotalEarnings,
                    monthly_summaries::Column::TotalTips,
                    monthly_summaries::Column::TotalExpenses,
                    monthly_summaries::Column::Savings,
                    monthly_summaries::Column::TotalDeliveries,
                    monthly_summaries::Column::DaysOff,
                    monthly_summaries::Column::UpdatedAt,
                ])
                .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }
}

/// Converts a stored row into the core summary.
fn to_domain(model: monthly_summaries::Model) -> CycleSummary {
    CycleSummary {
        user_id: model.user_id,
        window: CycleWindow {
            start: model.start_date,
            end: model.end_date,
        },
        total_earnings: model.total_earnings,
        total_tips: model.total_tips,
        total_expenses: model.total_expenses,
        savings: model.savings,
        total_deliveries: model.total_deliveries,
        days_off: u32::try_from(model.days_off).unwrap_or_default(),
    }
}

#[async_trait]
impl SummaryStore for MonthlySummaryRepository {
    async fn find_summary(
        &self,
        user_id: Uuid,
        window: CycleWindow,
    ) -> Result<Option<CycleSummary>, StoreError> {
        self.find_window(user_id, window)
            .await
            .map(|model| model.map(to_domain))
            .map_err(|e| StoreError(e.to_string()))
    }

    async fn upsert_summary(&self, summary: &CycleSummary) -> Result<(), StoreError> {
        self.upsert(summary)
            .await
            .map_err(|e| StoreError(e.to_string()))
    }
}
