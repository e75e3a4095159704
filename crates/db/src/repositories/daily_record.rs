//! Daily record repository for database operations.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set, SqlErr,
};
use uuid::Uuid;

use riderledger_core::billing::store::{RecordStore, StoreError};
use riderledger_core::record::{DailyRecord, DayActivity, WorkStatus};

use crate::entities::daily_records;

/// Error types for daily record operations.
#[derive(Debug, thiserror::Error)]
pub enum DailyRecordError {
    /// A record already exists for this (user, date) slot.
    #[error("Details for this date already submitted")]
    DuplicateDate,

    /// Database error.
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Daily record repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct DailyRecordRepository {
    db: DatabaseConnection,
}

impl DailyRecordRepository {
    /// Creates a new daily record repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a record for a (user, date) slot. The unique index is the
    /// sole guard against concurrent writers to the same slot.
    ///
    /// # Errors
    ///
    /// Returns `DailyRecordError::DuplicateDate` when the slot is taken.
    pub async fn insert(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        activity: &DayActivity,
    ) -> Result<daily_records::Model, DailyRecordError> {
        let now = Utc::now().into();
        let record = daily_records::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            date: Set(date),
            work_status: Set(activity.status().as_str().to_string()),
            deliveries: Set(activity.deliveries()),
            tips: Set(activity.tips()),
            expenses: Set(activity.expenses()),
            day_quality: Set(activity.quality().map(|q| q.as_str().to_string())),
            created_at: Set(now),
            updated_at: Set(now),
        };

        record.insert(&self.db).await.map_err(map_unique_violation)
    }

    /// Replaces a record's date and activity.
    ///
    /// # Errors
    ///
    /// Returns `DailyRecordError::DuplicateDate` when the new date collides
    /// with another record of the same user.
    pub async fn update(
        &self,
        record: daily_records::Model,
        date: NaiveDate,
        activity: &DayActivity,
    ) -> Result<daily_records::Model, DailyRecordError> {
        let mut active: daily_records::ActiveModel = record.into();
        active.date = Set(date);
        active.work_status = Set(activity.status().as_str().to_string());
        active.deliveries = Set(activity.deliveries());
        active.tips = Set(activity.tips());
        active.expenses = Set(activity.expenses());
        active.day_quality = Set(activity.quality().map(|q| q.as_str().to_string()));
        active.updated_at = Set(Utc::now().into());

        active.update(&self.db).await.map_err(map_unique_violation)
    }

    /// Deletes a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub async fn delete(&self, record: daily_records::Model) -> Result<(), DbErr> {
        daily_records::Entity::delete_by_id(record.id)
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Finds a record by id, restricted to its owner. Foreign records read
    /// as absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_owned(
        &self,
        id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<daily_records::Model>, DbErr> {
        daily_records::Entity::find_by_id(id)
            .filter(daily_records::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Returns a user's records with dates in `[start, end]`, ascending.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<daily_records::Model>, DbErr> {
        daily_records::Entity::find()
            .filter(daily_records::Column::UserId.eq(user_id))
            .filter(daily_records::Column::Date.gte(start))
            .filter(daily_records::Column::Date.lte(end))
            .order_by_asc(daily_records::Column::Date)
            .all(&self.db)
            .await
    }

    /// Checks whether another record of the same user already occupies a
    /// date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn date_taken_by_other(
        &self,
        user_id: Uuid,
        date: NaiveDate,
        exclude_id: Uuid,
    ) -> Result<bool, DbErr> {
        let existing = daily_records::Entity::find()
            .filter(daily_records::Column::UserId.eq(user_id))
            .filter(daily_records::Column::Date.eq(date))
            .filter(daily_records::Column::Id.ne(exclude_id))
            .one(&self.db)
            .await?;
        Ok(existing.is_some())
    }
}

fn map_unique_violation(err: DbErr) -> DailyRecordError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DailyRecordError::DuplicateDate,
        _ => DailyRecordError::Db(err),
    }
}

/// Converts a stored row into the core domain record.
fn to_domain(model: daily_records::Model) -> Result<DailyRecord, StoreError> {
    let status: WorkStatus = model
        .work_status
        .parse()
        .map_err(|_| StoreError(format!("record {} has invalid work status", model.id)))?;

    let activity = match status {
        WorkStatus::Off => DayActivity::Off,
        WorkStatus::On => DayActivity::Working {
            quality: model
                .day_quality
                .as_deref()
                .unwrap_or("Average")
                .parse()
                .map_err(|_| StoreError(format!("record {} has invalid day quality", model.id)))?,
            deliveries: model.deliveries,
            tips: model.tips,
            expenses: model.expenses,
        },
    };

    Ok(DailyRecord {
        id: model.id,
        user_id: model.user_id,
        date: model.date,
        activity,
    })
}

#[async_trait]
impl RecordStore for DailyRecordRepository {
    async fn records_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyRecord>, StoreError> {
        let models = self
            .list_range(user_id, start, end)
            .await
            .map_err(|e| StoreError(e.to_string()))?;

        models.into_iter().map(to_domain).collect()
    }
}
