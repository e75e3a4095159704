//! API route definitions.

pub mod auth;
pub mod health;
pub mod records;
pub mod users;

use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::response::ApiError;
use riderledger_core::billing::EarningsProfile;
use riderledger_db::UserRepository;
use riderledger_db::entities::users as user_entity;
use riderledger_shared::AppError;

/// Loads the authenticated user's row, treating absence as 404.
pub(crate) async fn require_user(
    db: &DatabaseConnection,
    user_id: Uuid,
) -> Result<user_entity::Model, ApiError> {
    UserRepository::new(db.clone())
        .find_by_id(user_id)
        .await?
        .ok_or_else(|| ApiError(AppError::NotFound("User not found".to_string())))
}

/// Builds the earnings-relevant profile from a user row.
pub(crate) fn earnings_profile(user: &user_entity::Model) -> Result<EarningsProfile, ApiError> {
    let employment_type = user.employment_type.parse().map_err(|_| {
        ApiError(AppError::Internal(format!(
            "user {} has invalid employment type",
            user.id
        )))
    })?;

    Ok(EarningsProfile {
        user_id: user.id,
        employment_type,
        fixed_salary: user.fixed_salary,
    })
}
