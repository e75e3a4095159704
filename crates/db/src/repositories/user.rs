//! User repository for database operations.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use riderledger_core::account::EmploymentType;

use crate::entities::{daily_records, monthly_summaries, users};

/// Fields for creating a fresh, unverified account.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Unique email.
    pub email: String,
    /// Argon2 password hash.
    pub password_hash: String,
    /// Employment classification; the fixed salary derives from it.
    pub employment_type: EmploymentType,
    /// Initial verification OTP.
    pub verify_otp: String,
    /// Verification OTP expiry.
    pub verify_otp_expires_at: DateTime<Utc>,
}

/// Fields refreshed when an unverified email registers again.
#[derive(Debug, Clone)]
pub struct UnverifiedUpdate {
    /// Replacement display name.
    pub name: String,
    /// Replacement password hash.
    pub password_hash: String,
    /// Replacement employment classification (salary follows).
    pub employment_type: EmploymentType,
    /// Fresh verification OTP.
    pub verify_otp: String,
    /// Fresh verification OTP expiry.
    pub verify_otp_expires_at: DateTime<Utc>,
}

/// Profile fields a user may change; any subset may be set.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    /// New display name.
    pub name: Option<String>,
    /// New employment classification (salary follows).
    pub employment_type: Option<EmploymentType>,
    /// New password hash.
    pub password_hash: Option<String>,
    /// New profile picture data-URI.
    pub profile_picture: Option<String>,
}

impl ProfileChanges {
    /// True when no recognized field changed.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.employment_type.is_none()
            && self.password_hash.is_none()
            && self.profile_picture.is_none()
    }
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Creates a new unverified user with the salary derived from the
    /// employment classification.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(&self, new: NewUser) -> Result<users::Model, DbErr> {
        let now = Utc::now().into();
        let user = users::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(new.name),
            email: Set(new.email),
            password_hash: Set(new.password_hash),
            employment_type: Set(new.employment_type.as_str().to_string()),
            fixed_salary: Set(new.employment_type.fixed_salary()),
            is_verified: Set(false),
            verify_otp: Set(Some(new.verify_otp)),
            verify_otp_expires_at: Set(Some(new.verify_otp_expires_at.into())),
            reset_otp: Set(None),
            reset_otp_expires_at: Set(None),
            profile_picture: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        user.insert(&self.db).await
    }

    /// Refreshes an unverified account on re-registration: replaces the
    /// updatable fields and issues a fresh verification OTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn refresh_unverified(
        &self,
        user: users::Model,
        update: UnverifiedUpdate,
    ) -> Result<users::Model, DbErr> {
        let mut active: users::ActiveModel = user.into();
        active.name = Set(update.name);
        active.password_hash = Set(update.password_hash);
        active.employment_type = Set(update.employment_type.as_str().to_string());
        active.fixed_salary = Set(update.employment_type.fixed_salary());
        active.verify_otp = Set(Some(update.verify_otp));
        active.verify_otp_expires_at = Set(Some(update.verify_otp_expires_at.into()));
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Stores a fresh verification OTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn set_verify_otp(
        &self,
        user: users::Model,
        otp: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<users::Model, DbErr> {
        let mut active: users::ActiveModel = user.into();
        active.verify_otp = Set(Some(otp.to_string()));
        active.verify_otp_expires_at = Set(Some(expires_at.into()));
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Marks the account verified and clears the verification OTP pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn mark_verified(&self, user: users::Model) -> Result<users::Model, DbErr> {
        let mut active: users::ActiveModel = user.into();
        active.is_verified = Set(true);
        active.verify_otp = Set(None);
        active.verify_otp_expires_at = Set(None);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Stores a fresh password-reset OTP.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn set_reset_otp(
        &self,
        user: users::Model,
        otp: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<users::Model, DbErr> {
        let mut active: users::ActiveModel = user.into();
        active.reset_otp = Set(Some(otp.to_string()));
        active.reset_otp_expires_at = Set(Some(expires_at.into()));
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Replaces the password hash and clears the reset OTP pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn reset_password(
        &self,
        user: users::Model,
        password_hash: &str,
    ) -> Result<users::Model, DbErr> {
        let mut active: users::ActiveModel = user.into();
        active.password_hash = Set(password_hash.to_string());
        active.reset_otp = Set(None);
        active.reset_otp_expires_at = Set(None);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Applies a set of profile changes. Changing the employment
    /// classification reassigns the fixed salary.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn apply_profile_changes(
        &self,
        user: users::Model,
        changes: ProfileChanges,
    ) -> Result<users::Model, DbErr> {
        let mut active: users::ActiveModel = user.into();
        if let Some(name) = changes.name {
            active.name = Set(name);
        }
        if let Some(employment) = changes.employment_type {
            active.employment_type = Set(employment.as_str().to_string());
            active.fixed_salary = Set(employment.fixed_salary());
        }
        if let Some(hash) = changes.password_hash {
            active.password_hash = Set(hash);
        }
        if let Some(picture) = changes.profile_picture {
            active.profile_picture = Set(Some(picture));
        }
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Sets or clears the profile picture.
    ///
    /// # Errors
    ///
    /// Returns an error if the database update fails.
    pub async fn set_profile_picture(
        &self,
        user: users::Model,
        picture: Option<String>,
    ) -> Result<users::Model, DbErr> {
        let mut active: users::ActiveModel = user.into();
        active.profile_picture = Set(picture);
        active.updated_at = Set(Utc::now().into());
        active.update(&self.db).await
    }

    /// Deletes an account and everything it owns. Children go first so no
    /// orphaned aggregates survive a partial failure.
    ///
    /// # Errors
    ///
    /// Returns an error if any of the deletes fail.
    pub async fn delete_account(&self, user_id: Uuid) -> Result<(), DbErr> {
        daily_records::Entity::delete_many()
            .filter(daily_records::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        monthly_summaries::Entity::delete_many()
            .filter(monthly_summaries::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await?;
        users::Entity::delete_by_id(user_id).exec(&self.db).await?;
        Ok(())
    }
}
