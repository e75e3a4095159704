//! `SeaORM` Entity for the users table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: String,
    pub employment_type: String,
    pub fixed_salary: Decimal,
    pub is_verified: bool,
    pub verify_otp: Option<String>,
    pub verify_otp_expires_at: Option<DateTimeWithTimeZone>,
    pub reset_otp: Option<String>,
    pub reset_otp_expires_at: Option<DateTimeWithTimeZone>,
    #[sea_orm(column_type = "Text", nullable)]
    pub profile_picture: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::daily_records::Entity")]
    DailyRecords,
    #[sea_orm(has_many = "super::monthly_summaries::Entity")]
    MonthlySummaries,
}

impl Related<super::daily_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DailyRecords.def()
    }
}

impl Related<super::monthly_summaries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlySummaries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
