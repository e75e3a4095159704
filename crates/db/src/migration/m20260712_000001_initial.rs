//! Initial schema: users, daily_records, monthly_summaries.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(INITIAL_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS monthly_summaries CASCADE;
             DROP TABLE IF EXISTS daily_records CASCADE;
             DROP TABLE IF EXISTS users CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const INITIAL_SQL: &str = r"
-- Rider accounts
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(20) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    employment_type VARCHAR(16) NOT NULL,
    fixed_salary NUMERIC(12,2) NOT NULL,
    is_verified BOOLEAN NOT NULL DEFAULT FALSE,
    verify_otp VARCHAR(6),
    verify_otp_expires_at TIMESTAMPTZ,
    reset_otp VARCHAR(6),
    reset_otp_expires_at TIMESTAMPTZ,
    profile_picture TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- One record per rider per calendar day
CREATE TABLE daily_records (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    date DATE NOT NULL,
    work_status VARCHAR(8) NOT NULL,
    deliveries INTEGER NOT NULL DEFAULT 0 CHECK (deliveries >= 0),
    tips NUMERIC(12,2) NOT NULL DEFAULT 0 CHECK (tips >= 0),
    expenses NUMERIC(12,2) NOT NULL DEFAULT 0 CHECK (expenses >= 0),
    day_quality VARCHAR(16),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_daily_records_user_date UNIQUE (user_id, date)
);

-- Range scans over a rider's cycle window
CREATE INDEX idx_daily_records_user_date ON daily_records(user_id, date);

-- Cached aggregate per (rider, cycle window)
CREATE TABLE monthly_summaries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    start_date DATE NOT NULL,
    end_date DATE NOT NULL,
    total_earnings NUMERIC(14,2) NOT NULL,
    total_tips NUMERIC(12,2) NOT NULL,
    total_expenses NUMERIC(12,2) NOT NULL,
    savings NUMERIC(14,2) NOT NULL,
    total_deliveries BIGINT NOT NULL,
    days_off INTEGER NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT uq_monthly_summaries_window UNIQUE (user_id, start_date, end_date)
);
";
