//! Daily record and billing cycle routes.
//!
//! Validated CRUD over one record per rider per calendar day, plus the
//! cached current-cycle summary and live history aggregation. A mutation
//! whose date touches the active cycle triggers a best-effort refresh of
//! the cached summary.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    middleware::from_fn_with_state,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::AppState;
use crate::middleware::{AuthUser, auth_middleware};
use crate::response::{ApiError, ApiResult};
use crate::routes::{earnings_profile, require_user};
use riderledger_core::billing::{
    self, BillingError, CycleWindow, EarningsProfile, HistoryReport, IncludeSet, IncomeComponent,
};
use riderledger_core::record::{DateBounds, RecordDraft, RecordError, validate_record};
use riderledger_db::entities::{daily_records, users};
use riderledger_db::{DailyRecordRepository, MonthlySummaryRepository};
use riderledger_shared::AppError;

/// Components a cycle summary may include.
const SUMMARY_COMPONENTS: [IncomeComponent; 3] = [
    IncomeComponent::FixedSalary,
    IncomeComponent::Deliveries,
    IncomeComponent::Tips,
];

/// Components a history query may include. No fixed salary in history.
const HISTORY_COMPONENTS: [IncomeComponent; 2] =
    [IncomeComponent::Deliveries, IncomeComponent::Tips];

/// Creates the daily record router. Everything here sits behind the
/// session cookie.
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/record", post(create_record))
        .route("/record/{id}", put(edit_record).delete(delete_record))
        .route("/records", get(list_records))
        .route("/monthly-summary", get(get_monthly_summary))
        .route("/history", get(get_history))
        .layer(from_fn_with_state(state, auth_middleware))
}

/// Request body for creating or editing a daily record.
#[derive(Debug, Deserialize)]
struct RecordRequest {
    /// Calendar day (YYYY-MM-DD). Required on create; defaults to the
    /// stored date on edit.
    date: Option<NaiveDate>,
    /// Work status (`On` / `Off`).
    work_status: Option<String>,
    /// Completed deliveries.
    deliveries: Option<i32>,
    /// Tips received.
    tips: Option<Decimal>,
    /// Expenses incurred.
    expenses: Option<Decimal>,
    /// Day quality; defaults to `Average` on working days.
    day_quality: Option<String>,
}

impl RecordRequest {
    fn draft(&self) -> RecordDraft {
        RecordDraft {
            work_status: self.work_status.clone(),
            deliveries: self.deliveries,
            tips: self.tips,
            expenses: self.expenses,
            day_quality: self.day_quality.clone(),
        }
    }
}

/// Query parameters for the cycle summary.
#[derive(Debug, Deserialize)]
struct SummaryQuery {
    /// Comma-separated income components to include.
    include: Option<String>,
}

/// Query parameters for the history aggregation.
#[derive(Debug, Deserialize)]
struct HistoryQuery {
    /// Range start (YYYY-MM-DD).
    from_date: Option<NaiveDate>,
    /// Range end (YYYY-MM-DD).
    to_date: Option<NaiveDate>,
    /// Comma-separated income components to include.
    include: Option<String>,
}

/// One stored record as returned to the client.
#[derive(Debug, Serialize)]
struct RecordResponse {
    id: Uuid,
    date: NaiveDate,
    work_status: String,
    deliveries: i32,
    tips: Decimal,
    expenses: Decimal,
    day_quality: Option<String>,
}

impl From<daily_records::Model> for RecordResponse {
    fn from(model: daily_records::Model) -> Self {
        Self {
            id: model.id,
            date: model.date,
            work_status: model.work_status,
            deliveries: model.deliveries,
            tips: model.tips,
            expenses: model.expenses,
            day_quality: model.day_quality,
        }
    }
}

fn date_bounds(user: &users::Model) -> DateBounds {
    DateBounds {
        account_created: user.created_at.naive_utc().date(),
        today: Utc::now().date_naive(),
    }
}

/// Recomputes and upserts the active-cycle summary. Best effort: a
/// failure leaves a stale cache that stays re-derivable from the raw
/// records, so it never fails the triggering request.
async fn refresh_active_summary(state: &AppState, profile: &EarningsProfile, window: CycleWindow) {
    let records = DailyRecordRepository::new((*state.db).clone());
    let summaries = MonthlySummaryRepository::new((*state.db).clone());

    if let Err(e) = billing::refresh_summary(&records, &summaries, profile, window).await {
        warn!(user_id = %profile.user_id, error = %e, "Failed to refresh cycle summary");
    }
}

/// POST /api/daily/record - creates the record for a (user, date) slot.
async fn create_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<RecordRequest>,
) -> ApiResult<Response> {
    let Some(date) = payload.date else {
        return Err(RecordError::MissingFields.into());
    };

    let user = require_user(&state.db, auth.user_id()).await?;
    let bounds = date_bounds(&user);
    let activity = validate_record(date, &payload.draft(), &bounds)?;

    let record_repo = DailyRecordRepository::new((*state.db).clone());
    record_repo.insert(user.id, date, &activity).await?;

    let window = CycleWindow::active(bounds.today);
    if window.contains(date) {
        let profile = earnings_profile(&user)?;
        refresh_active_summary(&state, &profile, window).await;
    }

    info!(user_id = %user.id, date = %date, "Daily record created");
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "message": "Daily record created successfully",
        })),
    )
        .into_response())
}

/// PUT /api/daily/record/{id} - edits a record. Foreign records read as
/// absent; moving onto another record's date is a conflict.
async fn edit_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordRequest>,
) -> ApiResult<Response> {
    let user = require_user(&state.db, auth.user_id()).await?;
    let record_repo = DailyRecordRepository::new((*state.db).clone());

    let Some(record) = record_repo.find_owned(id, user.id).await? else {
        return Err(ApiError(AppError::NotFound("Record not found".to_string())));
    };
    let old_date = record.date;

    let date = payload.date.unwrap_or(old_date);
    let bounds = date_bounds(&user);
    let activity = validate_record(date, &payload.draft(), &bounds)?;

    if date != old_date && record_repo.date_taken_by_other(user.id, date, id).await? {
        return Err(ApiError(AppError::Conflict(
            "Details for this date already submitted".to_string(),
        )));
    }

    record_repo.update(record, date, &activity).await?;

    // Moving a record out of the active window must not leave the old
    // total behind, so either end of the move triggers the refresh.
    let window = CycleWindow::active(bounds.today);
    if window.contains(old_date) || window.contains(date) {
        let profile = earnings_profile(&user)?;
        refresh_active_summary(&state, &profile, window).await;
    }

    info!(user_id = %user.id, record_id = %id, "Daily record updated");
    Ok(Json(json!({
        "success": true,
        "message": "Daily record updated successfully",
    }))
    .into_response())
}

/// DELETE /api/daily/record/{id}
async fn delete_record(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> ApiResult<Response> {
    let user = require_user(&state.db, auth.user_id()).await?;
    let record_repo = DailyRecordRepository::new((*state.db).clone());

    let Some(record) = record_repo.find_owned(id, user.id).await? else {
        return Err(ApiError(AppError::NotFound("Record not found".to_string())));
    };
    let date = record.date;

    record_repo.delete(record).await?;

    let window = CycleWindow::active(Utc::now().date_naive());
    if window.contains(date) {
        let profile = earnings_profile(&user)?;
        refresh_active_summary(&state, &profile, window).await;
    }

    info!(user_id = %user.id, record_id = %id, "Daily record deleted");
    Ok(Json(json!({
        "success": true,
        "message": "Daily record deleted successfully",
    }))
    .into_response())
}

/// GET /api/daily/records - the caller's records in the active cycle,
/// ascending by date.
async fn list_records(State(state): State<AppState>, auth: AuthUser) -> ApiResult<Response> {
    let window = CycleWindow::active(Utc::now().date_naive());
    let record_repo = DailyRecordRepository::new((*state.db).clone());

    let records: Vec<RecordResponse> = record_repo
        .list_range(auth.user_id(), window.start, window.end)
        .await?
        .into_iter()
        .map(RecordResponse::from)
        .collect();

    Ok(Json(json!({
        "success": true,
        "records": records,
    }))
    .into_response())
}

/// GET /api/daily/monthly-summary - the active-cycle summary under the
/// requested include set. Served from the cache when one exists;
/// otherwise aggregated live without caching.
async fn get_monthly_summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Response> {
    let include = IncludeSet::parse(query.include.as_deref(), &SUMMARY_COMPONENTS)
        .map_err(BillingError::from)?;

    let user = require_user(&state.db, auth.user_id()).await?;
    let profile = earnings_profile(&user)?;
    let window = CycleWindow::active(Utc::now().date_naive());

    let records = DailyRecordRepository::new((*state.db).clone());
    let summaries = MonthlySummaryRepository::new((*state.db).clone());
    let summary = billing::monthly_summary(&records, &summaries, &profile, window, include).await?;

    Ok(Json(json!({
        "success": true,
        "summary": {
            "total_earnings": summary.total_earnings,
            "total_tips": summary.total_tips,
            "total_expenses": summary.total_expenses,
            "savings": summary.savings,
            "total_deliveries": summary.total_deliveries,
            "days_off": summary.days_off,
        },
    }))
    .into_response())
}

/// GET /api/daily/history - live aggregation over an arbitrary range,
/// one entry per calendar day with zero-filled placeholders.
async fn get_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Response> {
    let (Some(from), Some(to)) = (query.from_date, query.to_date) else {
        return Err(ApiError(AppError::Validation(
            "From and to dates are required".to_string(),
        )));
    };

    let include = IncludeSet::parse(query.include.as_deref(), &HISTORY_COMPONENTS)
        .map_err(BillingError::from)?;

    let user = require_user(&state.db, auth.user_id()).await?;
    let bounds = date_bounds(&user);

    let records = DailyRecordRepository::new((*state.db).clone());
    let report: HistoryReport =
        billing::history(&records, user.id, from, to, &bounds, include).await?;

    Ok(Json(json!({
        "success": true,
        "summary": {
            "total_earnings": report.total_earnings,
            "total_tips": report.stats.total_tips,
            "total_expenses": report.stats.total_expenses,
            "savings": report.savings,
            "total_deliveries": report.stats.total_deliveries,
            "days_off": report.stats.days_off,
        },
        "daily_records": report.days,
    }))
    .into_response())
}
