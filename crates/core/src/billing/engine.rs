//! Aggregation and earnings calculus.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::record::{DailyRecord, DateBounds, DayActivity};

use super::cycle::CycleWindow;
use super::error::BillingError;
use super::store::{RecordStore, SummaryStore};
use super::types::{
    CycleStats, CycleSummary, EarningsProfile, HistoryDay, HistoryReport, IncludeSet,
    IncomeComponent,
};

/// Off-days per cycle that carry no penalty.
pub const PENALTY_FREE_OFF_DAYS: u32 = 4;

/// Pay per completed delivery.
fn delivery_rate() -> Decimal {
    Decimal::from(45)
}

/// Folds a set of daily records into raw totals.
#[must_use]
pub fn aggregate(records: &[DailyRecord]) -> CycleStats {
    let mut stats = CycleStats::default();
    for record in records {
        match &record.activity {
            DayActivity::Working {
                deliveries,
                tips,
                expenses,
                ..
            } => {
                stats.total_deliveries += i64::from(*deliveries);
                stats.total_tips += *tips;
                stats.total_expenses += *expenses;
            }
            DayActivity::Off => stats.days_off += 1,
        }
    }
    stats
}

/// Derives cycle earnings from raw totals.
///
/// Each included component contributes independently: the fixed salary,
/// deliveries at the per-delivery rate, and tips. Off-days beyond
/// [`PENALTY_FREE_OFF_DAYS`] deduct the classification's penalty rate per
/// extra day, independent of the include filter.
#[must_use]
pub fn compute_earnings(
    stats: &CycleStats,
    profile: &EarningsProfile,
    include: IncludeSet,
) -> Decimal {
    let mut earnings = Decimal::ZERO;
    if include.contains(IncomeComponent::FixedSalary) {
        earnings += profile.fixed_salary;
    }
    if include.contains(IncomeComponent::Deliveries) {
        earnings += Decimal::from(stats.total_deliveries) * delivery_rate();
    }
    if include.contains(IncomeComponent::Tips) {
        earnings += stats.total_tips;
    }
    if stats.days_off > PENALTY_FREE_OFF_DAYS {
        let extra_days = Decimal::from(stats.days_off - PENALTY_FREE_OFF_DAYS);
        earnings -= extra_days * profile.employment_type.penalty_rate();
    }
    earnings
}

/// Derives history earnings from raw totals: deliveries and tips only, no
/// fixed salary and no off-day penalty.
#[must_use]
pub fn compute_history_earnings(stats: &CycleStats, include: IncludeSet) -> Decimal {
    let mut earnings = Decimal::ZERO;
    if include.contains(IncomeComponent::Deliveries) {
        earnings += Decimal::from(stats.total_deliveries) * delivery_rate();
    }
    if include.contains(IncomeComponent::Tips) {
        earnings += stats.total_tips;
    }
    earnings
}

/// Builds the full summary for a window from raw totals.
#[must_use]
pub fn summarize(
    window: CycleWindow,
    stats: &CycleStats,
    profile: &EarningsProfile,
    include: IncludeSet,
) -> CycleSummary {
    let total_earnings = compute_earnings(stats, profile, include);
    CycleSummary {
        user_id: profile.user_id,
        window,
        total_earnings,
        total_tips: stats.total_tips,
        total_expenses: stats.total_expenses,
        savings: total_earnings - stats.total_expenses,
        total_deliveries: stats.total_deliveries,
        days_off: stats.days_off,
    }
}

/// Recomputes the summary for the window from raw records and upserts it
/// under its (user, window) key. Earnings use the full include set; callers
/// re-derive filtered earnings at read time.
///
/// # Errors
///
/// Returns `BillingError::Store` on storage failure.
pub async fn refresh_summary<R, S>(
    records: &R,
    summaries: &S,
    profile: &EarningsProfile,
    window: CycleWindow,
) -> Result<CycleSummary, BillingError>
where
    R: RecordStore + ?Sized,
    S: SummaryStore + ?Sized,
{
    let rows = records
        .records_in_range(profile.user_id, window.start, window.end)
        .await?;
    let stats = aggregate(&rows);
    let summary = summarize(window, &stats, profile, IncludeSet::all());
    summaries.upsert_summary(&summary).await?;
    Ok(summary)
}

/// Returns the summary for the window under the requested include set.
///
/// When a cached summary exists, only earnings and savings are recomputed
/// from its stored totals; raw records are not touched. When none exists,
/// the records are aggregated live and the result is returned without
/// being cached.
///
/// # Errors
///
/// Returns `BillingError::Store` on storage failure.
pub async fn monthly_summary<R, S>(
    records: &R,
    summaries: &S,
    profile: &EarningsProfile,
    window: CycleWindow,
    include: IncludeSet,
) -> Result<CycleSummary, BillingError>
where
    R: RecordStore + ?Sized,
    S: SummaryStore + ?Sized,
{
    if let Some(cached) = summaries.find_summary(profile.user_id, window).await? {
        return Ok(summarize(window, &cached.stats(), profile, include));
    }

    let rows = records
        .records_in_range(profile.user_id, window.start, window.end)
        .await?;
    let stats = aggregate(&rows);
    Ok(summarize(window, &stats, profile, include))
}

/// Aggregates an arbitrary date range live and reports one entry per
/// calendar day, zero-filling days without a stored record.
///
/// # Errors
///
/// Returns `BillingError::InvalidDateRange` when the range is inverted or
/// leaves the account's recordable days, `BillingError::Store` on storage
/// failure.
pub async fn history<R>(
    records: &R,
    user_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
    bounds: &DateBounds,
    include: IncludeSet,
) -> Result<HistoryReport, BillingError>
where
    R: RecordStore + ?Sized,
{
    if from > to || from < bounds.account_created || to > bounds.today {
        return Err(BillingError::InvalidDateRange);
    }

    let rows = records.records_in_range(user_id, from, to).await?;
    let stats = aggregate(&rows);
    let total_earnings = compute_history_earnings(&stats, include);

    let by_date: HashMap<NaiveDate, &DailyRecord> = rows.iter().map(|r| (r.date, r)).collect();
    let days: Vec<HistoryDay> = from
        .iter_days()
        .take_while(|d| *d <= to)
        .map(|day| {
            by_date
                .get(&day)
                .map_or_else(|| HistoryDay::placeholder(day), |r| HistoryDay::from_record(r))
        })
        .collect();

    Ok(HistoryReport {
        stats,
        total_earnings,
        savings: total_earnings - stats.total_expenses,
        days,
    })
}
