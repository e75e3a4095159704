//! Billing engine tests against in-memory stores.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use crate::account::EmploymentType;
use crate::record::{DailyRecord, DateBounds, DayActivity, DayQuality, WorkStatus};

use super::store::{RecordStore, StoreError, SummaryStore};
use super::*;

struct MemRecords(Vec<DailyRecord>);

#[async_trait]
impl RecordStore for MemRecords {
    async fn records_in_range(
        &self,
        user_id: Uuid,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyRecord>, StoreError> {
        let mut rows: Vec<DailyRecord> = self
            .0
            .iter()
            .filter(|r| r.user_id == user_id && r.date >= start && r.date <= end)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.date);
        Ok(rows)
    }
}

#[derive(Default)]
struct MemSummaries(Mutex<HashMap<(Uuid, CycleWindow), CycleSummary>>);

impl MemSummaries {
    fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

#[async_trait]
impl SummaryStore for MemSummaries {
    async fn find_summary(
        &self,
        user_id: Uuid,
        window: CycleWindow,
    ) -> Result<Option<CycleSummary>, StoreError> {
        Ok(self.0.lock().unwrap().get(&(user_id, window)).cloned())
    }

    async fn upsert_summary(&self, summary: &CycleSummary) -> Result<(), StoreError> {
        self.0
            .lock()
            .unwrap()
            .insert((summary.user_id, summary.window), summary.clone());
        Ok(())
    }
}

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn working(user_id: Uuid, date: NaiveDate, deliveries: i32, tips: Decimal) -> DailyRecord {
    DailyRecord {
        id: Uuid::new_v4(),
        user_id,
        date,
        activity: DayActivity::Working {
            quality: DayQuality::Average,
            deliveries,
            tips,
            expenses: Decimal::ZERO,
        },
    }
}

fn off(user_id: Uuid, date: NaiveDate) -> DailyRecord {
    DailyRecord {
        id: Uuid::new_v4(),
        user_id,
        date,
        activity: DayActivity::Off,
    }
}

fn full_timer(user_id: Uuid) -> EarningsProfile {
    EarningsProfile {
        user_id,
        employment_type: EmploymentType::FullTimer,
        fixed_salary: EmploymentType::FullTimer.fixed_salary(),
    }
}

#[test]
fn test_aggregate_totals() {
    let user = Uuid::new_v4();
    let mut r1 = working(user, d(2026, 3, 1), 10, dec!(25));
    if let DayActivity::Working { expenses, .. } = &mut r1.activity {
        *expenses = dec!(12);
    }
    let records = vec![
        r1,
        working(user, d(2026, 3, 2), 5, dec!(10)),
        off(user, d(2026, 3, 3)),
        off(user, d(2026, 3, 4)),
    ];

    let stats = aggregate(&records);
    assert_eq!(stats.total_deliveries, 15);
    assert_eq!(stats.total_tips, dec!(35));
    assert_eq!(stats.total_expenses, dec!(12));
    assert_eq!(stats.days_off, 2);
}

#[test]
fn test_full_timer_worked_example() {
    // 10 deliveries, 50 tips, 20 expenses, 6 off-days, all components:
    // 37000 + 450 + 50 - 2*1170 = 35160; savings 35140.
    let stats = CycleStats {
        total_deliveries: 10,
        total_tips: dec!(50),
        total_expenses: dec!(20),
        days_off: 6,
    };
    let profile = full_timer(Uuid::new_v4());

    let earnings = compute_earnings(&stats, &profile, IncludeSet::all());
    assert_eq!(earnings, dec!(35160));

    let summary = summarize(
        CycleWindow::containing(d(2026, 3, 1)),
        &stats,
        &profile,
        IncludeSet::all(),
    );
    assert_eq!(summary.total_earnings, dec!(35160));
    assert_eq!(summary.savings, dec!(35140));
}

#[test]
fn test_penalty_applies_only_beyond_grace() {
    let profile = full_timer(Uuid::new_v4());
    let mut stats = CycleStats {
        total_deliveries: 0,
        total_tips: Decimal::ZERO,
        total_expenses: Decimal::ZERO,
        days_off: PENALTY_FREE_OFF_DAYS,
    };

    assert_eq!(compute_earnings(&stats, &profile, IncludeSet::all()), dec!(37000));

    stats.days_off = PENALTY_FREE_OFF_DAYS + 1;
    assert_eq!(compute_earnings(&stats, &profile, IncludeSet::all()), dec!(35830));
}

#[test]
fn test_penalty_scales_with_classification() {
    let stats = CycleStats {
        total_deliveries: 0,
        total_tips: Decimal::ZERO,
        total_expenses: Decimal::ZERO,
        days_off: 7,
    };
    let part_timer = EarningsProfile {
        user_id: Uuid::new_v4(),
        employment_type: EmploymentType::PartTimer,
        fixed_salary: EmploymentType::PartTimer.fixed_salary(),
    };

    // 18500 - 3*585 = 16745
    assert_eq!(
        compute_earnings(&stats, &part_timer, IncludeSet::all()),
        dec!(16745)
    );
}

#[test]
fn test_penalty_independent_of_include_filter() {
    let stats = CycleStats {
        total_deliveries: 10,
        total_tips: dec!(50),
        total_expenses: Decimal::ZERO,
        days_off: 6,
    };
    let profile = full_timer(Uuid::new_v4());
    let tips_only = IncludeSet::parse(Some("tips"), &[
        IncomeComponent::FixedSalary,
        IncomeComponent::Deliveries,
        IncomeComponent::Tips,
    ])
    .unwrap();

    // 50 - 2*1170: the deduction applies even when salary is excluded.
    assert_eq!(compute_earnings(&stats, &profile, tips_only), dec!(-2290));
}

#[test]
fn test_earnings_monotone_in_included_components() {
    let stats = CycleStats {
        total_deliveries: 8,
        total_tips: dec!(40),
        total_expenses: dec!(5),
        days_off: 0,
    };
    let profile = full_timer(Uuid::new_v4());
    let all_components = [
        IncomeComponent::FixedSalary,
        IncomeComponent::Deliveries,
        IncomeComponent::Tips,
    ];

    let tips = compute_earnings(
        &stats,
        &profile,
        IncludeSet::parse(Some("tips"), &all_components).unwrap(),
    );
    let tips_deliveries = compute_earnings(
        &stats,
        &profile,
        IncludeSet::parse(Some("tips,deliveries"), &all_components).unwrap(),
    );
    let everything = compute_earnings(&stats, &profile, IncludeSet::all());

    assert!(tips < tips_deliveries);
    assert!(tips_deliveries < everything);
}

#[tokio::test]
async fn test_refresh_upserts_by_window_key() {
    let user = Uuid::new_v4();
    let window = CycleWindow::containing(d(2026, 3, 25));
    let records = MemRecords(vec![
        working(user, d(2026, 3, 22), 4, dec!(12)),
        off(user, d(2026, 3, 23)),
    ]);
    let summaries = MemSummaries::default();
    let profile = full_timer(user);

    let first = refresh_summary(&records, &summaries, &profile, window)
        .await
        .unwrap();
    assert_eq!(first.total_deliveries, 4);
    assert_eq!(summaries.len(), 1);

    // A second refresh replaces the row rather than adding one.
    let second = refresh_summary(&records, &summaries, &profile, window)
        .await
        .unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(first, second);

    let cached = summaries.find_summary(user, window).await.unwrap().unwrap();
    assert_eq!(cached, first);
}

#[tokio::test]
async fn test_monthly_summary_prefers_cache() {
    let user = Uuid::new_v4();
    let window = CycleWindow::containing(d(2026, 3, 25));
    // The store holds records that disagree with the cache; the cached
    // totals must win.
    let records = MemRecords(vec![working(user, d(2026, 3, 22), 100, dec!(999))]);
    let summaries = MemSummaries::default();
    let profile = full_timer(user);

    let cached = CycleSummary {
        user_id: user,
        window,
        total_earnings: dec!(37225),
        total_tips: dec!(45),
        total_expenses: dec!(10),
        savings: dec!(37215),
        total_deliveries: 4,
        days_off: 1,
    };
    summaries.upsert_summary(&cached).await.unwrap();

    let summary = monthly_summary(&records, &summaries, &profile, window, IncludeSet::all())
        .await
        .unwrap();
    assert_eq!(summary.total_deliveries, 4);
    assert_eq!(summary.total_tips, dec!(45));
    // 37000 + 180 + 45 = 37225
    assert_eq!(summary.total_earnings, dec!(37225));

    // A narrower filter re-derives earnings from the cached totals.
    let tips_only = monthly_summary(
        &records,
        &summaries,
        &profile,
        window,
        IncludeSet::of(&[IncomeComponent::Tips]),
    )
    .await
    .unwrap();
    assert_eq!(tips_only.total_earnings, dec!(45));
    assert_eq!(tips_only.savings, dec!(35));
}

#[tokio::test]
async fn test_monthly_summary_live_path_does_not_cache() {
    let user = Uuid::new_v4();
    let window = CycleWindow::containing(d(2026, 3, 25));
    let records = MemRecords(vec![working(user, d(2026, 3, 22), 2, dec!(10))]);
    let summaries = MemSummaries::default();
    let profile = full_timer(user);

    let summary = monthly_summary(&records, &summaries, &profile, window, IncludeSet::all())
        .await
        .unwrap();
    // 37000 + 90 + 10
    assert_eq!(summary.total_earnings, dec!(37100));
    assert_eq!(summaries.len(), 0);
}

#[tokio::test]
async fn test_history_zero_fills_every_day() {
    let user = Uuid::new_v4();
    let from = d(2026, 3, 1);
    let to = d(2026, 3, 7);
    let records = MemRecords(vec![
        working(user, d(2026, 3, 2), 6, dec!(20)),
        off(user, d(2026, 3, 5)),
    ]);
    let bounds = DateBounds {
        account_created: d(2026, 1, 1),
        today: d(2026, 3, 20),
    };
    let include =
        IncludeSet::parse(None, &[IncomeComponent::Deliveries, IncomeComponent::Tips]).unwrap();

    let report = history(&records, user, from, to, &bounds, include)
        .await
        .unwrap();

    assert_eq!(report.days.len(), 7);
    let dates: Vec<NaiveDate> = report.days.iter().map(|day| day.date).collect();
    assert_eq!(dates, from.iter_days().take(7).collect::<Vec<_>>());

    assert_eq!(report.days[1].work_status, WorkStatus::On);
    assert_eq!(report.days[1].deliveries, 6);
    // Placeholder days read as zero-valued off days.
    assert_eq!(report.days[0].work_status, WorkStatus::Off);
    assert_eq!(report.days[0].tips, Decimal::ZERO);

    // 6*45 + 20, no salary and no penalty in history.
    assert_eq!(report.total_earnings, dec!(290));
    assert_eq!(report.stats.days_off, 1);
}

#[tokio::test]
async fn test_history_tips_only_filter() {
    let user = Uuid::new_v4();
    let records = MemRecords(vec![working(user, d(2026, 3, 2), 6, dec!(20))]);
    let bounds = DateBounds {
        account_created: d(2026, 1, 1),
        today: d(2026, 3, 20),
    };
    let include = IncludeSet::parse(
        Some("tips"),
        &[IncomeComponent::Deliveries, IncomeComponent::Tips],
    )
    .unwrap();

    let report = history(&records, user, d(2026, 3, 1), d(2026, 3, 3), &bounds, include)
        .await
        .unwrap();
    assert_eq!(report.total_earnings, dec!(20));
}

#[tokio::test]
async fn test_history_range_validation() {
    let user = Uuid::new_v4();
    let records = MemRecords(vec![]);
    let bounds = DateBounds {
        account_created: d(2026, 2, 1),
        today: d(2026, 3, 15),
    };
    let include = IncludeSet::all();

    // Inverted range.
    assert!(matches!(
        history(&records, user, d(2026, 3, 5), d(2026, 3, 1), &bounds, include).await,
        Err(BillingError::InvalidDateRange)
    ));
    // Starts before account creation.
    assert!(matches!(
        history(&records, user, d(2026, 1, 20), d(2026, 2, 5), &bounds, include).await,
        Err(BillingError::InvalidDateRange)
    ));
    // Ends in the future.
    assert!(matches!(
        history(&records, user, d(2026, 3, 10), d(2026, 3, 16), &bounds, include).await,
        Err(BillingError::InvalidDateRange)
    ));
}
