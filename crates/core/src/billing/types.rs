//! Billing engine types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::account::EmploymentType;
use crate::record::{DailyRecord, WorkStatus};

use super::cycle::CycleWindow;

/// Raw totals aggregated from a set of daily records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CycleStats {
    /// Sum of deliveries across working days.
    pub total_deliveries: i64,
    /// Sum of tips across working days.
    pub total_tips: Decimal,
    /// Sum of expenses across working days.
    pub total_expenses: Decimal,
    /// Count of off days.
    pub days_off: u32,
}

/// The earnings-relevant slice of a user: identity, classification, and the
/// salary assigned at the last classification change.
#[derive(Debug, Clone, Copy)]
pub struct EarningsProfile {
    /// User ID.
    pub user_id: Uuid,
    /// Employment classification.
    pub employment_type: EmploymentType,
    /// Fixed salary as stored on the account.
    pub fixed_salary: Decimal,
}

/// An income component that can be toggled in earnings calculations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncomeComponent {
    /// The classification-derived base salary.
    FixedSalary,
    /// Per-delivery pay.
    Deliveries,
    /// Tips.
    Tips,
}

impl IncomeComponent {
    /// The wire representation of this component.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FixedSalary => "fixed_salary",
            Self::Deliveries => "deliveries",
            Self::Tips => "tips",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "fixed_salary" => Some(Self::FixedSalary),
            "deliveries" => Some(Self::Deliveries),
            "tips" => Some(Self::Tips),
            _ => None,
        }
    }
}

/// An explicitly supplied include filter selected nothing recognized.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("At least one income component ({0}) must be included")]
pub struct EmptyIncludeSet(String);

/// Which income components an earnings calculation should count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IncludeSet {
    components: [bool; 3],
}

impl IncludeSet {
    /// A set containing exactly the given components.
    #[must_use]
    pub fn of(components: &[IncomeComponent]) -> Self {
        let mut set = Self {
            components: [false; 3],
        };
        for c in components {
            set.components[*c as usize] = true;
        }
        set
    }

    /// All three components; the default for cycle summaries.
    #[must_use]
    pub fn all() -> Self {
        Self::of(&[
            IncomeComponent::FixedSalary,
            IncomeComponent::Deliveries,
            IncomeComponent::Tips,
        ])
    }

    /// Returns true if the component is included.
    #[must_use]
    pub const fn contains(&self, component: IncomeComponent) -> bool {
        self.components[component as usize]
    }

    /// Parses a comma-separated include filter against the components the
    /// endpoint recognizes. A missing filter selects every recognized
    /// component; a supplied filter is reduced to the recognized ones and
    /// must leave at least one.
    ///
    /// # Errors
    ///
    /// Returns `EmptyIncludeSet` when the supplied filter selects nothing.
    pub fn parse(raw: Option<&str>, allowed: &[IncomeComponent]) -> Result<Self, EmptyIncludeSet> {
        let Some(raw) = raw else {
            return Ok(Self::of(allowed));
        };

        let selected: Vec<IncomeComponent> = raw
            .split(',')
            .filter_map(|part| IncomeComponent::parse(part.trim()))
            .filter(|c| allowed.contains(c))
            .collect();

        if selected.is_empty() {
            let names: Vec<&str> = allowed.iter().map(|c| c.as_str()).collect();
            return Err(EmptyIncludeSet(names.join(", ")));
        }

        Ok(Self::of(&selected))
    }
}

/// Aggregated summary for one (user, window) pair.
///
/// A materialized view of the window's records: always re-derivable, never
/// a source of truth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleSummary {
    /// Owning user.
    pub user_id: Uuid,
    /// The cycle window this summary covers.
    pub window: CycleWindow,
    /// Derived earnings.
    pub total_earnings: Decimal,
    /// Sum of tips.
    pub total_tips: Decimal,
    /// Sum of expenses.
    pub total_expenses: Decimal,
    /// Earnings minus expenses.
    pub savings: Decimal,
    /// Sum of deliveries.
    pub total_deliveries: i64,
    /// Count of off days.
    pub days_off: u32,
}

impl CycleSummary {
    /// The raw stats this summary was derived from.
    #[must_use]
    pub const fn stats(&self) -> CycleStats {
        CycleStats {
            total_deliveries: self.total_deliveries,
            total_tips: self.total_tips,
            total_expenses: self.total_expenses,
            days_off: self.days_off,
        }
    }
}

/// One calendar day in a history report. Days without a stored record
/// appear as zero-valued off days.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryDay {
    /// Calendar day.
    pub date: NaiveDate,
    /// Work status for the day.
    pub work_status: WorkStatus,
    /// Deliveries for the day.
    pub deliveries: i32,
    /// Tips for the day.
    pub tips: Decimal,
    /// Expenses for the day.
    pub expenses: Decimal,
}

impl HistoryDay {
    /// Builds the entry for a stored record.
    #[must_use]
    pub fn from_record(record: &DailyRecord) -> Self {
        Self {
            date: record.date,
            work_status: record.activity.status(),
            deliveries: record.activity.deliveries(),
            tips: record.activity.tips(),
            expenses: record.activity.expenses(),
        }
    }

    /// Builds the zero-valued placeholder for a day without a record.
    #[must_use]
    pub fn placeholder(date: NaiveDate) -> Self {
        Self {
            date,
            work_status: WorkStatus::Off,
            deliveries: 0,
            tips: Decimal::ZERO,
            expenses: Decimal::ZERO,
        }
    }
}

/// A live aggregation over an arbitrary date range, one entry per day.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryReport {
    /// Raw totals over the range.
    pub stats: CycleStats,
    /// Earnings over the range under the requested include set (no fixed
    /// salary, no off-day penalty).
    pub total_earnings: Decimal,
    /// Earnings minus expenses.
    pub savings: Decimal,
    /// One entry per calendar day, ascending.
    pub days: Vec<HistoryDay>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SUMMARY_COMPONENTS: [IncomeComponent; 3] = [
        IncomeComponent::FixedSalary,
        IncomeComponent::Deliveries,
        IncomeComponent::Tips,
    ];

    #[test]
    fn test_missing_filter_selects_all_allowed() {
        let set = IncludeSet::parse(None, &SUMMARY_COMPONENTS).unwrap();
        assert_eq!(set, IncludeSet::all());

        let set = IncludeSet::parse(None, &[IncomeComponent::Deliveries, IncomeComponent::Tips])
            .unwrap();
        assert!(!set.contains(IncomeComponent::FixedSalary));
        assert!(set.contains(IncomeComponent::Deliveries));
        assert!(set.contains(IncomeComponent::Tips));
    }

    #[test]
    fn test_explicit_filter() {
        let set = IncludeSet::parse(Some("fixed_salary,tips"), &SUMMARY_COMPONENTS).unwrap();
        assert!(set.contains(IncomeComponent::FixedSalary));
        assert!(!set.contains(IncomeComponent::Deliveries));
        assert!(set.contains(IncomeComponent::Tips));
    }

    #[test]
    fn test_unrecognized_components_are_dropped() {
        let set = IncludeSet::parse(Some("tips,bonus"), &SUMMARY_COMPONENTS).unwrap();
        assert!(set.contains(IncomeComponent::Tips));
        assert!(!set.contains(IncomeComponent::Deliveries));
    }

    #[test]
    fn test_filter_reduced_to_nothing_is_an_error() {
        assert!(IncludeSet::parse(Some("bonus"), &SUMMARY_COMPONENTS).is_err());
        // fixed_salary is recognized globally but not allowed for history
        assert!(
            IncludeSet::parse(
                Some("fixed_salary"),
                &[IncomeComponent::Deliveries, IncomeComponent::Tips]
            )
            .is_err()
        );
    }

    #[test]
    fn test_empty_set_error_names_allowed_components() {
        let err = IncludeSet::parse(Some("x"), &SUMMARY_COMPONENTS).unwrap_err();
        assert_eq!(
            err.to_string(),
            "At least one income component (fixed_salary, deliveries, tips) must be included"
        );
    }
}
