//! Billing cycle window math.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

/// Day of month on which every cycle starts.
pub const CYCLE_START_DAY: u32 = 21;

/// An inclusive billing window from the 21st of one month through the 20th
/// of the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CycleWindow {
    /// First day of the window.
    pub start: NaiveDate,
    /// Last day of the window.
    pub end: NaiveDate,
}

impl CycleWindow {
    /// Returns the unique cycle that owns the given date.
    ///
    /// Dates on or after the 21st belong to the cycle starting that month;
    /// earlier dates belong to the cycle that started on the 21st of the
    /// previous month.
    #[must_use]
    pub fn containing(date: NaiveDate) -> Self {
        let (year, month) = (date.year(), date.month());
        if date.day() >= CYCLE_START_DAY {
            let (next_year, next_month) = month_after(year, month);
            Self {
                start: cycle_date(year, month, CYCLE_START_DAY),
                end: cycle_date(next_year, next_month, CYCLE_START_DAY - 1),
            }
        } else {
            let (prev_year, prev_month) = month_before(year, month);
            Self {
                start: cycle_date(prev_year, prev_month, CYCLE_START_DAY),
                end: cycle_date(year, month, CYCLE_START_DAY - 1),
            }
        }
    }

    /// Returns the cycle that is active on the given day.
    #[must_use]
    pub fn active(today: NaiveDate) -> Self {
        Self::containing(today)
    }

    /// Returns true if the given date falls within this window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Iterates every calendar day in the window, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

fn month_after(year: i32, month: u32) -> (i32, u32) {
    if month == 12 { (year + 1, 1) } else { (year, month + 1) }
}

fn month_before(year: i32, month: u32) -> (i32, u32) {
    if month == 1 { (year - 1, 12) } else { (year, month - 1) }
}

fn cycle_date(year: i32, month: u32, day: u32) -> NaiveDate {
    // Days 20 and 21 exist in every month.
    NaiveDate::from_ymd_opt(year, month, day).expect("cycle boundary day exists in every month")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_mid_cycle_before_the_21st() {
        let window = CycleWindow::containing(d(2026, 3, 10));
        assert_eq!(window.start, d(2026, 2, 21));
        assert_eq!(window.end, d(2026, 3, 20));
    }

    #[test]
    fn test_on_and_after_the_21st() {
        let window = CycleWindow::containing(d(2026, 3, 21));
        assert_eq!(window.start, d(2026, 3, 21));
        assert_eq!(window.end, d(2026, 4, 20));

        let window = CycleWindow::containing(d(2026, 3, 31));
        assert_eq!(window.start, d(2026, 3, 21));
        assert_eq!(window.end, d(2026, 4, 20));
    }

    #[test]
    fn test_year_boundaries() {
        let window = CycleWindow::containing(d(2026, 12, 25));
        assert_eq!(window.start, d(2026, 12, 21));
        assert_eq!(window.end, d(2027, 1, 20));

        let window = CycleWindow::containing(d(2026, 1, 5));
        assert_eq!(window.start, d(2025, 12, 21));
        assert_eq!(window.end, d(2026, 1, 20));
    }

    #[test]
    fn test_window_day_iteration() {
        let window = CycleWindow::containing(d(2026, 2, 1));
        let days: Vec<_> = window.days().collect();
        assert_eq!(days.first(), Some(&d(2026, 1, 21)));
        assert_eq!(days.last(), Some(&d(2026, 2, 20)));
        assert_eq!(days.len(), 31);
    }

    proptest! {
        // Every date has exactly one owning cycle: the window contains the
        // date, boundaries are always 21st/20th, and every day inside the
        // window maps back to the same window.
        #[test]
        fn prop_unique_owning_cycle(days_offset in 0i64..36_500) {
            let date = d(1990, 1, 1) + chrono::Duration::days(days_offset);
            let window = CycleWindow::containing(date);

            prop_assert!(window.contains(date));
            prop_assert_eq!(window.start.day(), 21);
            prop_assert_eq!(window.end.day(), 20);
            prop_assert!(window.start < window.end);

            prop_assert_eq!(CycleWindow::containing(window.start), window);
            prop_assert_eq!(CycleWindow::containing(window.end), window);
        }
    }
}
