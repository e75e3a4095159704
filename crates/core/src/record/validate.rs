//! Daily record input validation.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use super::error::RecordError;
use super::types::{DayActivity, DayQuality, WorkStatus};

/// The window of dates a rider may record against: from account creation
/// through today, inclusive.
#[derive(Debug, Clone, Copy)]
pub struct DateBounds {
    /// Calendar day the account was created.
    pub account_created: NaiveDate,
    /// Today's calendar day (UTC).
    pub today: NaiveDate,
}

impl DateBounds {
    /// Returns true if the date lies inside the allowed window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.account_created && date <= self.today
    }
}

/// Raw record input as it arrives from a client.
#[derive(Debug, Clone, Default)]
pub struct RecordDraft {
    /// Work status string (`On` / `Off`).
    pub work_status: Option<String>,
    /// Completed deliveries.
    pub deliveries: Option<i32>,
    /// Tips received.
    pub tips: Option<Decimal>,
    /// Expenses incurred.
    pub expenses: Option<Decimal>,
    /// Day quality string; defaults to `Average` on working days.
    pub day_quality: Option<String>,
}

/// Validates a record draft against the date bounds and the working/off
/// rules, producing the activity to persist.
///
/// Off days ignore any supplied amounts and quality: they persist as zeros
/// with no quality. Working days default missing amounts to zero and the
/// quality to `Average`, and reject negative amounts.
///
/// # Errors
///
/// Returns the violated `RecordError` rule.
pub fn validate_record(
    date: NaiveDate,
    draft: &RecordDraft,
    bounds: &DateBounds,
) -> Result<DayActivity, RecordError> {
    if !bounds.contains(date) {
        return Err(RecordError::DateOutOfRange);
    }

    let status: WorkStatus = draft
        .work_status
        .as_deref()
        .ok_or(RecordError::MissingFields)?
        .parse()
        .map_err(|_| RecordError::InvalidWorkStatus)?;

    if status == WorkStatus::Off {
        return Ok(DayActivity::Off);
    }

    let quality: DayQuality = match draft.day_quality.as_deref() {
        Some(q) => q.parse().map_err(|_| RecordError::InvalidDayQuality)?,
        None => DayQuality::default(),
    };

    let deliveries = draft.deliveries.unwrap_or(0);
    let tips = draft.tips.unwrap_or(Decimal::ZERO);
    let expenses = draft.expenses.unwrap_or(Decimal::ZERO);

    if deliveries < 0 || tips < Decimal::ZERO || expenses < Decimal::ZERO {
        return Err(RecordError::NegativeAmounts);
    }

    Ok(DayActivity::Working {
        quality,
        deliveries,
        tips,
        expenses,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn bounds() -> DateBounds {
        DateBounds {
            account_created: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            today: NaiveDate::from_ymd_opt(2026, 2, 15).unwrap(),
        }
    }

    fn on_draft() -> RecordDraft {
        RecordDraft {
            work_status: Some("On".into()),
            deliveries: Some(12),
            tips: Some(dec!(30)),
            expenses: Some(dec!(8)),
            day_quality: Some("Good".into()),
        }
    }

    #[test]
    fn test_working_day() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let activity = validate_record(date, &on_draft(), &bounds()).unwrap();
        assert_eq!(
            activity,
            DayActivity::Working {
                quality: DayQuality::Good,
                deliveries: 12,
                tips: dec!(30),
                expenses: dec!(8),
            }
        );
    }

    #[test]
    fn test_quality_defaults_to_average() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let mut draft = on_draft();
        draft.day_quality = None;
        let activity = validate_record(date, &draft, &bounds()).unwrap();
        assert_eq!(activity.quality(), Some(DayQuality::Average));
    }

    #[test]
    fn test_off_day_ignores_amounts() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let draft = RecordDraft {
            work_status: Some("Off".into()),
            deliveries: Some(7),
            tips: Some(dec!(15)),
            expenses: Some(dec!(-3)),
            day_quality: Some("Excellent".into()),
        };
        let activity = validate_record(date, &draft, &bounds()).unwrap();
        assert_eq!(activity, DayActivity::Off);
        assert_eq!(activity.deliveries(), 0);
        assert_eq!(activity.tips(), Decimal::ZERO);
        assert_eq!(activity.quality(), None);
    }

    #[test]
    fn test_date_bounds() {
        let before = NaiveDate::from_ymd_opt(2026, 1, 9).unwrap();
        let after = NaiveDate::from_ymd_opt(2026, 2, 16).unwrap();
        assert_eq!(
            validate_record(before, &on_draft(), &bounds()),
            Err(RecordError::DateOutOfRange)
        );
        assert_eq!(
            validate_record(after, &on_draft(), &bounds()),
            Err(RecordError::DateOutOfRange)
        );
        // Both ends are inclusive.
        assert!(validate_record(bounds().account_created, &on_draft(), &bounds()).is_ok());
        assert!(validate_record(bounds().today, &on_draft(), &bounds()).is_ok());
    }

    #[test]
    fn test_invalid_status_and_quality() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let mut draft = on_draft();
        draft.work_status = Some("Maybe".into());
        assert_eq!(
            validate_record(date, &draft, &bounds()),
            Err(RecordError::InvalidWorkStatus)
        );

        let mut draft = on_draft();
        draft.day_quality = Some("Stellar".into());
        assert_eq!(
            validate_record(date, &draft, &bounds()),
            Err(RecordError::InvalidDayQuality)
        );

        let mut draft = on_draft();
        draft.work_status = None;
        assert_eq!(
            validate_record(date, &draft, &bounds()),
            Err(RecordError::MissingFields)
        );
    }

    #[test]
    fn test_negative_amounts_rejected() {
        let date = NaiveDate::from_ymd_opt(2026, 2, 1).unwrap();
        let mut draft = on_draft();
        draft.deliveries = Some(-1);
        assert_eq!(
            validate_record(date, &draft, &bounds()),
            Err(RecordError::NegativeAmounts)
        );

        let mut draft = on_draft();
        draft.tips = Some(dec!(-0.5));
        assert_eq!(
            validate_record(date, &draft, &bounds()),
            Err(RecordError::NegativeAmounts)
        );
    }
}
