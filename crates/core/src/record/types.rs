//! Daily record types.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Whether the rider worked on a given day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkStatus {
    /// Worked.
    On,
    /// Did not work.
    Off,
}

/// Unrecognized work status value.
#[derive(Debug, Error)]
#[error("Invalid work status")]
pub struct InvalidWorkStatus;

impl WorkStatus {
    /// The wire representation of this status.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "On",
            Self::Off => "Off",
        }
    }
}

impl std::str::FromStr for WorkStatus {
    type Err = InvalidWorkStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "On" => Ok(Self::On),
            "Off" => Ok(Self::Off),
            _ => Err(InvalidWorkStatus),
        }
    }
}

impl std::fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Subjective quality of a working day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DayQuality {
    /// Excellent day.
    Excellent,
    /// Very good day.
    VeryGood,
    /// Good day.
    Good,
    /// Average day.
    #[default]
    Average,
    /// Bad day.
    Bad,
    /// Very bad day.
    VeryBad,
}

/// Unrecognized day quality value.
#[derive(Debug, Error)]
#[error("Invalid day quality for On status")]
pub struct InvalidDayQuality;

impl DayQuality {
    /// The wire representation of this quality.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "VeryGood",
            Self::Good => "Good",
            Self::Average => "Average",
            Self::Bad => "Bad",
            Self::VeryBad => "VeryBad",
        }
    }
}

impl std::str::FromStr for DayQuality {
    type Err = InvalidDayQuality;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Excellent" => Ok(Self::Excellent),
            "VeryGood" => Ok(Self::VeryGood),
            "Good" => Ok(Self::Good),
            "Average" => Ok(Self::Average),
            "Bad" => Ok(Self::Bad),
            "VeryBad" => Ok(Self::VeryBad),
            _ => Err(InvalidDayQuality),
        }
    }
}

impl std::fmt::Display for DayQuality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened on a recorded day.
///
/// Off days carry no amounts and no quality; the persistence layer stores
/// them as zeros with a NULL quality.
#[derive(Debug, Clone, PartialEq)]
pub enum DayActivity {
    /// A working day with its amounts.
    Working {
        /// Subjective day quality.
        quality: DayQuality,
        /// Completed deliveries.
        deliveries: i32,
        /// Tips received.
        tips: Decimal,
        /// Expenses incurred.
        expenses: Decimal,
    },
    /// A day off.
    Off,
}

impl DayActivity {
    /// The work status of this activity.
    #[must_use]
    pub const fn status(&self) -> WorkStatus {
        match self {
            Self::Working { .. } => WorkStatus::On,
            Self::Off => WorkStatus::Off,
        }
    }

    /// Deliveries for the day (zero when off).
    #[must_use]
    pub const fn deliveries(&self) -> i32 {
        match self {
            Self::Working { deliveries, .. } => *deliveries,
            Self::Off => 0,
        }
    }

    /// Tips for the day (zero when off).
    #[must_use]
    pub fn tips(&self) -> Decimal {
        match self {
            Self::Working { tips, .. } => *tips,
            Self::Off => Decimal::ZERO,
        }
    }

    /// Expenses for the day (zero when off).
    #[must_use]
    pub fn expenses(&self) -> Decimal {
        match self {
            Self::Working { expenses, .. } => *expenses,
            Self::Off => Decimal::ZERO,
        }
    }

    /// Day quality (None when off).
    #[must_use]
    pub const fn quality(&self) -> Option<DayQuality> {
        match self {
            Self::Working { quality, .. } => Some(*quality),
            Self::Off => None,
        }
    }
}

/// One rider's record for one calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user.
    pub user_id: Uuid,
    /// Calendar day (UTC).
    pub date: NaiveDate,
    /// What happened that day.
    pub activity: DayActivity,
}
