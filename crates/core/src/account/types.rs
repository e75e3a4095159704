//! Employment classification and its derived pay constants.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Employment classification for a rider.
///
/// The fixed salary and the off-day penalty rate are pure functions of the
/// classification; both are reassigned whenever the classification changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EmploymentType {
    /// Part-time rider.
    PartTimer,
    /// Full-time rider.
    FullTimer,
}

/// Unrecognized employment classification.
#[derive(Debug, Error)]
#[error("Invalid employmentType. Must be 'PartTimer' or 'FullTimer'")]
pub struct InvalidEmploymentType;

impl EmploymentType {
    /// Base monthly pay for this classification.
    #[must_use]
    pub fn fixed_salary(self) -> Decimal {
        match self {
            Self::FullTimer => Decimal::from(37_000),
            Self::PartTimer => Decimal::from(18_500),
        }
    }

    /// Per-day deduction applied to off-days beyond the grace threshold.
    #[must_use]
    pub fn penalty_rate(self) -> Decimal {
        match self {
            Self::FullTimer => Decimal::from(1_170),
            Self::PartTimer => Decimal::from(585),
        }
    }

    /// The wire representation of this classification.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PartTimer => "PartTimer",
            Self::FullTimer => "FullTimer",
        }
    }
}

impl std::str::FromStr for EmploymentType {
    type Err = InvalidEmploymentType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PartTimer" => Ok(Self::PartTimer),
            "FullTimer" => Ok(Self::FullTimer),
            _ => Err(InvalidEmploymentType),
        }
    }
}

impl std::fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_fixed_salary_by_classification() {
        assert_eq!(EmploymentType::FullTimer.fixed_salary(), dec!(37000));
        assert_eq!(EmploymentType::PartTimer.fixed_salary(), dec!(18500));
    }

    #[test]
    fn test_penalty_rate_by_classification() {
        assert_eq!(EmploymentType::FullTimer.penalty_rate(), dec!(1170));
        assert_eq!(EmploymentType::PartTimer.penalty_rate(), dec!(585));
    }

    #[test]
    fn test_parse_round_trip() {
        assert_eq!(
            "PartTimer".parse::<EmploymentType>().unwrap(),
            EmploymentType::PartTimer
        );
        assert_eq!(
            "FullTimer".parse::<EmploymentType>().unwrap(),
            EmploymentType::FullTimer
        );
        assert!("Contractor".parse::<EmploymentType>().is_err());
        assert_eq!(EmploymentType::PartTimer.to_string(), "PartTimer");
    }
}
