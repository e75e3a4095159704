//! Repository abstractions for data access.

pub mod daily_record;
pub mod monthly_summary;
pub mod user;

pub use daily_record::{DailyRecordError, DailyRecordRepository};
pub use monthly_summary::MonthlySummaryRepository;
pub use user::{NewUser, ProfileChanges, UnverifiedUpdate, UserRepository};
