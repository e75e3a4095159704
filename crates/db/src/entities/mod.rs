//! `SeaORM` entity definitions.
//!
//! Enum-like columns (`employment_type`, `work_status`, `day_quality`) are
//! stored as strings and converted to the core domain types at the
//! repository boundary, keeping the core crate free of database types.

pub mod daily_records;
pub mod monthly_summaries;
pub mod users;
