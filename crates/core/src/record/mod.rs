//! Daily record model and validation.
//!
//! A record is one entry per rider per calendar day. The working/off split
//! is a tagged type: working days carry quality and the three amounts, off
//! days carry nothing and persist as zeros.

mod error;
mod types;
mod validate;

pub use error::RecordError;
pub use types::{DailyRecord, DayActivity, DayQuality, WorkStatus};
pub use validate::{DateBounds, RecordDraft, validate_record};
