//! Account domain rules: employment classification and profile pictures.

mod picture;
mod types;

pub use picture::{MAX_PICTURE_BYTES, PictureError, validate_profile_picture};
pub use types::{EmploymentType, InvalidEmploymentType};
