//! Profile picture validation.
//!
//! Pictures are stored as embedded `data:image/...` URIs. The size ceiling
//! applies to the decoded payload, computed from the base64 text without
//! decoding it.

use thiserror::Error;

/// Maximum decoded picture size: 5MB.
pub const MAX_PICTURE_BYTES: usize = 5 * 1024 * 1024;

/// Profile picture validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PictureError {
    /// Not a `data:image/...` URI.
    #[error("Invalid profile picture format")]
    InvalidFormat,
    /// Decoded payload exceeds the size ceiling.
    #[error("Profile picture size must be 5MB or less")]
    TooLarge,
}

/// Validates a profile picture data-URI.
///
/// # Errors
///
/// Returns `PictureError::InvalidFormat` unless the value starts with
/// `data:image/`, and `PictureError::TooLarge` when the decoded payload
/// would exceed [`MAX_PICTURE_BYTES`].
pub fn validate_profile_picture(data_uri: &str) -> Result<(), PictureError> {
    if !data_uri.starts_with("data:image/") {
        return Err(PictureError::InvalidFormat);
    }

    if decoded_len(data_uri) > MAX_PICTURE_BYTES {
        return Err(PictureError::TooLarge);
    }

    Ok(())
}

/// Decoded byte length of the base64 payload after the data-URI header.
fn decoded_len(data_uri: &str) -> usize {
    let payload = data_uri
        .split_once(',')
        .map_or(data_uri, |(_, payload)| payload);
    let padding = payload.chars().rev().take_while(|c| *c == '=').count();
    (payload.len() / 4) * 3 - padding
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_non_image_uri() {
        assert_eq!(
            validate_profile_picture("data:text/plain;base64,aGVsbG8="),
            Err(PictureError::InvalidFormat)
        );
        assert_eq!(
            validate_profile_picture("https://example.com/avatar.png"),
            Err(PictureError::InvalidFormat)
        );
    }

    #[test]
    fn test_accepts_small_image() {
        // 1x1 PNG, well under the ceiling
        let uri = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAA=";
        assert_eq!(validate_profile_picture(uri), Ok(()));
    }

    #[test]
    fn test_rejects_oversized_payload() {
        // Base64 text whose decoded size is just over 5MB.
        let payload_len = (MAX_PICTURE_BYTES / 3 + 1) * 4;
        let uri = format!("data:image/png;base64,{}", "A".repeat(payload_len));
        assert_eq!(validate_profile_picture(&uri), Err(PictureError::TooLarge));
    }

    #[test]
    fn test_padding_counts_toward_decoded_size() {
        assert_eq!(decoded_len("data:image/png;base64,aGk="), 2);
        assert_eq!(decoded_len("data:image/png;base64,aGV5"), 3);
    }
}
