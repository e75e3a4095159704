//! Authentication types for session tokens and the auth API surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims for session tokens. The token carries only the subject id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user session.
    #[must_use]
    pub fn new(user_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            sub: user_id,
            iat: Utc::now().timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }
}

/// Registration request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    /// Display name.
    pub name: Option<String>,
    /// User email.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
    /// Employment classification (`PartTimer` or `FullTimer`).
    pub employment_type: Option<String>,
}

/// Login request payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// User email.
    pub email: Option<String>,
    /// Plaintext password.
    pub password: Option<String>,
}

/// Public user projection returned by auth endpoints. Never carries
/// password or OTP fields.
#[derive(Debug, Clone, Serialize)]
pub struct UserPublic {
    /// User ID.
    pub id: Uuid,
    /// Display name.
    pub name: String,
    /// User email.
    pub email: String,
}

/// Email verification request.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyEmailRequest {
    /// The 6-digit OTP from the verification email.
    pub otp: Option<String>,
}

/// Password-reset OTP request.
#[derive(Debug, Clone, Deserialize)]
pub struct SendResetOtpRequest {
    /// Account email.
    pub email: Option<String>,
}

/// Password-reset OTP check request.
#[derive(Debug, Clone, Deserialize)]
pub struct VerifyResetOtpRequest {
    /// Account email.
    pub email: Option<String>,
    /// The 6-digit reset OTP.
    pub otp: Option<String>,
}

/// Password reset completion request.
#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    /// Account email.
    pub email: Option<String>,
    /// The 6-digit reset OTP.
    pub otp: Option<String>,
    /// New plaintext password.
    pub new_password: Option<String>,
    /// Confirmation of the new password.
    pub confirm_password: Option<String>,
}

/// Profile update request. Any subset of the fields may be supplied.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UpdateProfileRequest {
    /// New display name.
    pub name: Option<String>,
    /// New employment classification.
    pub employment_type: Option<String>,
    /// Current password, required when changing the password.
    pub old_password: Option<String>,
    /// New plaintext password.
    pub new_password: Option<String>,
    /// New profile picture as a `data:image/...` URI.
    pub profile_picture: Option<String>,
}

/// Profile picture upload request.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadPictureRequest {
    /// Profile picture as a `data:image/...` URI.
    pub profile_picture: Option<String>,
}

/// Account deletion request. The caller re-asserts their own credentials.
#[derive(Debug, Clone, Deserialize)]
pub struct DeleteAccountRequest {
    /// Account email, must match the authenticated account.
    pub email: Option<String>,
    /// Current plaintext password.
    pub password: Option<String>,
}
