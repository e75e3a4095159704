//! One-time codes for email verification and password reset.
//!
//! Codes are six decimal digits drawn uniformly from 100000-999999 using a
//! cryptographically secure generator.

use chrono::Duration;
use rand::Rng;

/// Smallest issued code.
pub const OTP_MIN: u32 = 100_000;
/// Largest issued code.
pub const OTP_MAX: u32 = 999_999;

/// Validity window for account verification codes.
#[must_use]
pub fn verify_otp_ttl() -> Duration {
    Duration::hours(1)
}

/// Validity window for password reset codes.
#[must_use]
pub fn reset_otp_ttl() -> Duration {
    Duration::minutes(10)
}

/// Generates a fresh six-digit code.
#[must_use]
pub fn generate() -> String {
    rand::rng().random_range(OTP_MIN..=OTP_MAX).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_format() {
        for _ in 0..200 {
            let otp = generate();
            assert_eq!(otp.len(), 6);
            let value: u32 = otp.parse().unwrap();
            assert!((OTP_MIN..=OTP_MAX).contains(&value));
        }
    }

    #[test]
    fn test_ttl_constants() {
        assert_eq!(verify_otp_ttl(), Duration::hours(1));
        assert_eq!(reset_otp_ttl(), Duration::minutes(10));
    }
}
