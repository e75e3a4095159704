//! Input policies for credentials and display names.

use thiserror::Error;

/// Characters allowed in passwords besides letters and digits.
const PASSWORD_SYMBOLS: &str = "!@#$%^&*";

/// Maximum display name length.
const MAX_NAME_LEN: usize = 20;

/// Policy violations for registration and profile input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PolicyError {
    /// Password shorter than 8 characters.
    #[error("Password must be at least 8 characters")]
    PasswordTooShort,
    /// Password missing a letter or a digit, or using a character outside
    /// the allowed set.
    #[error("Password must contain at least one letter and one number")]
    PasswordComposition,
    /// Name longer than 20 characters.
    #[error("Name must be 20 characters or less")]
    NameTooLong,
    /// Name containing characters other than letters, digits, and spaces.
    #[error("Name can only contain letters, numbers, or spaces")]
    NameCharset,
}

/// Validates password strength: at least 8 characters, at least one letter
/// and one digit, restricted to letters, digits, and `!@#$%^&*`.
///
/// # Errors
///
/// Returns the first violated `PolicyError` rule.
pub fn validate_password(password: &str) -> Result<(), PolicyError> {
    if password.chars().count() < 8 {
        return Err(PolicyError::PasswordTooShort);
    }

    let mut has_letter = false;
    let mut has_digit = false;
    for c in password.chars() {
        if c.is_ascii_alphabetic() {
            has_letter = true;
        } else if c.is_ascii_digit() {
            has_digit = true;
        } else if !PASSWORD_SYMBOLS.contains(c) {
            return Err(PolicyError::PasswordComposition);
        }
    }

    if has_letter && has_digit {
        Ok(())
    } else {
        Err(PolicyError::PasswordComposition)
    }
}

/// Validates a display name: non-empty, at most 20 characters, ASCII
/// letters, digits, and spaces only.
///
/// # Errors
///
/// Returns the first violated `PolicyError` rule.
pub fn validate_display_name(name: &str) -> Result<(), PolicyError> {
    if name.chars().count() > MAX_NAME_LEN {
        return Err(PolicyError::NameTooLong);
    }

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ') {
        return Err(PolicyError::NameCharset);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("abcdefg1")]
    #[case("passw0rd!")]
    #[case("A1!@#$%^&*")]
    fn test_valid_passwords(#[case] password: &str) {
        assert_eq!(validate_password(password), Ok(()));
    }

    #[rstest]
    #[case("a1b2c3", PolicyError::PasswordTooShort)]
    #[case("abcdefgh", PolicyError::PasswordComposition)]
    #[case("12345678", PolicyError::PasswordComposition)]
    #[case("abcd 1234", PolicyError::PasswordComposition)]
    #[case("abcd1234?", PolicyError::PasswordComposition)]
    fn test_invalid_passwords(#[case] password: &str, #[case] expected: PolicyError) {
        assert_eq!(validate_password(password), Err(expected));
    }

    #[rstest]
    #[case("Sam")]
    #[case("Rider 42")]
    #[case("exactly twenty chars")]
    fn test_valid_names(#[case] name: &str) {
        assert_eq!(validate_display_name(name), Ok(()));
    }

    #[rstest]
    #[case("this name is far too long", PolicyError::NameTooLong)]
    #[case("", PolicyError::NameCharset)]
    #[case("tab\tname", PolicyError::NameCharset)]
    #[case("dot.name", PolicyError::NameCharset)]
    fn test_invalid_names(#[case] name: &str, #[case] expected: PolicyError) {
        assert_eq!(validate_display_name(name), Err(expected));
    }
}
