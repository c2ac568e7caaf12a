//! Password composition rules enforced at registration time.

use regex::Regex;
use thiserror::Error;

/// Minimum password length in characters
pub const MIN_LENGTH: usize = 8;

/// Maximum password length in characters
pub const MAX_LENGTH: usize = 64;

/// Special characters a password may (and must) draw from
pub const SPECIAL_CHARS: &str = "!@#$%^&*";

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("must be between 8 and 64 characters")]
    Length,
    #[error("must contain at least one uppercase letter")]
    MissingUppercase,
    #[error("must contain at least one lowercase letter")]
    MissingLowercase,
    #[error("must contain at least one digit")]
    MissingDigit,
    #[error("must contain at least one of !@#$%^&*")]
    MissingSpecial,
    #[error("may only contain letters, digits and !@#$%^&*")]
    ForbiddenCharacter,
}

/// Check a candidate password against the composition rules, reporting the
/// first violated rule.
pub fn validate(password: &str) -> Result<(), PolicyViolation> {
    let length = password.chars().count();
    if length < MIN_LENGTH || length > MAX_LENGTH {
        return Err(PolicyViolation::Length);
    }

    if !Regex::new(r"^[a-zA-Z0-9!@#$%^&*]+$").is_ok_and(|re| re.is_match(password)) {
        return Err(PolicyViolation::ForbiddenCharacter);
    }

    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(PolicyViolation::MissingUppercase);
    }

    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(PolicyViolation::MissingLowercase);
    }

    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(PolicyViolation::MissingDigit);
    }

    if !password.chars().any(|c| SPECIAL_CHARS.contains(c)) {
        return Err(PolicyViolation::MissingSpecial);
    }

    Ok(())
}
