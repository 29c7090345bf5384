//! User account rules.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex is valid"));

/// Username length is counted in characters, not bytes.
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    let len = username.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(ValidationError::UsernameLength {
            min: USERNAME_MIN_LEN,
            max: USERNAME_MAX_LEN,
        });
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < PASSWORD_MIN_LEN {
        return Err(ValidationError::PasswordTooShort {
            min: PASSWORD_MIN_LEN,
        });
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail)
    }
}

/// Trim every genre and drop blank entries, keeping the caller's order.
pub fn normalize_genres(genres: Vec<String>) -> Vec<String> {
    genres
        .into_iter()
        .map(|g| g.trim().to_owned())
        .filter(|g| !g.is_empty())
        .collect()
}

/// Lowercase and trim an optional email; an empty string counts as absent.
pub fn normalize_email(email: Option<String>) -> Option<String> {
    email
        .map(|e| e.trim().to_lowercase())
        .filter(|e| !e.is_empty())
}
