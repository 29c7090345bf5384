//! Validation failures raised by domain rules.

/// A field-level rule was violated. Always caught before anything is persisted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("username must be between {min} and {max} characters")]
    UsernameLength { min: usize, max: usize },
    #[error("password must be at least {min} characters long")]
    PasswordTooShort { min: usize },
    #[error("invalid email address")]
    InvalidEmail,
    #[error("userID is required")]
    MissingUserId,
    #[error("userID must be a positive integer")]
    InvalidUserId,
    #[error("isbn is required")]
    EmptyIsbn,
    #[error("isbn must be at most {max} characters")]
    IsbnTooLong { max: usize },
    #[error("title is required")]
    EmptyTitle,
    #[error("{field} must not be negative")]
    NegativePage { field: &'static str },
    #[error("current page cannot exceed total pages")]
    PageOutOfRange,
    #[error("unknown reading status `{0}`")]
    UnknownStatus(String),
}
