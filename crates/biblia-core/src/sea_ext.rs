use sea_orm::{DbErr, SqlErr};

/// Whether `err` is a unique or primary-key constraint violation.
///
/// Works across the Postgres and SQLite drivers.
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Whether `err` is a foreign-key constraint violation.
pub fn is_foreign_key_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::ForeignKeyConstraintViolation(_)))
}
