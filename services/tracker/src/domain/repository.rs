#![allow(async_fn_in_trait)]

use biblia_domain::id::{Isbn, UserId};

use crate::domain::types::{NewUser, ReadingRecord, RecordFilter, User, UserFilter};
use crate::error::TrackerError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    /// Users in id order, optionally narrowed by `filter`.
    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, TrackerError>;
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, TrackerError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, TrackerError>;
    /// Insert and return the stored row. `UsernameTaken` on a duplicate username.
    async fn create(&self, user: &NewUser) -> Result<User, TrackerError>;
    /// Overwrite every mutable column. `UsernameTaken` on a duplicate username.
    async fn save(&self, user: &User) -> Result<(), TrackerError>;
    /// Delete the user and all of their records. Returns `true` if a row was deleted.
    async fn delete(&self, id: UserId) -> Result<bool, TrackerError>;
}

/// Repository for reading records.
pub trait RecordRepository: Send + Sync {
    /// Records in `(user_id, isbn)` order matching every set field of `filter`.
    async fn find(&self, filter: &RecordFilter) -> Result<Vec<ReadingRecord>, TrackerError>;
    /// All records owned by any of `user_ids`, in one round trip.
    async fn find_by_users(&self, user_ids: &[UserId]) -> Result<Vec<ReadingRecord>, TrackerError>;
    async fn find_one(
        &self,
        user_id: UserId,
        isbn: &Isbn,
    ) -> Result<Option<ReadingRecord>, TrackerError>;
    /// `RecordAlreadyExists` on a duplicate key, `UserNotFound` if the owner is gone.
    async fn create(&self, record: &ReadingRecord) -> Result<(), TrackerError>;
    async fn save(&self, record: &ReadingRecord) -> Result<(), TrackerError>;
    /// Returns `true` if a row was deleted.
    async fn delete(&self, user_id: UserId, isbn: &Isbn) -> Result<bool, TrackerError>;
}

/// One-way password hashing. CPU-bound work must not run on the async worker.
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, plaintext: &str) -> Result<String, TrackerError>;
    /// `Ok(false)` on mismatch; `Err` only when `hash` is unreadable.
    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, TrackerError>;
}
