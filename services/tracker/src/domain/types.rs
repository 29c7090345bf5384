use chrono::{DateTime, Utc};

use biblia_domain::id::{Isbn, UserId};
use biblia_domain::record::{Progress, ReadingStatus, ReadingTimeline};

/// Account as stored. Deliberately not `Serialize`: it carries the password hash.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub favorite_genres: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Account about to be inserted; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub favorite_genres: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// A user together with all of their reading records.
#[derive(Debug, Clone)]
pub struct UserWithRecords {
    pub user: User,
    pub records: Vec<ReadingRecord>,
}

/// One user's progress through one book.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadingRecord {
    pub user_id: UserId,
    pub isbn: Isbn,
    pub title: String,
    pub author: Option<String>,
    pub cover: Option<String>,
    pub genre: Option<String>,
    pub status: ReadingStatus,
    pub progress: Progress,
    pub timeline: ReadingTimeline,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    /// Exact match.
    pub username: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub user_id: Option<UserId>,
    pub isbn: Option<Isbn>,
}
