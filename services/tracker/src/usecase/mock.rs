//! In-memory repositories and a fake hasher for use-case tests.

use std::sync::{Arc, Mutex};

use chrono::Utc;

use biblia_domain::id::{Isbn, UserId};
use biblia_domain::record::{Progress, ReadingStatus, ReadingTimeline};

use crate::domain::repository::{PasswordHasher, RecordRepository, UserRepository};
use crate::domain::types::{NewUser, ReadingRecord, RecordFilter, User, UserFilter};
use crate::error::TrackerError;

// ── MockStore ────────────────────────────────────────────────────────────────

/// Both repositories over one shared pair of tables. Clones share state.
#[derive(Clone, Default)]
pub struct MockStore {
    pub users: Arc<Mutex<Vec<User>>>,
    pub records: Arc<Mutex<Vec<ReadingRecord>>>,
}

impl MockStore {
    pub fn with_users(users: Vec<User>) -> Self {
        Self {
            users: Arc::new(Mutex::new(users)),
            ..Self::default()
        }
    }

    pub fn seed_record(&self, record: ReadingRecord) {
        self.records.lock().unwrap().push(record);
    }

    pub fn user_count(&self) -> usize {
        self.users.lock().unwrap().len()
    }

    pub fn record(&self, user_id: i32, isbn: &str) -> Option<ReadingRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.user_id.0 == user_id && r.isbn.as_str() == isbn)
            .cloned()
    }
}

impl UserRepository for MockStore {
    async fn list(&self, filter: &UserFilter) -> Result<Vec<User>, TrackerError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| filter.username.as_ref().is_none_or(|name| &u.username == name))
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, TrackerError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, TrackerError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create(&self, user: &NewUser) -> Result<User, TrackerError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.username == user.username) {
            return Err(TrackerError::UsernameTaken);
        }
        let next_id = users.iter().map(|u| u.id.0).max().unwrap_or(0) + 1;
        let created = User {
            id: UserId(next_id),
            username: user.username.clone(),
            password_hash: user.password_hash.clone(),
            email: user.email.clone(),
            favorite_genres: user.favorite_genres.clone(),
            created_at: user.created_at,
            updated_at: user.created_at,
        };
        users.push(created.clone());
        Ok(created)
    }

    async fn save(&self, user: &User) -> Result<(), TrackerError> {
        let mut users = self.users.lock().unwrap();
        if users
            .iter()
            .any(|u| u.id != user.id && u.username == user.username)
        {
            return Err(TrackerError::UsernameTaken);
        }
        let slot = users
            .iter_mut()
            .find(|u| u.id == user.id)
            .ok_or(TrackerError::UserNotFound)?;
        *slot = user.clone();
        Ok(())
    }

    async fn delete(&self, id: UserId) -> Result<bool, TrackerError> {
        let mut users = self.users.lock().unwrap();
        let before = users.len();
        users.retain(|u| u.id != id);
        self.records.lock().unwrap().retain(|r| r.user_id != id);
        Ok(users.len() < before)
    }
}

impl RecordRepository for MockStore {
    async fn find(&self, filter: &RecordFilter) -> Result<Vec<ReadingRecord>, TrackerError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter.user_id.is_none_or(|id| r.user_id == id))
            .filter(|r| filter.isbn.as_ref().is_none_or(|isbn| &r.isbn == isbn))
            .cloned()
            .collect())
    }

    async fn find_by_users(&self, user_ids: &[UserId]) -> Result<Vec<ReadingRecord>, TrackerError> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| user_ids.contains(&r.user_id))
            .cloned()
            .collect())
    }

    async fn find_one(
        &self,
        user_id: UserId,
        isbn: &Isbn,
    ) -> Result<Option<ReadingRecord>, TrackerError> {
        Ok(self.record(user_id.0, isbn.as_str()))
    }

    async fn create(&self, record: &ReadingRecord) -> Result<(), TrackerError> {
        let mut records = self.records.lock().unwrap();
        if records
            .iter()
            .any(|r| r.user_id == record.user_id && r.isbn == record.isbn)
        {
            return Err(TrackerError::RecordAlreadyExists);
        }
        records.push(record.clone());
        Ok(())
    }

    async fn save(&self, record: &ReadingRecord) -> Result<(), TrackerError> {
        let mut records = self.records.lock().unwrap();
        let slot = records
            .iter_mut()
            .find(|r| r.user_id == record.user_id && r.isbn == record.isbn)
            .ok_or(TrackerError::RecordNotFound)?;
        *slot = record.clone();
        Ok(())
    }

    async fn delete(&self, user_id: UserId, isbn: &Isbn) -> Result<bool, TrackerError> {
        let mut records = self.records.lock().unwrap();
        let before = records.len();
        records.retain(|r| !(r.user_id == user_id && &r.isbn == isbn));
        Ok(records.len() < before)
    }
}

// ── FakeHasher ───────────────────────────────────────────────────────────────

/// Reversible stand-in for Argon2 so tests stay fast.
#[derive(Clone, Default)]
pub struct FakeHasher;

impl PasswordHasher for FakeHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, TrackerError> {
        Ok(format!("hashed:{plaintext}"))
    }

    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, TrackerError> {
        let stored = hash
            .strip_prefix("hashed:")
            .ok_or_else(|| TrackerError::Hashing("not a fake hash".into()))?;
        Ok(stored == plaintext)
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(id: i32, username: &str) -> User {
    let now = Utc::now();
    User {
        id: UserId(id),
        username: username.to_owned(),
        password_hash: "hashed:secret1".to_owned(),
        email: None,
        favorite_genres: vec![],
        created_at: now,
        updated_at: now,
    }
}

pub fn test_record(user_id: i32, isbn: &str, current_page: i32, total_pages: i32) -> ReadingRecord {
    let now = Utc::now();
    ReadingRecord {
        user_id: UserId(user_id),
        isbn: Isbn::parse(isbn).unwrap(),
        title: "Dune".to_owned(),
        author: Some("Frank Herbert".to_owned()),
        cover: None,
        genre: None,
        status: ReadingStatus::Reading,
        progress: Progress::new(current_page, total_pages).unwrap(),
        timeline: ReadingTimeline {
            started_at: Some(now),
            ..ReadingTimeline::default()
        },
        created_at: now,
        updated_at: now,
    }
}
