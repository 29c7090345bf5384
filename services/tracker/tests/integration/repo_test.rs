//! Constraint mapping in the SeaORM repositories, without the use-case pre-checks.

use chrono::Utc;

use biblia_domain::id::{Isbn, UserId};
use biblia_domain::record::{Progress, ReadingStatus, ReadingTimeline};
use biblia_tracker::domain::repository::{RecordRepository, UserRepository};
use biblia_tracker::domain::types::{NewUser, ReadingRecord};
use biblia_tracker::error::TrackerError;
use biblia_tracker::infra::db::{DbRecordRepository, DbUserRepository};

use crate::helpers::test_db;

fn new_user(username: &str) -> NewUser {
    NewUser {
        username: username.to_owned(),
        password_hash: "$argon2id$v=19$stub".to_owned(),
        email: None,
        favorite_genres: vec![],
        created_at: Utc::now(),
    }
}

fn record(user_id: UserId, isbn: &str) -> ReadingRecord {
    let now = Utc::now();
    ReadingRecord {
        user_id,
        isbn: Isbn::parse(isbn).unwrap(),
        title: "Dune".to_owned(),
        author: None,
        cover: None,
        genre: None,
        status: ReadingStatus::Reading,
        progress: Progress::new(0, 400).unwrap(),
        timeline: ReadingTimeline {
            started_at: Some(now),
            ..ReadingTimeline::default()
        },
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn should_map_duplicate_username_on_insert() {
    let users = DbUserRepository { db: test_db().await };

    users.create(&new_user("alice")).await.unwrap();
    let result = users.create(&new_user("alice")).await;

    assert!(matches!(result, Err(TrackerError::UsernameTaken)));
}

#[tokio::test]
async fn should_map_duplicate_username_on_save() {
    let users = DbUserRepository { db: test_db().await };

    users.create(&new_user("alice")).await.unwrap();
    let mut bob = users.create(&new_user("bob")).await.unwrap();
    bob.username = "alice".to_owned();

    assert!(matches!(
        users.save(&bob).await,
        Err(TrackerError::UsernameTaken)
    ));
}

#[tokio::test]
async fn should_map_missing_user_on_save() {
    let users = DbUserRepository { db: test_db().await };

    let mut ghost = users.create(&new_user("ghost")).await.unwrap();
    users.delete(ghost.id).await.unwrap();
    ghost.username = "ghost2".to_owned();

    assert!(matches!(
        users.save(&ghost).await,
        Err(TrackerError::UserNotFound)
    ));
}

#[tokio::test]
async fn should_map_duplicate_record_key() {
    let db = test_db().await;
    let users = DbUserRepository { db: db.clone() };
    let records = DbRecordRepository { db };

    let alice = users.create(&new_user("alice")).await.unwrap();
    records.create(&record(alice.id, "123")).await.unwrap();
    let result = records.create(&record(alice.id, "123")).await;

    assert!(matches!(result, Err(TrackerError::RecordAlreadyExists)));
}

#[tokio::test]
async fn should_map_record_for_missing_owner() {
    let records = DbRecordRepository { db: test_db().await };

    let result = records.create(&record(UserId(999), "123")).await;

    assert!(matches!(result, Err(TrackerError::UserNotFound)));
}
