use sea_orm::DatabaseConnection;

use crate::infra::db::{DbRecordRepository, DbUserRepository};
use crate::infra::password::Argon2Hasher;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub hasher: Argon2Hasher,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn record_repo(&self) -> DbRecordRepository {
        DbRecordRepository {
            db: self.db.clone(),
        }
    }

    pub fn hasher(&self) -> Argon2Hasher {
        self.hasher.clone()
    }
}
