use std::collections::HashMap;

use chrono::Utc;

use biblia_domain::id::UserId;
use biblia_domain::user::{
    normalize_email, normalize_genres, validate_email, validate_password, validate_username,
};

use crate::domain::repository::{PasswordHasher, RecordRepository, UserRepository};
use crate::domain::types::{NewUser, RecordFilter, User, UserFilter, UserWithRecords};
use crate::error::TrackerError;

/// Attach every record `user` owns.
pub(crate) async fn with_records<R: RecordRepository>(
    records: &R,
    user: User,
) -> Result<UserWithRecords, TrackerError> {
    let records = records
        .find(&RecordFilter {
            user_id: Some(user.id),
            isbn: None,
        })
        .await?;
    Ok(UserWithRecords { user, records })
}

/// Credentials and profile fields shared by register and update.
pub struct UserInput {
    pub username: String,
    pub password: String,
    pub favorite_genres: Option<Vec<String>>,
    pub email: Option<String>,
}

impl UserInput {
    /// Check every field and return the normalized email, if one was given.
    fn validate(&self) -> Result<Option<String>, TrackerError> {
        validate_username(&self.username)?;
        validate_password(&self.password)?;
        let email = normalize_email(self.email.clone());
        if let Some(ref email) = email {
            validate_email(email)?;
        }
        Ok(email)
    }
}

// ── RegisterUser ─────────────────────────────────────────────────────────────

pub struct RegisterUserUseCase<U: UserRepository, H: PasswordHasher> {
    pub users: U,
    pub hasher: H,
}

impl<U: UserRepository, H: PasswordHasher> RegisterUserUseCase<U, H> {
    pub async fn execute(&self, input: UserInput) -> Result<UserWithRecords, TrackerError> {
        let email = input.validate()?;
        if self.users.find_by_username(&input.username).await?.is_some() {
            return Err(TrackerError::UsernameTaken);
        }
        let password_hash = self.hasher.hash(&input.password).await?;
        let user = self
            .users
            .create(&NewUser {
                username: input.username,
                password_hash,
                email,
                favorite_genres: normalize_genres(input.favorite_genres.unwrap_or_default()),
                created_at: Utc::now(),
            })
            .await?;
        tracing::info!(user_id = %user.id, username = %user.username, "user registered");
        Ok(UserWithRecords {
            user,
            records: vec![],
        })
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<U: UserRepository, R: RecordRepository> {
    pub users: U,
    pub records: R,
}

impl<U: UserRepository, R: RecordRepository> GetUserUseCase<U, R> {
    pub async fn execute(&self, id: UserId) -> Result<UserWithRecords, TrackerError> {
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(TrackerError::UserNotFound)?;
        with_records(&self.records, user).await
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<U: UserRepository, R: RecordRepository> {
    pub users: U,
    pub records: R,
}

impl<U: UserRepository, R: RecordRepository> ListUsersUseCase<U, R> {
    pub async fn execute(&self, filter: UserFilter) -> Result<Vec<UserWithRecords>, TrackerError> {
        let users = self.users.list(&filter).await?;
        let ids: Vec<UserId> = users.iter().map(|u| u.id).collect();

        let mut by_owner: HashMap<UserId, Vec<_>> = HashMap::new();
        for record in self.records.find_by_users(&ids).await? {
            by_owner.entry(record.user_id).or_default().push(record);
        }

        Ok(users
            .into_iter()
            .map(|user| {
                let records = by_owner.remove(&user.id).unwrap_or_default();
                UserWithRecords { user, records }
            })
            .collect())
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

pub struct UpdateUserUseCase<U: UserRepository, R: RecordRepository, H: PasswordHasher> {
    pub users: U,
    pub records: R,
    pub hasher: H,
}

impl<U, R, H> UpdateUserUseCase<U, R, H>
where
    U: UserRepository,
    R: RecordRepository,
    H: PasswordHasher,
{
    /// Absent `favorite_genres` and `email` keep the stored values.
    pub async fn execute(
        &self,
        id: UserId,
        input: UserInput,
    ) -> Result<UserWithRecords, TrackerError> {
        let email = input.validate()?;
        let mut user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(TrackerError::UserNotFound)?;

        if input.username != user.username {
            let owner = self.users.find_by_username(&input.username).await?;
            if owner.is_some_and(|other| other.id != id) {
                return Err(TrackerError::UsernameTaken);
            }
        }

        user.password_hash = self.hasher.hash(&input.password).await?;
        user.username = input.username;
        if let Some(genres) = input.favorite_genres {
            user.favorite_genres = normalize_genres(genres);
        }
        if input.email.is_some() {
            user.email = email;
        }
        user.updated_at = Utc::now();
        self.users.save(&user).await?;

        tracing::info!(user_id = %user.id, "user updated");
        with_records(&self.records, user).await
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<U: UserRepository> {
    pub users: U,
}

impl<U: UserRepository> DeleteUserUseCase<U> {
    pub async fn execute(&self, id: UserId) -> Result<(), TrackerError> {
        if !self.users.delete(id).await? {
            return Err(TrackerError::UserNotFound);
        }
        tracing::info!(user_id = %id, "user deleted with records");
        Ok(())
    }
}
