use crate::domain::repository::{PasswordHasher, RecordRepository, UserRepository};
use crate::domain::types::UserWithRecords;
use crate::error::TrackerError;
use crate::usecase::user::with_records;

pub struct LoginInput {
    pub username: String,
    pub password: String,
}

pub struct AuthenticateUseCase<U: UserRepository, R: RecordRepository, H: PasswordHasher> {
    pub users: U,
    pub records: R,
    pub hasher: H,
}

impl<U, R, H> AuthenticateUseCase<U, R, H>
where
    U: UserRepository,
    R: RecordRepository,
    H: PasswordHasher,
{
    /// Unknown username and wrong password fail identically.
    pub async fn execute(&self, input: LoginInput) -> Result<UserWithRecords, TrackerError> {
        let Some(user) = self.users.find_by_username(&input.username).await? else {
            tracing::warn!(username = %input.username, "login rejected: unknown username");
            return Err(TrackerError::InvalidCredentials);
        };
        if !self
            .hasher
            .verify(&input.password, &user.password_hash)
            .await? {
            tracing::warn!(user_id = %user.id, "login rejected: wrong password");
            return Err(TrackerError::InvalidCredentials);
        }
        with_records(&self.records, user).await
    }
}
