use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{
    PasswordHash, PasswordHasher as _, PasswordVerifier as _, SaltString,
};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::domain::repository::PasswordHasher;
use crate::error::TrackerError;

/// Argon2id hasher producing PHC strings with a fresh random salt per call.
#[derive(Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

impl Default for Argon2Hasher {
    fn default() -> Self {
        Self::new(Params::default())
    }
}

impl PasswordHasher for Argon2Hasher {
    async fn hash(&self, plaintext: &str) -> Result<String, TrackerError> {
        let argon2 = self.argon2();
        let plaintext = plaintext.to_owned();
        blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(plaintext.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| TrackerError::Hashing(e.to_string()))
        })
        .await
    }

    async fn verify(&self, plaintext: &str, hash: &str) -> Result<bool, TrackerError> {
        let argon2 = self.argon2();
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();
        blocking(move || {
            let parsed =
                PasswordHash::new(&hash).map_err(|e| TrackerError::Hashing(e.to_string()))?;
            // Parameters embedded in the PHC string win over `self.params`.
            Ok(argon2.verify_password(plaintext.as_bytes(), &parsed).is_ok())
        })
        .await
    }
}

/// Run an Argon2 call on the blocking pool.
async fn blocking<T, F>(work: F) -> Result<T, TrackerError>
where
    F: FnOnce() -> Result<T, TrackerError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| TrackerError::Hashing(format!("hashing task failed: {e}")))?
}
