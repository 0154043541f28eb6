use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{self, PasswordHasher as _, SaltString, rand_core},
};
use campus_core::{HashingError, Password, PasswordHasher};
use secrecy::{ExposeSecret, Secret};

const MEMORY_COST_KIB: u32 = 15000;
const ITERATIONS: u32 = 2;
const PARALLELISM: u32 = 1;

// Same parameters as real hashes; the all-zero output matches no password.
const DECOY_HASH: &str = "$argon2id$v=19$m=15000,t=2,p=1$c29tZXNhbHRzb21lc2FsdA$\
                          AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

/// Argon2id hasher producing PHC strings with a random per-hash salt.
///
/// Hashing is CPU bound, so both operations run on the blocking pool.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

fn argon2() -> Result<Argon2<'static>, HashingError> {
    let params = Params::new(MEMORY_COST_KIB, ITERATIONS, PARALLELISM, None)
        .map_err(|e| HashingError::UnexpectedError(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

#[async_trait::async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    #[tracing::instrument(name = "Computing password hash", skip_all)]
    async fn hash(&self, password: &Password) -> Result<Secret<String>, HashingError> {
        let current_span: tracing::Span = tracing::Span::current();
        let password = password.clone();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(move || {
                let salt: SaltString = SaltString::generate(rand_core::OsRng);
                argon2()?
                    .hash_password(password.as_ref().expose_secret().as_bytes(), &salt)
                    .map(|h| Secret::from(h.to_string()))
                    .map_err(|e| HashingError::UnexpectedError(e.to_string()))
            })
        })
        .await
        .map_err(|e| HashingError::UnexpectedError(e.to_string()))?
    }

    #[tracing::instrument(name = "Verify password hash", skip_all)]
    async fn verify(
        &self,
        password: &Password,
        password_hash: &Secret<String>,
    ) -> Result<bool, HashingError> {
        let current_span: tracing::Span = tracing::Span::current();
        let password = password.clone();
        let password_hash = password_hash.clone();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| {
                let expected_password_hash = PasswordHash::new(password_hash.expose_secret())
                    .map_err(|e| HashingError::UnexpectedError(e.to_string()))?;

                match argon2()?.verify_password(
                    password.as_ref().expose_secret().as_bytes(),
                    &expected_password_hash,
                ) {
                    Ok(()) => Ok(true),
                    Err(password_hash::Error::Password) => Ok(false),
                    Err(e) => Err(HashingError::UnexpectedError(e.to_string())),
                }
            })
        })
        .await
        .map_err(|e| HashingError::UnexpectedError(e.to_string()))?
    }

    fn decoy_hash(&self) -> Secret<String> {
        Secret::from(DECOY_HASH.to_string())
    }
}
