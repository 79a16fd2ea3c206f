//! Argon2id password hashing and verification.

use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher as ArgonHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use tracing::warn;

use keroosha_core::AppError;
use keroosha_core::result::AppResult;

/// One-way password encoding with a known verification contract.
pub trait PasswordEncoder: Send + Sync + std::fmt::Debug + 'static {
    /// Produces a salted hash; every call uses a new salt.
    fn encode(&self, plaintext: &str) -> AppResult<String>;

    /// Checks `plaintext` against a stored hash. Never fails: an unreadable
    /// hash simply does not verify.
    fn verify(&self, hash: &str, plaintext: &str) -> bool;
}

/// Argon2id encoder producing PHC strings.
#[derive(Debug, Clone, Default)]
pub struct Argon2PasswordEncoder;

impl Argon2PasswordEncoder {
    /// Creates a new encoder instance.
    pub fn new() -> Self {
        Self
    }
}

impl PasswordEncoder for Argon2PasswordEncoder {
    fn encode(&self, plaintext: &str) -> AppResult<String> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let hash = argon2
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| AppError::crypto(format!("Password hashing failed: {e}")))?;

        Ok(hash.to_string())
    }

    fn verify(&self, hash: &str, plaintext: &str) -> bool {
        let parsed_hash = match PasswordHash::new(hash) {
            Ok(h) => h,
            Err(e) => {
                warn!(error = %e, "Stored password hash is not a valid PHC string");
                return false;
            }
        };

        match Argon2::default().verify_password(plaintext.as_bytes(), &parsed_hash) {
            Ok(()) => true,
            Err(argon2::password_hash::Error::Password) => false,
            Err(e) => {
                warn!(error = %e, "Password verification failed");
                false
            }
        }
    }
}
