//! Password hashing.

use argon2::{
    Argon2,
    password_hash::{
        self, PasswordHash, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};

use super::AuthError;

/// One-way password hashing.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing digest.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::PasswordHash` if hashing fails.
    fn hash(&self, plaintext: &str) -> Result<String, AuthError>;

    /// Returns true if `plaintext` matches `digest`.
    ///
    /// A malformed digest never matches.
    fn verify(&self, plaintext: &str, digest: &str) -> bool;
}

/// Argon2id with default parameters; digests are PHC strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct Argon2Hasher;

impl PasswordHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        password_hash::PasswordHasher::hash_password(&argon2, plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|_| AuthError::PasswordHash)
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(digest) else {
            return false;
        };

        Argon2::default()
            .verify_password(plaintext.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
