use crate::error::IdentityError;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Argon2id hashing with PHC-formatted output.
#[derive(Debug, Clone, Default)]
pub struct Passwords {
    argon: Argon2<'static>,
}

impl Passwords {
    /// # Errors
    ///
    /// [`IdentityError::Password`] if the hasher rejects the input.
    pub fn hash(&self, password: &str) -> Result<String, IdentityError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| IdentityError::Password { message: err.to_string().into() })
    }

    /// `false` for a wrong password and for a stored hash that does not parse.
    #[must_use]
    pub fn verify(&self, password: &str, stored: &str) -> bool {
        PasswordHash::new(stored)
            .is_ok_and(|parsed| self.argon.verify_password(password.as_bytes(), &parsed).is_ok())
    }
}
