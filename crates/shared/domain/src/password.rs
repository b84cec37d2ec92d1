//! Argon2 password hashes for member and admin accounts.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::constants::{MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH};
use crate::error::{DomainError, DomainResult};

/// Well-formed hash of a random secret. Verified against when the login email
/// is unknown so both paths pay for one Argon2 run.
pub const DUMMY_PASSWORD_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$ZHVtbXlzYWx0MTIzNDU2$2N4rQw2c8cDq3v1bq6mCw1y2pW2x0mH5b6rKk3n7y2Q";

/// A stored password hash. Plain text never outlives [`Password::new`].
#[derive(Clone)]
pub struct Password {
    hash: String,
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password([REDACTED])")
    }
}

impl Password {
    /// Check the length policy and hash with a fresh salt.
    pub fn new(plain_text: &str) -> DomainResult<Self> {
        let length = plain_text.chars().count();
        if length < MIN_PASSWORD_LENGTH {
            return Err(DomainError::password(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }
        if length > MAX_PASSWORD_LENGTH {
            return Err(DomainError::password(format!(
                "Password may not exceed {} characters",
                MAX_PASSWORD_LENGTH
            )));
        }

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(plain_text.as_bytes(), &salt)
            .map_err(|e| DomainError::internal(format!("Password hash failed: {}", e)))?
            .to_string();
        Ok(Self { hash })
    }

    /// Wrap a hash read back from the `users` or `admin_users` table.
    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self { hash: hash.into() }
    }

    pub fn into_string(self) -> String {
        self.hash
    }

    /// An unparseable stored hash never verifies.
    pub fn verify(&self, plain_text: &str) -> bool {
        match PasswordHash::new(&self.hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(plain_text.as_bytes(), &parsed)
                .is_ok(),
            Err(e) => {
                tracing::warn!(error = %e, "Stored password hash is malformed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original() {
        let password = Password::new("alleluia-amen-2024").unwrap();

        assert!(password.verify("alleluia-amen-2024"));
        assert!(!password.verify("alleluia-amen-2025"));
    }

    #[test]
    fn stored_hash_round_trips() {
        let stored = Password::new("kyrie-eleison").unwrap().into_string();

        assert!(stored.starts_with("$argon2id$"));
        assert!(Password::from_hash(stored).verify("kyrie-eleison"));
    }

    #[test]
    fn each_hash_gets_its_own_salt() {
        let first = Password::new("gloria-in-excelsis").unwrap().into_string();
        let second = Password::new("gloria-in-excelsis").unwrap().into_string();

        assert_ne!(first, second);
    }

    #[test]
    fn length_policy_is_enforced() {
        assert!(matches!(Password::new("short"), Err(DomainError::Password(_))));
        let long = "a".repeat(MAX_PASSWORD_LENGTH + 1);
        assert!(matches!(Password::new(&long), Err(DomainError::Password(_))));
    }

    #[test]
    fn malformed_or_dummy_hash_never_verifies() {
        assert!(!Password::from_hash("not-a-phc-string").verify("anything"));
        assert!(!Password::from_hash(DUMMY_PASSWORD_HASH).verify("anything-at-all"));
    }

    #[test]
    fn debug_output_hides_the_hash() {
        let password = Password::new("sanctus-sanctus").unwrap();
        assert_eq!(format!("{:?}", password), "Password([REDACTED])");
    }
}
