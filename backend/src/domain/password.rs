//! Salted credential hashing.
//!
//! Passwords are never stored or compared in plaintext. A hash carries its
//! own random salt so equal passwords never produce equal hashes.

use rand::RngCore;
use sha2::{Digest, Sha256};

const SALT_LEN: usize = 16;
const SEPARATOR: char = '$';

/// Salted SHA-256 digest of a password, encoded as `salt_hex$digest_hex`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash a password with a fresh random salt.
    pub fn derive(password: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::derive_with_salt(password, &salt)
    }

    fn derive_with_salt(password: &str, salt: &[u8]) -> Self {
        Self(format!(
            "{}{SEPARATOR}{}",
            hex::encode(salt),
            hex::encode(Self::digest(password, salt)),
        ))
    }

    fn digest(password: &str, salt: &[u8]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(salt);
        hasher.update(password.as_bytes());
        hasher.finalize().into()
    }

    /// Check a candidate password against this hash.
    ///
    /// A malformed stored encoding verifies as false rather than erroring;
    /// login failures must stay indistinguishable from bad credentials.
    pub fn verify(&self, password: &str) -> bool {
        let Some((salt_hex, digest_hex)) = self.0.split_once(SEPARATOR) else {
            return false;
        };
        let Ok(salt) = hex::decode(salt_hex) else {
            return false;
        };
        hex::encode(Self::digest(password, &salt)) == digest_hex
    }

    /// Encoded form, suitable for storage.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<PasswordHash> for String {
    fn from(value: PasswordHash) -> Self {
        value.0
    }
}
