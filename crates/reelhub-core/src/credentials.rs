//! Password digests. Credentials are stored as salted SHA-256, never in the clear.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

const SALT_LEN: usize = 16;

/// A salted password digest, hex-encoded for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordDigest {
    pub salt: String,
    pub digest: String,
}

impl PasswordDigest {
    /// Digest `password` with a freshly generated random salt.
    #[must_use]
    pub fn new(password: &str) -> Self {
        let salt = hex::encode(rand::random::<[u8; SALT_LEN]>());
        let digest = digest_with_salt(&salt, password);
        Self { salt, digest }
    }

    /// Constant-time check of `candidate` against a stored salt and digest.
    #[must_use]
    pub fn verify(salt: &str, digest: &str, candidate: &str) -> bool {
        let computed = digest_with_salt(salt, candidate);
        computed.as_bytes().ct_eq(digest.as_bytes()).into()
    }
}

fn digest_with_salt(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn correct_password_verifies() {
        let stored = PasswordDigest::new("pw1");
        assert!(PasswordDigest::verify(&stored.salt, &stored.digest, "pw1"));
    }

    #[test]
    fn wrong_password_is_rejected() {
        let stored = PasswordDigest::new("pw1");
        assert!(!PasswordDigest::verify(&stored.salt, &stored.digest, "wrong"));
        assert!(!PasswordDigest::verify(&stored.salt, &stored.digest, ""));
    }

    #[test]
    fn digest_never_contains_plaintext() {
        let stored = PasswordDigest::new("hunter2");
        assert!(!stored.digest.contains("hunter2"));
        assert_eq!(stored.digest.len(), 64);
        assert_eq!(stored.salt.len(), SALT_LEN * 2);
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let a = PasswordDigest::new("same");
        let b = PasswordDigest::new("same");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.digest, b.digest);
    }
}
